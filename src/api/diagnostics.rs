use super::AppState;
use crate::config::Config;
use crate::store::DocumentStore;
use axum::{extract::State, Json};
use axum_extra::response::ErasedJson;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const ROOT_MESSAGE: &str = "Notepad Backend Running";
const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(value: &Option<String>) -> String {
    if value.is_some() { "✅ Set" } else { "❌ Not Set" }.to_string()
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

/// Builds the diagnostic report. Store failures end up in the `database`
/// status string, they are never returned.
pub fn health_report(store: Option<&dyn DocumentStore>, config: &Config) -> HealthReport {
    let mut report = HealthReport {
        backend: "✅ Running".to_string(),
        database: "⚠️  Available but not initialized".to_string(),
        database_url: set_or_not(&config.database_url),
        database_name: set_or_not(&config.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if let Some(store) = store {
        report.connection_status = "Connected".to_string();
        match store.collection_names() {
            Ok(mut names) => {
                names.truncate(MAX_COLLECTIONS);
                report.collections = names;
                report.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string()));
            }
        }
    }

    report
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

pub async fn health(State(state): State<AppState>) -> ErasedJson {
    ErasedJson::pretty(health_report(state.store.as_deref(), &state.config))
}

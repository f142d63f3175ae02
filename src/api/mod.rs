pub mod diagnostics;
mod error;
pub mod folders;
pub mod notes;
mod state;

pub use error::{ApiError, ErrorDetail, JsonBody};
pub use folders::CreateFolderRequest;
pub use notes::{CreateNoteRequest, ListNotesParams};
pub use state::AppState;

use crate::HEALTH_API;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Response types
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Wrapper for every list endpoint.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(diagnostics::root))
        .route(format!("/{HEALTH_API}").as_str(), get(diagnostics::health))
        .merge(notes::create_router())
        .merge(folders::create_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub mod folders;
pub mod notes;

pub use crate::api::diagnostics::HealthReport;
pub use folders::*;
pub use notes::*;

use crate::api::ErrorDetail;
use crate::HEALTH_API;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    Validation(String),

    #[error("Unexpected server error ({0}): {1}")]
    ServerError(StatusCode, String),
}

// Pulls `detail` out of an error body, falling back to the raw text.
async fn error_detail(response: Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    serde_json::from_str::<ErrorDetail>(&text)
        .map(|body| body.detail)
        .unwrap_or(text)
}

pub(crate) async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let detail = error_detail(response).await;
    Err(match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(detail),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(detail),
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(detail),
        _ => ClientError::ServerError(status, detail),
    })
}

pub async fn fetch_health(base_url: &str) -> Result<HealthReport, ClientError> {
    let url = format!("{}/{HEALTH_API}", base_url);
    let response = reqwest::get(url).await?;
    read_response(response).await
}

pub async fn fetch_root_message(base_url: &str) -> Result<String, ClientError> {
    #[derive(serde::Deserialize)]
    struct RootMessage {
        message: String,
    }

    let response = reqwest::get(format!("{}/", base_url)).await?;
    let body: RootMessage = read_response(response).await?;
    Ok(body.message)
}

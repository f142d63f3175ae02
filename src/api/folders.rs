use super::{ApiError, AppState, CreatedResponse, ItemsResponse, JsonBody, SuccessResponse};
use crate::store::{parse_id, NoteFilter};
use crate::tables::{Folder, NewFolder};
use crate::FOLDERS_API;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub const FOLDER_NOT_EMPTY: &str = "Folder contains notes. Move or delete them first.";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<CreateFolderRequest> for NewFolder {
    fn from(request: CreateFolderRequest) -> Self {
        NewFolder {
            name: request.name,
            color: request.color,
            icon: request.icon,
        }
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            format!("/{FOLDERS_API}").as_str(),
            get(list_folders).post(create_folder),
        )
        .route(format!("/{FOLDERS_API}/:id").as_str(), delete(delete_folder))
}

pub async fn create_folder(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateFolderRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let store = state.store()?;
    let id = store.insert_folder(&NewFolder::from(payload))?;

    Ok(Json(CreatedResponse { id: id.to_string() }))
}

pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Folder>>, ApiError> {
    let store = state.store()?;
    Ok(Json(ItemsResponse {
        items: store.find_folders()?,
    }))
}

/// Refuses to delete a folder that notes still point at.
///
/// The count and the delete are separate store calls, so a note created in
/// between can still end up referencing a deleted folder.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let store = state.store()?;

    let referencing = store.count_notes(&NoteFilter::in_folder(folder_id.as_str()))?;
    if referencing > 0 {
        return Err(ApiError::Conflict(FOLDER_NOT_EMPTY.to_string()));
    }

    let id = parse_id(&folder_id).map_err(|_| ApiError::InvalidId("folder"))?;
    if store.delete_folder(id)? == 0 {
        return Err(ApiError::NotFound("Folder"));
    }

    Ok(Json(SuccessResponse::ok()))
}

use super::{ApiError, AppState, CreatedResponse, ItemsResponse, JsonBody, SuccessResponse};
use crate::store::{parse_id, NoteFilter};
use crate::tables::{NewNote, Note, NoteChanges};
use crate::NOTES_API;
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/notes`. Omitted or `null` fields take the note defaults.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct CreateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pinned: bool,
}

impl From<CreateNoteRequest> for NewNote {
    fn from(request: CreateNoteRequest) -> Self {
        let defaults = NewNote::default();
        NewNote {
            title: request.title.unwrap_or(defaults.title),
            content: request.content.unwrap_or(defaults.content),
            folder_id: request.folder_id,
            tags: request.tags.unwrap_or(defaults.tags),
            pinned: request.pinned,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ListNotesParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            format!("/{NOTES_API}").as_str(),
            get(list_notes).post(create_note),
        )
        .route(
            format!("/{NOTES_API}/:id").as_str(),
            patch(update_note).delete(delete_note),
        )
}

fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw).map_err(|_| ApiError::InvalidId("note"))
}

/// Case-insensitive substring match over title and content.
pub fn matches_query(note: &Note, query: &str) -> bool {
    let haystack = format!(
        "{} {}",
        note.title.to_lowercase(),
        note.content.to_lowercase()
    );
    haystack.contains(&query.to_lowercase())
}

pub async fn create_note(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateNoteRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let store = state.store()?;
    let id = store.insert_note(&NewNote::from(payload))?;

    Ok(Json(CreatedResponse { id: id.to_string() }))
}

pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<ListNotesParams>,
) -> Result<Json<ItemsResponse<Note>>, ApiError> {
    let store = state.store()?;

    let filter = NoteFilter {
        folder_id: params.folder_id.filter(|f| !f.is_empty()),
    };
    let mut notes = store.find_notes(&filter)?;

    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        notes.retain(|note| matches_query(note, q));
    }

    Ok(Json(ItemsResponse { items: notes }))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    JsonBody(changes): JsonBody<NoteChanges>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let store = state.store()?;

    // Nothing allowed to change, so there is nothing to look up.
    if changes.is_empty() {
        return Ok(Json(SuccessResponse::ok()));
    }

    let id = parse_note_id(&note_id)?;
    let matched = store.update_note(id, &changes.touch(chrono::Utc::now()))?;
    if matched == 0 {
        return Err(ApiError::NotFound("Note"));
    }

    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let store = state.store()?;
    let id = parse_note_id(&note_id)?;

    if store.delete_note(id)? == 0 {
        return Err(ApiError::NotFound("Note"));
    }

    Ok(Json(SuccessResponse::ok()))
}

use super::{read_response, ClientError};
pub use crate::api::{CreateNoteRequest, ListNotesParams};
use crate::api::{CreatedResponse, ItemsResponse, SuccessResponse};
pub use crate::tables::{Note, NoteChanges};
use crate::NOTES_API;

// * Client ...................................................................
// ** Create ..................................................................
pub async fn create_note(base_url: &str, note: &CreateNoteRequest) -> Result<String, ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{NOTES_API}", base_url);
    let response = client.post(url).json(note).send().await?;
    let created: CreatedResponse = read_response(response).await?;
    Ok(created.id)
}

// ** Read ....................................................................
pub async fn fetch_notes(
    base_url: &str,
    params: &ListNotesParams,
) -> Result<Vec<Note>, ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{NOTES_API}", base_url);
    let response = client.get(url).query(params).send().await?;
    let notes: ItemsResponse<Note> = read_response(response).await?;
    Ok(notes.items)
}

// ** Update ..................................................................
pub async fn update_note(
    base_url: &str,
    id: &str,
    changes: &NoteChanges,
) -> Result<(), ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{NOTES_API}/{}", base_url, id);
    let response = client.patch(url).json(changes).send().await?;
    let _: SuccessResponse = read_response(response).await?;
    Ok(())
}

// ** Delete ..................................................................
pub async fn delete_note(base_url: &str, id: &str) -> Result<(), ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{NOTES_API}/{}", base_url, id);
    let response = client.delete(url).send().await?;
    let _: SuccessResponse = read_response(response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    // * Tests ................................................................
    use super::*;
    use crate::client::test_server;

    #[tokio::test]
    async fn test_note_lifecycle() {
        let base_url = test_server::spawn_memory().await;

        let id = create_note(
            &base_url,
            &CreateNoteRequest {
                title: Some("Standup".to_string()),
                tags: Some(vec!["daily".to_string()]),
                ..CreateNoteRequest::default()
            },
        )
        .await
        .expect("Failed to create note");

        let notes = fetch_notes(&base_url, &ListNotesParams::default())
            .await
            .expect("Failed to fetch notes");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id.to_string(), id);
        assert_eq!(notes[0].tags, vec!["daily".to_string()]);

        update_note(
            &base_url,
            &id,
            &NoteChanges {
                content: Some("Notes from the meeting".to_string()),
                folder_id: Some(Some("f1".to_string())),
                ..NoteChanges::default()
            },
        )
        .await
        .expect("Failed to update note");

        let found = fetch_notes(
            &base_url,
            &ListNotesParams {
                folder_id: Some("f1".to_string()),
                q: Some("MEETING".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].updated_at.is_some());

        delete_note(&base_url, &id).await.expect("Failed to delete note");
        assert!(matches!(
            delete_note(&base_url, &id).await,
            Err(ClientError::NotFound(detail)) if detail == "Note not found"
        ));
    }

    #[tokio::test]
    async fn test_clearing_folder_sends_null() {
        let base_url = test_server::spawn_memory().await;
        let id = create_note(
            &base_url,
            &CreateNoteRequest {
                folder_id: Some("f1".to_string()),
                ..CreateNoteRequest::default()
            },
        )
        .await
        .unwrap();

        update_note(
            &base_url,
            &id,
            &NoteChanges {
                folder_id: Some(None),
                ..NoteChanges::default()
            },
        )
        .await
        .unwrap();

        let notes = fetch_notes(&base_url, &ListNotesParams::default())
            .await
            .unwrap();
        assert_eq!(notes[0].folder_id, None);
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let base_url = test_server::spawn_memory().await;
        let result = delete_note(&base_url, "not-an-id").await;
        assert!(matches!(
            result,
            Err(ClientError::BadRequest(detail)) if detail == "Invalid note id"
        ));
    }
}

use super::{read_response, ClientError};
pub use crate::api::CreateFolderRequest;
use crate::api::{CreatedResponse, ItemsResponse, SuccessResponse};
pub use crate::tables::Folder;
use crate::FOLDERS_API;

// * Client ...................................................................
pub async fn create_folder(
    base_url: &str,
    folder: &CreateFolderRequest,
) -> Result<String, ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{FOLDERS_API}", base_url);
    let response = client.post(url).json(folder).send().await?;
    let created: CreatedResponse = read_response(response).await?;
    Ok(created.id)
}

pub async fn fetch_folders(base_url: &str) -> Result<Vec<Folder>, ClientError> {
    let url = format!("{}/{FOLDERS_API}", base_url);
    let response = reqwest::get(url).await?;
    let folders: ItemsResponse<Folder> = read_response(response).await?;
    Ok(folders.items)
}

pub async fn delete_folder(base_url: &str, id: &str) -> Result<(), ClientError> {
    let client = reqwest::Client::new();
    let url = format!("{}/{FOLDERS_API}/{}", base_url, id);
    let response = client.delete(url).send().await?;
    let _: SuccessResponse = read_response(response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::folders::FOLDER_NOT_EMPTY;
    use crate::client::notes::{create_note, delete_note, CreateNoteRequest};
    use crate::client::test_server;

    #[tokio::test]
    async fn test_folder_lifecycle() {
        let base_url = test_server::spawn_memory().await;

        let id = create_folder(
            &base_url,
            &CreateFolderRequest {
                name: "Work".to_string(),
                color: None,
                icon: Some("briefcase".to_string()),
            },
        )
        .await
        .expect("Failed to create folder");

        let folders = fetch_folders(&base_url).await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].id.to_string(), id);

        let note_id = create_note(
            &base_url,
            &CreateNoteRequest {
                folder_id: Some(id.clone()),
                ..CreateNoteRequest::default()
            },
        )
        .await
        .unwrap();

        match delete_folder(&base_url, &id).await {
            Err(ClientError::BadRequest(detail)) => assert_eq!(detail, FOLDER_NOT_EMPTY),
            other => panic!("Expected a conflict, got {:?}", other),
        }

        delete_note(&base_url, &note_id).await.unwrap();
        delete_folder(&base_url, &id)
            .await
            .expect("Failed to delete folder");
        assert!(fetch_folders(&base_url).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected() {
        let base_url = test_server::spawn_memory().await;
        let response = reqwest::Client::new()
            .post(format!("{}/{FOLDERS_API}", base_url))
            .json(&serde_json::json!({"color": "red"}))
            .send()
            .await
            .unwrap();

        let result: Result<String, ClientError> = read_response(response).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}

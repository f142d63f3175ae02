//! Document access layer.
//!
//! Handlers only talk to a [`DocumentStore`]; the concrete store is picked once
//! at startup and injected through the router state.
pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use crate::config::Config;
use crate::tables::{Folder, NewFolder, NewNote, Note, NoteChanges};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const NOTE_COLLECTION: &str = "note";
pub const FOLDER_COLLECTION: &str = "folder";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Converts the string form of an identifier back into the store's native id.
pub fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Exact match on the stored `folder_id` string.
    pub folder_id: Option<String>,
}

impl NoteFilter {
    pub fn in_folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match &self.folder_id {
            Some(folder_id) => note.folder_id.as_deref() == Some(folder_id.as_str()),
            None => true,
        }
    }
}

/// Operations the HTTP layer needs from the `note` and `folder` collections.
///
/// Every write touches a single document. Mutations return the number of
/// documents matched so callers can tell a miss from a hit.
pub trait DocumentStore: Send + Sync {
    fn collection_names(&self) -> StoreResult<Vec<String>>;

    fn insert_note(&self, note: &NewNote) -> StoreResult<Uuid>;
    /// Notes in insertion order.
    fn find_notes(&self, filter: &NoteFilter) -> StoreResult<Vec<Note>>;
    fn count_notes(&self, filter: &NoteFilter) -> StoreResult<u64>;
    fn update_note(&self, id: Uuid, changes: &NoteChanges) -> StoreResult<usize>;
    fn delete_note(&self, id: Uuid) -> StoreResult<usize>;

    fn insert_folder(&self, folder: &NewFolder) -> StoreResult<Uuid>;
    /// Folders in insertion order.
    fn find_folders(&self) -> StoreResult<Vec<Folder>>;
    fn delete_folder(&self, id: Uuid) -> StoreResult<usize>;
}

/// Opens the configured store, or returns `None` when the configuration is
/// incomplete. Never fails: an unreachable database shows up on first use.
pub fn connect(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    let Some(url) = config.connection_url() else {
        warn!("DATABASE_URL or DATABASE_NAME not set, database not available");
        return None;
    };

    let store = PgStore::from_url(&url);
    match store.ensure_collections() {
        Ok(()) => info!("Connected to database {:?}", config.database_name),
        Err(e) => warn!("Could not prepare collections: {}", e),
    }
    Some(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("not-an-id"), Err(StoreError::InvalidId(raw)) if raw == "not-an-id"));
        assert!(matches!(parse_id(""), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn test_connect_without_config_is_unavailable() {
        let config = Config {
            database_url: Some("postgres://localhost".to_string()),
            ..Config::default()
        };
        assert!(connect(&config).is_none());
    }

    #[test]
    fn test_filter_matches_exact_folder() {
        let note = NewNote {
            folder_id: Some("work".to_string()),
            ..NewNote::default()
        }
        .into_note(Uuid::now_v7());

        assert!(NoteFilter::default().matches(&note));
        assert!(NoteFilter::in_folder("work").matches(&note));
        assert!(!NoteFilter::in_folder("Work").matches(&note));
        assert!(!NoteFilter::in_folder("wor").matches(&note));
    }
}

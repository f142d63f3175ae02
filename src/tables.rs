use crate::schema::{folder, note};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = note)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
    pub pinned: bool,
    /// Only present once the note has been updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A note before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
    pub pinned: bool,
}

impl Default for NewNote {
    fn default() -> Self {
        Self {
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            folder_id: None,
            tags: Vec::new(),
            pinned: false,
        }
    }
}

impl NewNote {
    pub fn into_note(self, id: Uuid) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            folder_id: self.folder_id,
            tags: self.tags,
            pinned: self.pinned,
            updated_at: None,
        }
    }
}

/// The fields of a note that may be changed after creation.
///
/// Deserializing from an arbitrary JSON object keeps only these keys; anything
/// else in the payload is dropped. Only `folder_id` may be `null`, a `null`
/// for any other key is a deserialization error. `updated_at` can't be supplied by callers,
/// it is stamped by [`NoteChanges::touch`].
#[derive(Debug, Clone, Default, PartialEq, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = note)]
pub struct NoteChanges {
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
    /// `Some(None)` clears the folder, `None` leaves it alone.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_non_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub pinned: Option<bool>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

// A present key must hold a value; `null` is rejected.
fn deserialize_non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// Distinguishes an explicit `null` from a missing key.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.folder_id.is_none()
            && self.tags.is_none()
            && self.pinned.is_none()
    }

    pub fn touch(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = Some(now);
        self
    }

    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(folder_id) = &self.folder_id {
            note.folder_id = folder_id.clone();
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.clone();
        }
        if let Some(pinned) = self.pinned {
            note.pinned = pinned;
        }
        if self.updated_at.is_some() {
            note.updated_at = self.updated_at;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = folder)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFolder {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl NewFolder {
    pub fn into_folder(self, id: Uuid) -> Folder {
        Folder {
            id,
            name: self.name,
            color: self.color,
            icon: self.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_note_defaults() {
        let note = NewNote::default();
        assert_eq!(note.title, "Untitled");
        assert_eq!(note.content, "");
        assert_eq!(note.folder_id, None);
        assert!(note.tags.is_empty());
        assert!(!note.pinned);
    }

    #[test]
    fn test_changes_drop_unknown_keys() {
        let changes: NoteChanges =
            serde_json::from_value(json!({"color": "red", "updated_at": "2020-01-01"})).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_changes_keep_allowed_keys() {
        let changes: NoteChanges = serde_json::from_value(json!({
            "title": "Plan",
            "pinned": true,
            "tags": ["a", "b"],
            "icon": "star"
        }))
        .unwrap();

        assert_eq!(changes.title.as_deref(), Some("Plan"));
        assert_eq!(changes.pinned, Some(true));
        assert_eq!(changes.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(changes.folder_id, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_changes_reject_null_for_required_fields() {
        for key in ["title", "content", "tags", "pinned"] {
            let mut body = serde_json::Map::new();
            body.insert(key.to_string(), serde_json::Value::Null);
            let result = serde_json::from_value::<NoteChanges>(serde_json::Value::Object(body));
            assert!(result.is_err(), "null {key} should be rejected");
        }
    }

    #[test]
    fn test_changes_null_folder_clears_it() {
        let changes: NoteChanges = serde_json::from_value(json!({"folder_id": null})).unwrap();
        assert_eq!(changes.folder_id, Some(None));
        assert!(!changes.is_empty());

        let mut note = NewNote {
            folder_id: Some("f1".to_string()),
            ..NewNote::default()
        }
        .into_note(Uuid::now_v7());
        changes.apply_to(&mut note);
        assert_eq!(note.folder_id, None);
    }

    #[test]
    fn test_apply_leaves_untouched_fields() {
        let mut note = NewNote {
            title: "Keep".to_string(),
            content: "body".to_string(),
            ..NewNote::default()
        }
        .into_note(Uuid::now_v7());

        let now = Utc::now();
        NoteChanges {
            pinned: Some(true),
            ..NoteChanges::default()
        }
        .touch(now)
        .apply_to(&mut note);

        assert_eq!(note.title, "Keep");
        assert_eq!(note.content, "body");
        assert!(note.pinned);
        assert_eq!(note.updated_at, Some(now));
    }

    #[test]
    fn test_note_serializes_id_as_string_without_updated_at() {
        let id = Uuid::now_v7();
        let value = serde_json::to_value(NewNote::default().into_note(id)).unwrap();
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["folder_id"], json!(null));
        assert!(value.get("updated_at").is_none());
    }
}

use super::{DocumentStore, NoteFilter, StoreResult};
use crate::schema::{folder, note};
use crate::tables::{Folder, NewFolder, NewNote, Note, NoteChanges};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::sql_types::Text;
use std::time::Duration;
use uuid::Uuid;

// Connection pool type
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

const CREATE_COLLECTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS folder (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT,
    icon TEXT
);
CREATE TABLE IF NOT EXISTS note (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL DEFAULT 'Untitled',
    content TEXT NOT NULL DEFAULT '',
    folder_id TEXT,
    tags TEXT[] NOT NULL DEFAULT '{}',
    pinned BOOLEAN NOT NULL DEFAULT FALSE,
    updated_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS note_folder_id_idx ON note (folder_id);
"#;

#[derive(Insertable)]
#[diesel(table_name = note)]
struct NoteRecord<'a> {
    id: Uuid,
    title: &'a str,
    content: &'a str,
    folder_id: Option<&'a str>,
    tags: &'a [String],
    pinned: bool,
}

#[derive(Insertable)]
#[diesel(table_name = folder)]
struct FolderRecord<'a> {
    id: Uuid,
    name: &'a str,
    color: Option<&'a str>,
    icon: Option<&'a str>,
}

#[derive(QueryableByName)]
struct CollectionName {
    #[diesel(sql_type = Text)]
    table_name: String,
}

/// PostgreSQL-backed store. Each collection is a table keyed by a UUIDv7, so
/// ordering by id is insertion order.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds the pool without opening a connection up front.
    pub fn from_url(database_url: &str) -> Self {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .max_size(5)
            .connection_timeout(Duration::from_secs(5))
            .build_unchecked(manager);
        Self::new(pool)
    }

    /// Creates the `note` and `folder` collections if they don't exist yet.
    pub fn ensure_collections(&self) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.batch_execute(CREATE_COLLECTIONS)?;
        Ok(())
    }

    fn conn(&self) -> StoreResult<PooledConnection<ConnectionManager<PgConnection>>> {
        Ok(self.pool.get()?)
    }
}

impl DocumentStore for PgStore {
    fn collection_names(&self) -> StoreResult<Vec<String>> {
        let mut conn = self.conn()?;
        let names = diesel::sql_query(
            "SELECT table_name::text AS table_name FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
        )
        .load::<CollectionName>(&mut conn)?;
        Ok(names.into_iter().map(|row| row.table_name).collect())
    }

    fn insert_note(&self, new_note: &NewNote) -> StoreResult<Uuid> {
        let mut conn = self.conn()?;
        let record = NoteRecord {
            id: Uuid::now_v7(),
            title: &new_note.title,
            content: &new_note.content,
            folder_id: new_note.folder_id.as_deref(),
            tags: &new_note.tags,
            pinned: new_note.pinned,
        };

        diesel::insert_into(note::table)
            .values(&record)
            .execute(&mut conn)?;
        Ok(record.id)
    }

    fn find_notes(&self, filter: &NoteFilter) -> StoreResult<Vec<Note>> {
        let mut conn = self.conn()?;
        let mut query = note::table
            .select(Note::as_select())
            .order(note::id.asc())
            .into_boxed();
        if let Some(folder_id) = &filter.folder_id {
            query = query.filter(note::folder_id.eq(folder_id));
        }
        Ok(query.load(&mut conn)?)
    }

    fn count_notes(&self, filter: &NoteFilter) -> StoreResult<u64> {
        let mut conn = self.conn()?;
        let count = match &filter.folder_id {
            Some(folder_id) => note::table
                .filter(note::folder_id.eq(folder_id))
                .count()
                .get_result::<i64>(&mut conn)?,
            None => note::table.count().get_result::<i64>(&mut conn)?,
        };
        Ok(count.max(0) as u64)
    }

    fn update_note(&self, id: Uuid, changes: &NoteChanges) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(diesel::update(note::table.find(id))
            .set(changes)
            .execute(&mut conn)?)
    }

    fn delete_note(&self, id: Uuid) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(diesel::delete(note::table.find(id)).execute(&mut conn)?)
    }

    fn insert_folder(&self, new_folder: &NewFolder) -> StoreResult<Uuid> {
        let mut conn = self.conn()?;
        let record = FolderRecord {
            id: Uuid::now_v7(),
            name: &new_folder.name,
            color: new_folder.color.as_deref(),
            icon: new_folder.icon.as_deref(),
        };

        diesel::insert_into(folder::table)
            .values(&record)
            .execute(&mut conn)?;
        Ok(record.id)
    }

    fn find_folders(&self) -> StoreResult<Vec<Folder>> {
        let mut conn = self.conn()?;
        Ok(folder::table
            .select(Folder::as_select())
            .order(folder::id.asc())
            .load(&mut conn)?)
    }

    fn delete_folder(&self, id: Uuid) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(diesel::delete(folder::table.find(id)).execute(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    // Needs DATABASE_URL and DATABASE_NAME; run with `cargo test -- --ignored`.
    fn setup_test_store() -> PgStore {
        let url = Config::from_env()
            .connection_url()
            .expect("DATABASE_URL and DATABASE_NAME must be set");
        let store = PgStore::from_url(&url);
        store
            .ensure_collections()
            .expect("Failed to prepare collections");
        store
    }

    #[test]
    #[ignore = "requires a PostgreSQL database"]
    fn test_note_crud() {
        let store = setup_test_store();

        let folder_key = format!("test_folder_{}", Uuid::now_v7());
        let id = store
            .insert_note(&NewNote {
                title: "Test Note".to_string(),
                folder_id: Some(folder_key.clone()),
                tags: vec!["x".to_string()],
                ..NewNote::default()
            })
            .expect("Failed to insert note");

        let filter = NoteFilter::in_folder(folder_key.as_str());
        let found = store.find_notes(&filter).expect("Failed to find notes");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].tags, vec!["x".to_string()]);
        assert_eq!(found[0].updated_at, None);
        assert_eq!(store.count_notes(&filter).unwrap(), 1);

        let changes = NoteChanges {
            title: Some("Renamed".to_string()),
            ..NoteChanges::default()
        }
        .touch(chrono::Utc::now());
        assert_eq!(store.update_note(id, &changes).unwrap(), 1);
        assert_eq!(store.update_note(Uuid::now_v7(), &changes).unwrap(), 0);

        let found = store.find_notes(&filter).unwrap();
        assert_eq!(found[0].title, "Renamed");
        assert!(found[0].updated_at.is_some());

        assert_eq!(store.delete_note(id).unwrap(), 1);
        assert_eq!(store.delete_note(id).unwrap(), 0);
        assert_eq!(store.count_notes(&filter).unwrap(), 0);
    }

    #[test]
    #[ignore = "requires a PostgreSQL database"]
    fn test_folder_crud() {
        let store = setup_test_store();

        let id = store
            .insert_folder(&NewFolder {
                name: "Test Folder".to_string(),
                color: Some("#ff0000".to_string()),
                icon: None,
            })
            .expect("Failed to insert folder");

        let folders = store.find_folders().unwrap();
        assert!(folders.iter().any(|f| f.id == id && f.name == "Test Folder"));
        assert!(store
            .collection_names()
            .unwrap()
            .contains(&"folder".to_string()));

        assert_eq!(store.delete_folder(id).unwrap(), 1);
        assert_eq!(store.delete_folder(id).unwrap(), 0);
    }
}

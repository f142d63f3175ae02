use super::{DocumentStore, NoteFilter, StoreError, StoreResult, FOLDER_COLLECTION, NOTE_COLLECTION};
use crate::tables::{Folder, NewFolder, NewNote, Note, NoteChanges};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-process store holding both collections in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    notes: Mutex<Vec<Note>>,
    folders: Mutex<Vec<Folder>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| StoreError::Poisoned)
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> usize {
    let before = items.len();
    items.retain(|item| !matches(item));
    before - items.len()
}

impl DocumentStore for MemoryStore {
    fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(vec![FOLDER_COLLECTION.to_string(), NOTE_COLLECTION.to_string()])
    }

    fn insert_note(&self, note: &NewNote) -> StoreResult<Uuid> {
        let id = Uuid::now_v7();
        lock(&self.notes)?.push(note.clone().into_note(id));
        Ok(id)
    }

    fn find_notes(&self, filter: &NoteFilter) -> StoreResult<Vec<Note>> {
        Ok(lock(&self.notes)?
            .iter()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect())
    }

    fn count_notes(&self, filter: &NoteFilter) -> StoreResult<u64> {
        Ok(lock(&self.notes)?
            .iter()
            .filter(|note| filter.matches(note))
            .count() as u64)
    }

    fn update_note(&self, id: Uuid, changes: &NoteChanges) -> StoreResult<usize> {
        let mut notes = lock(&self.notes)?;
        match notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                changes.apply_to(note);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_note(&self, id: Uuid) -> StoreResult<usize> {
        Ok(remove_by(&mut *lock(&self.notes)?, |note| note.id == id))
    }

    fn insert_folder(&self, folder: &NewFolder) -> StoreResult<Uuid> {
        let id = Uuid::now_v7();
        lock(&self.folders)?.push(folder.clone().into_folder(id));
        Ok(id)
    }

    fn find_folders(&self) -> StoreResult<Vec<Folder>> {
        Ok(lock(&self.folders)?.clone())
    }

    fn delete_folder(&self, id: Uuid) -> StoreResult<usize> {
        Ok(remove_by(&mut *lock(&self.folders)?, |folder| folder.id == id))
    }
}

use super::{NoteMap, NotesStore, StoreError};
use crate::calendar::{DateKey, MonthCursor};

/// Keeps notes for the life of the process only
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore {
    notes: NoteMap,
}

impl MemoryStore {
    pub(crate) fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl NotesStore for MemoryStore {
    fn fetch_month(&mut self, cursor: MonthCursor) -> Result<NoteMap, StoreError> {
        Ok(self
            .notes
            .range(cursor.first_key()..=cursor.last_key())
            .map(|(&k, v)| (k, v.clone()))
            .collect())
    }

    fn upsert_note(&mut self, key: DateKey, text: &str) -> Result<(), StoreError> {
        self.notes.insert(key, text.to_owned());
        Ok(())
    }
}

use super::{NoteMap, NotesStore, StoreError};
use crate::calendar::{DateKey, MonthCursor};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Notes kept in a single JSON object mapping `YYYY-MM-DD` to note text
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: PathBuf) -> FileStore {
        FileStore { path }
    }

    fn load(&self) -> Result<NoteMap, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(src) => Ok(serde_json::from_str(&src)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(NoteMap::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn save(&self, notes: &NoteMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let src = serde_json::to_string_pretty(notes)?;
        // Write to a sibling file, then rename it over the original
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, src).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl NotesStore for FileStore {
    fn fetch_month(&mut self, cursor: MonthCursor) -> Result<NoteMap, StoreError> {
        let mut notes = self.load()?;
        notes.retain(|&key, _| cursor.contains(key));
        debug!(
            "event=file_fetch path={} month={cursor} rows={}",
            self.path.display(),
            notes.len()
        );
        Ok(notes)
    }

    fn upsert_note(&mut self, key: DateKey, text: &str) -> Result<(), StoreError> {
        let mut notes = self.load()?;
        notes.insert(key, text.to_owned());
        self.save(&notes)?;
        debug!("event=file_upsert path={} date={key}", self.path.display());
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("notes.json"));
        let cursor = MonthCursor::containing(date!(2024 - 02 - 01));
        assert!(store.fetch_month(cursor).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.json");
        let mut store = FileStore::new(path.clone());
        let dentist = DateKey::from(date!(2024 - 02 - 14));
        let rent = DateKey::from(date!(2024 - 03 - 01));
        store.upsert_note(dentist, "dentist\n3pm").unwrap();
        store.upsert_note(rent, "rent").unwrap();
        store.upsert_note(dentist, "dentist 4pm").unwrap();

        let feb = store
            .fetch_month(MonthCursor::containing(dentist.date()))
            .unwrap();
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[&dentist], "dentist 4pm");

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            on_disk,
            serde_json::json!({"2024-02-14": "dentist 4pm", "2024-03-01": "rent"})
        );
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_bad_key_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, r#"{"2024-2-1": "oops"}"#).unwrap();
        let mut store = FileStore::new(path);
        let r = store.fetch_month(MonthCursor::containing(date!(2024 - 02 - 01)));
        assert!(matches!(r, Err(StoreError::Json(_))));
    }
}

mod file;
mod memory;
mod rest;
pub(crate) use self::file::FileStore;
pub(crate) use self::memory::MemoryStore;
pub(crate) use self::rest::RestStore;
use crate::calendar::{DateKey, InvalidDateKey, MonthCursor};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Note text for each day of a month that has a stored row
pub(crate) type NoteMap = BTreeMap<DateKey, String>;

/// Where notes live.  Rows are keyed by date; an upsert replaces whatever
/// was stored for that date before, and the last write wins.
pub(crate) trait NotesStore: fmt::Debug + Send {
    fn fetch_month(&mut self, cursor: MonthCursor) -> Result<NoteMap, StoreError>;

    fn upsert_note(&mut self, key: DateKey, text: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("request to notes service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notes service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not access notes file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed notes data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("notes store returned a bad row: {0}")]
    InvalidDate(#[from] InvalidDateKey),
    #[error("could not timestamp note: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("notes worker is no longer running")]
    Disconnected,
}

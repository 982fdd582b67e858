use crate::calendar::{DateKey, MonthCursor, MonthGrid, OutOfTimeError};
use crate::editor::{EditBuffer, EditOp};
use crate::store::{NoteMap, StoreError};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fmt;
use time::Date;

/// Ask the store for every note in `cursor`'s month.  `generation` is
/// compared against the view's current generation when the answer arrives,
/// and answers for anything but the latest request are dropped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FetchRequest {
    pub(crate) generation: u64,
    pub(crate) cursor: MonthCursor,
}

/// Persist `text` as the note for `key`
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct UpsertRequest {
    pub(crate) key: DateKey,
    pub(crate) text: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FetchOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Notice {
    FetchFailed { cursor: MonthCursor, message: String },
    CommitFailed { key: DateKey, message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FetchFailed { cursor, message } => {
                write!(f, "Could not load notes for {cursor}: {message}")
            }
            Notice::CommitFailed { key, message } => {
                write!(f, "Note for {key} was not saved: {message}")
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Editing {
    pub(crate) key: DateKey,
    pub(crate) buffer: EditBuffer,
}

/// State of the month view: which month is shown, the notes cached for it,
/// and the one day (if any) whose note is being edited.
///
/// Nothing here talks to the store.  Operations that need the store return
/// a [`FetchRequest`] or [`UpsertRequest`] for the caller to deliver, and
/// the caller feeds the answers back in through
/// [`CalendarView::fetch_resolved`] and [`CalendarView::commit_resolved`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarView {
    grid: MonthGrid,
    notes: NoteMap,
    generation: u64,
    loading: bool,
    editing: Option<Editing>,
    selected: u8,
    unsaved: BTreeSet<DateKey>,
    notice: Option<Notice>,
}

impl CalendarView {
    pub(crate) fn new(cursor: MonthCursor) -> CalendarView {
        CalendarView {
            grid: MonthGrid::new(cursor),
            notes: NoteMap::new(),
            generation: 0,
            loading: false,
            editing: None,
            selected: 1,
            unsaved: BTreeSet::new(),
            notice: None,
        }
    }

    pub(crate) fn cursor(&self) -> MonthCursor {
        self.grid.cursor()
    }

    pub(crate) fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    pub(crate) fn selected(&self) -> u8 {
        self.selected
    }

    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn note(&self, day: u8) -> Option<&str> {
        let key = self.cursor().date_key(day)?;
        self.notes.get(&key).map(String::as_str)
    }

    pub(crate) fn is_unsaved(&self, key: DateKey) -> bool {
        self.unsaved.contains(&key)
    }

    /// Requests the notes for the current month again.  Day cells are
    /// hidden until the answer arrives.
    pub(crate) fn refresh(&mut self) -> FetchRequest {
        self.generation += 1;
        self.loading = true;
        FetchRequest {
            generation: self.generation,
            cursor: self.cursor(),
        }
    }

    pub(crate) fn next_month(&mut self) -> Result<FetchRequest, OutOfTimeError> {
        let cursor = self.cursor().next()?;
        Ok(self.jump_to(cursor))
    }

    pub(crate) fn prev_month(&mut self) -> Result<FetchRequest, OutOfTimeError> {
        let cursor = self.cursor().previous()?;
        Ok(self.jump_to(cursor))
    }

    /// Shows `cursor`'s month.  An open editor is closed without saving.
    pub(crate) fn jump_to(&mut self, cursor: MonthCursor) -> FetchRequest {
        if let Some(editing) = self.editing.take() {
            debug!("event=edit_dropped date={} reason=navigate", editing.key);
        }
        self.grid = MonthGrid::new(cursor);
        self.selected = self.selected.min(cursor.days_in_month());
        self.refresh()
    }

    pub(crate) fn jump_to_date(&mut self, date: Date) -> FetchRequest {
        let fetch = self.jump_to(MonthCursor::containing(date));
        self.selected = date.day();
        fetch
    }

    pub(crate) fn fetch_resolved(
        &mut self,
        request: FetchRequest,
        result: Result<NoteMap, StoreError>,
    ) -> FetchOutcome {
        if request.generation != self.generation {
            debug!(
                "event=fetch_stale month={} generation={} current={}",
                request.cursor, request.generation, self.generation
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(notes) => {
                self.notes = notes;
                self.unsaved.clear();
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("event=fetch_failed month={} error={e}", self.cursor());
                self.notice = Some(Notice::FetchFailed {
                    cursor: self.cursor(),
                    message: e.to_string(),
                });
                FetchOutcome::Failed
            }
        }
    }

    pub(crate) fn commit_resolved(&mut self, key: DateKey, result: Result<(), StoreError>) {
        match result {
            Ok(()) => {
                self.unsaved.remove(&key);
            }
            Err(e) => {
                warn!("event=commit_failed date={key} error={e}");
                self.unsaved.insert(key);
                self.notice = Some(Notice::CommitFailed {
                    key,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Opens the editor on `day`.  If a different day is being edited, that
    /// editor is blurred (and so committed) first; the returned request is
    /// that commit.  Clicks while notes are loading, on days outside the
    /// month, or on the day already being edited do nothing.
    pub(crate) fn click(&mut self, day: u8) -> Option<UpsertRequest> {
        if self.loading {
            return None;
        }
        let key = self.cursor().date_key(day)?;
        if self.editing.as_ref().is_some_and(|e| e.key == key) {
            return None;
        }
        let commit = self.blur();
        let text = self.notes.get(&key).cloned().unwrap_or_default();
        self.editing = Some(Editing {
            key,
            buffer: EditBuffer::new(text),
        });
        self.selected = day;
        commit
    }

    pub(crate) fn open_selected(&mut self) -> Option<UpsertRequest> {
        self.click(self.selected)
    }

    /// Closes the editor, committing its trimmed text
    pub(crate) fn blur(&mut self) -> Option<UpsertRequest> {
        let editing = self.editing.take()?;
        Some(self.commit(editing))
    }

    /// Enter on a line that is already blank (the text before the cursor
    /// ends in a newline) commits; any other Enter starts a new line
    pub(crate) fn enter(&mut self) -> Option<UpsertRequest> {
        let editing = self.editing.as_mut()?;
        if editing.buffer.at_blank_line() {
            self.blur()
        } else {
            editing.buffer.apply(EditOp::Insert('\n'));
            None
        }
    }

    /// Closes the editor without committing.  Returns `false` if nothing was
    /// being edited.
    pub(crate) fn escape(&mut self) -> bool {
        self.editing.take().is_some()
    }

    pub(crate) fn edit(&mut self, op: EditOp) -> bool {
        self.editing
            .as_mut()
            .is_some_and(|editing| editing.buffer.apply(op))
    }

    // Returns `false` if the move would leave the month
    pub(crate) fn move_selection(&mut self, delta: i16) -> bool {
        let target = i16::from(self.selected) + delta;
        match u8::try_from(target) {
            Ok(day) if (1..=self.cursor().days_in_month()).contains(&day) => {
                self.selected = day;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    fn commit(&mut self, editing: Editing) -> UpsertRequest {
        let Editing { key, buffer } = editing;
        let text = buffer.committed();
        info!("event=commit date={key} chars={}", text.chars().count());
        // The local copy is updated before the store confirms; a failure is
        // reported back through `commit_resolved`
        self.notes.insert(key, text.clone());
        UpsertRequest { key, text }
    }
}

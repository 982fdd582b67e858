use crate::calendar::{CalendarLayout, CalendarWidget, Hit, MonthCursor, OutOfTimeError};
use crate::clock::Clock;
use crate::editor::EditOp;
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crate::view::{CalendarView, FetchRequest, UpsertRequest};
use crate::worker::{StoreRequest, StoreResponse, StoreWorker};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::Duration;
use time::Date;

/// How long to wait for terminal input before checking on the store again
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub(crate) struct App {
    view: CalendarView,
    worker: StoreWorker,
    clock: Clock,
    state: AppState,
    /// Where the calendar was last drawn, for resolving mouse clicks
    layout: Option<CalendarLayout>,
}

impl App {
    /// Shows the month containing `start` with `start` selected, and asks
    /// the store for that month's notes
    pub(crate) fn new(worker: StoreWorker, clock: Clock, start: Date) -> App {
        let mut app = App {
            view: CalendarView::new(MonthCursor::containing(start)),
            worker,
            clock,
            state: AppState::Calendar,
            layout: None,
        };
        let fetch = app.view.jump_to_date(start);
        app.fetch(fetch);
        app
    }

    /// Runs until the user quits, then hands back the worker.  Requests the
    /// worker has not finished yet are completed when it is dropped, which
    /// can take a while with a slow store, so the caller should restore the
    /// terminal first.
    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<StoreWorker> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
            self.drain_responses();
        }
        info!("event=app_quit");
        Ok(self.into_worker())
    }

    fn into_worker(self) -> StoreWorker {
        self.worker
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(POLL_TIMEOUT)? {
            self.handle_event(event::read()?)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.quit();
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) = event
        {
            if !self.handle_click(column, row) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar if self.view.editing().is_some() => self.handle_edit_key(key),
            AppState::Calendar => {
                self.view.dismiss_notice();
                match key {
                    KeyCode::Char('h') | KeyCode::Left => self.view.move_selection(-1),
                    KeyCode::Char('l') | KeyCode::Right => self.view.move_selection(1),
                    KeyCode::Char('k') | KeyCode::Up => self.view.move_selection(-7),
                    KeyCode::Char('j') | KeyCode::Down => self.view.move_selection(7),
                    KeyCode::Char('i') | KeyCode::Enter => self.open_selected(),
                    KeyCode::Char('n' | ']') | KeyCode::PageDown => {
                        let r = self.view.next_month();
                        self.navigated(r)
                    }
                    KeyCode::Char('p' | '[') | KeyCode::PageUp => {
                        let r = self.view.prev_month();
                        self.navigated(r)
                    }
                    KeyCode::Char('t') | KeyCode::Home => {
                        self.jump_to_today();
                        true
                    }
                    KeyCode::Char('r') => {
                        let fetch = self.view.refresh();
                        self.fetch(fetch);
                        true
                    }
                    KeyCode::Char('g') => {
                        self.state = AppState::Jumping(JumpToState::new());
                        true
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.quit();
                        true
                    }
                    KeyCode::Char('?') => {
                        self.state = AppState::Helping;
                        true
                    }
                    _ => false,
                }
            }
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(cursor) => {
                            self.state = AppState::Calendar;
                            let fetch = self.view.jump_to(cursor);
                            self.fetch(fetch);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode) -> bool {
        let op = match key {
            KeyCode::Esc => return self.view.escape(),
            KeyCode::Tab => {
                let commit = self.view.blur();
                self.upsert(commit);
                return true;
            }
            KeyCode::Enter => {
                let commit = self.view.enter();
                self.upsert(commit);
                return true;
            }
            KeyCode::Char(c) => EditOp::Insert(c),
            KeyCode::Backspace => EditOp::Backspace,
            KeyCode::Delete => EditOp::Delete,
            KeyCode::Left => EditOp::Left,
            KeyCode::Right => EditOp::Right,
            KeyCode::Home => EditOp::Home,
            KeyCode::End => EditOp::End,
            _ => return false,
        };
        self.view.edit(op)
    }

    /// Left click at the given screen position.  Any click that does not
    /// land on the day being edited closes that editor (saving it) before
    /// anything else happens.  Returns `false` if the click was on an arrow
    /// but the month could not be changed.
    fn handle_click(&mut self, column: u16, row: u16) -> bool {
        if self.state != AppState::Calendar {
            return true;
        }
        let Some(layout) = self.layout else {
            return true;
        };
        match layout.hit(column, row) {
            Some(Hit::Cell(index)) => {
                let commit = match self.view.grid().day_at(index) {
                    Some(day) => self.view.click(day),
                    None => self.view.blur(),
                };
                self.upsert(commit);
                true
            }
            Some(Hit::PrevMonth) => {
                let commit = self.view.blur();
                self.upsert(commit);
                let r = self.view.prev_month();
                self.navigated(r)
            }
            Some(Hit::NextMonth) => {
                let commit = self.view.blur();
                self.upsert(commit);
                let r = self.view.next_month();
                self.navigated(r)
            }
            None => {
                let commit = self.view.blur();
                self.upsert(commit);
                true
            }
        }
    }

    fn open_selected(&mut self) -> bool {
        if self.view.is_loading() {
            return false;
        }
        let commit = self.view.open_selected();
        self.upsert(commit);
        true
    }

    fn navigated(&mut self, result: Result<FetchRequest, OutOfTimeError>) -> bool {
        match result {
            Ok(fetch) => {
                self.fetch(fetch);
                true
            }
            Err(e) => {
                debug!("event=navigate_failed error={e}");
                false
            }
        }
    }

    fn jump_to_today(&mut self) {
        let fetch = self.view.jump_to_date(self.clock.today());
        self.fetch(fetch);
    }

    fn fetch(&mut self, request: FetchRequest) {
        debug!(
            "event=fetch month={} generation={}",
            request.cursor, request.generation
        );
        if let Err(e) = self.worker.send(StoreRequest::Fetch(request)) {
            self.view.fetch_resolved(request, Err(e));
        }
    }

    fn upsert(&mut self, request: Option<UpsertRequest>) {
        let Some(request) = request else {
            return;
        };
        let key = request.key;
        if let Err(e) = self.worker.send(StoreRequest::Upsert(request)) {
            self.view.commit_resolved(key, Err(e));
        }
    }

    fn drain_responses(&mut self) {
        while let Some(response) = self.worker.try_recv() {
            self.apply_response(response);
        }
    }

    fn apply_response(&mut self, response: StoreResponse) {
        match response {
            StoreResponse::Fetched { request, result } => {
                let outcome = self.view.fetch_resolved(request, result);
                debug!(
                    "event=fetch_resolved month={} generation={} outcome={outcome:?}",
                    request.cursor, request.generation
                );
            }
            StoreResponse::Upserted { key, result } => self.view.commit_resolved(key, result),
        }
    }

    /// Stops the event loop.  An open editor is saved first; the worker
    /// finishes every queued request before the program exits.
    fn quit(&mut self) {
        let commit = self.view.blur();
        self.upsert(commit);
        self.state = AppState::Quitting;
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        CalendarWidget::new(self.clock.today()).render(area, buf, &mut self.view);
        self.layout = Some(CalendarLayout::new(area));
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

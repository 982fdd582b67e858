use super::grid::{Cell, DAYS_IN_WEEK, GRID_CELLS, GRID_WEEKS};
use crate::editor::EditBuffer;
use crate::theme::{
    ARROW_STYLE, BORDER_STYLE, CURSOR_STYLE, DAY_STYLE, EDIT_BORDER_STYLE, EMPTY_BORDER_STYLE,
    HINT_STYLE, LOADING_STYLE, NOTE_STYLE, NOTICE_STYLE, SELECTED_BORDER_STYLE, TITLE_STYLE,
    TODAY_STYLE, UNSAVED_STYLE, WEEKDAY_STYLE,
};
use crate::view::CalendarView;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, StatefulWidget, Widget, Wrap},
};
use time::Date;

static WEEKDAYS: [&str; DAYS_IN_WEEK] = ["SUN", "MON", "TUES", "WED", "THURS", "FRI", "SAT"];

static LOADING: &str = "Loading notes...";

static CALENDAR_HINT: &str =
    "←↓↑→ select · Enter edit · n/p month · t today · g jump · r reload · ? help · q quit";

static EDIT_HINT: &str = "Tab save · Enter on a blank line save · Esc cancel";

const PREV_ARROW: &str = " ‹ ";
const NEXT_ARROW: &str = " › ";

/// Columns taken up by each of the month navigation arrows
const ARROW_WIDTH: u16 = 3;

/// Shown in the top-left corner of a day whose last save failed
const UNSAVED_MARK: &str = "!";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Hit {
    PrevMonth,
    NextMonth,
    Cell(usize),
}

/// Where each part of the calendar goes within the area it is drawn in.
/// Used both for drawing and for mapping mouse clicks back onto cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalendarLayout {
    title: Rect,
    prev: Rect,
    next: Rect,
    header: Rect,
    body: Rect,
    status: Rect,
}

impl CalendarLayout {
    pub(crate) fn new(area: Rect) -> CalendarLayout {
        let [title, header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        let [prev, _, next] = Layout::horizontal([
            Constraint::Length(ARROW_WIDTH),
            Constraint::Min(0),
            Constraint::Length(ARROW_WIDTH),
        ])
        .areas(title);
        CalendarLayout {
            title,
            prev,
            next,
            header,
            body,
            status,
        }
    }

    pub(crate) fn cell(&self, index: usize) -> Rect {
        let (x, width) = split(self.body.x, self.body.width, DAYS_IN_WEEK, index % DAYS_IN_WEEK);
        let (y, height) = split(self.body.y, self.body.height, GRID_WEEKS, index / DAYS_IN_WEEK);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn weekday(&self, col: usize) -> Rect {
        let (x, width) = split(self.header.x, self.header.width, DAYS_IN_WEEK, col);
        Rect { x, width, ..self.header }
    }

    pub(crate) fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        if self.prev.contains(pos) {
            Some(Hit::PrevMonth)
        } else if self.next.contains(pos) {
            Some(Hit::NextMonth)
        } else if self.body.contains(pos) {
            (0..GRID_CELLS)
                .find(|&i| self.cell(i).contains(pos))
                .map(Hit::Cell)
        } else {
            None
        }
    }
}

/// Returns the start and length of the `i`-th of `parts` near-equal slices
/// of the span `start..start+len`
fn split(start: u16, len: u16, parts: usize, i: usize) -> (u16, u16) {
    let edge = |k: usize| u16::try_from(usize::from(len) * k / parts).unwrap_or(len);
    let lo = edge(i);
    let hi = edge(i + 1);
    (start.saturating_add(lo), hi.saturating_sub(lo))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalendarWidget {
    today: Date,
}

impl CalendarWidget {
    pub(crate) fn new(today: Date) -> CalendarWidget {
        CalendarWidget { today }
    }

    fn draw_title(&self, layout: &CalendarLayout, buf: &mut Buffer, view: &CalendarView) {
        let cursor = view.cursor();
        let title = format!(
            "{} {}",
            cursor.month().to_string().to_uppercase(),
            cursor.year()
        );
        Paragraph::new(Span::styled(title, TITLE_STYLE))
            .alignment(Alignment::Center)
            .render(layout.title, buf);
        buf.set_stringn(
            layout.prev.x,
            layout.prev.y,
            PREV_ARROW,
            usize::from(layout.prev.width),
            ARROW_STYLE,
        );
        buf.set_stringn(
            layout.next.x,
            layout.next.y,
            NEXT_ARROW,
            usize::from(layout.next.width),
            ARROW_STYLE,
        );
    }

    fn draw_header(&self, layout: &CalendarLayout, buf: &mut Buffer) {
        for (col, name) in WEEKDAYS.iter().enumerate() {
            Paragraph::new(Span::styled(*name, WEEKDAY_STYLE))
                .alignment(Alignment::Center)
                .render(layout.weekday(col), buf);
        }
    }

    fn draw_loading(&self, layout: &CalendarLayout, buf: &mut Buffer) {
        let area = layout.body;
        if area.is_empty() {
            return;
        }
        let middle = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        Paragraph::new(Span::styled(LOADING, LOADING_STYLE))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }

    fn draw_day(&self, area: Rect, buf: &mut Buffer, view: &CalendarView, day: u8) {
        let Some(key) = view.cursor().date_key(day) else {
            return;
        };
        let editing = view.editing().filter(|e| e.key == key);
        let border_style = if editing.is_some() {
            EDIT_BORDER_STYLE
        } else if view.selected() == day {
            SELECTED_BORDER_STYLE
        } else {
            BORDER_STYLE
        };
        let block = Block::bordered().border_style(border_style);
        let block = if key.date() == self.today {
            block.style(TODAY_STYLE)
        } else {
            block
        };
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }
        let [top, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

        let number = day.to_string();
        let mark = if view.is_unsaved(key) { UNSAVED_MARK } else { "" };
        let pad = usize::from(top.width).saturating_sub(mark.len() + number.len());
        let line = Line::from(vec![
            Span::styled(mark, UNSAVED_STYLE),
            Span::raw(" ".repeat(pad)),
            Span::styled(number, DAY_STYLE),
        ]);
        buf.set_line(top.x, top.y, &line, top.width);

        if body.is_empty() {
            return;
        }
        if let Some(editing) = editing {
            let cursor_line = editing.buffer.before_cursor().matches('\n').count();
            let scroll = cursor_line.saturating_sub(usize::from(body.height) - 1);
            Paragraph::new(editor_text(&editing.buffer))
                .wrap(Wrap { trim: false })
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
                .render(body, buf);
        } else if let Some(note) = view.note(day).filter(|n| !n.is_empty()) {
            Paragraph::new(note)
                .style(NOTE_STYLE)
                .wrap(Wrap { trim: true })
                .render(body, buf);
        }
    }

    fn draw_status(&self, layout: &CalendarLayout, buf: &mut Buffer, view: &CalendarView) {
        let area = layout.status;
        let line = match view.notice() {
            Some(notice) => Line::styled(notice.to_string(), NOTICE_STYLE),
            None if view.editing().is_some() => Line::styled(EDIT_HINT, HINT_STYLE),
            None => Line::styled(CALENDAR_HINT, HINT_STYLE),
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

impl StatefulWidget for CalendarWidget {
    type State = CalendarView;

    fn render(self, area: Rect, buf: &mut Buffer, view: &mut CalendarView) {
        let layout = CalendarLayout::new(area);
        self.draw_title(&layout, buf, view);
        self.draw_header(&layout, buf);
        if view.is_loading() {
            self.draw_loading(&layout, buf);
        } else {
            for (index, cell) in view.grid().cells().iter().enumerate() {
                let area = layout.cell(index);
                match *cell {
                    Cell::Empty => Block::bordered()
                        .border_style(EMPTY_BORDER_STYLE)
                        .render(area, buf),
                    Cell::Day(day) => self.draw_day(area, buf, view, day),
                }
            }
        }
        if !layout.status.is_empty() {
            self.draw_status(&layout, buf, view);
        }
    }
}

/// The buffer's lines, with the character under the text cursor (or a blank
/// at the end of a line) highlighted
fn editor_text(buffer: &EditBuffer) -> Text<'_> {
    let mut before = buffer.before_cursor().split('\n').collect::<Vec<_>>();
    let head = before.pop().unwrap_or_default();
    let mut after = buffer.after_cursor().split('\n');
    let tail = after.next().unwrap_or_default();
    let (under, rest) = match tail.chars().next() {
        Some(ch) => tail.split_at(ch.len_utf8()),
        None => (" ", ""),
    };
    let mut lines = before.into_iter().map(Line::raw).collect::<Vec<_>>();
    lines.push(Line::from(vec![
        Span::raw(head),
        Span::styled(under, CURSOR_STYLE),
        Span::raw(rest),
    ]));
    lines.extend(after.map(Line::raw));
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{DateKey, MonthCursor};
    use crate::editor::EditOp;
    use crate::store::{NoteMap, StoreError};
    use crate::view::UpsertRequest;
    use time::macros::date;

    const AREA: Rect = Rect::new(0, 0, 80, 30);

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn render(view: &mut CalendarView, today: Date) -> Buffer {
        let mut buf = Buffer::empty(AREA);
        CalendarWidget::new(today).render(AREA, &mut buf, view);
        buf
    }

    fn march_2024(notes: &[(Date, &str)]) -> CalendarView {
        let mut view = CalendarView::new(MonthCursor::containing(date!(2024 - 03 - 01)));
        let fetch = view.refresh();
        let notes = notes
            .iter()
            .map(|&(d, s)| (DateKey::from(d), s.to_owned()))
            .collect::<NoteMap>();
        view.fetch_resolved(fetch, Ok(notes));
        view
    }

    #[test]
    fn test_layout_hits() {
        let layout = CalendarLayout::new(AREA);
        assert_eq!(layout.hit(1, 0), Some(Hit::PrevMonth));
        assert_eq!(layout.hit(78, 0), Some(Hit::NextMonth));
        assert_eq!(layout.hit(40, 0), None);
        assert_eq!(layout.hit(40, 1), None);
        assert_eq!(layout.hit(1, 3), Some(Hit::Cell(0)));
        assert_eq!(layout.hit(79, 28), Some(Hit::Cell(41)));
        assert_eq!(layout.hit(40, 29), None);
    }

    #[test]
    fn test_cells_tile_the_body() {
        let layout = CalendarLayout::new(AREA);
        let total = (0..GRID_CELLS)
            .map(|i| {
                let r = layout.cell(i);
                u32::from(r.width) * u32::from(r.height)
            })
            .sum::<u32>();
        assert_eq!(total, 80 * 27);
        assert_eq!(layout.cell(0).x, 0);
        assert_eq!(layout.cell(6).right(), 80);
        assert_eq!(layout.cell(41).bottom(), 29);
    }

    #[test]
    fn test_split() {
        assert_eq!(split(0, 80, 7, 0), (0, 11));
        assert_eq!(split(0, 80, 7, 6), (68, 12));
        assert_eq!(split(5, 0, 7, 3), (5, 0));
    }

    #[test]
    fn test_loading() {
        let mut view = CalendarView::new(MonthCursor::containing(date!(2024 - 03 - 01)));
        view.refresh();
        let rows = rows(&render(&mut view, date!(2024 - 03 - 10)));
        assert!(rows[0].contains("MARCH 2024"));
        assert!(rows[1].contains("TUES"));
        assert!(rows.iter().any(|r| r.contains(LOADING)));
        assert!(!rows.iter().any(|r| r.contains('┌')));
    }

    #[test]
    fn test_days_and_notes() {
        let mut view = march_2024(&[(date!(2024 - 03 - 05), "dentist")]);
        let buf = render(&mut view, date!(2024 - 03 - 10));
        let rows = rows(&buf);
        assert!(rows[0].starts_with(" ‹ "));
        assert!(rows[0].ends_with(" › "));
        assert!(rows.iter().any(|r| r.contains("dentist")));
        assert!(rows.iter().any(|r| r.contains("31")));
        assert!(!rows.iter().any(|r| r.contains("32")));
        assert!(rows[29].contains("Enter edit"));
    }

    #[test]
    fn test_today_is_shaded() {
        let mut view = march_2024(&[]);
        let today = date!(2024 - 03 - 10);
        let buf = render(&mut view, today);
        let layout = CalendarLayout::new(AREA);
        let today_cell = layout.cell(view.grid().index_of(10).unwrap());
        let other_cell = layout.cell(view.grid().index_of(11).unwrap());
        assert_eq!(
            buf[(today_cell.x + 1, today_cell.y + 2)].bg,
            TODAY_STYLE.bg.unwrap()
        );
        assert_ne!(
            buf[(other_cell.x + 1, other_cell.y + 2)].bg,
            TODAY_STYLE.bg.unwrap()
        );
    }

    #[test]
    fn test_editor_and_unsaved_marker() {
        let mut view = march_2024(&[]);
        view.click(5);
        for ch in "buy milk".chars() {
            view.edit(EditOp::Insert(ch));
        }
        let rows_editing = rows(&render(&mut view, date!(2024 - 03 - 10)));
        assert!(rows_editing.iter().any(|r| r.contains("buy milk")));
        assert!(rows_editing[29].contains("Esc cancel"));

        let UpsertRequest { key, .. } = view.blur().unwrap();
        view.commit_resolved(
            key,
            Err(StoreError::Status {
                status: 500,
                body: String::from("boom"),
            }),
        );
        let buf = render(&mut view, date!(2024 - 03 - 10));
        let rows = rows(&buf);
        let cell = CalendarLayout::new(AREA).cell(view.grid().index_of(5).unwrap());
        assert_eq!(buf[(cell.x + 1, cell.y + 1)].symbol(), UNSAVED_MARK);
        assert!(rows[29].contains("Note for 2024-03-05 was not saved"));
    }

    #[test]
    fn test_editor_text_marks_cursor() {
        let mut buffer = EditBuffer::new(String::from("ab\ncd"));
        buffer.apply(EditOp::Left);
        let text = editor_text(&buffer);
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0], Line::raw("ab"));
        assert_eq!(
            text.lines[1],
            Line::from(vec![
                Span::raw("c"),
                Span::styled("d", CURSOR_STYLE),
                Span::raw(""),
            ])
        );
        let trailing = EditBuffer::new(String::from("x\n"));
        let end = editor_text(&trailing);
        assert_eq!(end.lines.len(), 2);
        assert_eq!(
            end.lines[1],
            Line::from(vec![
                Span::raw(""),
                Span::styled(" ", CURSOR_STYLE),
                Span::raw(""),
            ])
        );
    }
}

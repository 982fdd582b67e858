use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const ARROW_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const BORDER_STYLE: Style = Style::new().fg(Color::Gray);

pub(crate) const EMPTY_BORDER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub(crate) const SELECTED_BORDER_STYLE: Style = Style::new().fg(Color::Yellow);

pub(crate) const EDIT_BORDER_STYLE: Style = Style::new()
    .fg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

pub(crate) const DAY_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE.bg(Color::DarkGray);

pub(crate) const NOTE_STYLE: Style = Style::new().fg(Color::Gray);

pub(crate) const UNSAVED_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

pub(crate) const LOADING_STYLE: Style = BASE_STYLE.add_modifier(Modifier::ITALIC);

pub(crate) const NOTICE_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}

use crate::theme::BASE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "Calendar:\n",
    "  ←↓↑→, h j k l       Select a day\n",
    "  ENTER, i            Edit the selected day's note\n",
    "  n, PAGE DOWN, ]     Next month\n",
    "  p, PAGE UP, [       Previous month\n",
    "  t, HOME             Jump to today\n",
    "  g                   Input month to jump to\n",
    "  r                   Reload this month's notes\n",
    "  ?                   Show this help\n",
    "  q, ESC              Quit\n",
    "  Click a day to edit it; click ‹ › to change month\n",
    "\n",
    "Editing:\n",
    "  TAB                 Save and stop editing\n",
    "  ENTER               New line; on a blank line, save\n",
    "  ESC                 Stop editing without saving\n",
    "\n",
    "Press the Any Key to dismiss.\n",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Help;

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(BASE_STYLE);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        para.render(help_area, buf);
    }
}

/// Text being typed into a day's note, plus the position of the text cursor
/// as a byte offset that always sits on a `char` boundary
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EditBuffer {
    text: String,
    cursor: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EditOp {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

impl EditBuffer {
    pub(crate) fn new(text: String) -> EditBuffer {
        let cursor = text.len();
        EditBuffer { text, cursor }
    }

    #[cfg(test)]
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    pub(crate) fn after_cursor(&self) -> &str {
        &self.text[self.cursor..]
    }

    /// An Enter pressed here saves the note instead of starting a new line
    pub(crate) fn at_blank_line(&self) -> bool {
        self.before_cursor().ends_with('\n')
    }

    /// The text that gets stored when the note is committed
    pub(crate) fn committed(&self) -> String {
        self.text.trim().to_owned()
    }

    // Returns `false` if the operation had nothing to act on
    pub(crate) fn apply(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Insert(ch) => {
                self.text.insert(self.cursor, ch);
                self.cursor += ch.len_utf8();
                true
            }
            EditOp::Backspace => match self.before_cursor().chars().next_back() {
                Some(ch) => {
                    self.cursor -= ch.len_utf8();
                    self.text.remove(self.cursor);
                    true
                }
                None => false,
            },
            EditOp::Delete => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                    true
                } else {
                    false
                }
            }
            EditOp::Left => match self.before_cursor().chars().next_back() {
                Some(ch) => {
                    self.cursor -= ch.len_utf8();
                    true
                }
                None => false,
            },
            EditOp::Right => match self.after_cursor().chars().next() {
                Some(ch) => {
                    self.cursor += ch.len_utf8();
                    true
                }
                None => false,
            },
            EditOp::Home => {
                let start = self.before_cursor().rfind('\n').map_or(0, |i| i + 1);
                std::mem::replace(&mut self.cursor, start) != start
            }
            EditOp::End => {
                let rest = self.after_cursor();
                let end = self.cursor + rest.find('\n').unwrap_or(rest.len());
                std::mem::replace(&mut self.cursor, end) != end
            }
        }
    }
}

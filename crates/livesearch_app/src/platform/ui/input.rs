use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Single-line text field; the cursor is a char index into `text`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display columns between the start of the field and the cursor.
    pub fn cursor_column(&self) -> u16 {
        let before: String = self.text.chars().take(self.cursor).collect();
        u16::try_from(before.width()).unwrap_or(u16::MAX)
    }

    /// Applies an editing key. Keys that mean nothing to the field are ignored.
    pub fn apply(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !ctrl => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
            }
            KeyCode::Delete if self.cursor < self.len() => {
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => {}
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

#[cfg(test)]
mod tests {
    use super::TextInput;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(input: &mut TextInput, code: KeyCode) {
        input.apply(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for ch in text.chars() {
            press(input, KeyCode::Char(ch));
        }
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = TextInput::default();
        type_str(&mut input, "ct");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Char('a'));

        assert_eq!(input.text(), "cat");
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte_chars() {
        let mut input = TextInput::default();
        type_str(&mut input, "eichhörnchen");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        press(&mut input, KeyCode::End);
        press(&mut input, KeyCode::Backspace);

        assert_eq!(input.text(), "ichhörnche");
        press(&mut input, KeyCode::Backspace);
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.text(), "ichhörnch");
    }

    #[test]
    fn ctrl_u_clears_field() {
        let mut input = TextInput::default();
        type_str(&mut input, "cat");
        input.apply(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        assert_eq!(input.text(), "");
        assert_eq!(input.cursor_column(), 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = TextInput::default();
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Backspace);
        type_str(&mut input, "a");
        press(&mut input, KeyCode::Right);
        press(&mut input, KeyCode::Right);

        assert_eq!(input.cursor_column(), 1);
    }

    #[test]
    fn wide_chars_count_two_columns() {
        let mut input = TextInput::default();
        type_str(&mut input, "猫a");

        assert_eq!(input.cursor_column(), 3);
    }
}

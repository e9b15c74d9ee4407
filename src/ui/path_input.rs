use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::source::local::PATH_LIST_SEPARATOR;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line editor for a comma separated list of deck paths, with tab
/// completion of the path currently being typed.
pub struct PathInput {
    text: String,
    /// Cursor position as a char index.
    cursor: usize,
    completions: Vec<String>,
    completion_index: Option<usize>,
    /// Text before the segment being completed, kept across Tab presses.
    completion_head: String,
    /// True if the directory of the last completion could not be read.
    pub completion_error: bool,
}

impl PathInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            completions: Vec::new(),
            completion_index: None,
            completion_head: String::new(),
            completion_error: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.char_to_byte(self.cursor))
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        if !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.reset_completion();
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.remove_range(self.cursor - 1, self.cursor);
                self.cursor -= 1;
            }
            KeyCode::Delete if self.cursor < self.len() => {
                self.remove_range(self.cursor, self.cursor + 1);
            }
            KeyCode::Tab => self.tab_complete(true),
            KeyCode::BackTab => self.tab_complete(false),
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_segment_back(),
            KeyCode::Char(ch) if !ctrl => {
                let at = self.char_to_byte(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let (start, end) = (self.char_to_byte(from), self.char_to_byte(to));
        self.text.replace_range(start..end, "");
    }

    /// Deletes back to the previous path separator or list separator.
    fn delete_segment_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let is_stop = |c: char| c == '/' || c == '\\' || c == PATH_LIST_SEPARATOR;
        let mut pos = self.cursor;
        while pos > 0 && is_stop(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && !is_stop(chars[pos - 1]) {
            pos -= 1;
        }
        self.remove_range(pos, self.cursor);
        self.cursor = pos;
    }

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_head.clear();
        self.completion_error = false;
    }

    fn tab_complete(&mut self, forward: bool) {
        if self.cursor < self.len() {
            return;
        }

        match self.completion_index {
            None => {
                let (head, segment) = match self.text.rfind(PATH_LIST_SEPARATOR) {
                    Some(pos) => self.text.split_at(pos + 1),
                    None => ("", self.text.as_str()),
                };
                let leading_ws: String = segment.chars().take_while(|c| c.is_whitespace()).collect();
                let segment = segment.trim_start().to_string();
                self.completion_head = format!("{head}{leading_ws}");
                self.completions = self.build_completions(&segment);
                if !self.completions.is_empty() {
                    self.completion_index = Some(0);
                    self.apply_completion(0);
                }
            }
            Some(idx) => {
                let count = self.completions.len();
                let next = if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                };
                self.completion_index = Some(next);
                self.apply_completion(next);
            }
        }
    }

    fn apply_completion(&mut self, idx: usize) {
        self.text = format!("{}{}", self.completion_head, self.completions[idx]);
        self.cursor = self.len();
    }

    fn build_completions(&mut self, segment: &str) -> Vec<String> {
        let last_sep = segment.rfind(['/', '\\']);
        let (dir_str, partial) = match last_sep {
            Some(pos) => (&segment[..=pos], &segment[pos + 1..]),
            None => ("", segment),
        };

        let read_dir = if dir_str.is_empty() {
            std::path::PathBuf::from(".")
        } else {
            crate::source::local::expand_home(dir_str)
        };

        let entries = match std::fs::read_dir(&read_dir) {
            Ok(rd) => rd.map(|result| {
                result.map(|entry| {
                    let name = entry.file_name().to_string_lossy().to_string();
                    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                    (name, is_dir)
                })
            }),
            Err(_) => {
                self.completion_error = true;
                return Vec::new();
            }
        };

        self.collect_completions(entries, dir_str, partial)
    }

    /// Directories and `.txt` files matching `partial`, directories first.
    fn collect_completions(
        &mut self,
        entries: impl Iterator<Item = std::io::Result<(String, bool)>>,
        dir_str: &str,
        partial: &str,
    ) -> Vec<String> {
        let sep = std::path::MAIN_SEPARATOR;
        let include_hidden = partial.starts_with('.');
        let mut candidates: Vec<(bool, String)> = Vec::new();

        for entry in entries.take(1000) {
            let Ok((name, is_dir)) = entry else {
                self.completion_error = true;
                return Vec::new();
            };
            if !include_hidden && name.starts_with('.') {
                continue;
            }
            if !name.starts_with(partial) {
                continue;
            }
            if !is_dir && !name.to_ascii_lowercase().ends_with(".txt") {
                continue;
            }
            let full = if is_dir {
                format!("{dir_str}{name}{sep}")
            } else {
                format!("{dir_str}{name}")
            };
            candidates.push((is_dir, full));
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        candidates.truncate(100);
        candidates.into_iter().map(|(_, path)| path).collect()
    }
}

//! Input buffer editing and key policy

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Session-visible result of a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// The draft text changed; carries the full replacement text
    Edited { text: String },
    /// The user asked to submit the draft
    Submit,
}

/// Editing state layered over the canonical draft
///
/// The draft text itself lives in the session state; only the cursor
/// (a char index) lives here.
#[derive(Debug, Default)]
pub struct InputBuffer {
    cursor: usize,
}

impl InputBuffer {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Clamp the cursor into the current draft. The draft may have been
    /// cleared out from under us by a successful submission.
    pub fn sync(&mut self, draft: &str) {
        self.cursor = self.cursor.min(draft.chars().count());
    }

    /// Apply one key press against the current draft.
    ///
    /// Enter submits without inserting anything; Enter with Shift or Alt
    /// held inserts a literal line break instead of submitting.
    pub fn apply_key(&mut self, draft: &str, key: KeyEvent) -> Option<InputAction> {
        match key.code {
            KeyCode::Enter => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT)
                {
                    Some(self.insert(draft, '\n'))
                } else {
                    Some(InputAction::Submit)
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(self.insert(draft, c))
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let mut chars: Vec<char> = draft.chars().collect();
                chars.remove(self.cursor - 1);
                self.cursor -= 1;
                Some(InputAction::Edited {
                    text: chars.into_iter().collect(),
                })
            }
            KeyCode::Delete => {
                let mut chars: Vec<char> = draft.chars().collect();
                if self.cursor >= chars.len() {
                    return None;
                }
                chars.remove(self.cursor);
                Some(InputAction::Edited {
                    text: chars.into_iter().collect(),
                })
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(draft.chars().count());
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = draft.chars().count();
                None
            }
            _ => None,
        }
    }

    fn insert(&mut self, draft: &str, ch: char) -> InputAction {
        let mut chars: Vec<char> = draft.chars().collect();
        let at = self.cursor.min(chars.len());
        chars.insert(at, ch);
        self.cursor = at + 1;
        InputAction::Edited {
            text: chars.into_iter().collect(),
        }
    }
}

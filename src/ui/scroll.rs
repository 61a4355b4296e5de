//! Scroll pinning for the message viewport

/// Keeps the viewport pinned to the newest message.
///
/// Observes the conversation length each frame; any change re-pins the
/// viewport to the bottom. Between appends the user may scroll back
/// freely. Observation is idempotent and safe to repeat.
#[derive(Debug, Default)]
pub struct ScrollState {
    /// Lines scrolled back from the bottom (0 = pinned to newest)
    offset: usize,
    last_len: usize,
}

impl ScrollState {
    pub fn observe(&mut self, len: usize) {
        if len != self.last_len {
            self.last_len = len;
            self.offset = 0;
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Offset from the bottom, bounded by how far back there is to go
    pub fn bounded_offset(&mut self, total_lines: usize, viewport_height: usize) -> usize {
        let max = total_lines.saturating_sub(viewport_height);
        self.offset = self.offset.min(max);
        self.offset
    }
}

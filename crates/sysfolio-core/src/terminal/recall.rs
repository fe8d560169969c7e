//! Shell-style up/down recall over previously submitted input lines.

use serde::Serialize;

/// Ordered list of raw submitted lines plus a browsing cursor.
///
/// The cursor counts steps back from the newest entry: `None` means no
/// recall is active, `Some(0)` is the newest line. Navigation clamps at both
/// ends and never fails.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecallBuffer {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl RecallBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a submitted line and ends any active recall.
    pub fn push(&mut self, input: impl Into<String>) {
        self.entries.push(input.into());
        self.cursor = None;
    }

    /// Moves one step towards the oldest entry and returns it.
    ///
    /// Returns an empty string when nothing was ever submitted.
    pub fn previous(&mut self) -> &str {
        let Some(last) = self.entries.len().checked_sub(1) else {
            return "";
        };

        let next = match self.cursor {
            None => 0,
            Some(index) if index < last => index + 1,
            Some(index) => index,
        };
        self.cursor = Some(next);
        &self.entries[last - next]
    }

    /// Moves one step towards the newest entry and returns it.
    ///
    /// Stepping past the newest entry ends recall and returns an empty string.
    pub fn next(&mut self) -> &str {
        match self.cursor {
            Some(index) if index > 0 => {
                let index = index - 1;
                self.cursor = Some(index);
                &self.entries[self.entries.len() - 1 - index]
            }
            _ => {
                self.cursor = None;
                ""
            }
        }
    }

    /// Cursor position, `None` when no recall is active.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> RecallBuffer {
        let mut buf = RecallBuffer::new();
        for line in lines {
            buf.push(*line);
        }
        buf
    }

    #[test]
    fn test_empty_buffer_returns_empty_strings() {
        let mut buf = RecallBuffer::new();
        assert_eq!(buf.previous(), "");
        assert_eq!(buf.next(), "");
        assert_eq!(buf.cursor(), None);
    }

    #[test]
    fn test_previous_walks_back_and_clamps_at_oldest() {
        let mut buf = buffer(&["help", "ls services", "status"]);
        assert_eq!(buf.previous(), "status");
        assert_eq!(buf.previous(), "ls services");
        assert_eq!(buf.previous(), "help");
        for _ in 0..5 {
            assert_eq!(buf.previous(), "help");
        }
        assert_eq!(buf.cursor(), Some(2));
    }

    #[test]
    fn test_next_walks_forward_to_empty_input() {
        let mut buf = buffer(&["help", "ls services", "status"]);
        buf.previous();
        buf.previous();
        buf.previous();
        assert_eq!(buf.next(), "ls services");
        assert_eq!(buf.next(), "status");
        assert_eq!(buf.next(), "");
        assert_eq!(buf.cursor(), None);
        assert_eq!(buf.next(), "");
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut buf = buffer(&["help", "status"]);
        buf.previous();
        buf.previous();
        buf.push("ping api-gateway");
        assert_eq!(buf.cursor(), None);
        assert_eq!(buf.previous(), "ping api-gateway");
    }
}

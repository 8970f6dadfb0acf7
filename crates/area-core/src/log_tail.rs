//! Bounded tail of applet log lines.

use std::collections::VecDeque;

/// Lines kept for an applet's live log view.
pub const DEFAULT_LOG_LINES: usize = 10;

/// Keeps the most recent lines of a log stream, evicting the oldest.
#[derive(Debug, Clone)]
pub struct LogTail {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for LogTail {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LINES)
    }
}

impl LogTail {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one stream message. Messages may carry several lines.
    pub fn push_message(&mut self, message: &str) {
        for line in message.split('\n') {
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line.trim_end_matches('\r').to_string());
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

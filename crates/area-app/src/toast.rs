//! Transient notifications.

use std::time::{Duration, Instant};

/// Most toasts shown at once; older ones are dropped first.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub created_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Toasts {
    items: Vec<Toast>,
    lifetime: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, level: ToastLevel) {
        let text = text.into();
        // The same message twice in a row only refreshes its timer
        if let Some(last) = self.items.last_mut() {
            if last.text == text && last.level == level {
                last.created_at = Instant::now();
                return;
            }
        }
        self.items.push(Toast {
            text,
            level,
            created_at: Instant::now(),
        });
        if self.items.len() > MAX_TOASTS {
            self.items.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, ToastLevel::Info);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, ToastLevel::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text, ToastLevel::Error);
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.created_at) < lifetime);
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//! Cached query results with per-key response ordering.
//!
//! Each [`Query`] is one cache key. Issuing a request takes a ticket; a
//! response is applied only if its ticket is newer than the last applied
//! one, so a slow answer to an old request never overwrites a newer answer.
//! Data already shown stays visible while a revalidation is in flight.

use area_core::ApiFailure;

/// Request ticket. Monotonic per [`Query`].
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Query<T> {
    data: Option<T>,
    error: Option<ApiFailure>,
    issued: Ticket,
    applied: Ticket,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new request.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.issued
    }

    /// Apply a response. Returns `false` if it was stale and dropped.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<T, ApiFailure>) -> bool {
        if ticket <= self.applied || ticket > self.issued {
            return false;
        }
        self.applied = ticket;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure),
        }
        true
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn error(&self) -> Option<&ApiFailure> {
        self.error.as_ref()
    }

    /// A request newer than the applied data is in flight.
    pub fn is_loading(&self) -> bool {
        self.issued > self.applied
    }

    /// Nothing to show yet.
    pub fn is_pending(&self) -> bool {
        self.data.is_none() && self.is_loading()
    }

    /// Drop cached data; in-flight responses still apply.
    pub fn clear(&mut self) {
        self.data = None;
        self.error = None;
    }
}

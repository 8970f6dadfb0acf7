//! area-app - Application state and orchestration for the AREA client
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the page model, the applet builder wizard, remote query
//! caching, configuration loading and the background tasks that talk to the
//! API.

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod query;
pub mod state;
pub mod toast;
pub mod wizard;

// Re-export primary types
pub use engine::Engine;
pub use handler::{Mutation, QueryKey, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::{Message, OAuthPurpose};
pub use query::{Query, Ticket};
pub use state::{AppPhase, AppState, Route, UiMode};
pub use toast::{Toast, ToastLevel, Toasts};

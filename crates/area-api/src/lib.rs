//! # area-api - Remote API Access
//!
//! Everything that crosses the network: the typed REST client, the session
//! token it sends, the OAuth loopback callback, the live log WebSocket and
//! the bootstrap catalog poll.
//!
//! ## Public API
//!
//! ### Operations (`api`, `client`, `request`)
//! - [`AreaApi`] - Every remote operation, as a `Send` async trait
//! - [`ApiClient`] - `reqwest` implementation against the real server
//! - [`Request`] - Declarative request descriptor
//! - [`classify_response()`] - Status + body → payload or [`area_core::ApiFailure`]
//!
//! ### Session (`session`)
//! - [`Session`] - Shared bearer token, persisted to a single-line file
//!
//! ### OAuth (`oauth`)
//! - [`CallbackListener`] - One-shot axum listener on the redirect URI
//! - [`authorize()`] - Open the browser and wait for the code
//! - [`AuthorizationCodeReceived`] - The typed callback event
//!
//! ### Log Stream (`log_stream`)
//! - [`LogStream`], [`LogStreamEvent`], [`logs_url()`]
//!
//! ### Bootstrap (`bootstrap`)
//! - [`fetch_about_with_retry()`], [`RetryPolicy`]

pub mod api;
pub mod bootstrap;
pub mod client;
pub mod log_stream;
pub mod oauth;
pub mod request;
pub mod session;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use api::{AreaApi, Credentials, LocalAreaApi};
pub use bootstrap::{fetch_about_with_retry, RetryPolicy};
pub use client::{ApiClient, DEFAULT_API_URL};
pub use log_stream::{logs_url, LogStream, LogStreamEvent};
pub use oauth::{
    authorization_url, authorize, generate_state, AuthorizationCodeReceived, CallbackListener,
    DEFAULT_CALLBACK_TIMEOUT, DEFAULT_REDIRECT_URI,
};
pub use request::{classify_response, message_of, Body, Envelope, Method, Request};
pub use session::{Session, SESSION_FILE};

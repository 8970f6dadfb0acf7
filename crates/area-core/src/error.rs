//! Error types shared by every AREA crate

use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a remote API call did not produce a payload.
///
/// Kept separate from [`Error`] because it travels inside app messages and
/// therefore has to be `Clone`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// The server answered 401. The session token is no longer valid.
    Unauthorized,

    /// The server answered 406 with a `{field: valid}` map.
    InvalidFields(BTreeMap<String, bool>),

    /// Any other non-success status, with the raw error payload.
    Rejected {
        status: u16,
        payload: serde_json::Value,
    },

    /// The request never produced an HTTP response (DNS, refused, timeout).
    Transport(String),

    /// The response body did not match the expected shape.
    Decode(String),
}

impl ApiFailure {
    /// Field names the server flagged as invalid.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            ApiFailure::InvalidFields(fields) => fields
                .iter()
                .filter(|(_, valid)| !**valid)
                .map(|(name, _)| name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Text shown in a transient notification.
    ///
    /// Rejections show the server payload as-is: its `error` string when the
    /// payload has one, otherwise the raw JSON.
    pub fn notification_text(&self) -> String {
        match self {
            ApiFailure::Unauthorized => "Session expired, please sign in again".to_string(),
            ApiFailure::InvalidFields(_) => "Some fields are invalid".to_string(),
            ApiFailure::Rejected { payload, .. } => match payload.get("error") {
                Some(serde_json::Value::String(message)) => message.clone(),
                _ => payload.to_string(),
            },
            ApiFailure::Transport(message) => format!("Network error: {message}"),
            ApiFailure::Decode(message) => format!("Unexpected response: {message}"),
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiFailure::Unauthorized => write!(f, "unauthorized"),
            ApiFailure::InvalidFields(fields) => {
                write!(f, "invalid fields: {:?}", fields.keys().collect::<Vec<_>>())
            }
            ApiFailure::Rejected { status, payload } => write!(f, "status {status}: {payload}"),
            ApiFailure::Transport(message) => write!(f, "transport: {message}"),
            ApiFailure::Decode(message) => write!(f, "decode: {message}"),
        }
    }
}

/// Everything that can go wrong outside a single API payload
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(ApiFailure),

    #[error("Invalid API URL: {url}")]
    InvalidUrl { url: String },

    #[error("Server did not answer after {attempts} attempts")]
    BootstrapExhausted { attempts: u32 },

    #[error("Bootstrap cancelled")]
    BootstrapCancelled,

    #[error("Service is not available for oauth2: {service}")]
    OAuthUnavailable { service: String },

    #[error("OAuth error: {message}")]
    OAuth { message: String },

    #[error("Timed out waiting for the authorization code")]
    OAuthTimeout,

    /// The callback listener went away before a code arrived.
    #[error("Authorization listener stopped")]
    OAuthListenerGone,

    #[error("Log stream error: {message}")]
    LogStream { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<ApiFailure> for Error {
    fn from(failure: ApiFailure) -> Self {
        Error::Api(failure)
    }
}

impl Error {
    pub fn oauth(message: impl Into<String>) -> Self {
        Self::OAuth {
            message: message.into(),
        }
    }

    pub fn oauth_unavailable(service: impl Into<String>) -> Self {
        Self::OAuthUnavailable {
            service: service.into(),
        }
    }

    pub fn log_stream(message: impl Into<String>) -> Self {
        Self::LogStream {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// The API failure carried by this error, if any.
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            Error::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

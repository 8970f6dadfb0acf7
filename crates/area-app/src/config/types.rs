//! Configuration types for `config.toml`

use std::time::Duration;

use serde::{Deserialize, Serialize};

use area_api::{RetryPolicy, DEFAULT_API_URL, DEFAULT_REDIRECT_URI};
use area_core::DEFAULT_LOG_LINES;

/// Application settings (`<config_dir>/area/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub oauth: OAuthSettings,

    #[serde(default)]
    pub bootstrap: BootstrapSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Catalog filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Work-in-progress areas are hidden.
    #[default]
    Production,
    /// Work-in-progress areas are listed behind a confirmation.
    Development,
}

impl Mode {
    pub fn is_development(&self) -> bool {
        matches!(self, Mode::Development)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Production => write!(f, "production"),
            Mode::Development => write!(f, "development"),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the log WebSocket; derived from `api_url` when unset
    #[serde(default)]
    pub log_stream_url: Option<String>,

    #[serde(default)]
    pub mode: Mode,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            log_stream_url: None,
            mode: Mode::default(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// OAuth callback settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OAuthSettings {
    /// Redirect URI registered with the authenticators
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// How long to wait for the browser round trip
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            redirect_uri: default_redirect_uri(),
            callback_timeout_secs: default_callback_timeout_secs(),
        }
    }
}

impl OAuthSettings {
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs.max(1))
    }
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_callback_timeout_secs() -> u64 {
    180
}

/// Catalog bootstrap polling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BootstrapSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl BootstrapSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    30
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a notification stays on screen
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Lines kept by the applet log terminal
    #[serde(default = "default_log_lines")]
    pub log_lines: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            log_lines: default_log_lines(),
        }
    }
}

impl UiSettings {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

fn default_toast_duration_ms() -> u64 {
    4000
}

fn default_log_lines() -> usize {
    DEFAULT_LOG_LINES
}

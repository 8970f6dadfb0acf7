//! Settings loader for `<config_dir>/area/config.toml`

use std::path::{Path, PathBuf};

use area_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "area";

/// Environment variable overriding `[server] api_url`.
pub const API_URL_ENV_VAR: &str = "AREA_API_URL";

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILENAME)
}

/// Load settings from `path`.
///
/// A missing file or a file that fails to parse yields the defaults.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Apply `AREA_API_URL`, then the command-line URL, on top of the file.
pub fn apply_overrides(settings: &mut Settings, cli_api_url: Option<&str>) {
    if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
        if !url.trim().is_empty() {
            debug!("{} overrides api_url", API_URL_ENV_VAR);
            settings.server.api_url = url.trim().to_string();
        }
    }
    if let Some(url) = cli_api_url.filter(|url| !url.trim().is_empty()) {
        settings.server.api_url = url.trim().to_string();
    }
}

/// Write a commented default config file. Does nothing if one exists.
///
/// Returns whether a file was written.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, generate_default_config())
        .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))?;
    info!("Created default config at {:?}", path);
    Ok(true)
}

fn generate_default_config() -> String {
    r#"# AREA client configuration

[server]
api_url = "http://localhost:8080/api"
# WebSocket base for applet logs; derived from api_url when unset
# log_stream_url = "ws://localhost:8080/logs"
mode = "production"        # "development" also lists work-in-progress areas

[oauth]
# Must match the redirect URI registered with each authenticator
redirect_uri = "http://localhost:8081"
callback_timeout_secs = 180

[bootstrap]
poll_interval_ms = 2000
max_attempts = 30

[ui]
toast_duration_ms = 4000
log_lines = 10
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join(CONFIG_FILENAME));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\napi_url = ").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_init_config_writes_parseable_defaults_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("area").join(CONFIG_FILENAME);

        assert!(init_config(&path).unwrap());
        let settings = load_settings(&path);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.server.mode, Mode::Production);

        std::fs::write(&path, "[ui]\nlog_lines = 3\n").unwrap();
        assert!(!init_config(&path).unwrap());
        assert_eq!(load_settings(&path).ui.log_lines, 3);
    }

    #[test]
    #[serial]
    fn test_overrides_env_then_cli() {
        let mut settings = Settings::default();

        std::env::set_var(API_URL_ENV_VAR, "http://env.example.com/api");
        apply_overrides(&mut settings, None);
        assert_eq!(settings.server.api_url, "http://env.example.com/api");

        apply_overrides(&mut settings, Some("http://cli.example.com/api"));
        assert_eq!(settings.server.api_url, "http://cli.example.com/api");

        std::env::remove_var(API_URL_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_blank_overrides_are_ignored() {
        let mut settings = Settings::default();
        std::env::set_var(API_URL_ENV_VAR, "  ");
        apply_overrides(&mut settings, Some(""));
        assert_eq!(settings.server.api_url, "http://localhost:8080/api");
        std::env::remove_var(API_URL_ENV_VAR);
    }
}

//! AREA client - terminal front end for the AREA automation platform
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use area_api::{ApiClient, Session};
use area_app::config::{self, Mode, Settings};
use area_app::Engine;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

/// Terminal client for AREA: build applets from service actions and reactions
#[derive(Parser, Debug)]
#[command(name = "area", version)]
#[command(about = "Terminal client for the AREA automation platform", long_about = None)]
struct Args {
    /// Base URL of the API, e.g. http://localhost:8080/api
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List work-in-progress actions and reactions
    #[arg(long)]
    dev: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(config::default_config_path)
    }

    /// File settings with the environment and flags applied on top.
    fn settings(&self) -> Settings {
        let mut settings = config::load_settings(&self.config_path());
        config::apply_overrides(&mut settings, self.api_url.as_deref());
        if self.dev {
            settings.server.mode = Mode::Development;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.init_config {
        let path = args.config_path();
        if config::init_config(&path)? {
            eprintln!("Wrote {}", path.display());
        } else {
            eprintln!("{} already exists, leaving it alone", path.display());
        }
        return Ok(());
    }

    area_core::logging::init().wrap_err("failed to set up logging")?;

    let settings = args.settings();
    let session = Session::load(Session::default_path());
    let api = ApiClient::new(&settings.server.api_url, session.clone())
        .wrap_err_with(|| format!("invalid API URL {}", settings.server.api_url))?;
    info!(
        "Starting against {} ({} mode, signed in: {})",
        api.base_url(),
        settings.server.mode,
        session.is_authenticated()
    );

    let api_base = api.base_url().clone();
    let engine = Engine::new(settings, api, session, api_base);
    area_tui::run(engine).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parses_every_flag() {
        let args = Args::try_parse_from([
            "area",
            "--api-url",
            "http://api.example.com/api",
            "--config",
            "/tmp/area.toml",
            "--dev",
        ])
        .expect("valid arguments");

        assert_eq!(args.api_url.as_deref(), Some("http://api.example.com/api"));
        assert_eq!(args.config_path(), PathBuf::from("/tmp/area.toml"));
        assert!(args.dev);
        assert!(!args.init_config);
    }

    #[test]
    #[serial]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\napi_url = \"http://file.example.com/api\"\n")
            .expect("config written");
        std::env::remove_var(config::API_URL_ENV_VAR);

        let args = Args::try_parse_from([
            "area",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--api-url",
            "http://flag.example.com/api",
            "--dev",
        ])
        .expect("valid arguments");
        let settings = args.settings();

        assert_eq!(settings.server.api_url, "http://flag.example.com/api");
        assert!(settings.server.mode.is_development());
    }

    #[test]
    #[serial]
    fn test_config_file_is_used_without_flags() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\napi_url = \"http://file.example.com/api\"\n")
            .expect("config written");
        std::env::remove_var(config::API_URL_ENV_VAR);

        let args = Args::try_parse_from(["area", "--config", path.to_str().expect("utf-8 path")])
            .expect("valid arguments");

        assert_eq!(args.settings().server.api_url, "http://file.example.com/api");
        assert!(!args.settings().server.mode.is_development());
    }
}

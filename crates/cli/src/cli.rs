//! Command line and startup
//!
//! Startup runs in a fixed order: settings, credentials (or first-run
//! setup), S3 client, bucket pre-flight, then the browser.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use console::Term;
use tokio::sync::mpsc;

use s4_core::{DiskFs, Error, ObjectStore, S3Config, Settings, SettingsManager, credentials};
use s4_s3::S3Client;

use crate::app::{self, NavigationState};
use crate::dispatch::{Dispatcher, StatsDeadlines};
use crate::exit_code::ExitCode;
use crate::output::Formatter;
use crate::setup::{self, SetupOutcome};

/// s4 - browse an S3 bucket in the terminal
///
/// Reads credentials from an s3cmd-compatible `.s3cfg` file.
#[derive(Parser, Debug)]
#[command(name = "s4")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bucket to browse
    pub bucket: String,

    /// Credentials file (default: ./.s3cfg, ~/.s3cfg, /etc/s3cfg)
    #[arg(long, env = "S4_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory downloads are written to
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, env = "S4_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (requires --log-file)
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Fail instead of prompting when no credentials file exists
    #[arg(long, default_value = "false")]
    pub no_setup: bool,
}

/// Run s4 and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new();

    let mut settings = match SettingsManager::new().and_then(|m| m.load()) {
        Ok(settings) => settings,
        Err(e) => {
            formatter.error(&format!("Failed to load settings: {e}"));
            return ExitCode::from(&e);
        }
    };
    if let Some(dir) = cli.download_dir {
        settings.download_dir = Some(dir);
    }

    let config = match load_credentials(cli.config.as_deref(), cli.no_setup, &formatter) {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::Interrupted,
        Err(e) => {
            formatter.error(&format!("No usable S3 configuration: {e}"));
            formatter.hint("Create a .s3cfg in one of these locations:");
            formatter.hint("  ./.s3cfg   ~/.s3cfg   /etc/s3cfg");
            return ExitCode::from(&e);
        }
    };
    if config.signature_v2 {
        formatter.warning("signature_v2 is set but not supported; using SigV4");
    }

    let client = match S3Client::new(&config).await {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Error creating S3 client: {e}"));
            return ExitCode::from(&e);
        }
    };

    if let Err(e) = client.bucket_accessible(&cli.bucket).await {
        formatter.error(&format!("Error accessing bucket '{}': {e}", cli.bucket));
        formatter.hint("Please check:");
        formatter.hint("  - Bucket name is correct");
        formatter.hint("  - Your credentials have access to this bucket");
        formatter.hint("  - Your S3 endpoint configuration is correct");
        return ExitCode::from(&e);
    }

    match browse(cli.bucket, client, &settings).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            formatter.error(&format!("Error running browser: {e:#}"));
            ExitCode::GeneralError
        }
    }
}

/// Find and load credentials, falling back to the interactive setup
///
/// `Ok(None)` means the user declined to create a configuration.
fn load_credentials(
    explicit: Option<&Path>,
    no_setup: bool,
    formatter: &Formatter,
) -> s4_core::Result<Option<S3Config>> {
    if let Some(path) = credentials::locate(explicit)? {
        tracing::debug!(path = %path.display(), "loading credentials");
        return S3Config::load(&path).map(Some);
    }

    if no_setup {
        return Err(Error::Config("no .s3cfg file found".into()));
    }

    match setup::run(&mut Term::stdout())? {
        SetupOutcome::Saved { config, path } => {
            formatter.success(&format!("Configuration saved to: {}", path.display()));
            Ok(Some(config))
        }
        SetupOutcome::Declined => {
            formatter.error("Setup declined; no configuration created");
            Ok(None)
        }
    }
}

async fn browse(bucket: String, client: S3Client, settings: &Settings) -> anyhow::Result<()> {
    let store: Arc<dyn ObjectStore> = Arc::new(client);
    let (tx, rx) = mpsc::unbounded_channel();

    let dispatcher = Dispatcher::new(store, Arc::new(DiskFs), bucket.clone(), tx)
        .with_download_dir(settings.download_dir())
        .with_deadlines(StatsDeadlines {
            size: settings.size_timeout(),
            date: settings.date_timeout(),
        });
    let state = NavigationState::new(bucket, settings.upload_start_dir());

    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, state, dispatcher, rx).await;
    ratatui::restore();

    result.context("terminal event loop failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bucket_is_required() {
        let err = Cli::try_parse_from(["s4"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "s4",
            "photos",
            "--config",
            "/tmp/s3cfg",
            "--download-dir",
            "/tmp/dl",
            "--no-setup",
        ])
        .unwrap();
        assert_eq!(cli.bucket, "photos");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s3cfg")));
        assert_eq!(cli.download_dir, Some(PathBuf::from("/tmp/dl")));
        assert!(cli.no_setup);
        assert!(!cli.debug);
    }

    #[test]
    fn test_missing_explicit_credentials() {
        let err = load_credentials(
            Some(Path::new("/nonexistent/s4/s3cfg")),
            true,
            &Formatter::plain(),
        )
        .unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::UsageError);
    }

    #[test]
    fn test_explicit_credentials_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s3cfg");
        S3Config::new("AK", "SK")
            .with_endpoint("localhost:9000")
            .save(&path)
            .unwrap();

        let config = load_credentials(Some(&path), true, &Formatter::plain())
            .unwrap()
            .unwrap();
        assert_eq!(config.access_key, "AK");
        assert!(config.path_style());
    }
}

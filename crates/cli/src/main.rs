//! s4 - S3 bucket browser for the terminal
//!
//! Browse, preview, download, upload, rename, copy and delete objects in an
//! S3-compatible bucket. Credentials come from an s3cmd-style `.s3cfg`.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use s4::cli::{self, Cli};
use s4::exit_code::ExitCode;
use s4::output::Formatter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The browser owns the terminal, so logs only ever go to a file
    if let Some(path) = &cli.log_file {
        if let Err(e) = init_logging(path, cli.debug) {
            Formatter::new().error(&format!(
                "Cannot open log file '{}': {e}",
                path.display()
            ));
            std::process::exit(ExitCode::UsageError.as_i32());
        }
    }

    let exit_code = cli::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}

fn init_logging(path: &Path, debug: bool) -> std::io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .init();

    Ok(())
}

//! # Subscribe - subscription catalog CLI
//!
//! ## Usage
//!
//! ```bash
//! subscribe init
//! subscribe index --id Toyota --uid U1 --name like --name love
//! subscribe search --query '{"like": "U1", "love": "U1"}'
//! subscribe --json-mode status
//! ```

use clap::Parser;
use subscribe::cli::{self, Cli};
use subscribe::config::{DEFAULT_LOG_FILTER, LogFormat, Settings};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::resolve(cli.config.as_deref(), cli.snapshot.as_deref(), |key| {
        std::env::var(key).ok()
    }) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(&settings);

    let mut out = std::io::stdout().lock();
    if let Err(e) = cli::execute(&cli, &settings, &mut out) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for `--json-mode` output.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match settings.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

//! Log output for the CLI
//!
//! `RUST_LOG` wins over the `app.logFilter` setting. Logs go to stderr so
//! they never mix with `--json` output on stdout.

use std::path::Path;

use tally_core::config::Config;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::get_data_dir;

pub fn init() {
    let (configured, problem) = match get_data_dir() {
        Ok(dir) => configured_filter(&dir),
        Err(e) => (Config::default().log_filter, Some(format!("{:#}", e))),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    if let Some(problem) = problem {
        warn!(error = %problem, "ignoring configured log filter, using the default");
    }
}

/// Log filter from settings.json, plus the reason it fell back to the default
fn configured_filter(data_dir: &Path) -> (String, Option<String>) {
    match Config::load(data_dir) {
        Ok(config) => (config.log_filter, None),
        Err(e) => (Config::default().log_filter, Some(format!("{:#}", e))),
    }
}

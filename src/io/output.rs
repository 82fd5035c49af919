//! Logging and progress output

use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Install the global subscriber, writing to `log_file` or stdout.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn setup_output(log_file: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let log = File::create(path)
                .wrap_err_with(|| format!("Could not create log file: {path}"))?;
            let file_layer = layer().with_writer(Mutex::new(log)).with_ansi(false);
            Registry::default().with(filter).with(file_layer).init();
        }
        None => {
            let stdout_layer = layer().with_writer(std::io::stdout).with_ansi(true);
            Registry::default().with(filter).with(stdout_layer).init();
        }
    }
    Ok(())
}

/// Bar over completed update attempts. The length is set from the driver's
/// progress callback, since the step count is only known once a backend runs.
pub fn step_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message("steps");
    pb
}

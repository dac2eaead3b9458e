//! Tracing initialization for the dispatch pipeline.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Filter applied when `RUST_LOG` is unset. The pipeline crates log at
/// debug so silent drop decisions (stale edits, bans, disabled or
/// unauthorized commands) are visible without turning the whole tree up.
const DEFAULT_FILTER: &str = "info,dispatch=debug,cbot_telegram=debug";

/// Installs the global tracing subscriber: one fmt layer (level, target,
/// span close events) tee'd to stdout and an append-mode log file. Missing
/// parent directories of `log_file_path` are created. Load `.env` before
/// calling this, otherwise `RUST_LOG` from the file is not picked up.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let path = Path::new(log_file_path);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_level(true);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {}", e))?;

    Ok(())
}

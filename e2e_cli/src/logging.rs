//! Tracing subscriber setup: stderr console layer plus an optional JSON file layer.

use std::path::Path;

use e2e_config::Logging;
use eyre::{Result, WrapErr, eyre};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` for the console; the file layer uses
/// `logging.level` (default "info"). Keep the returned guard alive until exit
/// or buffered file lines are lost.
pub fn init_tracing(json: bool, level: &str, logging: &Logging) -> Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    if json {
        layers.push(console.json().with_filter(console_filter).boxed());
    } else {
        layers.push(console.with_filter(console_filter).boxed());
    }

    let mut guard = None;
    if let Some(file) = logging.file.as_deref() {
        let (layer, g) = file_layer(file, logging)?;
        layers.push(layer);
        guard = Some(g);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| eyre!("init tracing: {e}"))?;

    tracing::debug!(json, level, file = ?logging.file, "logging initialized");
    Ok(guard)
}

fn file_layer(file: &str, logging: &Logging) -> Result<(BoxedLayer, WorkerGuard)> {
    let path = Path::new(file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| eyre!("logging.file {file:?} has no file name"))?;

    let rotation = match logging.rotation.as_deref() {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(name.to_string_lossy().into_owned())
        .build(dir)
        .wrap_err_with(|| format!("open log file {file:?}"))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let level = logging.level.as_deref().unwrap_or("info");
    let filter =
        EnvFilter::try_new(level).wrap_err_with(|| format!("invalid logging.level {level:?}"))?;
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();
    Ok((layer, guard))
}

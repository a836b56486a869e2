use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub(crate) const TRACE_FILE_ENV: &str = "MNEMO_TRACE_FILE";

/// Guard that must be held alive for non-blocking writer flush on shutdown.
/// When dropped, buffered JSONL lines are flushed to disk.
#[allow(missing_debug_implementations)]
pub(crate) struct TracingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Initialize the layered tracing subscriber.
///
/// Layers:
/// 1. Console on stderr, filtered by `RUST_LOG` (default `warn`) so stdout
///    carries only tool output
/// 2. JSONL file, activated by `MNEMO_TRACE_FILE`, filtered at `debug`
///
/// Returns a guard that must be held in `main()` to ensure buffered writes flush.
pub(crate) fn init() -> TracingGuard {
    let mut guards = Vec::new();

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let jsonl = std::env::var(TRACE_FILE_ENV).ok().map(|trace_file| {
        let jsonl_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let (layer, guard) = jsonl_layer(Path::new(&trace_file), jsonl_filter);
        guards.push(guard);
        layer
    });

    Registry::default()
        .with(jsonl)
        .with(console_layer)
        .init();

    TracingGuard { _guards: guards }
}

/// A JSONL layer appending to `path`, with span open/close events.
pub(crate) fn jsonl_layer(
    path: &Path,
    filter: EnvFilter,
) -> (Box<dyn Layer<Registry> + Send + Sync>, WorkerGuard) {
    let dir = path.parent().map_or_else(
        || PathBuf::from("."),
        |p| {
            if p.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                p.to_path_buf()
            }
        },
    );
    let filename = path.file_name().map_or_else(
        || "traces.jsonl".to_owned(),
        |f| f.to_string_lossy().into_owned(),
    );

    let file_appender = tracing_appender::rolling::never(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_span_list(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_filter(filter)
        .boxed();

    (layer, guard)
}

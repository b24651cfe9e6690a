//! Optional local telemetry logging for debugging banner transitions.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Trace log destination, overridable via `BANNERSTACK_TRACE_LOG`.
#[must_use]
pub fn tracing_log_path() -> PathBuf {
    env::var("BANNERSTACK_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("bannerstack_trace.jsonl"))
}

fn init_tracing_once(once: &OnceLock<()>) {
    let _ = once.get_or_init(|| {
        let path = tracing_log_path();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(_) => return,
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Install the JSON file subscriber once per process. Safe to call from
/// hosts that already installed their own global subscriber; the second
/// installation simply loses.
pub fn init_tracing() {
    init_tracing_once(&TRACING_INIT);
}

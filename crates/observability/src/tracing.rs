//! Tracing/logging initialization.
//!
//! One flattened JSON object per event on stdout. Event fields sit at the top
//! level next to `message`, and the enclosing span (the store's instrumented
//! calls carry `list_id`/`item_id`) is attached as `span`. The filter comes
//! from `RUST_LOG`; without it, sqlx statement logging stays at `warn` so
//! request lines are not buried under SQL.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the JSON subscriber. Later calls are no-ops.
pub fn init(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_filter))
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .try_init();
}

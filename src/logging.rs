use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "READECK_SUMMARY_LOG";
const DEFAULT_FILTER: &str = "warn";

fn build_filter(raw: Option<String>) -> EnvFilter {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Output goes to stderr; stdout carries
/// command output and bridge frames.
pub fn init() {
    let filter = build_filter(std::env::var(LOG_ENV).ok());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

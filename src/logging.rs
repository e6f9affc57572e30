//! Structured logging setup.
//!
//! All diagnostics go to stderr so that command output on stdout stays
//! machine-readable.

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Env var holding the log filter directive, e.g. `debug` or `codetree::upload=trace`.
pub const LOG_VAR: &str = "CODETREE_LOG";
/// Env var selecting the output format: `text` (default) or `json`.
pub const LOG_FORMAT_VAR: &str = "CODETREE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "warn";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Builds the filter from a directive string, falling back to `warn` when
/// it is missing or unparsable.
fn build_env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber from `CODETREE_LOG` and `CODETREE_LOG_FORMAT`.
///
/// Calling it more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_logging() {
    let directive = std::env::var(LOG_VAR).ok();
    let format = LogFormat::parse(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    let filter = build_env_filter(directive.as_deref());
    let base = Registry::default().with(filter);

    let result = match format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

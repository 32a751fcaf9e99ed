use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter {filter:?}: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("unknown log format {0:?} (expected json or pretty)")]
    UnknownFormat(String),
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global `tracing` subscriber described by `logging`.
///
/// `RUST_LOG`, when set, takes precedence over `logging.level`.
pub fn init(logging: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|source| {
            TelemetryError::InvalidFilter {
                filter: logging.level.clone(),
                source,
            }
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => return Err(TelemetryError::UnknownFormat(other.to_string())),
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)
}

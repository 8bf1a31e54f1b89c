//! Logging bootstrap for binaries and test harnesses embedding survey objects

use crate::config::LoggingConfig;
use crate::error::SurveyError;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`.
///
/// # Errors
/// Returns [`SurveyError::Logging`] when the filter is invalid or a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), SurveyError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|error| SurveyError::Logging(error.to_string()))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|error| SurveyError::Logging(error.to_string()))
}

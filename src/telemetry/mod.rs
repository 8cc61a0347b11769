//! Tracing setup
//!
//! The client reports every operation through `tracing` events:
//! `info` for the human-readable status lines, `debug` for HTTP traffic and
//! poll ticks. Applications that do not install their own subscriber can call
//! [`init_tracing`] once at startup.
//!
//! ```rust,no_run
//! use gemini_file_search::telemetry::{TracingConfig, init_tracing};
//!
//! init_tracing(TracingConfig::minimal()).expect("tracing");
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::FileSearchError;

/// Output format of the fmt subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub filter: String,
    pub format: OutputFormat,
    /// Include the event target (module path) in output
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

impl TracingConfig {
    /// Status lines only.
    pub fn minimal() -> Self {
        Self {
            filter: "gemini_file_search=info".to_string(),
            format: OutputFormat::Text,
            with_target: false,
        }
    }

    /// Status lines plus request/response and poll details.
    pub fn development() -> Self {
        Self {
            filter: "gemini_file_search=debug".to_string(),
            format: OutputFormat::Text,
            with_target: true,
        }
    }

    pub fn json_production() -> Self {
        Self {
            filter: "gemini_file_search=info".to_string(),
            format: OutputFormat::Json,
            with_target: true,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, FileSearchError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter).map_err(|e| {
                FileSearchError::ConfigurationError(format!(
                    "Invalid tracing filter '{}': {e}",
                    self.filter
                ))
            }),
        }
    }
}

/// Install a global fmt subscriber.
///
/// Fails if the filter is invalid or a global subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> Result<(), FileSearchError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let result = match config.format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| {
        FileSearchError::ConfigurationError(format!("Failed to install tracing subscriber: {e}"))
    })
}

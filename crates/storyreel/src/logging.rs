//! Tracing subscriber setup for the binary.

use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// How logs are filtered and formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log at debug level regardless of `RUST_LOG`
    pub verbose: bool,
    /// Emit one JSON object per event
    pub json: bool,
}

impl LoggingConfig {
    /// Create a configuration.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// `debug` when verbose, otherwise `RUST_LOG` falling back to `info`.
    pub fn filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        let filter = if self.verbose {
            EnvFilter::try_new("debug")?
        } else {
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?
        };
        Ok(filter)
    }

    pub(crate) fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        if self.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .boxed()
        }
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Registry::default()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .try_init()?;
    Ok(())
}

//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from storyreel.toml)
//! - `~/.config/storyreel/storyreel.toml`
//! - `./storyreel.toml`

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyreel_core::GenerationSettings;
use storyreel_error::{ConfigError, StoryreelError, StoryreelResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../storyreel.toml");

/// Where the provider lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.lumalabs.ai/dream-machine/v1".to_string()
}

fn default_api_key_env() -> String {
    "LUMA_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProviderSettings {
    /// Read the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is unset or blank.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::new(format!(
                "{} environment variable not set",
                self.api_key_env
            ))),
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Request parameters plus the continuity switch.
///
/// The parameter keys sit directly under `[generation]` next to
/// `continuity`, and take their defaults from [`GenerationSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Per-request parameters
    #[serde(flatten)]
    pub settings: GenerationSettings,
    /// Thread each scene's outcome into the next scene's request
    #[serde(default = "default_true")]
    pub continuity: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            settings: GenerationSettings::default(),
            continuity: true,
        }
    }
}

/// How the wait between status polls grows.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyreel_rate_limit::Backoff;
///
/// let base = Duration::from_secs(5);
/// let cap = Duration::from_secs(60);
/// assert_eq!(Backoff::Constant.delay(base, 4, cap), Duration::from_secs(5));
/// assert_eq!(Backoff::Linear.delay(base, 3, cap), Duration::from_secs(15));
/// assert_eq!(Backoff::Exponential.delay(base, 3, cap), Duration::from_secs(20));
/// assert_eq!(Backoff::Exponential.delay(base, 10, cap), cap);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same interval every time
    #[default]
    #[display("constant")]
    Constant,
    /// Interval times attempt number
    #[display("linear")]
    Linear,
    /// Interval doubled each attempt
    #[display("exponential")]
    Exponential,
}

impl Backoff {
    /// Delay before poll `attempt` (1-based), never above `cap`.
    pub fn delay(&self, interval: Duration, attempt: u32, cap: Duration) -> Duration {
        let attempt = attempt.max(1);
        let delay = match self {
            Backoff::Constant => interval,
            Backoff::Linear => interval.saturating_mul(attempt),
            Backoff::Exponential => {
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                interval.saturating_mul(factor)
            }
        };
        match self {
            Backoff::Constant => delay,
            _ => delay.min(cap.max(interval)),
        }
    }
}

/// Status polling budget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Polls before a job is declared timed out
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base wait before each poll
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Growth of the wait between polls
    #[serde(default)]
    pub backoff: Backoff,
    /// Ceiling for growing waits
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,
}

fn default_max_attempts() -> u32 {
    60
}

fn default_interval_secs() -> u64 {
    5
}

fn default_max_interval_secs() -> u64 {
    60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_secs: default_interval_secs(),
            backoff: Backoff::default(),
            max_interval_secs: default_max_interval_secs(),
        }
    }
}

impl PollingConfig {
    /// Base wait before each poll.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Ceiling for growing waits.
    pub fn max_interval(&self) -> Duration {
        Duration::from_secs(self.max_interval_secs)
    }
}

/// Provider-side resource bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Jobs allowed in flight at once
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: u32,
    /// HTTP requests per minute, unlimited when unset
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
}

fn default_max_concurrent_jobs() -> u32 {
    1
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            requests_per_minute: None,
        }
    }
}

/// Transport retry policy for transient HTTP errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Retry transient errors at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// First backoff delay
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Longest single backoff
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_retries() -> usize {
    3
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_retries: default_max_retries(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

/// Top-level Storyreel configuration.
///
/// # Example
///
/// ```no_run
/// use storyreel_rate_limit::StoryreelConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryreelConfig::load()?;
/// println!("Polling every {}s", config.polling.interval_secs);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct StoryreelConfig {
    /// Provider endpoint and credentials
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Request parameters
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Status polling budget
    #[serde(default)]
    pub polling: PollingConfig,
    /// Concurrency and request rate bounds
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Transport retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl StoryreelConfig {
    /// Only the bundled defaults, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> StoryreelResult<Self> {
        build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file, layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration from file");

        build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> StoryreelResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyreel/storyreel.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyreel").required(false));

        build(builder)
    }
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> StoryreelResult<StoryreelConfig> {
    builder
        .build()
        .map_err(|e| {
            StoryreelError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            StoryreelError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}

//! HTTP transport for the Dream Machine generations API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use storyreel_core::error_message;
use storyreel_error::{
    GenerationError, GenerationResult, HttpError, RetryableError, StoryreelResult,
};
use storyreel_interface::GenerationProvider;
use storyreel_rate_limit::{ProviderSettings, RetryConfig, StoryreelConfig};
use tracing::{debug, error, info, instrument, warn};

/// Luma Dream Machine client.
///
/// Constructed explicitly and passed to the job client; there is no shared
/// global instance.
#[derive(Debug, Clone)]
pub struct LumaProvider {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl LumaProvider {
    /// Create a provider for `base_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl AsRef<str>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> StoryreelResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Creating Luma provider");
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            retry,
        })
    }

    /// Create a provider from loaded configuration, reading the API key from
    /// the environment variable named in `[provider]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the HTTP client cannot be built.
    pub fn from_config(config: &StoryreelConfig) -> StoryreelResult<Self> {
        Self::from_settings(&config.provider, config.retry.clone())
    }

    /// Create a provider from the `[provider]` and `[retry]` sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings, retry: RetryConfig) -> StoryreelResult<Self> {
        let api_key = settings.api_key()?;
        Self::new(api_key, &settings.base_url, settings.request_timeout(), retry)
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generations_url(&self) -> String {
        format!("{}/generations", self.base_url)
    }

    fn generation_url(&self, job_id: &str) -> String {
        format!("{}/generations/{}", self.base_url, job_id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .header("content-type", "application/json")
    }

    async fn post_once(&self, body: &Value) -> Result<Value, HttpError> {
        let request = self.authorized(self.client.post(self.generations_url())).json(body);
        read_json(request).await
    }

    async fn get_once(&self, job_id: &str) -> Result<Value, HttpError> {
        let request = self.authorized(self.client.get(self.generation_url(job_id)));
        read_json(request).await
    }

    /// Run `operation`, retrying transient HTTP errors.
    ///
    /// The first failure picks the backoff shape for its status; `[retry]`
    /// caps the retry count and longest delay. At most `max_retries + 1`
    /// attempts are made, and every retry waits out a backoff delay first.
    async fn with_retry<F, Fut>(&self, operation: F) -> Result<Value, HttpError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Value, HttpError>>,
    {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let first = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !self.retry.enabled || !first.is_retryable() {
            warn!(error = %first, "Permanent provider error, failing immediately");
            return Err(first);
        }

        let (initial_ms, max_retries, max_delay_secs) = retry_plan(&first, &self.retry);
        info!(
            error = %first,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Provider request failed, will retry with configured strategy"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        // `Retry::spawn` runs its action before the first delay, so the
        // failure already seen is handed back once without touching the network.
        let mut seen = Some(first);
        Retry::spawn(retry_strategy, || {
            let attempt = match seen.take() {
                Some(e) => Err(e),
                None => Ok(operation()),
            };
            async move {
                let outcome = match attempt {
                    Ok(request) => request.await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Transient provider error, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent provider error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }
}

/// Merge the error-specific backoff shape with the configured caps.
fn retry_plan(err: &HttpError, config: &RetryConfig) -> (u64, usize, u64) {
    let (initial_ms, retries, max_delay_secs) = err.retry_strategy_params();
    (
        initial_ms.max(config.initial_backoff_ms),
        retries.min(config.max_retries),
        max_delay_secs.min(config.max_delay_secs).max(1),
    )
}

/// Send a request and decode a JSON body, mapping failures to [`HttpError`].
async fn read_json(request: RequestBuilder) -> Result<Value, HttpError> {
    let response = request.send().await.map_err(|e| {
        error!(error = ?e, "Failed to send request to provider");
        HttpError::new(format!("Request failed: {}", e))
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        HttpError::with_status(status.as_u16(), format!("Failed to read response body: {}", e))
    })?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| format!("{} {}", status, text.trim()));
        error!(status = %status, message = %message, "Provider returned error status");
        return Err(HttpError::with_status(status.as_u16(), message));
    }

    serde_json::from_str(&text).map_err(|e| {
        HttpError::with_status(status.as_u16(), format!("Response is not valid JSON: {}", e))
    })
}

#[async_trait]
impl GenerationProvider for LumaProvider {
    #[instrument(skip(self, body), fields(provider = "luma"))]
    async fn submit(&self, body: &Value) -> GenerationResult<Value> {
        debug!("Submitting generation");
        self.with_retry(|| self.post_once(body))
            .await
            .map_err(GenerationError::from)
    }

    #[instrument(skip(self), fields(provider = "luma"))]
    async fn fetch(&self, job_id: &str) -> GenerationResult<Value> {
        debug!("Fetching generation status");
        self.with_retry(|| self.get_once(job_id))
            .await
            .map_err(GenerationError::from)
    }

    fn provider_name(&self) -> &'static str {
        "luma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> LumaProvider {
        LumaProvider::new("test-key", base_url, Duration::from_secs(1), RetryConfig::default())
            .unwrap()
    }

    #[test]
    fn urls_drop_trailing_slash() {
        let luma = provider("https://api.example.com/v1/");
        assert_eq!(luma.generations_url(), "https://api.example.com/v1/generations");
        assert_eq!(
            luma.generation_url("abc"),
            "https://api.example.com/v1/generations/abc"
        );
    }

    fn always_unavailable(
        calls: &std::sync::Mutex<Vec<tokio::time::Instant>>,
    ) -> impl std::future::Future<Output = Result<Value, HttpError>> {
        calls.lock().unwrap().push(tokio::time::Instant::now());
        std::future::ready(Err(HttpError::with_status(503, "busy")))
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_at_configured_bound_after_backoff() {
        let retry = RetryConfig {
            enabled: true,
            initial_backoff_ms: 1000,
            max_retries: 1,
            max_delay_secs: 1,
        };
        let luma = LumaProvider::new("test-key", "http://localhost", Duration::from_secs(1), retry)
            .unwrap();
        let calls = std::sync::Mutex::new(Vec::new());

        let result = luma.with_retry(|| always_unavailable(&calls)).await;

        assert_eq!(result.unwrap_err().status, Some(503));
        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 2);
        // One-second cap with jitter in [0.5, 1.5).
        assert!(calls[1] - calls[0] >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_a_single_attempt() {
        let retry = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        let luma = LumaProvider::new("test-key", "http://localhost", Duration::from_secs(1), retry)
            .unwrap();
        let calls = std::sync::Mutex::new(Vec::new());

        assert!(luma.with_retry(|| always_unavailable(&calls)).await.is_err());
        assert_eq!(calls.into_inner().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let luma = provider("http://localhost");
        let calls = std::sync::Mutex::new(0);

        let result = luma
            .with_retry(|| {
                *calls.lock().unwrap() += 1;
                std::future::ready(Err(HttpError::with_status(400, "bad prompt")))
            })
            .await;

        assert_eq!(result.unwrap_err().status, Some(400));
        assert_eq!(calls.into_inner().unwrap(), 1);
    }

    #[test]
    fn retry_plan_respects_configured_caps() {
        let config = RetryConfig {
            enabled: true,
            initial_backoff_ms: 500,
            max_retries: 2,
            max_delay_secs: 10,
        };
        let throttled = HttpError::with_status(429, "slow down");
        assert_eq!(retry_plan(&throttled, &config), (5000, 2, 10));

        let dropped = HttpError::new("connection reset");
        assert_eq!(retry_plan(&dropped, &config), (1000, 2, 10));
    }
}

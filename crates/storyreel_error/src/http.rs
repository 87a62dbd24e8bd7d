//! HTTP error types.

use crate::RetryableError;

/// HTTP transport error with source location.
///
/// `status` is `None` when no response was received at all (DNS, connect,
/// TLS, timeout).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// The underlying error message
    pub message: String,
    /// Response status code, if a response arrived
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// assert_eq!(err.status, None);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an HttpError for a non-success response status.
    #[track_caller]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: Some(status),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(status) => matches!(status, 408 | 429 | 500 | 502 | 503 | 504),
        }
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self.status {
            Some(429) => (5000, 3, 40),
            Some(503) => (2000, 5, 60),
            Some(500 | 502 | 504) => (1000, 3, 8),
            Some(408) => (2000, 4, 30),
            _ => (1000, 3, 30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_transient() {
        assert!(HttpError::new("dns failure").is_retryable());
    }

    #[test]
    fn throttling_and_server_errors_are_transient() {
        for status in [408, 429, 500, 502, 503, 504] {
            assert!(HttpError::with_status(status, "busy").is_retryable(), "{status}");
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        for status in [400, 401, 403, 404, 422] {
            assert!(!HttpError::with_status(status, "nope").is_retryable(), "{status}");
        }
    }

    #[test]
    fn rate_limit_backs_off_longer() {
        let (initial_ms, retries, _) = HttpError::with_status(429, "slow down").retry_strategy_params();
        assert_eq!(initial_ms, 5000);
        assert_eq!(retries, 3);
    }
}

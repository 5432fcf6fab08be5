use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single status fetch against one device
///
/// Every variant is contained within one device's fetch for one tick. The poller logs
/// it and moves on; nothing here is fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused connection, reset, body read)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Device answered with a non-2xx status
    #[error("unexpected status code: {0}")]
    BadStatus(StatusCode),

    /// Response body did not match the expected `Shelly.GetStatus` shape
    #[error("failed to decode status response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// True for both connection failures and timeouts
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Timeout)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ExporterError>;

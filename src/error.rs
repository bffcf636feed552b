use thiserror::Error;

/// Fatal, run-level failures. Anything here aborts the harvest with a non-zero exit.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("review items never appeared within {waited_ms}ms")]
    ConvergenceTimeout { waited_ms: u64 },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("browser error: {0}")]
    Browser(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Transport-level failure talking to a sink. Non-2xx statuses are not errors here;
/// the sink turns them into per-record outcomes.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

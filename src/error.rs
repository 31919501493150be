use thiserror::Error;

/// Failure to produce the event table. Rendered by the dashboard as an
/// error panel over an empty view; never retried automatically.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed dataset: {0}")]
    Malformed(String),
}

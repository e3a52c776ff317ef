use fxhist_instrument::UnknownGranularity;
use reqwest::StatusCode;
use thiserror::Error;

/// All errors generated in `fxhist-data`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    UnknownGranularity(#[from] UnknownGranularity),

    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),

    #[error("HTTP error (status {status}): {body}")]
    Http { status: StatusCode, body: String },

    #[error("malformed candle record: {0}")]
    MalformedRecord(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode candles response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Determine if an error only affects the window or record that produced it.
    ///
    /// Recoverable errors are logged and skipped by the download job, everything
    /// else terminates it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DataError::Http { .. } | DataError::MalformedRecord(_))
    }
}

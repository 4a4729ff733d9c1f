use thiserror::Error;

/// Errors raised by the decision cache, its stores and the session.
/// Classification and evaluation never fail.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying store I/O failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Store document could not be (de)serialized
    #[cfg(feature = "serde")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Persisted value does not decode to a known state
    #[error("corrupted entry \"{key}\": {value}")]
    CorruptedEntry { key: String, value: i64 },
    /// The cache never goes back to an undetermined state
    #[error("cannot persist an undetermined outcome")]
    UndeterminedOutcome,
    /// Signal source failed to start
    #[error("signal source error: {0}")]
    SignalSource(String),
}

/// Errors raised by the [std::str::FromStr] implementations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown constellation \"{0}\"")]
    Constellation(String),
    #[error("unknown sbas system \"{0}\"")]
    SbasSubtype(String),
}

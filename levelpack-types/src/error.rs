//! Error types for schema decoding and validation.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised when a level schema is malformed.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema text is not valid JSON or does not match the level shape.
    #[error("malformed level schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Two states share the same id.
    #[error("duplicate state id: {0}")]
    DuplicateStateId(String),

    /// The initial state id does not name any state.
    #[error("initial state {0:?} does not match any state")]
    UnknownInitialState(String),

    /// A time frame has a negative or non-finite average.
    #[error("state {state:?} has invalid average seconds {average}")]
    InvalidAverage { state: String, average: f64 },

    /// Unrecognized distribution name or discriminant.
    #[error("unknown distribution: {0}")]
    UnknownDistribution(String),
}

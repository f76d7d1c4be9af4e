use thiserror::Error;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Rate limiting error types
#[derive(Error, Debug)]
pub enum RateLimitError {
    /// A policy was handed more history than it asked for. This is an
    /// integration bug in the caller, never a business-rule outcome.
    #[error("policy requested at most {requested} history records but received {received}")]
    InvalidHistorySize { requested: usize, received: usize },

    /// The storage collaborator failed an I/O operation. Propagated
    /// unchanged; retry policy belongs to the caller.
    #[error("usage storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Invalid limiter configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl RateLimitError {
    /// Whether this error indicates a caller bug rather than an
    /// operational condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RateLimitError::InvalidHistorySize { .. })
    }
}

//! Store error types.

/// Errors from writing to the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store rejected the write
    #[error("store error {status} at {path}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// Value could not be serialized for writing
    #[error("cannot serialize value for {path}: {message}")]
    Serialize { path: String, message: String },

    /// Adapter could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

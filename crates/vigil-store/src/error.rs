/// Errors surfaced by the durable log layer.
///
/// Append failures are intentionally NOT represented here: appends are
/// best-effort and logged internally, never propagated to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested log file does not exist in the log directory.
    #[error("log file not found: {name}")]
    NotFound { name: String },

    /// The filename contained a path separator or parent reference.
    /// Downloads accept bare names only.
    #[error("invalid log filename: {name}")]
    InvalidFilename { name: String },

    /// An underlying I/O error while reading a log file.
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` alias for durable log reads.
pub type Result<T> = std::result::Result<T, StoreError>;

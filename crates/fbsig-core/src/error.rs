//! Error types for the fbsig core.

/// Core error type for fbsig configuration and setup.
#[derive(Debug, thiserror::Error)]
pub enum FbSigError {
    /// The application secret is missing or empty.
    #[error("application secret is required")]
    MissingSecret,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for fbsig operations.
pub type FbSigResult<T> = Result<T, FbSigError>;

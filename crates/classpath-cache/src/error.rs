//! Error types for class path resolution and cache persistence.

/// Classpath cache errors.
///
/// None of these escape `resolve`, `load` or `save`; they surface only through
/// the fallible `try_*` variants and in log output.
#[derive(Debug, thiserror::Error)]
pub enum ClasspathError {
    /// Filesystem access failed.
    #[error("io error: {message}")]
    Io { message: String },

    /// Persisted cache artifact could not be parsed or rendered.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClasspathError {
    /// Whether the error came from the filesystem rather than from content.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<serde_yaml::Error> for ClasspathError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

/// Result type for classpath cache operations.
pub type ClasspathResult<T> = Result<T, ClasspathError>;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for loop recognition tooling
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error types for the loop recognition tooling.
///
/// The analysis itself is infallible on well-formed graphs; errors arise
/// only at the edges, in the CLI and when writing dumps or DOT files.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(havlak::io_error))]
    Io(String),

    #[error("Invalid arguments: {message}")]
    #[diagnostic(code(havlak::invalid_args))]
    InvalidArgs { message: String },

    #[error("Serialization failed: {message}")]
    #[diagnostic(code(havlak::serialize_error))]
    Serialize { message: String },
}

impl Error {
    /// Create an invalid-arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Error::InvalidArgs {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize {
            message: err.to_string(),
        }
    }
}

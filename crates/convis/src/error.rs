use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, ConvisError>;

/// Errors raised by models, filters and the reporting helpers.
#[derive(Debug)]
pub enum ConvisError {
    /// Array shapes do not line up (expected, got).
    ShapeMismatch(String, String),
    /// Stimulus with no frames or an empty spatial extent.
    EmptyInput,
    /// Number of non-finite values found in a stimulus.
    InvalidInput(usize),
    InvalidParameter(String),
    Io(std::io::Error),
    Serde(serde_json::Error),
    Csv(csv::Error),
}

impl fmt::Display for ConvisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConvisError::ShapeMismatch(expected, got) => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, got)
            }
            ConvisError::EmptyInput => write!(f, "Input stimulus is empty"),
            ConvisError::InvalidInput(count) => {
                write!(f, "Found {} non-finite values in input stimulus", count)
            }
            ConvisError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            ConvisError::Io(e) => write!(f, "I/O error: {}", e),
            ConvisError::Serde(e) => write!(f, "JSON error: {}", e),
            ConvisError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl Error for ConvisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConvisError::Io(e) => Some(e),
            ConvisError::Serde(e) => Some(e),
            ConvisError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvisError {
    fn from(e: std::io::Error) -> Self {
        ConvisError::Io(e)
    }
}

impl From<serde_json::Error> for ConvisError {
    fn from(e: serde_json::Error) -> Self {
        ConvisError::Serde(e)
    }
}

impl From<csv::Error> for ConvisError {
    fn from(e: csv::Error) -> Self {
        ConvisError::Csv(e)
    }
}

/// Shorthand for an `InvalidParameter` error.
pub(crate) fn invalid(msg: impl Into<String>) -> ConvisError {
    ConvisError::InvalidParameter(msg.into())
}

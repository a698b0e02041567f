use std::fmt;

/// Result type for vitalog-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// The query text does not match the supported grammar. One taxonomy
    /// bucket on purpose: callers display it inline and keep the previous
    /// result set.
    Syntax(String),

    /// Export serialization failed
    Export(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(detail) => write!(f, "query syntax error: {}", detail),
            Error::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(_) => None,
            Error::Export(err) => Some(err),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err)
    }
}

use std::fmt;

/// Result type for vitalog-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the remote boundary
#[derive(Debug)]
pub enum Error {
    /// The backend could not be reached (network, TLS, timeout).
    Disconnected(String),

    /// The backend answered and said no (bad credentials, constraint
    /// violation, expired token).
    Rejected(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Disconnected(msg) => write!(f, "backend unreachable: {}", msg),
            Error::Rejected(msg) => write!(f, "backend rejected request: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Disconnected(err.to_string())
    }
}

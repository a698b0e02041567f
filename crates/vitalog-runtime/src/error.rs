use std::fmt;

/// Result type for vitalog-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Local cache layer error
    Store(vitalog_store::Error),

    /// Remote gateway error
    Remote(vitalog_remote::Error),

    /// Query engine error
    Engine(vitalog_engine::Error),

    /// Configuration error
    Config(String),

    /// An operation needed the remote backend but none is configured
    Unconfigured,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "store error: {}", err),
            Error::Remote(err) => write!(f, "remote error: {}", err),
            Error::Engine(err) => write!(f, "{}", err),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Unconfigured => write!(f, "no remote backend configured"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Remote(err) => Some(err),
            Error::Engine(err) => Some(err),
            Error::Config(_) | Error::Unconfigured => None,
        }
    }
}

impl From<vitalog_store::Error> for Error {
    fn from(err: vitalog_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<vitalog_remote::Error> for Error {
    fn from(err: vitalog_remote::Error) -> Self {
        Error::Remote(err)
    }
}

impl From<vitalog_engine::Error> for Error {
    fn from(err: vitalog_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

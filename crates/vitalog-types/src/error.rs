use std::fmt;

/// Result type for vitalog-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A wall-clock time string did not match `HH:MM`
    InvalidTimeOfDay(String),

    /// A categorical value is not part of its enumerated set
    UnknownVariant { kind: &'static str, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTimeOfDay(input) => {
                write!(f, "invalid time of day {:?}, expected HH:MM", input)
            }
            Error::UnknownVariant { kind, value } => {
                write!(f, "unknown {} value: {:?}", kind, value)
            }
        }
    }
}

impl std::error::Error for Error {}

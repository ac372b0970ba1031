use thiserror::Error;

/// Errors that can occur when reading from or writing to a [`PropertyStore`][crate::PropertyStore].
///
/// Every variant is an invalid-argument condition: the caller asked for something the store
/// cannot provide. They are always recoverable, typically by falling back to a default.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided an empty key, which is never a valid entry.
    #[error("property key must not be empty")]
    EmptyKey,

    /// No value is stored under the requested key.
    #[error("no property is stored under key '{key}'")]
    MissingKey {
        /// The key that was looked up.
        key: String,
    },

    /// A value is stored under the requested key but it is of a different type.
    #[error("property '{key}' holds a value of type {stored}, not {requested}")]
    TypeMismatch {
        /// The key that was looked up. Empty when reading from a standalone cell.
        key: String,

        /// The name of the type the stored value was created with.
        stored: &'static str,

        /// The name of the type the caller asked for.
        requested: &'static str,
    },
}

/// The broad class of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The caller passed a key or requested a type that the store cannot satisfy.
    InvalidArgument,
}

impl Error {
    /// Returns the broad class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyKey | Self::MissingKey { .. } | Self::TypeMismatch { .. } => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

/// A specialized `Result` type for property store operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

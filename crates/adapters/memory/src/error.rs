//! Memory adapter error types.

use greenhouse_domain::error::{GreenhouseError, ValidationError};

/// Errors raised while building a [`MemoryStorage`](crate::MemoryStorage).
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The connection string is not of the form `mock://fake/<limit>`.
    #[error("unsupported storage url {url}, expected mock://fake/<limit>")]
    UnsupportedUrl { url: String },

    /// The `<limit>` segment is not an unsigned integer.
    #[error("invalid retention limit")]
    InvalidLimit(#[from] std::num::ParseIntError),

    /// A domain invariant was violated (e.g. a zero limit).
    #[error("invalid storage configuration")]
    Validation(#[from] ValidationError),
}

impl From<MemoryError> for GreenhouseError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Validation(inner) => Self::Validation(inner),
            other => Self::Storage(Box::new(other)),
        }
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while producing a slug.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("slug length must be between 1 and 64 characters, got {0}")]
    InvalidLength(usize),
    #[error("random source failed: {0}")]
    Entropy(String),
}

impl From<Error> for clipper_core::ShortenerError {
    fn from(value: Error) -> Self {
        Self::Generator(value.to_string())
    }
}

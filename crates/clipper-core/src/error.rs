use thiserror::Error;

/// Errors raised by a storage backend.
///
/// Every variant carries the operation that was being attempted along with
/// the underlying message, so callers can log it without extra context.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("schema migration failed: {0}")]
    Migration(String),
    #[error("storage backend is closed")]
    Closed,
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Outcomes of the shortener service that are not a successful value.
///
/// `NotFound`, `Gone` and `NoContent` are terminal, user-facing states.
/// `Generator` and `Storage` are opaque internal failures.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("short url not found: {0}")]
    NotFound(String),
    #[error("short url has been deleted: {0}")]
    Gone(String),
    #[error("no urls stored for this user")]
    NoContent,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    #[error("slug generation failed: {0}")]
    Generator(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ShortenerError {
    /// Returns `true` for failures the caller cannot act on.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Generator(_) | Self::Storage(_))
    }
}

use crate::error::StorageError;
use crate::slug::Slug;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short identifier, unique among active records.
    pub slug: Slug,
    /// The original URL that was shortened.
    pub original_url: String,
    /// Opaque id of the creating user. Empty for anonymous records.
    pub owner: String,
    /// Soft-delete flag. Only the relational backend ever returns `true`.
    pub deleted: bool,
}

/// One item of a batch insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub correlation_id: String,
    pub slug: Slug,
    pub original_url: String,
}

/// The slug a batch item ended up stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub correlation_id: String,
    pub slug: Slug,
}

/// Outcome of a single insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The proposed slug was stored.
    Created(Slug),
    /// The URL was already stored under another slug, which is returned instead.
    Conflict(Slug),
}

impl PutOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, PutOutcome::Conflict(_))
    }
}

/// Aggregate counts over the active records of a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of active records.
    pub urls: u64,
    /// Number of distinct non-empty owners among active records.
    pub users: u64,
}

/// The storage capability-set shared by every backend.
///
/// A backend instance is a long-lived singleton shared by all requests;
/// implementations provide their own internal synchronization.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Retrieves the record stored under `slug`.
    ///
    /// Returns `None` if the slug was never stored (or was physically removed).
    /// Soft-deleted records are returned with `deleted == true`.
    async fn get(&self, slug: &Slug) -> Result<Option<UrlRecord>>;

    /// Stores `original_url` under `slug` for `owner`.
    ///
    /// Backends that enforce content uniqueness return
    /// [`PutOutcome::Conflict`] with the pre-existing slug instead of inserting.
    async fn put(&self, slug: &Slug, original_url: &str, owner: &str) -> Result<PutOutcome>;

    /// Applies [`Repository::put`] to every item, returning one entry per
    /// item in input order.
    async fn put_batch(&self, items: &[BatchItem], owner: &str) -> Result<Vec<BatchEntry>>;

    /// Lists the active records created by `owner`. An empty list is a valid result.
    async fn get_all_by_owner(&self, owner: &str) -> Result<Vec<UrlRecord>>;

    /// Deletes the listed slugs that belong to `owner`.
    ///
    /// Slugs that are missing or owned by someone else are skipped silently.
    async fn delete_many(&self, slugs: &[Slug], owner: &str) -> Result<()>;

    /// Liveness probe.
    async fn ping(&self) -> Result<()>;

    async fn stats(&self) -> Result<Stats>;

    /// Releases backend resources. Calling it more than once is harmless.
    async fn close(&self);
}

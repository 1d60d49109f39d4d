use crate::repository::Stats;
use crate::slug::Slug;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Result of shortening a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new short URL was created.
    Created(String),
    /// The URL had already been shortened; this is the existing short URL.
    Conflict(String),
}

impl Shortened {
    /// Returns the short URL regardless of the outcome.
    pub fn short_url(&self) -> &str {
        match self {
            Shortened::Created(url) | Shortened::Conflict(url) => url,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Shortened::Conflict(_))
    }
}

/// One URL of a batch shortening request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub correlation_id: String,
    pub original_url: String,
}

/// The short URL produced for one [`BatchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub correlation_id: String,
    pub short_url: String,
}

/// A record owned by the caller, with the slug expanded to a full short URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUrl {
    pub short_url: String,
    pub original_url: String,
}

/// The business-logic surface consumed by transport adapters.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `original_url` on behalf of `owner`.
    async fn shorten(&self, owner: &str, original_url: &str) -> Result<Shortened>;

    /// Shortens every item of `batch`, returning one response per item in input order.
    async fn shorten_batch(&self, owner: &str, batch: Vec<BatchRequest>) -> Result<Vec<BatchResponse>>;

    /// Resolves a slug to its original URL.
    ///
    /// Fails with `NotFound` for unknown slugs and `Gone` for deleted ones.
    async fn resolve(&self, slug: &Slug) -> Result<String>;

    /// Lists the records of `owner`. Fails with `NoContent` when there are none.
    async fn user_urls(&self, owner: &str) -> Result<Vec<UserUrl>>;

    /// Accepts a deletion request and performs it in the background.
    ///
    /// Nothing is reported back to the caller; failures are only logged.
    fn delete_user_urls(&self, owner: &str, slugs: Vec<Slug>);

    async fn ping(&self) -> Result<()>;

    async fn stats(&self) -> Result<Stats>;
}

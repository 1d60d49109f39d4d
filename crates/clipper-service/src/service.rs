use async_trait::async_trait;
use clipper_core::{
    BatchItem, BatchRequest, BatchResponse, PutOutcome, Repository, Shortened, Shortener,
    ShortenerError, Slug, Stats, StorageError, UserUrl,
};
use clipper_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`Repository`] and a [`Generator`] to handle:
/// - URL validation
/// - Slug generation
/// - Mapping storage outcomes to service outcomes
/// - Composing public short URLs from the configured base URL
///
/// No collision retry is performed; a conflicting slug surfaces as a
/// storage failure.
pub struct ShortenerService<R: ?Sized, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    base_url: String,
}

impl<R: ?Sized, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R: Repository + ?Sized, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: Arc<R>, generator: G, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            base_url: base_url.into(),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Deletes `slugs` owned by `owner` and waits for the backend.
    ///
    /// This is the work [`Shortener::delete_user_urls`] runs in the background.
    /// The anonymous owner owns nothing, so its requests delete nothing.
    pub async fn delete_user_urls_now(
        &self,
        owner: &str,
        slugs: &[Slug],
    ) -> Result<(), ShortenerError> {
        if is_anonymous(owner) {
            return Ok(());
        }
        self.repository
            .delete_many(slugs, owner)
            .await
            .map_err(|e| log_storage_error("delete user urls", e))
    }

    /// Validates that the URL has a valid format (has a scheme and host).
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        };

        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if scheme.is_empty() || !is_valid_host(authority) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        }

        let scheme = scheme.to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        Ok(())
    }

    fn generate_slug(&self) -> Result<Slug, ShortenerError> {
        self.generator.generate().map_err(|e| {
            error!(error = %e, "slug generation failed");
            ShortenerError::from(e)
        })
    }
}

/// Records stored without a user id belong to nobody: they can be resolved
/// but never listed or deleted.
fn is_anonymous(owner: &str) -> bool {
    owner.is_empty()
}

/// Checks the `[userinfo@]host[:port]` part of a URL.
fn is_valid_host(authority: &str) -> bool {
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if let Some(bracketed) = host.strip_prefix('[') {
        return bracketed.split_once(']').is_some_and(|(addr, port)| {
            !addr.is_empty()
                && addr.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.')
                && is_valid_port(port)
        });
    }

    let (name, port) = host.find(':').map_or((host, ""), |i| host.split_at(i));
    !name.is_empty()
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '.')
        && is_valid_port(port)
}

/// An empty suffix, or `:` followed by digits.
fn is_valid_port(suffix: &str) -> bool {
    match suffix.strip_prefix(':') {
        None => suffix.is_empty(),
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
    }
}

/// Logs a backend failure with context and passes it up as opaque.
fn log_storage_error(context: &str, err: StorageError) -> ShortenerError {
    error!(error = %err, "{context} failed");
    ShortenerError::Storage(err)
}

#[async_trait]
impl<R: Repository + ?Sized, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, owner: &str, original_url: &str) -> Result<Shortened, ShortenerError> {
        Self::validate_url(original_url)?;
        let slug = self.generate_slug()?;

        let outcome = self
            .repository
            .put(&slug, original_url, owner)
            .await
            .map_err(|e| log_storage_error("save url", e))?;

        Ok(match outcome {
            PutOutcome::Created(slug) => {
                debug!(slug = %slug, owner = %owner, "shortened url");
                Shortened::Created(slug.to_url(&self.base_url))
            }
            PutOutcome::Conflict(existing) => {
                debug!(slug = %existing, "url was already shortened");
                Shortened::Conflict(existing.to_url(&self.base_url))
            }
        })
    }

    async fn shorten_batch(
        &self,
        owner: &str,
        batch: Vec<BatchRequest>,
    ) -> Result<Vec<BatchResponse>, ShortenerError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        // nothing is stored unless every item is valid
        for request in &batch {
            Self::validate_url(&request.original_url)?;
        }

        let mut items = Vec::with_capacity(batch.len());
        for request in batch {
            items.push(BatchItem {
                correlation_id: request.correlation_id,
                slug: self.generate_slug()?,
                original_url: request.original_url,
            });
        }

        let entries = self
            .repository
            .put_batch(&items, owner)
            .await
            .map_err(|e| log_storage_error("put batch", e))?;

        if entries.len() != items.len() {
            return Err(log_storage_error(
                "put batch",
                StorageError::InvalidData(format!(
                    "backend returned {} results for {} items",
                    entries.len(),
                    items.len()
                )),
            ));
        }

        debug!(count = entries.len(), owner = %owner, "shortened batch");
        Ok(entries
            .into_iter()
            .map(|entry| BatchResponse {
                short_url: entry.slug.to_url(&self.base_url),
                correlation_id: entry.correlation_id,
            })
            .collect())
    }

    async fn resolve(&self, slug: &Slug) -> Result<String, ShortenerError> {
        trace!(slug = %slug, "resolving slug");

        let record = self
            .repository
            .get(slug)
            .await
            .map_err(|e| log_storage_error("get original url", e))?;

        match record {
            None => Err(ShortenerError::NotFound(slug.to_string())),
            Some(record) if record.deleted => Err(ShortenerError::Gone(slug.to_string())),
            Some(record) => Ok(record.original_url),
        }
    }

    async fn user_urls(&self, owner: &str) -> Result<Vec<UserUrl>, ShortenerError> {
        if is_anonymous(owner) {
            return Err(ShortenerError::NoContent);
        }

        let records = self
            .repository
            .get_all_by_owner(owner)
            .await
            .map_err(|e| log_storage_error("list user urls", e))?;

        if records.is_empty() {
            return Err(ShortenerError::NoContent);
        }

        Ok(records
            .into_iter()
            .map(|record| UserUrl {
                short_url: record.slug.to_url(&self.base_url),
                original_url: record.original_url,
            })
            .collect())
    }

    /// Spawns the deletion on the current tokio runtime and returns at once.
    ///
    /// At most once: a failed deletion is logged and never retried.
    fn delete_user_urls(&self, owner: &str, slugs: Vec<Slug>) {
        if slugs.is_empty() || is_anonymous(owner) {
            return;
        }

        let service = self.clone();
        let owner = owner.to_owned();
        info!(count = slugs.len(), owner = %owner, "accepted deletion request");

        tokio::spawn(async move {
            // failures are already logged by delete_user_urls_now
            if service.delete_user_urls_now(&owner, &slugs).await.is_ok() {
                debug!(count = slugs.len(), owner = %owner, "deleted user urls");
            }
        });
    }

    async fn ping(&self) -> Result<(), ShortenerError> {
        self.repository
            .ping()
            .await
            .map_err(|e| log_storage_error("ping storage", e))
    }

    async fn stats(&self) -> Result<Stats, ShortenerError> {
        self.repository
            .stats()
            .await
            .map_err(|e| log_storage_error("get service stats", e))
    }
}

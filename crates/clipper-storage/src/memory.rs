use async_trait::async_trait;
use clipper_core::repository::Result;
use clipper_core::{BatchEntry, BatchItem, PutOutcome, Repository, Slug, Stats, UrlRecord};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    original_url: String,
    owner: String,
}

impl Entry {
    fn to_record(&self, slug: &Slug) -> UrlRecord {
        UrlRecord {
            slug: slug.clone(),
            original_url: self.original_url.clone(),
            owner: self.owner.clone(),
            deleted: false,
        }
    }
}

/// In-memory implementation of [`Repository`].
///
/// One mutex guards the whole map, so every operation on an instance is
/// serialized. Content is not deduplicated: storing an existing slug
/// replaces its entry. Deletion removes entries physically, so a deleted
/// slug reads back as missing.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: Mutex<HashMap<Slug, Entry>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }

    /// Stores a record, replacing whatever was stored under `slug`.
    pub(crate) fn insert(&self, slug: &Slug, original_url: &str, owner: &str) {
        self.storage.lock().insert(
            slug.clone(),
            Entry {
                original_url: original_url.to_owned(),
                owner: owner.to_owned(),
            },
        );
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get(&self, slug: &Slug) -> Result<Option<UrlRecord>> {
        let storage = self.storage.lock();
        let record = storage.get(slug).map(|entry| entry.to_record(slug));
        trace!(slug = %slug, found = record.is_some(), "memory lookup");
        Ok(record)
    }

    async fn put(&self, slug: &Slug, original_url: &str, owner: &str) -> Result<PutOutcome> {
        self.insert(slug, original_url, owner);
        Ok(PutOutcome::Created(slug.clone()))
    }

    async fn put_batch(&self, items: &[BatchItem], owner: &str) -> Result<Vec<BatchEntry>> {
        let mut storage = self.storage.lock();
        let entries = items
            .iter()
            .map(|item| {
                storage.insert(
                    item.slug.clone(),
                    Entry {
                        original_url: item.original_url.clone(),
                        owner: owner.to_owned(),
                    },
                );
                BatchEntry {
                    correlation_id: item.correlation_id.clone(),
                    slug: item.slug.clone(),
                }
            })
            .collect();
        Ok(entries)
    }

    async fn get_all_by_owner(&self, owner: &str) -> Result<Vec<UrlRecord>> {
        let storage = self.storage.lock();
        let mut records: Vec<UrlRecord> = storage
            .iter()
            .filter(|(_, entry)| entry.owner == owner)
            .map(|(slug, entry)| entry.to_record(slug))
            .collect();
        records.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(records)
    }

    async fn delete_many(&self, slugs: &[Slug], owner: &str) -> Result<()> {
        let mut storage = self.storage.lock();
        for slug in slugs {
            if storage.get(slug).is_some_and(|entry| entry.owner == owner) {
                storage.remove(slug);
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<Stats> {
        let storage = self.storage.lock();
        let users: HashSet<&str> = storage
            .values()
            .map(|entry| entry.owner.as_str())
            .filter(|owner| !owner.is_empty())
            .collect();
        Ok(Stats {
            urls: storage.len() as u64,
            users: users.len() as u64,
        })
    }

    async fn close(&self) {}
}

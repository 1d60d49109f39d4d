//! Storage backends for the Clipper URL shortener.
//!
//! Three interchangeable implementations of [`Repository`]:
//! - [`InMemoryRepository`]: a map behind one lock, for development and tests.
//! - [`FileRepository`]: the in-memory map plus an append-only JSON-lines log.
//! - [`PostgresRepository`]: soft-deleting, content-unique relational storage.
//!
//! [`open`] picks one from a [`StorageConfig`].

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod postgres;

pub use clipper_core::repository::Result;
pub use clipper_core::{
    BatchEntry, BatchItem, PutOutcome, Repository, Slug, Stats, StorageError, UrlRecord,
};
pub use config::{open, StorageConfig};
pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

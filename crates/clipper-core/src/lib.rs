//! Core types and traits for the Clipper URL shortener.
//!
//! This crate provides the domain types shared by the storage backends,
//! the shortener service, and the transport adapters.

pub mod error;
pub mod repository;
pub mod shortener;
pub mod slug;

pub use error::{ShortenerError, StorageError};
pub use repository::{BatchEntry, BatchItem, PutOutcome, Repository, Stats, UrlRecord};
pub use shortener::{BatchRequest, BatchResponse, Shortened, Shortener, UserUrl};
pub use slug::Slug;

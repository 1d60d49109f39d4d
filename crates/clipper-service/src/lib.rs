//! Business logic of the Clipper URL shortener.
//!
//! [`ShortenerService`] generates slugs, delegates to a storage backend and
//! composes the public short URLs. Core types are re-exported from
//! `clipper_core`.

pub mod service;

pub use clipper_core::{
    BatchRequest, BatchResponse, Shortened, Shortener, ShortenerError, Slug, Stats, UserUrl,
};
pub use service::ShortenerService;

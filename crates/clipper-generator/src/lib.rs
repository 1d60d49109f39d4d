//! Slug generators for the Clipper URL shortener.
//!
//! Generators are pure: they never touch storage. The random generator
//! draws from a CSPRNG seeded by the operating system because slugs double
//! as access identifiers and must not be predictable.

pub mod error;
pub mod random;
pub mod seq;

use clipper_core::Slug;

pub use error::{Error, Result};
pub use random::{random_alphanumeric, random_hex, RandomGenerator};
pub use seq::SeqGenerator;

/// Trait for generating slugs.
///
/// Implementations can vary from random generators to
/// deterministic counters used in tests.
pub trait Generator: Send + Sync + 'static {
    /// Produces a candidate slug for a new record.
    fn generate(&self) -> Result<Slug>;
}

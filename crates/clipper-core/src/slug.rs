use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short identifier for a shortened URL.
///
/// Slugs must be 1-64 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

const MIN_LENGTH: usize = 1;

impl Slug {
    /// Longest slug accepted, in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Creates a new `Slug` after validating the input.
    ///
    /// Valid slugs are 1-64 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(slug: impl Into<String>) -> Result<Self, ShortenerError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    /// Creates a `Slug` without validation.
    ///
    /// Use this only for slugs produced by trusted internal sources
    /// (generators, rows read back from a backend).
    pub fn new_unchecked(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Joins `base_url` and the slug with exactly one `/`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(slug: &str) -> Result<(), ShortenerError> {
        if slug.len() < MIN_LENGTH || slug.len() > Self::MAX_LENGTH {
            return Err(ShortenerError::InvalidSlug(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                Self::MAX_LENGTH,
                slug.len()
            )));
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ShortenerError::InvalidSlug(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                slug
            )));
        }

        Ok(())
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use crate::error::Result;
use crate::Generator;
use clipper_core::Slug;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator producing `<prefix><6-digit counter>` slugs.
///
/// Codes are unique within one instance only, which makes it suitable for
/// tests and local development where predictable slugs are convenient.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Starts counting from `offset`, e.g. to resume after a restart.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> Result<Slug> {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(Slug::new_unchecked(format!("{}{:06}", self.prefix, count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_slugs() {
        let generator = SeqGenerator::with_prefix("cl");

        assert_eq!(generator.generate().unwrap().as_str(), "cl000000");
        assert_eq!(generator.generate().unwrap().as_str(), "cl000001");
        assert_eq!(generator.generate().unwrap().as_str(), "cl000002");
    }

    #[test]
    fn starts_from_offset() {
        let generator = SeqGenerator::with_offset("n", 41);
        assert_eq!(generator.generate().unwrap().as_str(), "n000041");
    }

    #[test]
    fn concurrent_generation_is_unique() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let generator = Arc::new(SeqGenerator::with_prefix("t"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| generator.generate().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for slug in handle.join().unwrap() {
                assert!(seen.insert(slug));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}

use crate::error::{Error, Result};
use crate::Generator;
use clipper_core::Slug;
use rand::distr::{Alphanumeric, SampleString};
use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, TryRngCore};

/// Returns `length` characters drawn uniformly from `[0-9A-Za-z]`.
///
/// The generator is seeded from the OS random source, so a broken source
/// is reported instead of silently producing predictable output.
pub fn random_alphanumeric(length: usize) -> Result<String> {
    if length == 0 {
        return Err(Error::InvalidLength(length));
    }

    let mut rng = StdRng::try_from_os_rng().map_err(|e| Error::Entropy(e.to_string()))?;
    Ok(Alphanumeric.sample_string(&mut rng, length))
}

/// Returns `bytes` random bytes hex-encoded (`2 * bytes` characters).
pub fn random_hex(bytes: usize) -> Result<String> {
    if bytes == 0 {
        return Err(Error::InvalidLength(bytes));
    }

    let mut buf = vec![0_u8; bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::Entropy(e.to_string()))?;
    Ok(hex::encode(buf))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Alphanumeric { length: usize },
    Hex { bytes: usize },
}

/// Generates random slugs from the OS random source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomGenerator {
    mode: Mode,
}

impl RandomGenerator {
    /// Slugs of `length` alphanumeric characters, at most [`Slug::MAX_LENGTH`].
    pub fn alphanumeric(length: usize) -> Result<Self> {
        check_slug_length(length)?;
        Ok(Self {
            mode: Mode::Alphanumeric { length },
        })
    }

    /// Slugs made of `bytes` random bytes, hex-encoded.
    ///
    /// The encoded slug must fit [`Slug::MAX_LENGTH`], so `bytes` is at most 32.
    pub fn hex(bytes: usize) -> Result<Self> {
        check_slug_length(bytes * 2)?;
        Ok(Self {
            mode: Mode::Hex { bytes },
        })
    }

    /// Length in characters of the slugs this generator produces.
    pub fn slug_length(&self) -> usize {
        match self.mode {
            Mode::Alphanumeric { length } => length,
            Mode::Hex { bytes } => bytes * 2,
        }
    }
}

fn check_slug_length(length: usize) -> Result<()> {
    if length == 0 || length > Slug::MAX_LENGTH {
        return Err(Error::InvalidLength(length));
    }
    Ok(())
}

impl Default for RandomGenerator {
    /// Eight alphanumeric characters.
    fn default() -> Self {
        Self {
            mode: Mode::Alphanumeric { length: 8 },
        }
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Result<Slug> {
        let slug = match self.mode {
            Mode::Alphanumeric { length } => random_alphanumeric(length)?,
            Mode::Hex { bytes } => random_hex(bytes)?,
        };
        Ok(Slug::new_unchecked(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphanumeric_has_exact_length_and_alphabet() {
        for length in [1, 2, 7, 8, 33, 64, 500] {
            let slug = random_alphanumeric(length).unwrap();
            assert_eq!(slug.len(), length);
            assert!(slug.bytes().all(|b| b.is_ascii_alphanumeric()), "{slug}");
        }
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(random_alphanumeric(0), Err(Error::InvalidLength(0)));
        assert_eq!(random_hex(0), Err(Error::InvalidLength(0)));
        assert!(RandomGenerator::alphanumeric(0).is_err());
        assert!(RandomGenerator::hex(0).is_err());
    }

    #[test]
    fn hex_doubles_the_byte_count() {
        let slug = random_hex(8).unwrap();
        assert_eq!(slug.len(), 16);
        assert!(slug.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generator_lengths_fit_a_slug() {
        assert!(RandomGenerator::alphanumeric(64).is_ok());
        assert_eq!(RandomGenerator::alphanumeric(65), Err(Error::InvalidLength(65)));
        assert!(RandomGenerator::hex(32).is_ok());
        assert_eq!(RandomGenerator::hex(33), Err(Error::InvalidLength(66)));

        let longest = RandomGenerator::alphanumeric(64).unwrap().generate().unwrap();
        assert!(Slug::new(longest.as_str()).is_ok());
        let longest = RandomGenerator::hex(32).unwrap().generate().unwrap();
        assert!(Slug::new(longest.as_str()).is_ok());
    }

    #[test]
    fn every_symbol_shows_up() {
        let sample = random_alphanumeric(20_000).unwrap();
        let seen: HashSet<_> = sample.bytes().collect();
        assert_eq!(seen.len(), 62);
    }

    #[test]
    fn generator_produces_valid_slugs() {
        let generator = RandomGenerator::alphanumeric(12).unwrap();
        assert_eq!(generator.slug_length(), 12);

        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_eq!(first.as_str().len(), 12);
        assert!(Slug::new(first.as_str()).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn hex_generator_matches_slug_length() {
        let generator = RandomGenerator::hex(4).unwrap();
        assert_eq!(generator.slug_length(), 8);
        assert_eq!(generator.generate().unwrap().as_str().len(), 8);
    }

    #[test]
    fn default_is_eight_alphanumerics() {
        let slug = RandomGenerator::default().generate().unwrap();
        assert_eq!(slug.as_str().len(), 8);
    }
}

//! Random sources used for prime search, padding bytes and Miller-Rabin witnesses.

use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, OsRng, RngCore, SeedableRng};
use serde::Deserialize;

/// Where randomness comes from.
///
/// [`RandomSource::Secure`] is the default and the only choice suitable for
/// production keys. [`RandomSource::Deterministic`] replays the same stream
/// for a given seed and exists for tests and reproducible examples.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomSource {
    /// Operating system CSPRNG.
    #[default]
    Secure,
    /// ChaCha20 stream seeded from the given value. Testing only.
    Deterministic(u64),
}

impl RandomSource {
    /// Resolves the `(secure, seed)` flag pair into a source.
    ///
    /// Secure generation always wins: when `secure` is set any `seed` is
    /// ignored, so deterministic keys can never be produced by a caller that
    /// asked for secure ones. Without `secure` and without a seed, a fast
    /// stream seeded from the operating system is used.
    pub fn from_flags(secure: bool, seed: Option<u64>) -> Self {
        match (secure, seed) {
            (true, Some(_)) => {
                log::warn!("seed ignored: secure random generation was requested");
                RandomSource::Secure
            }
            (true, None) => RandomSource::Secure,
            (false, Some(seed)) => RandomSource::Deterministic(seed),
            (false, None) => RandomSource::Deterministic(OsRng.next_u64()),
        }
    }

    /// Returns `true` for the operating system source.
    pub fn is_secure(&self) -> bool {
        matches!(self, RandomSource::Secure)
    }

    /// Instantiates the generator described by this source.
    pub fn rng(&self) -> SourceRng {
        match *self {
            RandomSource::Secure => SourceRng::Os(OsRng),
            RandomSource::Deterministic(seed) => {
                SourceRng::Seeded(Box::new(ChaCha20Rng::seed_from_u64(seed)))
            }
        }
    }
}

/// Concrete generator backing a [`RandomSource`].
///
/// Both variants implement [`CryptoRng`] so that either can drive key
/// generation, but the marker only holds for [`SourceRng::Os`]. A
/// [`SourceRng::Seeded`] stream is fully determined by a 64-bit seed and must
/// not produce keys that protect anything; check [`SourceRng::is_secure`].
#[derive(Clone, Debug)]
pub enum SourceRng {
    /// Operating system CSPRNG.
    Os(OsRng),
    /// Seeded ChaCha20 stream.
    Seeded(Box<ChaCha20Rng>),
}

impl SourceRng {
    /// Returns `true` for the operating system generator.
    pub fn is_secure(&self) -> bool {
        matches!(self, SourceRng::Os(_))
    }
}

impl RngCore for SourceRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            SourceRng::Os(rng) => rng.next_u32(),
            SourceRng::Seeded(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            SourceRng::Os(rng) => rng.next_u64(),
            SourceRng::Seeded(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            SourceRng::Os(rng) => rng.fill_bytes(dest),
            SourceRng::Seeded(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        match self {
            SourceRng::Os(rng) => rng.try_fill_bytes(dest),
            SourceRng::Seeded(rng) => rng.try_fill_bytes(dest),
        }
    }
}

// Only sound for `Os`, see the type docs.
impl CryptoRng for SourceRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_secure() {
        assert_eq!(RandomSource::default(), RandomSource::Secure);
        assert!(RandomSource::default().is_secure());
    }

    #[test]
    fn test_secure_wins_over_seed() {
        let secure = RandomSource::Secure;
        assert_eq!(RandomSource::from_flags(true, Some(7)), secure);
        assert_eq!(RandomSource::from_flags(true, None), secure);
        assert_eq!(
            RandomSource::from_flags(false, Some(7)),
            RandomSource::Deterministic(7)
        );
        assert!(!RandomSource::from_flags(false, None).is_secure());
    }

    #[test]
    fn test_only_os_rng_is_secure() {
        assert!(RandomSource::Secure.rng().is_secure());
        assert!(!RandomSource::Deterministic(1).rng().is_secure());
        assert!(!RandomSource::from_flags(false, None).rng().is_secure());
        assert!(RandomSource::from_flags(true, Some(1)).rng().is_secure());
    }

    #[test]
    fn test_deterministic_replays() {
        let mut a = RandomSource::Deterministic(42).rng();
        let mut b = RandomSource::Deterministic(42).rng();
        let mut c = RandomSource::Deterministic(43).rng();

        let mut x = [0u8; 64];
        let mut y = [0u8; 64];
        let mut z = [0u8; 64];
        a.fill_bytes(&mut x);
        b.fill_bytes(&mut y);
        c.fill_bytes(&mut z);

        assert_eq!(x, y);
        assert_ne!(x, z);
    }

    #[test]
    fn test_deserialize() {
        let secure: RandomSource = serde_json::from_str("\"secure\"").unwrap();
        assert_eq!(secure, RandomSource::Secure);

        let seeded: RandomSource = serde_json::from_str("{\"deterministic\": 9}").unwrap();
        assert_eq!(seeded, RandomSource::Deterministic(9));
    }
}

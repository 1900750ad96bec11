//! Session configuration.

use serde::Deserialize;

use crate::algorithms::generate::{check_key_size, DEFAULT_EXPONENT};
use crate::errors::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::random::RandomSource;

/// Defaults for an [`Rsa`](crate::Rsa) session.
///
/// Every field is optional when deserializing:
///
/// ```
/// use rsa_forge::{Config, HashAlgorithm, RandomSource};
///
/// let config = Config::from_json(r#"{"key_size": 1024, "hash_algorithm": "sha512"}"#).unwrap();
/// assert_eq!(config.key_size, 1024);
/// assert_eq!(config.hash_algorithm, HashAlgorithm::Sha512);
/// assert_eq!(config.random, RandomSource::Secure);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Modulus size in bits for generated keys. Defaults to 2048.
    pub key_size: usize,
    /// Digest used by signing and verification. Defaults to SHA-256.
    pub hash_algorithm: HashAlgorithm,
    /// Randomness for key generation and padding. Defaults to
    /// [`RandomSource::Secure`].
    pub random: RandomSource,
    /// First public exponent tried during key generation. Defaults to 65537.
    pub public_exponent: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            key_size: 2048,
            hash_algorithm: HashAlgorithm::Sha256,
            random: RandomSource::Secure,
            public_exponent: DEFAULT_EXPONENT,
        }
    }
}

impl Config {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the key size and the public exponent.
    pub fn validate(&self) -> Result<()> {
        check_key_size(self.key_size)?;

        if self.public_exponent < 3 {
            return Err(Error::Config(format!(
                "public exponent must be at least 3, got {}",
                self.public_exponent
            )));
        }

        Ok(())
    }

    /// Sets the modulus size for generated keys.
    pub fn with_key_size(mut self, key_size: usize) -> Self {
        self.key_size = key_size;
        self
    }

    /// Sets the signature digest.
    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// Sets the first public exponent tried during key generation.
    pub fn with_public_exponent(mut self, public_exponent: u64) -> Self {
        self.public_exponent = public_exponent;
        self
    }

    /// Sets the randomness source.
    pub fn with_random(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }
}

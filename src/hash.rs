//! Digest algorithms available for signing and fingerprints.

use core::fmt;
use core::str::FromStr;

use serde::Deserialize;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::errors::{Error, Result};

/// A list of provided hashes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum HashAlgorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Canonical lowercase name, e.g. `"sha256"`.
    pub fn name(&self) -> &'static str {
        match *self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Returns the length in bytes of a digest.
    pub fn size(&self) -> usize {
        match *self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Hashes `msg`.
    pub fn digest(&self, msg: &[u8]) -> Vec<u8> {
        match *self {
            HashAlgorithm::Sha256 => Sha256::digest(msg).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(msg).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(msg).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::UnsupportedHashAlgorithm(s.to_owned())),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Hashes `msg` with the algorithm called `algorithm`.
///
/// Fails with [`Error::UnsupportedHashAlgorithm`] for unknown names.
pub fn digest(algorithm: &str, msg: &[u8]) -> Result<Vec<u8>> {
    Ok(algorithm.parse::<HashAlgorithm>()?.digest(msg))
}

use core::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::algorithms::generate::{generate_key_components, DEFAULT_EXPONENT, MAX_KEY_SIZE};
use crate::errors::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::random::RandomSource;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// An RSA key: always the public half, optionally the private exponent.
///
/// Keys without a private exponent can encrypt and verify only. The prime
/// factors are kept for keys generated in this process and are never
/// serialized.
#[derive(Clone)]
pub struct KeyPair {
    /// Modulus
    n: BigUint,
    /// Public exponent
    e: BigUint,
    /// Private exponent
    d: Option<BigUint>,
    /// Prime factors of N, empty when unknown.
    primes: Vec<BigUint>,
}

impl KeyPair {
    /// Generate a new key pair of the given bit size using the passed in `rng`
    /// and the default public exponent.
    ///
    /// The key is only as strong as `rng`. A seeded [`SourceRng`] satisfies the
    /// bound but is not a secret source.
    ///
    /// [`SourceRng`]: crate::random::SourceRng
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<KeyPair> {
        Self::new_with_exp(rng, bit_size, &BigUint::from(DEFAULT_EXPONENT))
    }

    /// Generate a new key pair of the given bit size, searching for a public
    /// exponent upwards from `exp`.
    pub fn new_with_exp<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bit_size: usize,
        exp: &BigUint,
    ) -> Result<KeyPair> {
        let components = generate_key_components(rng, bit_size, exp)?;
        Ok(KeyPair {
            n: components.n,
            e: components.e,
            d: Some(components.d),
            primes: components.primes,
        })
    }

    /// Generate a new key pair drawing randomness from `source`.
    ///
    /// Keys from [`RandomSource::Deterministic`] are reproducible from the
    /// seed alone and are only fit for tests.
    pub fn generate(bit_size: usize, source: &RandomSource) -> Result<KeyPair> {
        if !source.is_secure() {
            log::warn!(
                "generating a {}-bit key from a seeded stream, for testing only",
                bit_size
            );
        }
        Self::new(&mut source.rng(), bit_size)
    }

    /// Constructs a key from its parts, after validating them.
    ///
    /// `primes` may be empty. When present they must multiply to `n`.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: Option<BigUint>,
        primes: Vec<BigUint>,
    ) -> Result<KeyPair> {
        let key = KeyPair { n, e, d, primes };
        key.validate()?;
        Ok(key)
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        let one = BigUint::one();

        if self.n <= BigUint::from(2u32) || self.n.is_even() {
            return Err(Error::MalformedKey(
                "modulus must be odd and greater than 2".into(),
            ));
        }

        if self.n.bits() > MAX_KEY_SIZE {
            return Err(Error::MalformedKey("modulus is too large".into()));
        }

        if self.e <= one || self.e >= self.n {
            return Err(Error::MalformedKey("public exponent out of range".into()));
        }

        if let Some(d) = &self.d {
            if d.is_zero() || d >= &self.n {
                return Err(Error::MalformedKey("private exponent out of range".into()));
            }
        }

        if self.primes.is_empty() {
            return Ok(());
        }

        let mut m = BigUint::one();
        for prime in &self.primes {
            if prime <= &one {
                return Err(Error::MalformedKey("invalid prime factor".into()));
            }
            m *= prime;
        }
        if m != self.n {
            return Err(Error::MalformedKey(
                "prime factors do not multiply to the modulus".into(),
            ));
        }

        // d·e ≡ 1 mod (p - 1) for every prime factor p
        if let Some(d) = &self.d {
            let de = d * &self.e;
            for prime in &self.primes {
                if !(&de % (prime - &one)).is_one() {
                    return Err(Error::MalformedKey(
                        "private exponent does not match the public exponent".into(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns a copy of this key without the private exponent and primes.
    pub fn to_public_key(&self) -> KeyPair {
        KeyPair {
            n: self.n.clone(),
            e: self.e.clone(),
            d: None,
            primes: Vec::new(),
        }
    }

    /// Returns `true` if this key can decrypt and sign.
    pub fn has_private_key(&self) -> bool {
        self.d.is_some()
    }

    /// Short identifier of the public half: the first eight bytes of
    /// SHA-256 over `"{e}:{n}"`, both in decimal.
    pub fn fingerprint(&self) -> Fingerprint {
        let digest = HashAlgorithm::Sha256.digest(format!("{}:{}", self.e, self.n).as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Fingerprint(bytes)
    }

    /// Summary of the key, safe to log.
    pub fn key_info(&self) -> KeyInfo {
        KeyInfo {
            key_size: self.key_size(),
            public_exponent: self.e.clone(),
            fingerprint: self.fingerprint(),
            has_private_key: self.has_private_key(),
        }
    }
}

impl PublicKeyParts for KeyPair {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl PrivateKeyParts for KeyPair {
    fn d(&self) -> Option<&BigUint> {
        self.d.as_ref()
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }
}

impl PartialEq for KeyPair {
    #[inline]
    fn eq(&self, other: &KeyPair) -> bool {
        self.n == other.n && self.e == other.e && self.d == other.d
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("n", &self.n)
            .field("e", &self.e)
            .field("d", &self.d.as_ref().map(|_| "..."))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_private_key() {
            write!(f, "RSA Key Pair ({} bits)", self.key_size())
        } else {
            write!(f, "RSA Public Key ({} bits)", self.key_size())
        }
    }
}

impl Zeroize for KeyPair {
    fn zeroize(&mut self) {
        if let Some(d) = self.d.as_mut() {
            d.zeroize();
        }
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Eight byte identifier of a public key, displayed as sixteen hex digits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Fingerprint([u8; 8]);

impl Fingerprint {
    /// Raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Public summary of a key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyInfo {
    /// Modulus size in bits.
    pub key_size: usize,
    /// Public exponent.
    pub public_exponent: BigUint,
    /// Fingerprint of the public half.
    pub fingerprint: Fingerprint,
    /// Whether the private exponent is present.
    pub has_private_key: bool,
}

//! Generate prime components for an RSA key pair

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::math::{gcd, mod_inverse};
use crate::prime_rand::RandPrime;

/// Smallest modulus size, in bits, accepted for key generation.
pub const MIN_KEY_SIZE: usize = 512;

/// Largest modulus size, in bits, accepted for key generation.
pub const MAX_KEY_SIZE: usize = 16384;

/// Public exponent tried first during key generation.
pub const DEFAULT_EXPONENT: u64 = 65537;

/// Key sizes below this one are accepted with a warning.
const RECOMMENDED_MIN_KEY_SIZE: usize = 1024;

/// Odd candidates examined by [`find_public_exponent`] before giving up.
const MAX_EXPONENT_CANDIDATES: usize = 1000;

/// Prime pairs drawn before key generation gives up.
const MAX_GENERATION_ATTEMPTS: usize = 1000;

pub(crate) struct KeyComponents {
    pub n: BigUint,
    pub e: BigUint,
    pub d: BigUint,
    pub primes: Vec<BigUint>,
}

/// Fails with [`Error::InvalidKeySize`] unless `bit_size` lies in
/// `[MIN_KEY_SIZE, MAX_KEY_SIZE]`.
pub fn check_key_size(bit_size: usize) -> Result<()> {
    if !(MIN_KEY_SIZE..=MAX_KEY_SIZE).contains(&bit_size) {
        return Err(Error::InvalidKeySize {
            min: MIN_KEY_SIZE,
            max: MAX_KEY_SIZE,
            actual: bit_size,
        });
    }

    Ok(())
}

/// Returns the first odd exponent, counting up from `preferred`, that is
/// coprime to `phi`.
///
/// Even or too small starting points are moved to the next odd value of at
/// least 3. Fails with [`Error::KeyGenerationFailed`] after a bounded number
/// of candidates, or when the candidates reach `phi`.
pub fn find_public_exponent(phi: &BigUint, preferred: &BigUint) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    let mut e = preferred.clone();
    if e < three {
        e = three;
    } else if e.is_even() {
        e += BigUint::one();
    }

    for _ in 0..MAX_EXPONENT_CANDIDATES {
        if &e >= phi {
            break;
        }

        if gcd(&e, phi).is_one() {
            return Ok(e);
        }

        e += &two;
    }

    Err(Error::KeyGenerationFailed(
        "no public exponent coprime to the totient",
    ))
}

/// Generates a two-prime RSA key of exactly `bit_size` bits.
///
/// `p` gets `bit_size / 2` bits and `q` the rest, both with their top two
/// bits set so that the product never comes out one bit short. Prime pairs
/// are redrawn until they differ, the modulus has the requested size and a
/// public exponent starting from `exp` is coprime to `(p - 1)(q - 1)`.
pub(crate) fn generate_key_components<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<KeyComponents> {
    check_key_size(bit_size)?;

    if bit_size < RECOMMENDED_MIN_KEY_SIZE {
        log::warn!(
            "{}-bit keys are too small for production use, use at least {} bits",
            bit_size,
            RECOMMENDED_MIN_KEY_SIZE
        );
    }

    let one = BigUint::one();

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let p = rng.gen_prime(bit_size / 2)?;
        let q = rng.gen_prime(bit_size - p.bits())?;

        // Makes sure that the primes are unequal.
        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            continue;
        }

        let phi = (&p - &one) * (&q - &one);
        let e = match find_public_exponent(&phi, exp) {
            Ok(e) => e,
            Err(_) => {
                log::debug!("no usable public exponent for this prime pair, retrying");
                continue;
            }
        };

        let d = match mod_inverse(&e, &phi) {
            Ok(d) => d,
            Err(_) => continue,
        };

        log::debug!(
            "generated {}-bit key after {} attempt(s), e = {}",
            bit_size,
            attempt,
            e
        );

        return Ok(KeyComponents {
            n,
            e,
            d,
            primes: vec![p, q],
        });
    }

    Err(Error::KeyGenerationFailed(
        "prime search exceeded its retry bound",
    ))
}

//! Generation of random primes.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive};
use rand_core::RngCore;

use crate::errors::{Error, Result};
use crate::prime::{miller_rabin_test, GENERATION_ROUNDS};
use crate::random::RandomSource;

/// Smallest bit length accepted by [`RandPrime::gen_safe_prime`].
pub const MIN_SAFE_PRIME_BITS: usize = 16;

/// Random prime generation on top of any [`RngCore`].
///
/// The quality of the primes is exactly that of the generator; use a
/// cryptographic one for keys.
///
/// # Example
/// ```
/// use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
/// use rsa_forge::prime_rand::RandPrime;
///
/// let mut rng = ChaCha8Rng::from_seed([42; 32]);
/// let p = rng.gen_prime(256).unwrap();
/// assert_eq!(p.bits(), 256);
/// ```
pub trait RandPrime {
    /// Generate a random prime number with exactly `bit_size` bits and the
    /// top two bits set.
    fn gen_prime(&mut self, bit_size: usize) -> Result<BigUint>;

    /// Generate a random safe prime `p = 2q + 1`, with `q` also prime, of
    /// exactly `bit_size` bits.
    fn gen_safe_prime(&mut self, bit_size: usize) -> Result<BigUint>;
}

/// Odd primes whose product still fits in a u64. Candidates are odd by
/// construction, so two is left out.
const SIEVE_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Product of [`SIEVE_PRIMES`]. One big division by it lets the sieve run on
/// machine words.
const SIEVE_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

/// How far past a random candidate the sieve looks for a survivor.
const MAX_SIEVE_OFFSET: u64 = 1 << 20;

/// Random odd integer below `2^bit_size` with its top two bits set.
fn candidate<R: RngCore + ?Sized>(rng: &mut R, bit_size: usize) -> BigUint {
    let top = BigUint::from(3u32) << (bit_size - 2);
    rng.gen_biguint(bit_size) | top | BigUint::one()
}

/// Smallest even offset that moves `rem` off every multiple of the sieve
/// primes. Tiny sizes may land on a sieve prime itself.
fn sieve_offset(rem: u64, bit_size: usize) -> Option<u64> {
    (0..MAX_SIEVE_OFFSET).step_by(2).find(|offset| {
        let m = rem + offset;
        SIEVE_PRIMES.iter().all(|&prime| {
            let prime = u64::from(prime);
            m % prime != 0 || (bit_size <= 6 && m == prime)
        })
    })
}

impl<R: RngCore + ?Sized> RandPrime for R {
    fn gen_prime(&mut self, bit_size: usize) -> Result<BigUint> {
        if bit_size < 2 {
            return Err(Error::InvalidPrimeSize(bit_size));
        }

        loop {
            let mut p = candidate(self, bit_size);
            let offset = (&p % SIEVE_PRIMES_PRODUCT)
                .to_u64()
                .and_then(|rem| sieve_offset(rem, bit_size));

            match offset {
                Some(offset) => p += offset,
                None => continue,
            }

            // the offset may carry into one more bit
            if p.bits() == bit_size && miller_rabin_test(self, &p, GENERATION_ROUNDS) {
                return Ok(p);
            }
        }
    }

    fn gen_safe_prime(&mut self, bit_size: usize) -> Result<BigUint> {
        if bit_size < MIN_SAFE_PRIME_BITS {
            return Err(Error::InvalidPrimeSize(bit_size));
        }

        let mut candidates = 0usize;
        loop {
            let q = self.gen_prime(bit_size - 1)?;
            let p = (q << 1usize) + BigUint::one();
            candidates += 1;

            if p.bits() == bit_size && miller_rabin_test(self, &p, GENERATION_ROUNDS) {
                log::trace!(
                    "found {}-bit safe prime after {} candidate(s)",
                    bit_size,
                    candidates
                );
                return Ok(p);
            }
        }
    }
}

/// Generates a prime of exactly `bit_length` bits from `source`.
pub fn generate_prime(bit_length: usize, source: &RandomSource) -> Result<BigUint> {
    source.rng().gen_prime(bit_length)
}

/// Generates a safe prime of exactly `bit_length` bits from `source`.
pub fn generate_safe_prime(bit_length: usize, source: &RandomSource) -> Result<BigUint> {
    source.rng().gen_safe_prime(bit_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::DEFAULT_ROUNDS;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_prime_small() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        for n in 2..10 {
            let p = rng.gen_prime(n).unwrap();

            assert_eq!(p.bits(), n);
            assert!(miller_rabin_test(&mut rng, &p, 32));
        }
    }

    #[test]
    fn test_top_two_bits_set() {
        let mut rng = ChaCha8Rng::from_seed([1u8; 32]);
        for n in [16usize, 63, 64, 65, 100, 256] {
            let p = rng.gen_prime(n).unwrap();
            assert_eq!(p.bits(), n);
            assert_eq!(&p >> (n - 2), BigUint::from(3u32), "{} bits", n);
        }
    }

    #[test]
    fn test_gen_prime_1024() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let p = rng.gen_prime(1024).unwrap();
        assert_eq!(p.bits(), 1024);
    }

    #[test]
    fn test_prime_size_too_small() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        assert_eq!(rng.gen_prime(0), Err(Error::InvalidPrimeSize(0)));
        assert_eq!(rng.gen_prime(1), Err(Error::InvalidPrimeSize(1)));
        assert_eq!(rng.gen_safe_prime(8), Err(Error::InvalidPrimeSize(8)));
    }

    #[test]
    fn test_safe_prime() {
        let mut rng = ChaCha8Rng::from_seed([3u8; 32]);
        for n in [16usize, 64, 128] {
            let p = rng.gen_safe_prime(n).unwrap();
            assert_eq!(p.bits(), n);
            assert!(miller_rabin_test(&mut rng, &p, DEFAULT_ROUNDS));

            let q = (&p - BigUint::one()) >> 1usize;
            assert!(
                miller_rabin_test(&mut rng, &q, DEFAULT_ROUNDS),
                "{} = 2q + 1",
                p
            );
        }
    }

    #[test]
    fn test_generate_prime_deterministic_replays() {
        let source = RandomSource::Deterministic(5);
        let a = generate_prime(128, &source).unwrap();
        let b = generate_prime(128, &source).unwrap();
        assert_eq!(a, b);

        let secure = generate_prime(128, &RandomSource::Secure).unwrap();
        assert_eq!(secure.bits(), 128);
    }
}

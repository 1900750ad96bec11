//! Probabilistic primality testing and related number-theoretic checks.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{pow, One, Zero};
use rand_core::RngCore;

use crate::math::{fast_mod_pow, gcd};
use crate::random::RandomSource;

/// Miller-Rabin rounds used when the caller does not choose.
pub const DEFAULT_ROUNDS: usize = 10;

/// Miller-Rabin rounds applied to candidates during prime generation.
pub(crate) const GENERATION_ROUNDS: usize = 20;

/// Primes below 320. Candidates are trial divided by these before any
/// Miller-Rabin round is spent on them.
pub(crate) const SMALL_PRIMES: [u32; 66] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317,
];

/// Trial division against [`SMALL_PRIMES`].
///
/// `Some(true)` if `n` is one of them, `Some(false)` if `n` is a multiple of
/// one, `None` if the question stays open.
fn trial_division(n: &BigUint) -> Option<bool> {
    for &prime in SMALL_PRIMES.iter() {
        if (n % prime).is_zero() {
            return Some(n == &BigUint::from(prime));
        }
    }

    None
}

/// Reports whether `n` passes `rounds` rounds of the Miller-Rabin test, with
/// witnesses drawn uniformly from `[2, n - 2]` using `rng`.
///
/// Composites are always detected by trial division or by a witness found with
/// probability at least `1 - 4^(-rounds)`; a `false` result is exact.
///
/// The quality of the test is bounded by `rng`: pass a cryptographically secure
/// generator when judging primes for production keys. See Menezes et al.,
/// Handbook of Applied Cryptography, 1997, Algorithm 4.24.
pub fn miller_rabin_test<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }

    if let Some(is_prime) = trial_division(n) {
        return is_prime;
    }

    // n is odd and larger than the biggest small prime from here on.
    let n_minus_one = n - BigUint::one();

    // determine d, s such that n - 1 = 2^s · d with d odd
    let mut d = n_minus_one.clone();
    let mut s = 0usize;
    while d.is_even() {
        d = d >> 1usize;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = fast_mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }

        return false;
    }

    true
}

/// Runs [`miller_rabin_test`] with witnesses drawn from `source`.
///
/// [`RandomSource::Deterministic`] is faster to set up and reproducible, and
/// only meant for tests.
pub fn probably_prime(n: &BigUint, rounds: usize, source: &RandomSource) -> bool {
    miller_rabin_test(&mut source.rng(), n, rounds)
}

/// Reports whether `p` is a prime resistant to Pollard's `p - 1` method:
/// `p` must be prime and the part of `p - 1` left after dividing out every
/// small prime must exceed `p^0.3`.
///
/// The bound is checked exactly, as `largest^10 > p^3`.
pub fn is_strong_prime<R: RngCore + ?Sized>(rng: &mut R, p: &BigUint) -> bool {
    if !miller_rabin_test(rng, p, DEFAULT_ROUNDS) {
        return false;
    }

    let mut rest = p - BigUint::one();
    let mut largest = BigUint::one();

    for &prime in SMALL_PRIMES.iter() {
        while !rest.is_zero() && (&rest % prime).is_zero() {
            largest = BigUint::from(prime);
            rest = rest / prime;
        }
    }

    if rest > BigUint::one() {
        largest = rest;
    }

    pow(largest, 10) > pow(p.clone(), 3)
}

/// Reports whether `n` is a Carmichael number: a square-free composite with at
/// least three prime factors where every `p - 1` divides `n - 1` (Korselt's
/// criterion).
///
/// Factorisation only strips [`SMALL_PRIMES`]; any remaining cofactor is taken
/// as the last prime factor.
pub fn is_carmichael_number<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint) -> bool {
    // 561 is the smallest Carmichael number
    if n < &BigUint::from(561u32) || miller_rabin_test(rng, n, DEFAULT_ROUNDS) {
        return false;
    }

    let one = BigUint::one();
    let mut factors = Vec::new();
    let mut rest = n.clone();

    for &prime in SMALL_PRIMES.iter() {
        if (&rest % prime).is_zero() {
            factors.push(BigUint::from(prime));
            rest = rest / prime;
            if (&rest % prime).is_zero() {
                return false;
            }
        }
    }

    if rest > one {
        factors.push(rest);
    }

    if factors.len() < 3 {
        return false;
    }

    let n_minus_one = n - &one;
    factors
        .iter()
        .all(|p| (&n_minus_one % (p - &one)).is_zero())
}

/// Pollard's rho factorisation with `f(x) = x² + 1`.
///
/// Returns a non-trivial factor of `n`, or `None` when none was found within
/// `max_iterations` steps or the cycle closed without exposing one.
pub fn pollard_rho(n: &BigUint, max_iterations: usize) -> Option<BigUint> {
    let one = BigUint::one();
    let two = BigUint::from(2u32);

    if n <= &two {
        return None;
    }

    if n.is_even() {
        return Some(two);
    }

    let step = |v: &BigUint| (v * v + &one) % n;

    let mut x = two.clone();
    let mut y = two;

    for _ in 0..max_iterations {
        x = step(&x);
        y = step(&step(&y));

        let diff = if x > y { &x - &y } else { &y - &x };
        let d = gcd(&diff, n);

        if &d == n {
            return None;
        }
        if d > one {
            return Some(d);
        }
    }

    None
}

/// Returns the smallest prime strictly greater than `n`.
pub fn next_prime<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    if n < &two {
        return two;
    }

    let mut candidate = if n.is_even() {
        n + BigUint::one()
    } else {
        n + &two
    };

    while !miller_rabin_test(rng, &candidate, GENERATION_ROUNDS) {
        candidate += &two;
    }

    candidate
}

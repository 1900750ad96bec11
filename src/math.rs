//! Number theory over arbitrary precision integers.
//!
//! Every encryption, decryption, signature and primality round funnels
//! through [`fast_mod_pow`].

use core::mem;

use num_bigint::Sign::Plus;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::errors::{Error, Result};

/// Greatest common divisor of `a` and `b`, computed with the Euclidean
/// algorithm. `gcd(0, 0)` is defined as 0.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let r = &a % &b;
        a = mem::replace(&mut b, r);
    }

    a
}

/// Least common multiple of `a` and `b`. Zero if either argument is zero.
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::zero();
    }

    (a / gcd(a, b)) * b
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, x, y)` such that `a·x + b·y = g`, where `g` is the
/// non-negative greatest common divisor of `a` and `b`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = mem::replace(&mut s, next_s);

        let next_t = &old_t - &q * &t;
        old_t = mem::replace(&mut t, next_t);
    }

    if old_r.is_negative() {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}

/// Computes the [modular multiplicative inverse] of `a` modulo `m`.
///
/// Fails with [`Error::NoInverseExists`] when `gcd(a, m) ≠ 1` or `m` is zero.
///
/// [modular multiplicative inverse]: https://en.wikipedia.org/wiki/Modular_multiplicative_inverse
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() {
        return Err(Error::NoInverseExists);
    }

    let m = BigInt::from_biguint(Plus, m.clone());
    let a = BigInt::from_biguint(Plus, a.clone()).mod_floor(&m);

    let (g, x, _) = extended_gcd(&a, &m);
    if !g.is_one() {
        return Err(Error::NoInverseExists);
    }

    x.mod_floor(&m).to_biguint().ok_or(Error::NoInverseExists)
}

/// Computes `base^exponent mod modulus` by left-to-right square-and-multiply,
/// in `O(log exponent)` multiplications.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn fast_mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    assert!(!modulus.is_zero(), "modulus must be non-zero");

    if modulus.is_one() {
        return BigUint::zero();
    }

    let base = base % modulus;
    let mut result = BigUint::one();

    for byte in exponent.to_bytes_be() {
        for bit in (0..8).rev() {
            result = &result * &result % modulus;
            if (byte >> bit) & 1 == 1 {
                result = &result * &base % modulus;
            }
        }
    }

    result
}

/// Jacobi symbol `(a/n)`: one of `1`, `-1` or `0`.
///
/// Returns `None` unless `n` is odd and positive.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> Option<i8> {
    if !n.is_positive() || n.is_even() {
        return None;
    }

    let mut a = a.mod_floor(n);
    let mut n = n.clone();
    let mut j = 1i8;

    while !a.is_zero() {
        // handle factors of 2 in a
        while a.is_even() {
            a = &a >> 1usize;
            let r = residue(&n, 8);
            if r == 3 || r == 5 {
                j = -j;
            }
        }

        // swap numerator and denominator
        mem::swap(&mut a, &mut n);
        if residue(&a, 4) == 3 && residue(&n, 4) == 3 {
            j = -j;
        }

        a = a.mod_floor(&n);
    }

    if n.is_one() {
        Some(j)
    } else {
        Some(0)
    }
}

#[inline]
fn residue(x: &BigInt, m: u8) -> u8 {
    x.mod_floor(&BigInt::from(m)).to_u8().unwrap_or(0)
}

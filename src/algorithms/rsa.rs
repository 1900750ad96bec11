//! Generic RSA implementation

use num_bigint::BigUint;

use crate::errors::{Error, Result};
use crate::math::fast_mod_pow;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
///
/// Fails with [`Error::NumberTooLarge`] unless `m < n`.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// or signature scheme.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts + ?Sized>(key: &K, m: &BigUint) -> Result<BigUint> {
    if m >= key.n() {
        return Err(Error::NumberTooLarge);
    }

    Ok(fast_mod_pow(m, key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding.
///
/// Fails with [`Error::PrivateKeyRequired`] for public-only keys and with
/// [`Error::InvalidCiphertext`] unless `c < n`.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without an appropriate padding
/// or signature scheme.
#[inline]
pub fn rsa_decrypt<K: PrivateKeyParts + ?Sized>(key: &K, c: &BigUint) -> Result<BigUint> {
    let d = key.d().ok_or(Error::PrivateKeyRequired)?;

    if c >= key.n() {
        return Err(Error::InvalidCiphertext);
    }

    Ok(fast_mod_pow(c, d, key.n()))
}

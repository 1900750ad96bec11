//! Padded encryption and digest signatures.
//!
//! Every operation works on a [`KeyPair`]. Encryption and verification need
//! only the public half; decryption and signing fail with
//! [`Error::PrivateKeyRequired`] without the private exponent.

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{to_block, to_zeroizing_block};
use crate::algorithms::pkcs1v15::{
    max_payload_len, pkcs1v15_encrypt_pad, pkcs1v15_sign_pad, pkcs1v15_sign_unpad, pkcs1v15_unpad,
    BlockType,
};
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::key::KeyPair;
use crate::traits::PublicKeyParts;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Largest message, in bytes, that fits in one block under `key`.
pub fn max_message_len(key: &KeyPair) -> usize {
    max_payload_len(key.size())
}

/// Encrypts a message of at most [`max_message_len`] bytes.
///
/// Two encryptions of the same message differ, since the padding is random.
pub fn encrypt_block<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &KeyPair,
    msg: &[u8],
) -> Result<BigUint> {
    let em = pkcs1v15_encrypt_pad(rng, msg, key.size())?;
    let m = Zeroizing::new(BigUint::from_bytes_be(&em));
    rsa_encrypt(key, &m)
}

/// Decrypts a ciphertext produced by [`encrypt_block`].
pub fn decrypt_block(key: &KeyPair, ciphertext: &BigUint) -> Result<Vec<u8>> {
    let m = rsa_decrypt(key, ciphertext)?;
    let em = to_zeroizing_block(m, key.size())?;
    pkcs1v15_unpad(&em, BlockType::Encryption)
}

/// Splits `msg` into chunks of [`max_message_len`] bytes and encrypts each
/// one. An empty message yields no ciphertexts.
pub fn encrypt_long<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &KeyPair,
    msg: &[u8],
) -> Result<Vec<BigUint>> {
    let chunk_len = max_message_len(key);
    if chunk_len == 0 {
        return Err(Error::MessageTooLong);
    }

    let mut blocks = Vec::with_capacity((msg.len() + chunk_len - 1) / chunk_len);
    for chunk in msg.chunks(chunk_len) {
        blocks.push(encrypt_block(rng, key, chunk)?);
    }

    log::debug!(
        "encrypted {} bytes into {} block(s)",
        msg.len(),
        blocks.len()
    );

    Ok(blocks)
}

/// Decrypts every block and concatenates the plaintexts in order.
///
/// With the `parallel` feature blocks are decrypted on the rayon pool.
pub fn decrypt_long(key: &KeyPair, blocks: &[BigUint]) -> Result<Vec<u8>> {
    #[cfg(feature = "parallel")]
    let chunks = blocks
        .par_iter()
        .map(|c| decrypt_block(key, c))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let chunks = blocks
        .iter()
        .map(|c| decrypt_block(key, c))
        .collect::<Result<Vec<_>>>()?;

    Ok(chunks.concat())
}

/// Encrypts a non-negative integer through its minimal big-endian encoding.
///
/// Fails with [`Error::NumberTooLarge`] when that encoding exceeds
/// [`max_message_len`]. Zero encodes as an empty payload.
pub fn encrypt_number<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &KeyPair,
    m: &BigUint,
) -> Result<BigUint> {
    let bytes = Zeroizing::new(number_to_bytes(m));
    if bytes.len() > max_message_len(key) {
        return Err(Error::NumberTooLarge);
    }

    encrypt_block(rng, key, &bytes)
}

/// Inverse of [`encrypt_number`].
pub fn decrypt_number(key: &KeyPair, ciphertext: &BigUint) -> Result<BigUint> {
    let bytes = Zeroizing::new(decrypt_block(key, ciphertext)?);
    Ok(BigUint::from_bytes_be(&bytes))
}

fn number_to_bytes(m: &BigUint) -> Vec<u8> {
    if m.bits() == 0 {
        Vec::new()
    } else {
        m.to_bytes_be()
    }
}

/// Signs `payload` as given, with type 1 padding and no DigestInfo.
///
/// The payload is usually a digest; see [`sign_digest`].
pub fn sign_prehash(key: &KeyPair, payload: &[u8]) -> Result<BigUint> {
    if !key.has_private_key() {
        return Err(Error::PrivateKeyRequired);
    }

    let em = pkcs1v15_sign_pad(payload, key.size())?;
    rsa_decrypt(key, &BigUint::from_bytes_be(&em))
}

/// Checks a signature produced by [`sign_prehash`].
///
/// Any failure, including a signature not below the modulus, yields `false`.
pub fn verify_prehash(key: &KeyPair, payload: &[u8], signature: &BigUint) -> bool {
    let m = match rsa_encrypt(key, signature) {
        Ok(m) => m,
        Err(_) => return false,
    };

    match to_block(&m, key.size()) {
        Ok(em) => pkcs1v15_sign_unpad(payload, &em).is_ok(),
        Err(_) => false,
    }
}

/// Hashes `msg` with `hash` and signs the digest.
pub fn sign_digest(key: &KeyPair, msg: &[u8], hash: HashAlgorithm) -> Result<BigUint> {
    sign_prehash(key, &hash.digest(msg))
}

/// Hashes `msg` with `hash` and checks `signature` against the digest.
pub fn verify_digest(key: &KeyPair, msg: &[u8], signature: &BigUint, hash: HashAlgorithm) -> bool {
    verify_prehash(key, &hash.digest(msg), signature)
}

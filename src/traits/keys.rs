//! Accessors shared by full and public-only keys.

use num_bigint::BigUint;

use crate::algorithms::pad::block_len;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes. Raw signatures and ciphertexts for
    /// or by this public key will have the same size.
    fn size(&self) -> usize {
        block_len(self.n().bits())
    }

    /// Returns the modulus size in bits.
    fn key_size(&self) -> usize {
        self.n().bits()
    }
}

/// Components of an RSA private key.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent of the key, if present.
    fn d(&self) -> Option<&BigUint>;

    /// Returns the prime factors. Empty when they are not known, as for
    /// imported keys.
    fn primes(&self) -> &[BigUint];
}

//! Unpadded RSA.
//!
//! # Warning
//!
//! These functions raise an integer to the public or private exponent and
//! nothing else. Without padding, textbook RSA is deterministic and
//! malleable: equal messages give equal ciphertexts, and ciphertexts can be
//! multiplied together. Use [`crate::engine`] unless you are building a
//! padding scheme of your own on top.
//!
//! Both functions reject inputs that are not below the modulus.

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};

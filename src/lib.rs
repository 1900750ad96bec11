#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]

//! A self-contained RSA engine: prime generation, key pairs, PKCS#1 v1.5
//! encryption with chunking for long messages, and digest signatures.
//!
//! All arithmetic is done on [`BigUint`] with a square-and-multiply modular
//! exponentiation. Signatures pad the raw digest with block type 1 and carry
//! no DigestInfo, so signer and verifier must agree on the hash algorithm.
//!
//! # Usage
//!
//! ## Encryption
//! ```
//! use rsa_forge::{engine, KeyPair, RandomSource};
//!
//! let mut rng = RandomSource::Secure.rng();
//!
//! // use at least 2048 bits outside of examples and tests
//! let key = KeyPair::new(&mut rng, 1024).expect("failed to generate a key");
//! let public_key = key.to_public_key();
//!
//! // Encrypt
//! let data = b"hello world";
//! let ciphertext = engine::encrypt_block(&mut rng, &public_key, data).expect("failed to encrypt");
//!
//! // Decrypt
//! let plaintext = engine::decrypt_block(&key, &ciphertext).expect("failed to decrypt");
//! assert_eq!(&plaintext[..], &data[..]);
//! ```
//!
//! ## Signatures
//! ```
//! use rsa_forge::{engine, HashAlgorithm, KeyPair, RandomSource};
//!
//! // deterministic keys are for tests only
//! let key = KeyPair::generate(1024, &RandomSource::Deterministic(7)).unwrap();
//!
//! let signature = engine::sign_digest(&key, b"document", HashAlgorithm::Sha256).unwrap();
//! assert!(engine::verify_digest(&key, b"document", &signature, HashAlgorithm::Sha256));
//! assert!(!engine::verify_digest(&key, b"Document", &signature, HashAlgorithm::Sha256));
//! ```
//!
//! ## Sessions
//!
//! [`Rsa`] holds one key and exchanges base64 text:
//!
//! ```
//! use rsa_forge::{Config, RandomSource, Rsa};
//!
//! let config = Config::default()
//!     .with_key_size(512)
//!     .with_random(RandomSource::Deterministic(42));
//! let mut rsa = Rsa::new(config);
//! rsa.generate_key_pair().unwrap();
//!
//! let chunks = rsa.encrypt_long_text(&"long text ".repeat(20)).unwrap();
//! assert_eq!(rsa.decrypt_long_text(&chunks).unwrap(), "long text ".repeat(20));
//!
//! let exported = rsa.export_public_key().unwrap();
//! let mut peer = Rsa::default();
//! peer.load_public_key(&exported).unwrap();
//! let signature = rsa.sign_message("hello").unwrap();
//! assert!(peer.verify_signature("hello", &signature).unwrap());
//! ```
//!
//! ## Key strings
//!
//! Keys travel as base64-encoded JSON records, see [`encoding`].
//!
//! ```
//! use rsa_forge::{KeyPair, RandomSource};
//!
//! let key = KeyPair::generate(512, &RandomSource::Deterministic(1)).unwrap();
//! let exported = key.export_private_key().unwrap();
//! assert_eq!(KeyPair::from_private_key_string(&exported).unwrap(), key);
//! println!("{} {}", key, key.fingerprint());
//! ```

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod errors;
pub mod hash;
pub mod math;
pub mod padding;
pub mod prime;
pub mod prime_rand;
pub mod random;
pub mod session;
pub mod traits;

mod key;

pub use crate::{
    algorithms::generate::{
        check_key_size, find_public_exponent, DEFAULT_EXPONENT, MAX_KEY_SIZE, MIN_KEY_SIZE,
    },
    config::Config,
    encoding::ExportedKeyPair,
    errors::{Error, Result},
    hash::HashAlgorithm,
    key::{Fingerprint, KeyInfo, KeyPair},
    random::RandomSource,
    session::{BenchmarkReport, Rsa},
};

#[cfg(feature = "hazmat")]
pub mod hazmat;

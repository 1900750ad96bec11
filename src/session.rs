//! Stateful facade over the engine.
//!
//! An [`Rsa`] session owns at most one [`KeyPair`] and a random source, and
//! exchanges ciphertexts and signatures as base64 text.

use std::time::{Duration, Instant};

use base64ct::{Base64, Encoding};
use num_bigint::BigUint;
use rand_core::{OsRng, RngCore};

use crate::algorithms::pad::to_block;
use crate::config::Config;
use crate::engine;
use crate::errors::{Error, Result};
use crate::hash::HashAlgorithm;
use crate::key::{KeyInfo, KeyPair};
use crate::random::{RandomSource, SourceRng};
use crate::traits::PublicKeyParts;

/// Timings gathered by [`Rsa::benchmark_performance`].
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkReport {
    /// Modulus size of the benchmarked key.
    pub key_size: usize,
    /// Operations timed per direction.
    pub iterations: usize,
    /// Mean time of one encryption.
    pub avg_encrypt: Duration,
    /// Mean time of one decryption, absent for public-only keys.
    pub avg_decrypt: Option<Duration>,
    /// Encryptions per second.
    pub encrypt_ops_per_sec: f64,
    /// Decryptions per second, zero for public-only keys.
    pub decrypt_ops_per_sec: f64,
}

const BENCHMARK_MESSAGE: &[u8] = b"benchmark message";

/// An RSA session.
pub struct Rsa {
    config: Config,
    key_pair: Option<KeyPair>,
    rng: SourceRng,
    session_id: String,
}

impl Default for Rsa {
    fn default() -> Self {
        Rsa::new(Config::default())
    }
}

impl Rsa {
    /// Creates a session without a key.
    pub fn new(config: Config) -> Self {
        let mut id = [0u8; 16];
        OsRng.fill_bytes(&mut id);

        Rsa {
            rng: config.random.rng(),
            config,
            key_pair: None,
            session_id: hex::encode(id),
        }
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Random identifier of this session, 32 hex characters.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The loaded key, if any.
    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    /// Generates and loads a key with the configured size, exponent and
    /// random source.
    pub fn generate_key_pair(&mut self) -> Result<&KeyPair> {
        let exp = BigUint::from(self.config.public_exponent);
        let key = KeyPair::new_with_exp(&mut self.rng, self.config.key_size, &exp)?;
        Ok(self.load(key))
    }

    /// Generates and loads a key of `key_size` bits.
    ///
    /// With `secure` set the operating system source is used and `seed` is
    /// ignored. Otherwise keys are reproducible from `seed`.
    pub fn generate_key_pair_with(
        &mut self,
        key_size: usize,
        seed: Option<u64>,
        secure: bool,
    ) -> Result<&KeyPair> {
        let source = RandomSource::from_flags(secure, seed);
        let exp = BigUint::from(self.config.public_exponent);
        let key = KeyPair::new_with_exp(&mut source.rng(), key_size, &exp)?;
        Ok(self.load(key))
    }

    fn load(&mut self, key: KeyPair) -> &KeyPair {
        log::info!(
            "session {}: loaded {} ({})",
            self.session_id,
            key,
            key.fingerprint()
        );
        self.key_pair.insert(key)
    }

    /// Replaces the loaded key.
    pub fn load_key_pair(&mut self, key: KeyPair) {
        self.load(key);
    }

    /// Decodes and loads a public key string.
    pub fn load_public_key(&mut self, s: &str) -> Result<()> {
        let key = KeyPair::from_public_key_string(s)?;
        self.load(key);
        Ok(())
    }

    /// Decodes and loads a private key string.
    pub fn load_private_key(&mut self, s: &str) -> Result<()> {
        let key = KeyPair::from_private_key_string(s)?;
        self.load(key);
        Ok(())
    }

    /// Encodes the public half of the loaded key.
    pub fn export_public_key(&self) -> Result<String> {
        self.key()?.export_public_key()
    }

    /// Encodes the loaded key including its private exponent.
    pub fn export_private_key(&self) -> Result<String> {
        self.key()?.export_private_key()
    }

    /// Summary of the loaded key.
    pub fn get_key_info(&self) -> Result<KeyInfo> {
        Ok(self.key()?.key_info())
    }

    /// Largest message, in bytes, that fits in one block.
    pub fn max_message_len(&self) -> Result<usize> {
        Ok(engine::max_message_len(self.key()?))
    }

    fn key(&self) -> Result<&KeyPair> {
        self.key_pair.as_ref().ok_or(Error::NoKeyLoaded)
    }

    /// Encrypts a number. See [`engine::encrypt_number`].
    pub fn encrypt_number(&mut self, m: &BigUint) -> Result<BigUint> {
        let key = self.key_pair.as_ref().ok_or(Error::NoKeyLoaded)?;
        engine::encrypt_number(&mut self.rng, key, m)
    }

    /// Decrypts a number. See [`engine::decrypt_number`].
    pub fn decrypt_number(&self, c: &BigUint) -> Result<BigUint> {
        engine::decrypt_number(self.key()?, c)
    }

    /// Encrypts UTF-8 text of at most [`Rsa::max_message_len`] bytes into a
    /// base64 ciphertext.
    pub fn encrypt_text(&mut self, text: &str) -> Result<String> {
        let key = self.key_pair.as_ref().ok_or(Error::NoKeyLoaded)?;
        let c = engine::encrypt_block(&mut self.rng, key, text.as_bytes())?;
        encode_block(key, &c)
    }

    /// Decrypts a ciphertext produced by [`Rsa::encrypt_text`].
    pub fn decrypt_text(&self, ciphertext: &str) -> Result<String> {
        let key = self.key()?;
        let plaintext = engine::decrypt_block(key, &decode_block(ciphertext)?)?;
        String::from_utf8(plaintext).map_err(|_| Error::InvalidEncoding)
    }

    /// Encrypts text of any length into one base64 ciphertext per chunk.
    pub fn encrypt_long_text(&mut self, text: &str) -> Result<Vec<String>> {
        let key = self.key_pair.as_ref().ok_or(Error::NoKeyLoaded)?;
        engine::encrypt_long(&mut self.rng, key, text.as_bytes())?
            .iter()
            .map(|c| encode_block(key, c))
            .collect()
    }

    /// Decrypts the chunks produced by [`Rsa::encrypt_long_text`].
    ///
    /// Chunks are concatenated before UTF-8 decoding, so characters split
    /// across chunk boundaries survive.
    pub fn decrypt_long_text<S: AsRef<str>>(&self, ciphertexts: &[S]) -> Result<String> {
        let key = self.key()?;
        let blocks = ciphertexts
            .iter()
            .map(|c| decode_block(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let plaintext = engine::decrypt_long(key, &blocks)?;
        String::from_utf8(plaintext).map_err(|_| Error::InvalidEncoding)
    }

    /// Signs `message` with the configured digest, returning base64.
    pub fn sign_message(&self, message: &str) -> Result<String> {
        self.sign_message_with(message, self.config.hash_algorithm)
    }

    /// Signs `message` with `hash`, returning base64.
    pub fn sign_message_with(&self, message: &str, hash: HashAlgorithm) -> Result<String> {
        let key = self.key()?;
        let signature = engine::sign_digest(key, message.as_bytes(), hash)?;
        encode_block(key, &signature)
    }

    /// Verifies a signature from [`Rsa::sign_message`].
    ///
    /// Malformed and mismatched signatures both yield `Ok(false)`.
    pub fn verify_signature(&self, message: &str, signature: &str) -> Result<bool> {
        self.verify_signature_with(message, signature, self.config.hash_algorithm)
    }

    /// Verifies a signature made with `hash`.
    pub fn verify_signature_with(
        &self,
        message: &str,
        signature: &str,
        hash: HashAlgorithm,
    ) -> Result<bool> {
        let key = self.key()?;
        let signature = match decode_block(signature) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };

        let valid = engine::verify_digest(key, message.as_bytes(), &signature, hash);
        Ok(valid)
    }

    /// Signs `message` with the digest called `hash_name`, such as `"sha384"`.
    ///
    /// Fails with [`Error::UnsupportedHashAlgorithm`] for unknown names.
    pub fn sign_message_named(&self, message: &str, hash_name: &str) -> Result<String> {
        self.sign_message_with(message, hash_name.parse()?)
    }

    /// Verifies a signature made with the digest called `hash_name`.
    ///
    /// An unknown name cannot match any signature and yields `Ok(false)`.
    pub fn verify_signature_named(
        &self,
        message: &str,
        signature: &str,
        hash_name: &str,
    ) -> Result<bool> {
        match hash_name.parse() {
            Ok(hash) => self.verify_signature_with(message, signature, hash),
            Err(_) => self.key().map(|_| false),
        }
    }

    /// Times `iterations` encryptions and, when the private exponent is
    /// loaded, as many decryptions. At least one iteration is run.
    pub fn benchmark_performance(&mut self, iterations: usize) -> Result<BenchmarkReport> {
        let key = self.key_pair.as_ref().ok_or(Error::NoKeyLoaded)?;
        let iterations = iterations.max(1);

        let mut ciphertext = BigUint::default();
        let start = Instant::now();
        for _ in 0..iterations {
            ciphertext = engine::encrypt_block(&mut self.rng, key, BENCHMARK_MESSAGE)?;
        }
        let avg_encrypt = start.elapsed().div_f64(iterations as f64);

        let avg_decrypt = if key.has_private_key() {
            let start = Instant::now();
            for _ in 0..iterations {
                engine::decrypt_block(key, &ciphertext)?;
            }
            Some(start.elapsed().div_f64(iterations as f64))
        } else {
            None
        };

        let report = BenchmarkReport {
            key_size: key.key_size(),
            iterations,
            avg_encrypt,
            avg_decrypt,
            encrypt_ops_per_sec: ops_per_sec(avg_encrypt),
            decrypt_ops_per_sec: avg_decrypt.map(ops_per_sec).unwrap_or(0.0),
        };

        log::debug!("benchmark: {:?}", report);
        Ok(report)
    }
}

fn ops_per_sec(avg: Duration) -> f64 {
    let secs = avg.as_secs_f64();
    if secs > 0.0 {
        1.0 / secs
    } else {
        0.0
    }
}

/// Base64 of the `k`-byte big-endian encoding of `c`.
fn encode_block(key: &KeyPair, c: &BigUint) -> Result<String> {
    Ok(Base64::encode_string(&to_block(c, key.size())?))
}

fn decode_block(s: &str) -> Result<BigUint> {
    let bytes = Base64::decode_vec(s.trim()).map_err(|_| Error::InvalidCiphertext)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

//! Error types.

/// Alias for [`core::result::Result`] with the `rsa-forge` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested key size is outside of the supported range.
    #[error("invalid key size: must be between {min} and {max} bits, got {actual}")]
    InvalidKeySize {
        /// Smallest supported modulus size in bits.
        min: usize,
        /// Largest supported modulus size in bits.
        max: usize,
        /// Requested modulus size in bits.
        actual: usize,
    },

    /// Prime or exponent search exceeded its retry bound.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(&'static str),

    /// Requested prime bit length is too small to hold a prime of that kind.
    #[error("invalid prime size: {0} bits")]
    InvalidPrimeSize(usize),

    /// Modular inverse requested for inputs that are not coprime.
    #[error("modular inverse does not exist")]
    NoInverseExists,

    /// Message does not fit in a single padded block.
    #[error("message too long")]
    MessageTooLong,

    /// Number does not fit in a single padded block.
    #[error("number too large for key size")]
    NumberTooLarge,

    /// Decrypted or recovered block is not correctly padded.
    #[error("invalid padding")]
    InvalidPadding,

    /// Ciphertext is not a valid image under the modulus.
    #[error("invalid ciphertext")]
    InvalidCiphertext,

    /// Integer does not fit in the requested byte width.
    #[error("invalid padding length")]
    InvalidPadLen,

    /// Operation needs the private exponent, but the key is public-only.
    #[error("private key required")]
    PrivateKeyRequired,

    /// Key string could not be parsed.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// Digest algorithm name is not recognized.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// Session operation invoked before a key pair was loaded.
    #[error("no key pair loaded")]
    NoKeyLoaded,

    /// Decrypted bytes are not valid UTF-8 text.
    #[error("decrypted data is not valid UTF-8")]
    InvalidEncoding,

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

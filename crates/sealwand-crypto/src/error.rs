//! Wand error types.

use thiserror::Error;

/// Errors surfaced by keys, wands and sealed-box codecs.
///
/// No variant ever carries key or plaintext bytes.
#[derive(Debug, Error)]
pub enum WandError {
    /// Caller-supplied nonce has the wrong size for the algorithm
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Sealed box did not authenticate (wrong key, wrong AAD, tampered or malformed box)
    #[error("decryption failed: authentication failure")]
    AuthenticationFailure,

    /// Decrypted bytes are not valid UTF-8
    #[error("decoding failed: invalid UTF-8 after byte {valid_up_to}")]
    DecodingError {
        /// Length of the longest valid UTF-8 prefix
        valid_up_to: usize,
    },

    /// Invalid key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,

    /// Counter nonce space exhausted, a new key is required
    #[error("nonce counter exhausted, rekey required")]
    NonceExhausted,

    /// Envelope bytes could not be parsed into a sealed box
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Key file contents are not `<algorithm>:<hex>`
    #[error("malformed key file: {0}")]
    MalformedKeyFile(String),

    /// Unknown algorithm name or identifier
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Invalid wand configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key file could not be read or written
    #[error("key file error: {0}")]
    Io(#[from] std::io::Error),

    /// Offloaded transform did not complete
    #[error("transform task failed")]
    TaskFailed,
}

//! # sealwand Crypto
//!
//! Key-bound authenticated encryption for sealwand.
//!
//! This crate provides:
//! - Opaque secret keys that never expose their bytes
//! - Cipher wands: async `encrypt`/`decrypt` sessions bound to one key
//! - Sealed boxes: the portable `(nonce, cipher_text, mac)` triple
//! - Buffer hygiene: plaintext scrubbing on every exit path
//! - A canonical byte envelope for moving boxes across a wire
//!
//! ## Cryptographic Suite
//!
//! | Algorithm | Key | Nonce | Tag |
//! |-----------|-----|-------|-----|
//! | XChaCha20-Poly1305 (default) | 256-bit | 192-bit | 128-bit |
//! | ChaCha20-Poly1305 (RFC 8439) | 256-bit | 96-bit | 128-bit |
//!
//! ## Usage
//!
//! ```ignore
//! use sealwand_crypto::{Algorithm, CipherWand, new_cipher_wand_from_secret_key, new_secret_key};
//!
//! let key = new_secret_key(Algorithm::XChaCha20Poly1305)?;
//! let wand = new_cipher_wand_from_secret_key(key)?;
//!
//! let sealed = wand.encrypt_string("hi").await?;
//! assert_eq!(wand.decrypt_string(&sealed).await?, "hi");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod algorithm;
pub mod binding;
pub mod codec;
pub mod config;
pub mod constant_time;
pub mod envelope;
pub mod error;
pub mod hygiene;
pub mod key;
pub mod nonce;
pub mod random;
pub mod sealed_box;
pub mod wand;

pub use algorithm::Algorithm;
pub use binding::{AeadBinding, SoftwareBinding};
pub use config::{NoncePolicy, WandConfig};
pub use error::WandError;
pub use key::{SecretKey, new_secret_key};
pub use sealed_box::SealedBox;
pub use wand::{
    BoundWand, CipherWand, SoftwareWand, new_cipher_wand_from_secret_key,
    new_cipher_wand_with_config,
};

/// Secret key size shared by every supported algorithm
pub const KEY_SIZE: usize = 32;

/// Poly1305 authentication tag size
pub const TAG_SIZE: usize = 16;

/// XChaCha20-Poly1305 nonce size
pub const XCHACHA_NONCE_SIZE: usize = 24;

/// ChaCha20-Poly1305 (IETF) nonce size
pub const CHACHA_NONCE_SIZE: usize = 12;

//! Supported AEAD algorithms.
//!
//! Both algorithms are stream-cipher constructions with a Poly1305 tag, so
//! every supported binding can transform buffers in place.

use crate::{CHACHA_NONCE_SIZE, KEY_SIZE, TAG_SIZE, WandError, XCHACHA_NONCE_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AEAD algorithm a key and wand are bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// `XChaCha20-Poly1305` with a 192-bit nonce (safe for random nonces)
    #[default]
    #[serde(rename = "xchacha20-poly1305")]
    XChaCha20Poly1305,
    /// IETF `ChaCha20-Poly1305` (RFC 8439) with a 96-bit nonce
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl Algorithm {
    /// All supported algorithms.
    pub const ALL: [Algorithm; 2] = [Algorithm::XChaCha20Poly1305, Algorithm::ChaCha20Poly1305];

    /// Secret key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        KEY_SIZE
    }

    /// Nonce length in bytes.
    #[must_use]
    pub const fn nonce_len(self) -> usize {
        match self {
            Algorithm::XChaCha20Poly1305 => XCHACHA_NONCE_SIZE,
            Algorithm::ChaCha20Poly1305 => CHACHA_NONCE_SIZE,
        }
    }

    /// Authentication tag length in bytes.
    #[must_use]
    pub const fn tag_len(self) -> usize {
        TAG_SIZE
    }

    /// Stable one-byte identifier used by the envelope encoding.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Algorithm::XChaCha20Poly1305 => 0x01,
            Algorithm::ChaCha20Poly1305 => 0x02,
        }
    }

    /// Look up an algorithm by its envelope identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::UnknownAlgorithm`] for unassigned identifiers.
    pub fn from_id(id: u8) -> Result<Self, WandError> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.id() == id)
            .ok_or_else(|| WandError::UnknownAlgorithm(format!("id 0x{id:02x}")))
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::XChaCha20Poly1305 => "xchacha20-poly1305",
            Algorithm::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = WandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| WandError::UnknownAlgorithm(s.to_string()))
    }
}

//! Wand configuration.

use crate::WandError;
use serde::{Deserialize, Serialize};

/// How a wand picks nonces when the caller does not supply one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoncePolicy {
    /// Fresh nonce from the OS CSPRNG on every encryption
    #[default]
    Random,
    /// Little-endian counter followed by a random per-wand salt.
    ///
    /// XChaCha20-Poly1305 nonces carry an 8-byte counter and a 16-byte salt.
    /// ChaCha20-Poly1305 nonces carry a 4-byte counter and an 8-byte salt, so
    /// `max_messages` is capped at 2^32 and independent wands sharing one key
    /// collide on a salt with probability 2^-64 per pair.
    Counter,
}

/// Tunables for a bound wand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WandConfig {
    /// Nonce policy for encryptions without a caller nonce
    pub nonce_policy: NoncePolicy,
    /// Reuse caller buffers when the binding transforms in place
    pub reuse_buffers: bool,
    /// Payloads of at least this many bytes run on the blocking thread pool
    pub offload_threshold: usize,
    /// Maximum messages under one key with the counter policy
    pub max_messages: u64,
}

fn default_offload_threshold() -> usize {
    64 * 1024 // 64 KB
}

fn default_max_messages() -> u64 {
    1 << 32
}

impl Default for WandConfig {
    fn default() -> Self {
        Self {
            nonce_policy: NoncePolicy::Random,
            reuse_buffers: true,
            offload_threshold: default_offload_threshold(),
            max_messages: default_max_messages(),
        }
    }
}

impl WandConfig {
    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidConfig`] if a value is out of range.
    pub fn validate(&self) -> Result<(), WandError> {
        if self.max_messages == 0 {
            return Err(WandError::InvalidConfig(
                "max_messages must be at least 1".into(),
            ));
        }

        if self.max_messages == u64::MAX {
            return Err(WandError::InvalidConfig(
                "max_messages must be below 2^64 - 1".into(),
            ));
        }

        Ok(())
    }
}

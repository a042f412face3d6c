//! Nonce sources for wands.
//!
//! The random policy draws every nonce from the OS CSPRNG; with 192-bit
//! XChaCha nonces collisions are negligible. The counter policy lays out
//! `counter (LE) || salt`, where the salt is drawn once per wand so two wands
//! sharing a key do not walk the same sequence.
//!
//! | Algorithm | Counter | Salt |
//! |-----------|---------|------|
//! | XChaCha20-Poly1305 | 8 bytes | 16 bytes |
//! | ChaCha20-Poly1305 | 4 bytes | 8 bytes |
//!
//! The short counter caps ChaCha20-Poly1305 wands at 2^32 messages.

use crate::random::{random_16, random_vec};
use crate::{Algorithm, NoncePolicy, WandError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces nonces for one wand under its configured policy.
#[derive(Debug)]
pub struct NonceSource {
    algorithm: Algorithm,
    state: State,
}

#[derive(Debug)]
enum State {
    Random,
    Counter {
        next: AtomicU64,
        limit: u64,
        salt: [u8; 16],
    },
}

impl NonceSource {
    /// Build a source for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidConfig`] if `limit` does not fit the
    /// algorithm's counter and [`WandError::RandomFailed`] if the counter salt
    /// cannot be drawn.
    pub fn new(algorithm: Algorithm, policy: NoncePolicy, limit: u64) -> Result<Self, WandError> {
        if policy == NoncePolicy::Counter {
            let width = counter_len(algorithm);
            if width < 8 && limit > 1u64 << (width * 8) {
                return Err(WandError::InvalidConfig(format!(
                    "max_messages {limit} exceeds the {width}-byte {algorithm} nonce counter"
                )));
            }
        }

        let state = match policy {
            NoncePolicy::Random => State::Random,
            NoncePolicy::Counter => State::Counter {
                next: AtomicU64::new(0),
                limit,
                salt: random_16()?,
            },
        };
        Ok(Self { algorithm, state })
    }

    /// Next nonce, `algorithm.nonce_len()` bytes long.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::NonceExhausted`] once the counter reaches its
    /// limit and [`WandError::RandomFailed`] if the CSPRNG fails.
    pub fn next_nonce(&self) -> Result<Vec<u8>, WandError> {
        let len = self.algorithm.nonce_len();
        match &self.state {
            State::Random => random_vec(len),
            State::Counter { next, limit, salt } => {
                let counter = next
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                        (c < *limit).then_some(c + 1)
                    })
                    .map_err(|_| WandError::NonceExhausted)?;

                let width = counter_len(self.algorithm);
                let mut nonce = Vec::with_capacity(len);
                nonce.extend_from_slice(&counter.to_le_bytes()[..width]);
                nonce.extend_from_slice(&salt[..len - width]);
                Ok(nonce)
            }
        }
    }

    /// Number of counter nonces issued so far (always 0 for the random policy).
    #[must_use]
    pub fn issued(&self) -> u64 {
        match &self.state {
            State::Random => 0,
            State::Counter { next, .. } => next.load(Ordering::SeqCst),
        }
    }
}

/// Counter bytes at the front of a counter-policy nonce.
fn counter_len(algorithm: Algorithm) -> usize {
    match algorithm {
        Algorithm::XChaCha20Poly1305 => 8,
        Algorithm::ChaCha20Poly1305 => 4,
    }
}

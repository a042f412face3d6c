//! Algorithm bindings: the raw AEAD transform a wand delegates to.
//!
//! A binding owns (or references) key material and performs detached,
//! in-place seal/open operations. Wands layer nonce policy, buffer hygiene
//! and the async call shape on top, so alternative bindings (hardware
//! sessions, test doubles) plug in without touching that layer.

use crate::{Algorithm, SecretKey, TAG_SIZE, WandError};
use chacha20poly1305::{
    ChaCha20Poly1305, XChaCha20Poly1305,
    aead::{AeadInPlace, KeyInit},
};
use std::sync::Arc;

/// Raw detached AEAD transform.
pub trait AeadBinding: Send + Sync {
    /// Algorithm implemented by this binding.
    fn algorithm(&self) -> Algorithm;

    /// Whether the transform consumes each source byte before overwriting it,
    /// so the clear text buffer can become the ciphertext buffer.
    fn transforms_in_place(&self) -> bool {
        true
    }

    /// Encrypt `buffer` in place and return the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidNonceLength`] for a wrong-size nonce and
    /// [`WandError::EncryptionFailed`] if the cipher rejects the input.
    fn seal_in_place(&self, nonce: &[u8], aad: &[u8], buffer: &mut [u8])
    -> Result<Vec<u8>, WandError>;

    /// Verify `mac` and only then decrypt `buffer` in place.
    ///
    /// On failure the buffer still holds ciphertext; no plaintext is written.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::AuthenticationFailure`] when verification fails or
    /// the nonce or tag has the wrong size.
    fn open_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        mac: &[u8],
    ) -> Result<(), WandError>;
}

/// Software binding over the `chacha20poly1305` crate.
///
/// The cipher is keyed per call from the shared [`SecretKey`], so no
/// expanded key state outlives an operation.
#[derive(Clone, Debug)]
pub struct SoftwareBinding {
    key: Arc<SecretKey>,
}

impl SoftwareBinding {
    /// Bind a key to its algorithm's software implementation.
    #[must_use]
    pub fn new(key: SecretKey) -> Self {
        Self { key: Arc::new(key) }
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<(), WandError> {
        let expected = self.algorithm().nonce_len();
        if nonce.len() != expected {
            return Err(WandError::InvalidNonceLength {
                expected,
                actual: nonce.len(),
            });
        }
        Ok(())
    }

    fn open_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        tag: &chacha20poly1305::Tag,
    ) -> Result<(), chacha20poly1305::aead::Error> {
        let key: &chacha20poly1305::Key = self.key.expose().into();

        match self.algorithm() {
            Algorithm::XChaCha20Poly1305 => XChaCha20Poly1305::new(key).decrypt_in_place_detached(
                chacha20poly1305::XNonce::from_slice(nonce),
                aad,
                buffer,
                tag,
            ),
            Algorithm::ChaCha20Poly1305 => ChaCha20Poly1305::new(key).decrypt_in_place_detached(
                chacha20poly1305::Nonce::from_slice(nonce),
                aad,
                buffer,
                tag,
            ),
        }
    }
}

impl AeadBinding for SoftwareBinding {
    fn algorithm(&self) -> Algorithm {
        self.key.algorithm()
    }

    fn seal_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
    ) -> Result<Vec<u8>, WandError> {
        self.check_nonce(nonce)?;
        let key: &chacha20poly1305::Key = self.key.expose().into();

        let tag = match self.algorithm() {
            Algorithm::XChaCha20Poly1305 => XChaCha20Poly1305::new(key)
                .encrypt_in_place_detached(
                    chacha20poly1305::XNonce::from_slice(nonce),
                    aad,
                    buffer,
                ),
            Algorithm::ChaCha20Poly1305 => ChaCha20Poly1305::new(key).encrypt_in_place_detached(
                chacha20poly1305::Nonce::from_slice(nonce),
                aad,
                buffer,
            ),
        }
        .map_err(|_| WandError::EncryptionFailed)?;

        Ok(tag.to_vec())
    }

    fn open_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        mac: &[u8],
    ) -> Result<(), WandError> {
        if self.check_nonce(nonce).is_err() || mac.len() != TAG_SIZE {
            // Structural problems cost a full tag verification and report
            // exactly like a bad tag
            let decoy_nonce = vec![0u8; self.algorithm().nonce_len()];
            let decoy_tag = chacha20poly1305::Tag::default();
            let _ = self.open_detached(&decoy_nonce, aad, buffer, &decoy_tag);
            return Err(WandError::AuthenticationFailure);
        }

        self.open_detached(nonce, aad, buffer, chacha20poly1305::Tag::from_slice(mac))
            .map_err(|_| WandError::AuthenticationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_secret_key;

    fn binding(algorithm: Algorithm) -> SoftwareBinding {
        SoftwareBinding::new(new_secret_key(algorithm).unwrap())
    }

    #[test]
    fn test_seal_open_in_place() {
        for alg in Algorithm::ALL {
            let binding = binding(alg);
            let nonce = vec![9u8; alg.nonce_len()];
            let plaintext = b"hello world";
            let mut buffer = plaintext.to_vec();

            let tag = binding.seal_in_place(&nonce, b"hdr", &mut buffer).unwrap();
            assert_eq!(tag.len(), TAG_SIZE);
            assert_ne!(&buffer, plaintext);

            binding
                .open_in_place(&nonce, b"hdr", &mut buffer, &tag)
                .unwrap();
            assert_eq!(&buffer, plaintext);
        }
    }

    #[test]
    fn test_failed_open_leaves_ciphertext() {
        let binding = binding(Algorithm::XChaCha20Poly1305);
        let nonce = [1u8; 24];
        let mut buffer = b"attack at dawn".to_vec();
        let tag = binding.seal_in_place(&nonce, b"", &mut buffer).unwrap();
        let cipher_text = buffer.clone();

        assert!(matches!(
            binding.open_in_place(&nonce, b"other", &mut buffer, &tag),
            Err(WandError::AuthenticationFailure)
        ));
        assert_eq!(buffer, cipher_text);
    }

    #[test]
    fn test_wrong_nonce_length() {
        let binding = binding(Algorithm::ChaCha20Poly1305);
        let mut buffer = vec![0u8; 4];

        assert!(matches!(
            binding.seal_in_place(&[0u8; 24], b"", &mut buffer),
            Err(WandError::InvalidNonceLength {
                expected: 12,
                actual: 24
            })
        ));
        assert!(matches!(
            binding.open_in_place(&[0u8; 24], b"", &mut buffer, &[0u8; 16]),
            Err(WandError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_short_tag_is_authentication_failure() {
        let binding = binding(Algorithm::XChaCha20Poly1305);
        let mut buffer = vec![0u8; 4];
        assert!(matches!(
            binding.open_in_place(&[0u8; 24], b"", &mut buffer, &[0u8; 15]),
            Err(WandError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_malformed_box_runs_full_verification() {
        let binding = binding(Algorithm::XChaCha20Poly1305);
        let nonce = [4u8; 24];
        let mut buffer = vec![0x5Au8; 64 * 1024];
        let tag = binding.seal_in_place(&nonce, b"aad", &mut buffer).unwrap();
        let cipher_text = buffer.clone();

        // Short nonce, short tag, and a decoy-shaped all-zero tag all fail the
        // same way and never touch the ciphertext
        let cases: [(&[u8], &[u8]); 3] = [
            (&nonce[..12], &tag[..]),
            (&nonce[..], &tag[..8]),
            (&[0u8; 24][..], &[0u8; 16][..]),
        ];
        for (bad_nonce, bad_tag) in cases {
            assert!(matches!(
                binding.open_in_place(bad_nonce, b"aad", &mut buffer, bad_tag),
                Err(WandError::AuthenticationFailure)
            ));
            assert_eq!(buffer, cipher_text);
        }

        // The genuine box still opens afterwards
        binding
            .open_in_place(&nonce, b"aad", &mut buffer, &tag)
            .unwrap();
        assert!(buffer.iter().all(|&b| b == 0x5A));
    }
}

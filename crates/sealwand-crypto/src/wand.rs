//! Cipher wands: async encrypt/decrypt sessions bound to one secret key.
//!
//! [`CipherWand`] is the capability callers program against. Its provided
//! methods (`encrypt`, `encrypt_string`, `decrypt_string`) carry the buffer
//! hygiene rules, so every implementation gets them for free.
//! [`BoundWand`] implements the required methods for any [`AeadBinding`].
//!
//! ## Buffer reuse
//!
//! When the binding transforms in place and `reuse_buffers` is set, the
//! buffer handed to [`CipherWand::encrypt_in_place`] becomes the ciphertext
//! of the returned box (same allocation). Otherwise the wand seals a copy and
//! leaves the caller's buffer untouched, and whoever owns it scrubs it.
//!
//! ## Cancellation
//!
//! Working buffers live in `Zeroizing` guards, and offloaded transforms own
//! their buffers outright, so dropping an in-flight future never leaves
//! clear text behind.

use crate::binding::{AeadBinding, SoftwareBinding};
use crate::codec;
use crate::hygiene::{reclaim, region_of, scrub_unless_aliased};
use crate::nonce::NonceSource;
use crate::{Algorithm, SealedBox, SecretKey, WandConfig, WandError};
use async_trait::async_trait;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Session capability bound to a single secret key.
///
/// Calls are independent of one another and safe to run concurrently on the
/// same wand.
#[async_trait]
pub trait CipherWand: Send + Sync {
    /// Algorithm of the bound key.
    fn algorithm(&self) -> Algorithm;

    /// Seal the clear text held in `buffer`.
    ///
    /// If the wand transforms in place, the allocation moves into the
    /// returned box and `buffer` is left empty. Otherwise `buffer` keeps its
    /// clear text and the caller is responsible for it. On error a buffer the
    /// wand took over has been scrubbed and `buffer` is left empty.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidNonceLength`] for a wrong-size caller
    /// nonce and [`WandError::NonceExhausted`] when the counter policy runs out.
    async fn encrypt_in_place(
        &self,
        buffer: &mut Vec<u8>,
        nonce: Option<&[u8]>,
        aad: &[u8],
    ) -> Result<SealedBox, WandError>;

    /// Verify and open a sealed box.
    ///
    /// `possible_buffer` may be reused for the clear text. The result is
    /// scrubbed when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::AuthenticationFailure`] for a wrong key, wrong
    /// AAD, or a tampered or malformed box. No plaintext is produced then.
    async fn decrypt(
        &self,
        sealed: &SealedBox,
        aad: &[u8],
        possible_buffer: Option<Vec<u8>>,
    ) -> Result<Zeroizing<Vec<u8>>, WandError>;

    /// Seal `clear_text`, leaving the caller's slice untouched.
    ///
    /// `possible_buffer` may be reused for the ciphertext. The wand's working
    /// copy of the clear text never outlives the call.
    ///
    /// # Errors
    ///
    /// Same as [`CipherWand::encrypt_in_place`].
    async fn encrypt(
        &self,
        clear_text: &[u8],
        nonce: Option<&[u8]>,
        aad: &[u8],
        possible_buffer: Option<Vec<u8>>,
    ) -> Result<SealedBox, WandError> {
        let mut work = reclaim(possible_buffer, true, clear_text.len());
        work.extend_from_slice(clear_text);
        seal_scrubbed(self, &mut work, nonce, aad).await
    }

    /// Seal UTF-8 text with empty AAD.
    ///
    /// # Errors
    ///
    /// Same as [`CipherWand::encrypt_in_place`].
    async fn encrypt_string(&self, clear_text: &str) -> Result<SealedBox, WandError> {
        self.encrypt_string_with_aad(clear_text, &[]).await
    }

    /// Seal UTF-8 text; the encoded bytes are the reuse hint and are zeroed
    /// unless they became the ciphertext.
    ///
    /// # Errors
    ///
    /// Same as [`CipherWand::encrypt_in_place`].
    async fn encrypt_string_with_aad(
        &self,
        clear_text: &str,
        aad: &[u8],
    ) -> Result<SealedBox, WandError> {
        let mut encoded = Zeroizing::new(codec::encode(clear_text));
        seal_scrubbed(self, &mut encoded, None, aad).await
    }

    /// Open a box sealed with empty AAD and decode it as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::AuthenticationFailure`] or
    /// [`WandError::DecodingError`]; the clear bytes are zeroed either way.
    async fn decrypt_string(&self, sealed: &SealedBox) -> Result<String, WandError> {
        self.decrypt_string_with_aad(sealed, &[]).await
    }

    /// Open a box and decode it as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::AuthenticationFailure`] or
    /// [`WandError::DecodingError`]; the clear bytes are zeroed either way.
    async fn decrypt_string_with_aad(
        &self,
        sealed: &SealedBox,
        aad: &[u8],
    ) -> Result<String, WandError> {
        let clear = self.decrypt(sealed, aad, None).await?;
        codec::decode(&clear)
    }
}

/// Seal `buffer` and scrub it unless it became the ciphertext.
pub(crate) async fn seal_scrubbed<W: CipherWand + ?Sized>(
    wand: &W,
    buffer: &mut Zeroizing<Vec<u8>>,
    nonce: Option<&[u8]>,
    aad: &[u8],
) -> Result<SealedBox, WandError> {
    let region = region_of(buffer.as_slice());
    let sealed = wand.encrypt_in_place(&mut **buffer, nonce, aad).await?;
    scrub_unless_aliased(buffer.as_mut_slice(), region, sealed.cipher_text());
    Ok(sealed)
}

/// Wand over an [`AeadBinding`].
///
/// Cloning is cheap and clones share the binding and nonce source, so the
/// counter policy never hands out a nonce twice.
pub struct BoundWand<B = SoftwareBinding> {
    binding: Arc<B>,
    nonces: Arc<NonceSource>,
    config: WandConfig,
}

/// Wand over the software `chacha20poly1305` binding.
pub type SoftwareWand = BoundWand<SoftwareBinding>;

impl<B> Clone for BoundWand<B> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            nonces: Arc::clone(&self.nonces),
            config: self.config.clone(),
        }
    }
}

impl<B: AeadBinding + 'static> BoundWand<B> {
    /// Bind a wand to `binding`.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidConfig`] for an invalid configuration and
    /// [`WandError::RandomFailed`] if the counter salt cannot be drawn.
    pub fn with_binding(binding: B, config: WandConfig) -> Result<Self, WandError> {
        config.validate()?;
        let nonces = NonceSource::new(binding.algorithm(), config.nonce_policy, config.max_messages)?;

        tracing::debug!(
            algorithm = %binding.algorithm(),
            nonce_policy = ?config.nonce_policy,
            "bound cipher wand"
        );

        Ok(Self {
            binding: Arc::new(binding),
            nonces: Arc::new(nonces),
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &WandConfig {
        &self.config
    }

    /// Counter nonces issued so far (0 under the random policy).
    #[must_use]
    pub fn nonces_issued(&self) -> u64 {
        self.nonces.issued()
    }

    fn reuses_buffers(&self) -> bool {
        self.config.reuse_buffers && self.binding.transforms_in_place()
    }

    fn resolve_nonce(&self, nonce: Option<&[u8]>) -> Result<Vec<u8>, WandError> {
        match nonce {
            Some(nonce) => {
                let expected = self.binding.algorithm().nonce_len();
                if nonce.len() != expected {
                    return Err(WandError::InvalidNonceLength {
                        expected,
                        actual: nonce.len(),
                    });
                }
                Ok(nonce.to_vec())
            }
            None => self.nonces.next_nonce(),
        }
    }

    /// Run `op` inline, or on the blocking pool for large payloads when a
    /// tokio runtime is available.
    async fn run<T, F>(&self, len: usize, op: F) -> Result<T, WandError>
    where
        F: FnOnce(&B) -> Result<T, WandError> + Send + 'static,
        T: Send + 'static,
    {
        if len >= self.config.offload_threshold {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let binding = Arc::clone(&self.binding);
                tracing::trace!(len, "offloading transform to blocking pool");
                return handle
                    .spawn_blocking(move || op(&binding))
                    .await
                    .map_err(|_| WandError::TaskFailed)?;
            }
        }

        op(&self.binding)
    }
}

#[async_trait]
impl<B: AeadBinding + 'static> CipherWand for BoundWand<B> {
    fn algorithm(&self) -> Algorithm {
        self.binding.algorithm()
    }

    async fn encrypt_in_place(
        &self,
        buffer: &mut Vec<u8>,
        nonce: Option<&[u8]>,
        aad: &[u8],
    ) -> Result<SealedBox, WandError> {
        let nonce = self.resolve_nonce(nonce)?;
        let len = buffer.len();
        let in_place = self.reuses_buffers();

        let mut work = if in_place {
            Zeroizing::new(std::mem::take(buffer))
        } else {
            Zeroizing::new(buffer.clone())
        };

        let op_nonce = nonce.clone();
        let aad = aad.to_vec();
        let (cipher_text, mac) = self
            .run(len, move |binding| {
                let mac = binding.seal_in_place(&op_nonce, &aad, work.as_mut_slice())?;
                Ok((std::mem::take(&mut *work), mac))
            })
            .await?;

        tracing::debug!(algorithm = %self.algorithm(), len, in_place, "sealed box");
        Ok(SealedBox::new(nonce, cipher_text, mac))
    }

    async fn decrypt(
        &self,
        sealed: &SealedBox,
        aad: &[u8],
        possible_buffer: Option<Vec<u8>>,
    ) -> Result<Zeroizing<Vec<u8>>, WandError> {
        let len = sealed.len();
        let mut work = reclaim(possible_buffer, self.reuses_buffers(), len);
        work.extend_from_slice(sealed.cipher_text());

        let nonce = sealed.nonce().to_vec();
        let mac = sealed.mac().to_vec();
        let aad = aad.to_vec();
        let result = self
            .run(len, move |binding| {
                binding.open_in_place(&nonce, &aad, work.as_mut_slice(), &mac)?;
                Ok(work)
            })
            .await;

        match &result {
            Ok(_) => tracing::debug!(algorithm = %self.algorithm(), len, "opened box"),
            Err(e) => tracing::debug!(algorithm = %self.algorithm(), len, error = %e, "failed to open box"),
        }
        result
    }
}

/// Bind `key` to its software binding with the default configuration.
///
/// # Errors
///
/// Returns [`WandError::RandomFailed`] if wand setup cannot draw randomness.
pub fn new_cipher_wand_from_secret_key(key: SecretKey) -> Result<SoftwareWand, WandError> {
    new_cipher_wand_with_config(key, WandConfig::default())
}

/// Bind `key` to its software binding with an explicit configuration.
///
/// # Errors
///
/// Returns [`WandError::InvalidConfig`] for an invalid configuration and
/// [`WandError::RandomFailed`] if wand setup cannot draw randomness.
pub fn new_cipher_wand_with_config(
    key: SecretKey,
    config: WandConfig,
) -> Result<SoftwareWand, WandError> {
    BoundWand::with_binding(SoftwareBinding::new(key), config)
}

//! Zeroization and buffer hygiene validation tests
//!
//! Verifies that clear text is scrubbed or moved on every exit path and that
//! sensitive types carry the right drop guarantees.

use sealwand_crypto::hygiene::{reclaim, region_of, same_region, scrub, scrub_unless_aliased};
use sealwand_crypto::{
    AeadBinding, Algorithm, BoundWand, CipherWand, SecretKey, SoftwareBinding, WandConfig,
    WandError, new_cipher_wand_from_secret_key, new_secret_key,
};
use std::future::Future;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::task::{Context, Waker};
use std::time::Duration;
use zeroize::Zeroizing;

/// Helper function to check if memory region contains all zeros
fn is_zeroed(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}

/// Compile-time verification that the decrypt output scrubs itself
fn assert_zeroizing(_: &Zeroizing<Vec<u8>>) {}

#[test]
fn test_zeroize_trait_bounds() {
    fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}

    assert_zeroize_on_drop::<SecretKey>();
}

#[tokio::test]
async fn test_decrypt_output_is_zeroizing() {
    let wand = new_cipher_wand_from_secret_key(new_secret_key(Algorithm::default()).unwrap())
        .unwrap();
    let sealed = wand.encrypt(b"scrub me", None, b"", None).await.unwrap();

    let clear = wand.decrypt(&sealed, b"", None).await.unwrap();
    assert_zeroizing(&clear);
    assert_eq!(clear.as_slice(), b"scrub me");
}

#[test]
fn test_scrub_unless_aliased_wipes_separate_buffer() {
    let mut input = b"clear text".to_vec();
    let region = region_of(&input);
    let output = vec![0xC3; input.len()];

    assert!(scrub_unless_aliased(&mut input, region, &output));
    assert_eq!(input.len(), 10);
    assert!(is_zeroed(&input));
}

#[test]
fn test_scrub_unless_aliased_keeps_moved_allocation() {
    let buffer = b"now ciphertext".to_vec();
    let region = region_of(&buffer);

    // Moving the Vec keeps its heap bytes where they were
    let moved = buffer;
    assert!(same_region(region, &moved));
    assert!(!same_region(region, &moved.clone()));

    let mut leftover = Vec::new();
    assert!(!scrub_unless_aliased(&mut leftover, region, &moved));
    assert_eq!(moved, b"now ciphertext");
}

#[test]
fn test_scrub_keeps_length() {
    let mut buf = b"secret".to_vec();
    scrub(&mut buf);
    assert_eq!(buf.len(), 6);
    assert!(is_zeroed(&buf));
}

#[test]
fn test_reclaim_reuses_allocation_empty() {
    let hint = vec![0xAB; 64];
    let region = region_of(&hint);

    let work = reclaim(Some(hint), true, 16);
    assert!(work.is_empty());
    assert!(work.capacity() >= 64);
    assert_eq!(work.as_ptr() as usize, region);
}

#[tokio::test]
async fn test_encrypt_leaves_caller_input_alone() {
    let wand = new_cipher_wand_from_secret_key(new_secret_key(Algorithm::default()).unwrap())
        .unwrap();
    let clear_text = b"caller owned".to_vec();

    let _sealed = wand.encrypt(&clear_text, None, b"", None).await.unwrap();

    assert_eq!(clear_text, b"caller owned");
}

#[tokio::test]
async fn test_in_place_buffer_becomes_ciphertext() {
    let wand = new_cipher_wand_from_secret_key(new_secret_key(Algorithm::default()).unwrap())
        .unwrap();
    let mut buffer = b"transform me".to_vec();
    let region = region_of(&buffer);

    let sealed = wand.encrypt_in_place(&mut buffer, None, b"").await.unwrap();

    // The allocation moved into the box and now holds ciphertext
    assert!(buffer.is_empty());
    assert_eq!(region_of(sealed.cipher_text()), region);
    assert_ne!(sealed.cipher_text(), b"transform me");
}

#[tokio::test]
async fn test_copying_wand_leaves_buffer_for_caller_scrub() {
    let config = WandConfig {
        reuse_buffers: false,
        ..WandConfig::default()
    };
    let wand = BoundWand::with_binding(
        SoftwareBinding::new(new_secret_key(Algorithm::default()).unwrap()),
        config,
    )
    .unwrap();
    let mut buffer = b"still clear".to_vec();
    let region = region_of(&buffer);

    let sealed = wand.encrypt_in_place(&mut buffer, None, b"").await.unwrap();
    assert_eq!(buffer, b"still clear");

    // Distinct regions, so the caller-side scrub wipes every byte
    assert!(scrub_unless_aliased(&mut buffer, region, sealed.cipher_text()));
    assert!(is_zeroed(&buffer));
}

#[tokio::test]
async fn test_failed_decrypt_returns_nothing() {
    let wand = new_cipher_wand_from_secret_key(new_secret_key(Algorithm::default()).unwrap())
        .unwrap();
    let sealed = wand.encrypt(b"classified", None, b"right", None).await.unwrap();

    let result = wand.decrypt(&sealed, b"wrong", Some(vec![0xFF; 64])).await;
    assert!(matches!(result, Err(WandError::AuthenticationFailure)));
}

#[tokio::test]
async fn test_decoding_error_after_successful_decrypt() {
    let wand = new_cipher_wand_from_secret_key(new_secret_key(Algorithm::default()).unwrap())
        .unwrap();
    let sealed = wand.encrypt(&[0xFF, 0xFE], None, b"", None).await.unwrap();

    assert!(matches!(
        wand.decrypt_string(&sealed).await,
        Err(WandError::DecodingError { valid_up_to: 0 })
    ));
}

/// Binding that holds every open until released, then reports the outcome.
struct GatedBinding {
    inner: SoftwareBinding,
    gate: Mutex<Receiver<()>>,
    done: Mutex<Sender<Result<Vec<u8>, WandError>>>,
}

impl AeadBinding for GatedBinding {
    fn algorithm(&self) -> Algorithm {
        self.inner.algorithm()
    }

    fn seal_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
    ) -> Result<Vec<u8>, WandError> {
        self.inner.seal_in_place(nonce, aad, buffer)
    }

    fn open_in_place(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buffer: &mut [u8],
        mac: &[u8],
    ) -> Result<(), WandError> {
        let _ = self.gate.lock().unwrap().recv();
        let result = self.inner.open_in_place(nonce, aad, buffer, mac);
        let report = match &result {
            Ok(()) => Ok(buffer.to_vec()),
            Err(_) => Err(WandError::AuthenticationFailure),
        };
        let _ = self.done.lock().unwrap().send(report);
        result
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_offloaded_decrypt_finishes_in_owned_buffer() {
    let (release, gate) = mpsc::channel();
    let (done, finished) = mpsc::channel();
    let binding = GatedBinding {
        inner: SoftwareBinding::new(SecretKey::from_bytes(Algorithm::default(), [0x0D; 32])),
        gate: Mutex::new(gate),
        done: Mutex::new(done),
    };
    let config = WandConfig {
        offload_threshold: 0,
        ..WandConfig::default()
    };
    let wand = BoundWand::with_binding(binding, config).unwrap();
    let sealed = wand.encrypt(&[7u8; 8192], None, b"", None).await.unwrap();

    // Poll once so the transform is handed to the blocking pool, then cancel
    let mut pending = wand.decrypt(&sealed, b"", None);
    let _ = pending.as_mut().poll(&mut Context::from_waker(Waker::noop()));
    drop(pending);

    // The offloaded closure owns its buffer and runs to completion
    release.send(()).unwrap();
    let report =
        tokio::task::spawn_blocking(move || finished.recv_timeout(Duration::from_secs(10)))
            .await
            .unwrap()
            .expect("offloaded transform never ran");
    assert_eq!(report.unwrap(), vec![7u8; 8192]);

    // The wand stays usable afterwards
    release.send(()).unwrap();
    let clear = wand.decrypt(&sealed, b"", None).await.unwrap();
    assert!(clear.iter().all(|&b| b == 7));
}

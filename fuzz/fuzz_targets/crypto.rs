//! Fuzz target for cryptographic operations
//!
//! Tests that the binding seal/open operations correctly handle arbitrary input.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sealwand_crypto::{AeadBinding, Algorithm, SecretKey, SoftwareBinding};

#[derive(Debug, Arbitrary)]
struct CryptoInput {
    chacha: bool,
    key: [u8; 32],
    nonce: Vec<u8>,
    plaintext: Vec<u8>,
    aad: Vec<u8>,
    mac: Vec<u8>,
}

fuzz_target!(|input: CryptoInput| {
    let algorithm = if input.chacha {
        Algorithm::ChaCha20Poly1305
    } else {
        Algorithm::XChaCha20Poly1305
    };
    let binding = SoftwareBinding::new(SecretKey::from_bytes(algorithm, input.key));

    // Fuzz sealing - should never panic, wrong nonce sizes are errors
    let mut buffer = input.plaintext.clone();
    if let Ok(mac) = binding.seal_in_place(&input.nonce, &input.aad, &mut buffer) {
        // If sealing succeeded, opening with same params must recover the plaintext
        binding
            .open_in_place(&input.nonce, &input.aad, &mut buffer, &mac)
            .expect("open after seal");
        assert_eq!(buffer, input.plaintext);
    }

    // Fuzz opening with arbitrary data - should never panic
    let mut forged = input.plaintext;
    let _ = binding.open_in_place(&input.nonce, &input.aad, &mut forged, &input.mac);
});

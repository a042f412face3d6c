//! Fuzz target for envelope decoding
//!
//! Arbitrary bytes and text must decode to a well-formed box or an error,
//! and every decoded box must re-encode to the same bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealwand_crypto::envelope;

fuzz_target!(|data: &[u8]| {
    if let Ok((algorithm, sealed)) = envelope::decode(data) {
        assert_eq!(sealed.nonce().len(), algorithm.nonce_len());
        assert_eq!(sealed.mac().len(), algorithm.tag_len());

        let encoded = envelope::encode(algorithm, &sealed).expect("re-encode");
        assert_eq!(encoded, data);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = envelope::decode_hex(text);
    }
});

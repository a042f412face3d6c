//! Text codec for the string convenience methods.
//!
//! Strict UTF-8 in both directions: decoding never substitutes replacement
//! characters, and errors carry only a position, never the offending bytes.

use crate::WandError;

/// Encode text to a fresh byte buffer owned by the caller.
#[must_use]
pub fn encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode bytes as UTF-8.
///
/// # Errors
///
/// Returns [`WandError::DecodingError`] on malformed UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String, WandError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| WandError::DecodingError {
            valid_up_to: e.valid_up_to(),
        })
}

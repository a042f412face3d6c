//! Canonical byte envelope for sealed boxes.
//!
//! ```text
//! +--------+-----------------+-------------------+--------------+
//! | alg id |      nonce      |    cipher_text    |     mac      |
//! | 1 byte | nonce_len bytes |   variable length | tag_len bytes|
//! +--------+-----------------+-------------------+--------------+
//! ```
//!
//! Field lengths come from the algorithm, so the envelope carries no length
//! prefixes. Decoding checks structure only; authenticity is established by
//! a wand's `decrypt`.

use crate::{Algorithm, SealedBox, WandError};

/// Header size (algorithm identifier).
pub const HEADER_SIZE: usize = 1;

/// Encode a sealed box produced under `algorithm`.
///
/// # Errors
///
/// Returns [`WandError::MalformedEnvelope`] if the box's nonce or tag length
/// does not match `algorithm`.
pub fn encode(algorithm: Algorithm, sealed: &SealedBox) -> Result<Vec<u8>, WandError> {
    if sealed.nonce().len() != algorithm.nonce_len() {
        return Err(WandError::MalformedEnvelope(format!(
            "nonce is {} bytes, {algorithm} needs {}",
            sealed.nonce().len(),
            algorithm.nonce_len()
        )));
    }
    if sealed.mac().len() != algorithm.tag_len() {
        return Err(WandError::MalformedEnvelope(format!(
            "mac is {} bytes, {algorithm} needs {}",
            sealed.mac().len(),
            algorithm.tag_len()
        )));
    }

    let mut out = Vec::with_capacity(encoded_len(algorithm, sealed.len()));
    out.push(algorithm.id());
    out.extend_from_slice(sealed.nonce());
    out.extend_from_slice(sealed.cipher_text());
    out.extend_from_slice(sealed.mac());
    Ok(out)
}

/// Decode an envelope into its algorithm and sealed box.
///
/// # Errors
///
/// Returns [`WandError::MalformedEnvelope`] for empty or truncated input and
/// [`WandError::UnknownAlgorithm`] for an unassigned algorithm identifier.
pub fn decode(bytes: &[u8]) -> Result<(Algorithm, SealedBox), WandError> {
    let (&id, rest) = bytes
        .split_first()
        .ok_or_else(|| WandError::MalformedEnvelope("empty envelope".into()))?;
    let algorithm = Algorithm::from_id(id)?;

    let overhead = algorithm.nonce_len() + algorithm.tag_len();
    if rest.len() < overhead {
        return Err(WandError::MalformedEnvelope(format!(
            "{} bytes after header, {algorithm} needs at least {overhead}",
            rest.len()
        )));
    }

    let (nonce, rest) = rest.split_at(algorithm.nonce_len());
    let (cipher_text, mac) = rest.split_at(rest.len() - algorithm.tag_len());

    Ok((
        algorithm,
        SealedBox::new(nonce.to_vec(), cipher_text.to_vec(), mac.to_vec()),
    ))
}

/// Encoded size for a clear text of `clear_len` bytes.
#[must_use]
pub fn encoded_len(algorithm: Algorithm, clear_len: usize) -> usize {
    HEADER_SIZE + algorithm.nonce_len() + clear_len + algorithm.tag_len()
}

/// Encode as lowercase hex text.
///
/// # Errors
///
/// Same as [`encode`].
pub fn encode_hex(algorithm: Algorithm, sealed: &SealedBox) -> Result<String, WandError> {
    encode(algorithm, sealed).map(hex::encode)
}

/// Decode hex text produced by [`encode_hex`].
///
/// # Errors
///
/// Returns [`WandError::MalformedEnvelope`] for invalid hex, otherwise same
/// as [`decode`].
pub fn decode_hex(text: &str) -> Result<(Algorithm, SealedBox), WandError> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| WandError::MalformedEnvelope(format!("invalid hex: {e}")))?;
    decode(&bytes)
}

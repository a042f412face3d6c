//! The sealed box: nonce, ciphertext and authentication tag.

use serde::{Deserialize, Serialize};

/// Output of a wand's `encrypt`, input to its `decrypt`.
///
/// Plain data: cloneable, comparable and serializable (fields serialize as
/// hex strings). A box only authenticates together with the key and AAD
/// that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBox {
    #[serde(with = "hex")]
    nonce: Vec<u8>,
    #[serde(with = "hex")]
    cipher_text: Vec<u8>,
    #[serde(with = "hex")]
    mac: Vec<u8>,
}

impl SealedBox {
    /// Assemble a box from its parts, e.g. after receiving them from a transport.
    ///
    /// Lengths are not checked here; a box with the wrong nonce or tag size
    /// fails authentication on `decrypt`.
    #[must_use]
    pub fn new(nonce: Vec<u8>, cipher_text: Vec<u8>, mac: Vec<u8>) -> Self {
        Self {
            nonce,
            cipher_text,
            mac,
        }
    }

    /// Nonce used for this encryption.
    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Ciphertext, same length as the original clear text.
    #[must_use]
    pub fn cipher_text(&self) -> &[u8] {
        &self.cipher_text
    }

    /// Authentication tag over nonce, AAD and ciphertext.
    #[must_use]
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    /// Length of the sealed clear text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cipher_text.len()
    }

    /// Whether the sealed clear text was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cipher_text.is_empty()
    }

    /// Split into `(nonce, cipher_text, mac)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        (self.nonce, self.cipher_text, self.mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let sealed = SealedBox::new(vec![1; 24], vec![2; 5], vec![3; 16]);
        assert_eq!(sealed.nonce(), &[1; 24]);
        assert_eq!(sealed.cipher_text(), &[2; 5]);
        assert_eq!(sealed.mac(), &[3; 16]);
        assert_eq!(sealed.len(), 5);
        assert!(!sealed.is_empty());

        let (nonce, cipher_text, mac) = sealed.into_parts();
        assert_eq!((nonce.len(), cipher_text.len(), mac.len()), (24, 5, 16));
    }

    #[test]
    fn test_json_uses_hex_fields() {
        let sealed = SealedBox::new(vec![0xAB; 2], vec![], vec![0x01, 0xFF]);
        let json = serde_json::to_string(&sealed).unwrap();
        assert_eq!(json, r#"{"nonce":"abab","cipher_text":"","mac":"01ff"}"#);

        let parsed: SealedBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sealed);
        assert!(parsed.is_empty());
    }
}

//! Text renderings of sealed boxes for the terminal.

use clap::ValueEnum;
use sealwand_crypto::{Algorithm, SealedBox, envelope};
use serde::{Deserialize, Serialize};

/// Output format for `seal`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Hex-encoded binary envelope
    #[default]
    Hex,
    /// JSON object with hex fields
    Json,
}

#[derive(Serialize, Deserialize)]
struct JsonBox {
    algorithm: Algorithm,
    #[serde(flatten)]
    sealed: SealedBox,
}

/// Render a sealed box.
///
/// # Errors
///
/// Returns an error if the box does not fit `algorithm`.
pub fn render(
    format: OutputFormat,
    algorithm: Algorithm,
    sealed: SealedBox,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Hex => Ok(envelope::encode_hex(algorithm, &sealed)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonBox { algorithm, sealed })?),
    }
}

/// Parse either rendering back into an algorithm and box.
///
/// # Errors
///
/// Returns an error for malformed hex, JSON, or envelope bytes.
pub fn parse(text: &str) -> anyhow::Result<(Algorithm, SealedBox)> {
    let text = text.trim();
    if text.starts_with('{') {
        let parsed: JsonBox = serde_json::from_str(text)?;
        Ok((parsed.algorithm, parsed.sealed))
    } else {
        Ok(envelope::decode_hex(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SealedBox {
        SealedBox::new(vec![1; 24], b"abc".to_vec(), vec![2; 16])
    }

    #[test]
    fn test_hex_rendering() {
        let text = render(OutputFormat::Hex, Algorithm::XChaCha20Poly1305, sample()).unwrap();
        assert!(text.starts_with("01"));

        let (algorithm, sealed) = parse(&text).unwrap();
        assert_eq!(algorithm, Algorithm::XChaCha20Poly1305);
        assert_eq!(sealed, sample());
    }

    #[test]
    fn test_json_rendering() {
        let text = render(OutputFormat::Json, Algorithm::XChaCha20Poly1305, sample()).unwrap();
        assert!(text.contains("\"algorithm\": \"xchacha20-poly1305\""));
        assert!(text.contains("\"cipher_text\": \"616263\""));

        let (algorithm, sealed) = parse(&text).unwrap();
        assert_eq!(algorithm, Algorithm::XChaCha20Poly1305);
        assert_eq!(sealed, sample());
    }

    #[test]
    fn test_render_rejects_mismatched_box() {
        assert!(render(OutputFormat::Hex, Algorithm::ChaCha20Poly1305, sample()).is_err());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse("zz").is_err());
        assert!(parse("{\"algorithm\": 1}").is_err());
        assert!(parse("").is_err());
    }
}

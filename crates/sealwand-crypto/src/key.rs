//! Opaque secret keys and the key-generation facility.
//!
//! A [`SecretKey`] never hands out its bytes: the only code that can read
//! them is the software binding in this crate. Key material is zeroized on
//! drop.

use crate::constant_time::ct_eq;
use crate::random::fill_random;
use crate::{Algorithm, KEY_SIZE, WandError};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::{Zeroizing, ZeroizeOnDrop};

/// Opaque, non-extractable secret key bound to one algorithm.
///
/// Does not implement `Clone`: wands share a key through `Arc` instead of
/// duplicating the material.
#[derive(ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)]
    algorithm: Algorithm,
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    /// Generate a fresh key from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::RandomFailed`] if the OS CSPRNG fails.
    pub fn generate(algorithm: Algorithm) -> Result<Self, WandError> {
        let mut bytes = [0u8; KEY_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self { algorithm, bytes })
    }

    /// Import a key from raw bytes.
    #[must_use]
    pub fn from_bytes(algorithm: Algorithm, bytes: [u8; KEY_SIZE]) -> Self {
        Self { algorithm, bytes }
    }

    /// Import a key from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::InvalidKeyLength`] if the slice is not exactly
    /// `algorithm.key_len()` bytes.
    pub fn from_slice(algorithm: Algorithm, slice: &[u8]) -> Result<Self, WandError> {
        if slice.len() != algorithm.key_len() {
            return Err(WandError::InvalidKeyLength {
                expected: algorithm.key_len(),
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self { algorithm, bytes })
    }

    /// Algorithm this key is meant for.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Raw key material, visible to the bindings in this crate only.
    pub(crate) fn expose(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Persist the key as `<algorithm>:<hex>` to an owner-only file.
    ///
    /// # Errors
    ///
    /// Returns [`WandError::Io`] if the file cannot be created or written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), WandError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = Zeroizing::new(format!(
            "{}:{}\n",
            self.algorithm,
            Zeroizing::new(hex::encode(self.bytes)).as_str()
        ));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        // `mode` only applies on creation; an existing file keeps its bits
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(line.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(algorithm = %self.algorithm, path = %path.display(), "wrote key file");
        Ok(())
    }

    /// Load a key written by [`SecretKey::write_to`].
    ///
    /// # Errors
    ///
    /// Returns [`WandError::Io`] if the file cannot be read,
    /// [`WandError::MalformedKeyFile`] if it is not `<algorithm>:<hex>`,
    /// [`WandError::UnknownAlgorithm`] for an unrecognised algorithm name, and
    /// [`WandError::InvalidKeyLength`] for key material of the wrong size.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, WandError> {
        let contents = Zeroizing::new(fs::read_to_string(path)?);
        let (name, encoded) = contents
            .trim()
            .split_once(':')
            .ok_or_else(|| WandError::MalformedKeyFile("missing algorithm prefix".into()))?;

        let algorithm: Algorithm = name.parse()?;
        let raw = Zeroizing::new(
            hex::decode(encoded)
                .map_err(|_| WandError::MalformedKeyFile("key material is not hex".into()))?,
        );

        Self::from_slice(algorithm, &raw)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && ct_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for SecretKey {}

/// Key-generation facility: a fresh random key for `algorithm`.
///
/// # Errors
///
/// Returns [`WandError::RandomFailed`] if the OS CSPRNG fails.
pub fn new_secret_key(algorithm: Algorithm) -> Result<SecretKey, WandError> {
    SecretKey::generate(algorithm)
}

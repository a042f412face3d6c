//! Secure random number generation.
//!
//! All randomness comes from the operating system CSPRNG.

use crate::WandError;

/// Fill a buffer with random bytes from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`WandError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn fill_random(buf: &mut [u8]) -> Result<(), WandError> {
    getrandom::fill(buf).map_err(|_| WandError::RandomFailed)
}

/// Generate a random byte vector of `len` bytes.
///
/// # Errors
///
/// Returns [`WandError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn random_vec(len: usize) -> Result<Vec<u8>, WandError> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// Generate a random 16-byte array.
///
/// # Errors
///
/// Returns [`WandError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn random_16() -> Result<[u8; 16], WandError> {
    let mut buf = [0u8; 16];
    fill_random(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_vec_length() {
        assert_eq!(random_vec(0).unwrap().len(), 0);
        assert_eq!(random_vec(24).unwrap().len(), 24);
        assert_ne!(random_vec(24).unwrap(), random_vec(24).unwrap());
    }

    #[test]
    fn test_random_16_differs() {
        let a = random_16().unwrap();
        let b = random_16().unwrap();
        assert_ne!(a, b);
    }
}

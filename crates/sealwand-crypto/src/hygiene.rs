//! Buffer hygiene.
//!
//! Every buffer that may hold clear text is either transformed in place into
//! ciphertext or overwritten with zeros before it is released. Owned working
//! buffers live inside [`Zeroizing`] guards so the scrub also runs on error
//! returns and when an in-flight future is dropped.

use zeroize::{Zeroize, Zeroizing};

/// Overwrite every byte of `buf` with zero, keeping its length.
pub fn scrub(buf: &mut [u8]) {
    buf.zeroize();
}

/// Address of a buffer's first byte.
///
/// Kept as a plain integer so it can be held across `.await` points.
#[must_use]
pub fn region_of(buf: &[u8]) -> usize {
    buf.as_ptr() as usize
}

/// Whether `output` starts at the memory region recorded in `region`.
#[must_use]
pub fn same_region(region: usize, output: &[u8]) -> bool {
    !output.is_empty() && region_of(output) == region
}

/// Scrub `input` unless `output` is the very same memory region.
///
/// Returns `true` when the input was scrubbed. When the regions are
/// identical the buffer already holds ciphertext, and zeroing it would
/// destroy the result.
pub fn scrub_unless_aliased(input: &mut [u8], region: usize, output: &[u8]) -> bool {
    if same_region(region, output) {
        return false;
    }
    scrub(input);
    true
}

/// Turn an optional reuse hint into a scrubbed, empty working buffer.
///
/// When `reuse` is false the hint is scrubbed and dropped and a fresh buffer
/// of `capacity` is allocated instead.
#[must_use]
pub fn reclaim(hint: Option<Vec<u8>>, reuse: bool, capacity: usize) -> Zeroizing<Vec<u8>> {
    match hint {
        Some(mut buf) if reuse => {
            // Zeroize wipes the spare capacity too, then truncates
            buf.zeroize();
            buf.reserve(capacity);
            Zeroizing::new(buf)
        }
        Some(buf) => {
            drop(Zeroizing::new(buf));
            Zeroizing::new(Vec::with_capacity(capacity))
        }
        None => Zeroizing::new(Vec::with_capacity(capacity)),
    }
}

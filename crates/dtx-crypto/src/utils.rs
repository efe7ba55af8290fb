//! Constant-time comparison helpers.
//!
//! Every comparison of a received value against a locally recomputed digest
//! goes through here so a mismatch position never shows up in timing.

use constant_time_eq::constant_time_eq;

/// Compare two byte slices in constant time.
///
/// Slices of different lengths compare unequal.
///
/// ```rust
/// use dtx_crypto::utils::constant_time_compare;
///
/// assert!(constant_time_compare(&[7u8; 32], &[7u8; 32]));
/// assert!(!constant_time_compare(&[7u8; 32], &[8u8; 32]));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    constant_time_eq(a, b)
}

/// Fixed-size variant of [`constant_time_compare`].
pub fn constant_time_compare_array<const N: usize>(a: &[u8; N], b: &[u8; N]) -> bool {
    constant_time_eq(a, b)
}

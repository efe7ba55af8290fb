//! Per-session random contributions.
//!
//! Each role generates exactly one [`RandomNonce`] per session from the OS
//! CSPRNG. The client's nonce stays secret until it opens its commitment.

use std::fmt;

use getrandom::getrandom;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::utils::constant_time_compare_array;

/// Nonce length in bytes. Pinned for protocol v1.
pub const NONCE_LEN: usize = 32;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RandomNonce([u8; NONCE_LEN]);

impl RandomNonce {
    /// Draw a fresh nonce from the OS CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if the OS random source is unavailable. There is no safe way to
    /// continue a handshake without one.
    pub fn generate() -> Self {
        let mut b = [0u8; NONCE_LEN];
        getrandom(&mut b).expect("OS random source unavailable");
        Self(b)
    }

    /// Wrap a nonce received from the peer.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl PartialEq for RandomNonce {
    fn eq(&self, other: &Self) -> bool {
        constant_time_compare_array(&self.0, &other.0)
    }
}

impl Eq for RandomNonce {}

impl fmt::Debug for RandomNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RandomNonce(<redacted>)")
    }
}

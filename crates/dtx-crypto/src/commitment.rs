//! Commit/reveal binding of a certificate to a not-yet-revealed nonce.
//!
//! commitment = SHA-256(transcript("dtx_commitment_v1", cert, nonce))
//!
//! The client publishes the commitment before it sees the server's nonce,
//! so it cannot pick its own nonce after the fact. The server later checks the
//! revealed nonce against the certificate it observed on the transport.

use crate::{
    nonce::RandomNonce,
    transcript::{domains, tags, Transcript},
    utils::constant_time_compare_array,
};

/// Commitment length in bytes (SHA-256 digest).
pub const COMMITMENT_LEN: usize = 32;

#[derive(Clone, Copy, Debug, Eq)]
pub struct Commitment([u8; COMMITMENT_LEN]);

impl Commitment {
    pub fn compute(certificate_der: &[u8], nonce: &RandomNonce) -> Self {
        let mut t = Transcript::new(domains::COMMITMENT_V1);
        t.append_bytes(tags::COMMIT_CERTIFICATE, certificate_der);
        t.append_bytes(tags::COMMIT_NONCE, nonce.as_bytes());
        Self(t.finalize())
    }

    /// Recompute from the revealed opening and compare in constant time.
    pub fn verify(&self, certificate_der: &[u8], nonce: &RandomNonce) -> bool {
        let expected = Self::compute(certificate_der, nonce);
        constant_time_compare_array(&self.0, &expected.0)
    }

    pub fn from_bytes(bytes: [u8; COMMITMENT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }
}

impl PartialEq for Commitment {
    fn eq(&self, other: &Self) -> bool {
        constant_time_compare_array(&self.0, &other.0)
    }
}

//! Short authentication code shown to the user on both devices.
//!
//! sas = first 4 bytes (BE) of SHA-256(transcript("dtx_sas_v1",
//!   server_cert, client_cert, server_random, client_random)) mod 10^6
//!
//! Field order and tags are pinned for protocol v1. The code is short on
//! purpose: the commitment carries the cryptographic strength, the code only
//! has to make a relayed handshake visible to a human.

use std::fmt;

use crate::{
    nonce::RandomNonce,
    transcript::{domains, tags, Transcript},
};

/// Number of decimal digits displayed.
pub const SAS_DIGITS: usize = 6;

const SAS_MODULUS: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShortAuthenticationCode(u32);

impl ShortAuthenticationCode {
    pub fn derive(
        server_certificate_der: &[u8],
        client_certificate_der: &[u8],
        server_random: &RandomNonce,
        client_random: &RandomNonce,
    ) -> Self {
        let mut t = Transcript::new(domains::SAS_V1);
        t.append_bytes(tags::SAS_SERVER_CERTIFICATE, server_certificate_der);
        t.append_bytes(tags::SAS_CLIENT_CERTIFICATE, client_certificate_der);
        t.append_bytes(tags::SAS_SERVER_RANDOM, server_random.as_bytes());
        t.append_bytes(tags::SAS_CLIENT_RANDOM, client_random.as_bytes());
        Self(truncate(&t.finalize()))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShortAuthenticationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = SAS_DIGITS)
    }
}

fn truncate(digest: &[u8; 32]) -> u32 {
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % SAS_MODULUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::NONCE_LEN;

    fn fixed() -> (RandomNonce, RandomNonce) {
        (
            RandomNonce::from_bytes([0x33; NONCE_LEN]),
            RandomNonce::from_bytes([0x44; NONCE_LEN]),
        )
    }

    #[test]
    fn test_sas_is_deterministic() {
        let (s, c) = fixed();
        let a = ShortAuthenticationCode::derive(b"server", b"client", &s, &c);
        let b = ShortAuthenticationCode::derive(b"server", b"client", &s, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sas_display_is_six_digits() {
        let (s, c) = fixed();
        let code = ShortAuthenticationCode::derive(b"server", b"client", &s, &c).to_string();
        assert_eq!(code.len(), SAS_DIGITS);
        assert!(code.chars().all(|ch| ch.is_ascii_digit()));
    }

    #[test]
    fn test_truncation_uses_first_four_bytes_big_endian() {
        let mut digest = [0xFFu8; 32];
        digest[..4].copy_from_slice(&1_234_567u32.to_be_bytes());
        assert_eq!(truncate(&digest), 234_567);
    }

    #[test]
    fn test_sas_display_zero_pads() {
        assert_eq!(ShortAuthenticationCode(42).to_string(), "000042");
    }

    #[test]
    fn test_swapping_certificates_changes_sas() {
        let (s, c) = fixed();
        let a = ShortAuthenticationCode::derive(b"server", b"client", &s, &c);
        let b = ShortAuthenticationCode::derive(b"client", b"server", &s, &c);
        assert_ne!(a, b);
    }

    #[test]
    fn test_swapping_randoms_changes_sas() {
        let (s, c) = fixed();
        let a = ShortAuthenticationCode::derive(b"server", b"client", &s, &c);
        let b = ShortAuthenticationCode::derive(b"server", b"client", &c, &s);
        assert_ne!(a, b);
    }
}

//! Tagged, length-prefixed transcript used by every digest in the handshake.
//!
//! Each field is written as `tag (u32 BE) || len (u32 BE) || bytes`, so two
//! different field sequences can never serialize to the same byte string.
//! Domain strings and tags are part of the wire protocol and MUST NOT change
//! once released; a change means a new protocol version.

use bytes::{BufMut, BytesMut};
use sha2::{Digest, Sha256};

/// Pinned domain separators (protocol v1).
pub mod domains {
    pub const COMMITMENT_V1: &str = "dtx_commitment_v1";
    pub const SAS_V1: &str = "dtx_sas_v1";
}

/// Pinned field tags (protocol v1).
pub mod tags {
    pub const DOMAIN: u32 = 0;

    pub const COMMIT_CERTIFICATE: u32 = 1;
    pub const COMMIT_NONCE: u32 = 2;

    pub const SAS_SERVER_CERTIFICATE: u32 = 1;
    pub const SAS_CLIENT_CERTIFICATE: u32 = 2;
    pub const SAS_SERVER_RANDOM: u32 = 3;
    pub const SAS_CLIENT_RANDOM: u32 = 4;
}

#[derive(Clone, Debug)]
pub struct Transcript {
    buf: BytesMut,
}

impl Transcript {
    /// Create a new transcript with the given domain separator.
    pub fn new(domain: &'static str) -> Self {
        let mut t = Self { buf: BytesMut::with_capacity(1024) };
        t.append_str(tags::DOMAIN, domain);
        t
    }

    /// Append raw bytes with a tag.
    pub fn append_bytes(&mut self, tag: u32, data: &[u8]) -> &mut Self {
        // Certificates are a few hundred bytes, nonces 32; a field over 4 GiB
        // cannot be framed and indicates a caller bug.
        let len = u32::try_from(data.len()).expect("transcript field exceeds u32::MAX bytes");
        self.buf.put_u32(tag);
        self.buf.put_u32(len);
        self.buf.extend_from_slice(data);
        self
    }

    /// Append a string with a tag (encoded as UTF-8 bytes).
    pub fn append_str(&mut self, tag: u32, s: &str) -> &mut Self {
        self.append_bytes(tag, s.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// SHA-256 of the transcript contents.
    pub fn finalize(&self) -> [u8; 32] {
        Sha256::digest(&self.buf).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_determinism() {
        let t1 = Transcript::new("test_domain").append_bytes(1, b"hello").clone();
        let t2 = Transcript::new("test_domain").append_bytes(1, b"hello").clone();

        assert_eq!(t1.as_bytes(), t2.as_bytes());
        assert_eq!(t1.finalize(), t2.finalize());
    }

    #[test]
    fn test_framing_layout() {
        let t = Transcript::new("d").append_bytes(7, b"ab").clone();
        assert_eq!(
            hex::encode(t.as_bytes()),
            // tag 0, len 1, "d", tag 7, len 2, "ab"
            "00000000000000016400000007000000026162"
        );
    }

    #[test]
    fn test_boundary_shift_changes_bytes() {
        // "ab" + "c" must not collide with "a" + "bc".
        let t1 = Transcript::new("d")
            .append_bytes(1, b"ab")
            .append_bytes(2, b"c")
            .clone();
        let t2 = Transcript::new("d")
            .append_bytes(1, b"a")
            .append_bytes(2, b"bc")
            .clone();

        assert_ne!(t1.as_bytes(), t2.as_bytes());
        assert_ne!(t1.finalize(), t2.finalize());
    }

    #[test]
    fn test_different_domains_different_outputs() {
        let t1 = Transcript::new(domains::COMMITMENT_V1).append_bytes(1, b"data").clone();
        let t2 = Transcript::new(domains::SAS_V1).append_bytes(1, b"data").clone();

        assert_ne!(t1.finalize(), t2.finalize());
    }

    #[test]
    fn test_tag_ordering_matters() {
        let t1 = Transcript::new("test").append_bytes(1, b"data").clone();
        let t2 = Transcript::new("test").append_bytes(2, b"data").clone();

        assert_ne!(t1.finalize(), t2.finalize());
    }

    #[test]
    fn test_order_of_appends_matters() {
        let t1 = Transcript::new("test")
            .append_bytes(1, b"first")
            .append_bytes(2, b"second")
            .clone();

        let t2 = Transcript::new("test")
            .append_bytes(2, b"second")
            .append_bytes(1, b"first")
            .clone();

        assert_ne!(t1.finalize(), t2.finalize());
    }

    #[test]
    fn test_new_always_starts_with_domain_field() {
        let t = Transcript::new("x");
        // tag 0, len 1, "x"
        assert_eq!(hex::encode(t.as_bytes()), "000000000000000178");
    }
}

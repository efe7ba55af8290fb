//! Identity material provider.
//!
//! Each transfer attempt gets a fresh self-signed certificate and key pair.
//! The certificate bytes are one of the inputs bound by the commitment and
//! the short authentication code, so they must never be reused across
//! sessions.

use std::fmt;

use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use dtx_crypto::hash::fingerprint;

use crate::errors::IdentityError;

/// DER-encoded certificate, immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCertificate {
    der: Vec<u8>,
}

impl IdentityCertificate {
    /// Wrap certificate bytes as observed on the transport handshake.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// SHA-256 of the DER bytes.
    pub fn fingerprint(&self) -> [u8; 32] {
        fingerprint(&self.der)
    }

    /// Short hex prefix of the fingerprint, for logs only.
    pub fn short_fingerprint(&self) -> String {
        hex::encode(&self.fingerprint()[..8])
    }
}

impl fmt::Debug for IdentityCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCertificate")
            .field("len", &self.der.len())
            .field("fingerprint", &self.short_fingerprint())
            .finish()
    }
}

/// PKCS#8 DER private key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    der: Vec<u8>,
}

impl PrivateKey {
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Source of per-session transport identities.
pub trait IdentityProvider {
    fn create(&self) -> Result<(PrivateKey, IdentityCertificate), IdentityError>;
}

/// Generates a fresh key pair and a self-signed certificate on every call.
#[derive(Clone, Debug)]
pub struct SelfSignedIdentityProvider {
    subject_alt_names: Vec<String>,
}

impl SelfSignedIdentityProvider {
    pub fn new(subject_alt_names: Vec<String>) -> Self {
        Self { subject_alt_names }
    }
}

impl Default for SelfSignedIdentityProvider {
    fn default() -> Self {
        Self::new(vec!["dtx.local".to_string()])
    }
}

impl IdentityProvider for SelfSignedIdentityProvider {
    fn create(&self) -> Result<(PrivateKey, IdentityCertificate), IdentityError> {
        let certified_key = rcgen::generate_simple_self_signed(self.subject_alt_names.clone())
            .map_err(|e| IdentityError::KeyGenerationFailed(e.to_string()))?;

        let certificate = IdentityCertificate::from_der(certified_key.cert.der().to_vec());
        let key = PrivateKey {
            der: certified_key.key_pair.serialize_der(),
        };

        debug!(
            fingerprint = %certificate.short_fingerprint(),
            "generated self-signed transfer identity"
        );
        Ok((key, certificate))
    }
}

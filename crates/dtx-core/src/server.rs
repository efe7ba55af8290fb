//! Server (responding) role.
//!
//! The server sends its random immediately and holds the client's commitment
//! until the client reveals its random. Verification binds the client random
//! to the client certificate the server actually observed on the transport,
//! which is what exposes a relay that substituted the client's certificate.

use tracing::{debug, warn};

use dtx_crypto::{Commitment, RandomNonce, ShortAuthenticationCode};

use crate::{errors::DeviceTransferAuthenticationError, identity::IdentityCertificate};

/// CREATED: server random drawn, commitment held.
#[derive(Debug)]
pub struct Server {
    server_certificate: IdentityCertificate,
    client_certificate: IdentityCertificate,
    peer_commitment: Commitment,
    server_random: RandomNonce,
}

impl Server {
    /// `server_certificate` is the certificate this device presents on the
    /// transport, `observed_client_certificate` the one its peer presented.
    pub fn new(
        server_certificate: IdentityCertificate,
        observed_client_certificate: IdentityCertificate,
        peer_commitment: Commitment,
    ) -> Self {
        debug!(
            server_cert = %server_certificate.short_fingerprint(),
            client_cert = %observed_client_certificate.short_fingerprint(),
            "server handshake created"
        );

        Self {
            server_certificate,
            client_certificate: observed_client_certificate,
            peer_commitment,
            server_random: RandomNonce::generate(),
        }
    }

    /// Message 2, server -> client.
    pub fn random(&self) -> &RandomNonce {
        &self.server_random
    }

    /// Check the revealed client random (message 3) against the commitment.
    ///
    /// On mismatch the server is consumed and the session is over; there is
    /// no retry on the same instance.
    pub fn set_client_random(
        self,
        client_random: RandomNonce,
    ) -> Result<VerifiedServer, DeviceTransferAuthenticationError> {
        if !self
            .peer_commitment
            .verify(self.client_certificate.as_der(), &client_random)
        {
            warn!(
                client_cert = %self.client_certificate.short_fingerprint(),
                commitment = %hex::encode(&self.peer_commitment.as_bytes()[..8]),
                "commitment mismatch, aborting transfer"
            );
            return Err(DeviceTransferAuthenticationError::CommitmentMismatch);
        }

        debug!("client commitment verified");
        Ok(VerifiedServer {
            server_certificate: self.server_certificate,
            client_certificate: self.client_certificate,
            server_random: self.server_random,
            client_random,
        })
    }
}

/// VERIFIED: the commitment opened; the code can be computed.
#[derive(Debug)]
pub struct VerifiedServer {
    server_certificate: IdentityCertificate,
    client_certificate: IdentityCertificate,
    server_random: RandomNonce,
    client_random: RandomNonce,
}

impl VerifiedServer {
    /// Deterministic; repeated calls return the same code.
    pub fn compute_short_authentication_code(&self) -> ShortAuthenticationCode {
        ShortAuthenticationCode::derive(
            self.server_certificate.as_der(),
            self.client_certificate.as_der(),
            &self.server_random,
            &self.client_random,
        )
    }
}

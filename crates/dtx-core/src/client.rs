//! Client (initiating) role.
//!
//! The client draws its random up front and publishes only a commitment to
//! it. It reveals the random after it has received the server's, so neither
//! side can choose its contribution after seeing the other's.
//!
//! Each step consumes the previous state, so revealing twice or computing
//! the code before the server random arrives does not compile.

use tracing::debug;

use dtx_crypto::{Commitment, RandomNonce, ShortAuthenticationCode};

use crate::identity::IdentityCertificate;

/// CREATED: commitment computed, waiting for the server random.
#[derive(Debug)]
pub struct Client {
    client_certificate: IdentityCertificate,
    server_certificate: IdentityCertificate,
    client_random: RandomNonce,
    commitment: Commitment,
}

impl Client {
    /// `client_certificate` is the certificate this device presents on the
    /// transport. `server_certificate` is the one it observed from its peer.
    pub fn new(
        client_certificate: IdentityCertificate,
        server_certificate: IdentityCertificate,
    ) -> Self {
        let client_random = RandomNonce::generate();
        let commitment = Commitment::compute(client_certificate.as_der(), &client_random);

        debug!(
            client_cert = %client_certificate.short_fingerprint(),
            server_cert = %server_certificate.short_fingerprint(),
            commitment = %hex::encode(&commitment.as_bytes()[..8]),
            "client handshake created"
        );

        Self {
            client_certificate,
            server_certificate,
            client_random,
            commitment,
        }
    }

    /// Message 1, client -> server.
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Record the server random (message 2) and reveal the client random
    /// (message 3).
    pub fn set_server_random_and_get_client_random(
        self,
        server_random: RandomNonce,
    ) -> (ClientExchanged, RandomNonce) {
        let revealed = self.client_random.clone();
        debug!("client received server random, revealing client random");

        let exchanged = ClientExchanged {
            client_certificate: self.client_certificate,
            server_certificate: self.server_certificate,
            client_random: self.client_random,
            server_random,
        };
        (exchanged, revealed)
    }
}

/// RANDOM_EXCHANGED: all four code inputs known.
#[derive(Debug)]
pub struct ClientExchanged {
    client_certificate: IdentityCertificate,
    server_certificate: IdentityCertificate,
    client_random: RandomNonce,
    server_random: RandomNonce,
}

impl ClientExchanged {
    /// Deterministic; repeated calls return the same code.
    ///
    /// A tampered server random is not detected here. It only shows up as a
    /// code that differs from the one on the other device.
    pub fn compute_short_authentication_code(&self) -> ShortAuthenticationCode {
        ShortAuthenticationCode::derive(
            self.server_certificate.as_der(),
            self.client_certificate.as_der(),
            &self.server_random,
            &self.client_random,
        )
    }
}

//! In-process handshake runner.
//!
//! Relays the three messages between a client and a server in memory and can
//! play an active attacker on the path. Used by the integration tests and the
//! demo binary.

use tracing::info;

use dtx_crypto::{Commitment, RandomNonce, ShortAuthenticationCode};

use crate::{
    client::Client,
    errors::HandshakeError,
    identity::{IdentityCertificate, IdentityProvider},
    server::Server,
};

/// What an attacker on the path does to the handshake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tamper {
    #[default]
    None,
    /// The server observes an attacker certificate instead of the client's.
    SubstituteClientCertificate,
    /// Message 1 is altered.
    CorruptCommitment,
    /// Message 3 is altered.
    CorruptClientRandom,
    /// Message 2 is altered. Not detected by the protocol; the codes differ.
    CorruptServerRandom,
}

impl Tamper {
    pub fn relay_commitment(&self, commitment: Commitment) -> Commitment {
        match self {
            Tamper::CorruptCommitment => {
                let mut bytes = *commitment.as_bytes();
                bytes[0] ^= 0xFF;
                Commitment::from_bytes(bytes)
            }
            _ => commitment,
        }
    }

    pub fn relay_server_random(&self, random: RandomNonce) -> RandomNonce {
        match self {
            Tamper::CorruptServerRandom => flip_first_byte(&random),
            _ => random,
        }
    }

    pub fn relay_client_random(&self, random: RandomNonce) -> RandomNonce {
        match self {
            Tamper::CorruptClientRandom => flip_first_byte(&random),
            _ => random,
        }
    }
}

fn flip_first_byte(random: &RandomNonce) -> RandomNonce {
    let mut bytes = *random.as_bytes();
    bytes[0] ^= 0xFF;
    RandomNonce::from_bytes(bytes)
}

/// Codes computed independently by both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandshakeOutcome {
    pub client_code: ShortAuthenticationCode,
    pub server_code: ShortAuthenticationCode,
}

impl HandshakeOutcome {
    /// What the user checks by eye. A mismatch means the transfer must not
    /// proceed.
    pub fn codes_match(&self) -> bool {
        self.client_code == self.server_code
    }
}

/// Certificates each side presents and observes on the transport.
pub struct TransportView {
    pub client_certificate: IdentityCertificate,
    pub server_certificate: IdentityCertificate,
    /// What the server saw its peer present.
    pub client_certificate_seen_by_server: IdentityCertificate,
}

impl TransportView {
    /// Create fresh identities for both devices, plus an attacker identity if
    /// the tampering requires one.
    pub fn establish<P: IdentityProvider>(provider: &P, tamper: Tamper) -> Result<Self, HandshakeError> {
        let (_client_key, client_certificate) = provider.create()?;
        let (_server_key, server_certificate) = provider.create()?;

        let client_certificate_seen_by_server = match tamper {
            Tamper::SubstituteClientCertificate => provider.create()?.1,
            _ => client_certificate.clone(),
        };

        Ok(Self {
            client_certificate,
            server_certificate,
            client_certificate_seen_by_server,
        })
    }
}

/// Run the full handshake with the given on-path behavior.
pub fn run_handshake<P: IdentityProvider>(
    provider: &P,
    tamper: Tamper,
) -> Result<HandshakeOutcome, HandshakeError> {
    let view = TransportView::establish(provider, tamper)?;

    let client = Client::new(view.client_certificate, view.server_certificate.clone());
    let commitment = tamper.relay_commitment(client.commitment());

    let server = Server::new(
        view.server_certificate,
        view.client_certificate_seen_by_server,
        commitment,
    );
    let server_random = tamper.relay_server_random(server.random().clone());

    let (client, client_random) = client.set_server_random_and_get_client_random(server_random);
    let server = server.set_client_random(tamper.relay_client_random(client_random))?;

    let outcome = HandshakeOutcome {
        client_code: client.compute_short_authentication_code(),
        server_code: server.compute_short_authentication_code(),
    };
    info!(
        tamper = ?tamper,
        codes_match = outcome.codes_match(),
        "handshake completed"
    );
    Ok(outcome)
}

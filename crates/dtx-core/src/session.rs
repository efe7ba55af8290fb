//! Event-driven wrappers around the role types.
//!
//! Transports deliver frames through callbacks, so callers usually keep the
//! handshake in a struct field. These wrappers hold the current role state
//! and advance it per received message. Frames arriving out of order are
//! network input, not a programmer error, and are reported as
//! [`SessionError::UnexpectedMessage`] without changing state.
//!
//! State flow:
//! - client: `Created -> RandomExchanged -> CodeComputed`
//! - server: `AwaitingCommitment -> RandomExchanged -> Verified | Failed`,
//!   then `Verified -> CodeComputed`. The server role is created and its
//!   random sent in the same step, so it never rests in `Created`.

use std::mem;

use bytes::Bytes;
use tracing::{debug, warn};

use dtx_crypto::ShortAuthenticationCode;

use crate::{
    client::{Client, ClientExchanged},
    errors::SessionError,
    identity::IdentityCertificate,
    server::{Server, VerifiedServer},
    wire::WireMessage,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    /// Server only: transport is up, no commitment received yet.
    AwaitingCommitment,
    Created,
    /// Client: server random received, own random revealed.
    /// Server: commitment held, own random sent.
    RandomExchanged,
    Verified,
    Failed,
    CodeComputed,
}

impl HandshakeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandshakeState::AwaitingCommitment => "awaiting_commitment",
            HandshakeState::Created => "created",
            HandshakeState::RandomExchanged => "random_exchanged",
            HandshakeState::Verified => "verified",
            HandshakeState::Failed => "failed",
            HandshakeState::CodeComputed => "code_computed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakeState::Failed | HandshakeState::CodeComputed)
    }
}

// ============================================================================
// Client
// ============================================================================

enum ClientState {
    /// Only held while a transition is in progress.
    Transitioning,
    Created(Client),
    RandomExchanged(ClientExchanged),
    CodeComputed(ShortAuthenticationCode),
}

pub struct ClientSession {
    state: ClientState,
}

impl ClientSession {
    /// Create the client role and return the commitment frame to send first.
    pub fn start(
        client_certificate: IdentityCertificate,
        server_certificate: IdentityCertificate,
    ) -> (Self, WireMessage) {
        let client = Client::new(client_certificate, server_certificate);
        let first = WireMessage::Commitment(client.commitment());
        (
            Self {
                state: ClientState::Created(client),
            },
            first,
        )
    }

    pub fn state(&self) -> HandshakeState {
        match self.state {
            ClientState::Transitioning => HandshakeState::Failed,
            ClientState::Created(_) => HandshakeState::Created,
            ClientState::RandomExchanged(_) => HandshakeState::RandomExchanged,
            ClientState::CodeComputed(_) => HandshakeState::CodeComputed,
        }
    }

    /// Advance on a received message. Returns the reply to send, if any.
    pub fn handle_message(&mut self, msg: WireMessage) -> Result<Option<WireMessage>, SessionError> {
        let current = self.state();
        match (current, msg) {
            (HandshakeState::Created, WireMessage::ServerRandom(server_random)) => {
                let ClientState::Created(client) =
                    mem::replace(&mut self.state, ClientState::Transitioning)
                else {
                    unreachable!("state checked by the match above");
                };
                let (exchanged, client_random) =
                    client.set_server_random_and_get_client_random(server_random);
                self.state = ClientState::RandomExchanged(exchanged);
                debug!("client session: random exchanged");
                Ok(Some(WireMessage::ClientRandom(client_random)))
            }
            (_, msg) => {
                warn!(message = msg.name(), state = current.as_str(), "client session: unexpected message");
                Err(SessionError::UnexpectedMessage {
                    message: msg.name(),
                    state: current.as_str(),
                })
            }
        }
    }

    /// Decode a frame and advance. Returns the encoded reply, if any.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Option<Bytes>, SessionError> {
        let msg = WireMessage::decode(frame)?;
        Ok(self.handle_message(msg)?.map(|reply| reply.encode()))
    }

    /// The code to display, once the server random has been received.
    pub fn short_authentication_code(&mut self) -> Option<ShortAuthenticationCode> {
        let code = match &self.state {
            ClientState::Transitioning | ClientState::Created(_) => return None,
            ClientState::RandomExchanged(exchanged) => exchanged.compute_short_authentication_code(),
            ClientState::CodeComputed(code) => return Some(*code),
        };
        self.state = ClientState::CodeComputed(code);
        Some(code)
    }
}

// ============================================================================
// Server
// ============================================================================

enum ServerState {
    AwaitingCommitment {
        server_certificate: IdentityCertificate,
        observed_client_certificate: IdentityCertificate,
    },
    RandomSent(Server),
    Verified(VerifiedServer),
    Failed,
    CodeComputed(ShortAuthenticationCode),
}

pub struct ServerSession {
    state: ServerState,
}

impl ServerSession {
    /// `observed_client_certificate` is what the transport handshake saw the
    /// peer present, not anything the peer claims in-band.
    pub fn new(
        server_certificate: IdentityCertificate,
        observed_client_certificate: IdentityCertificate,
    ) -> Self {
        Self {
            state: ServerState::AwaitingCommitment {
                server_certificate,
                observed_client_certificate,
            },
        }
    }

    pub fn state(&self) -> HandshakeState {
        match self.state {
            ServerState::AwaitingCommitment { .. } => HandshakeState::AwaitingCommitment,
            ServerState::RandomSent(_) => HandshakeState::RandomExchanged,
            ServerState::Verified(_) => HandshakeState::Verified,
            ServerState::Failed => HandshakeState::Failed,
            ServerState::CodeComputed(_) => HandshakeState::CodeComputed,
        }
    }

    /// Advance on a received message. Returns the reply to send, if any.
    ///
    /// A commitment mismatch moves the session to `Failed` permanently.
    pub fn handle_message(&mut self, msg: WireMessage) -> Result<Option<WireMessage>, SessionError> {
        let current = self.state();
        match (current, msg) {
            (HandshakeState::AwaitingCommitment, WireMessage::Commitment(commitment)) => {
                let ServerState::AwaitingCommitment {
                    server_certificate,
                    observed_client_certificate,
                } = mem::replace(&mut self.state, ServerState::Failed)
                else {
                    unreachable!("state checked by the match above");
                };
                let server = Server::new(server_certificate, observed_client_certificate, commitment);
                let reply = WireMessage::ServerRandom(server.random().clone());
                self.state = ServerState::RandomSent(server);
                debug!("server session: commitment received");
                Ok(Some(reply))
            }
            (HandshakeState::RandomExchanged, WireMessage::ClientRandom(client_random)) => {
                let ServerState::RandomSent(server) = mem::replace(&mut self.state, ServerState::Failed)
                else {
                    unreachable!("state checked by the match above");
                };
                // On error the state stays Failed.
                let verified = server.set_client_random(client_random)?;
                self.state = ServerState::Verified(verified);
                debug!("server session: verified");
                Ok(None)
            }
            (_, msg) => {
                warn!(message = msg.name(), state = current.as_str(), "server session: unexpected message");
                Err(SessionError::UnexpectedMessage {
                    message: msg.name(),
                    state: current.as_str(),
                })
            }
        }
    }

    /// Decode a frame and advance. Returns the encoded reply, if any.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<Option<Bytes>, SessionError> {
        let msg = WireMessage::decode(frame)?;
        Ok(self.handle_message(msg)?.map(|reply| reply.encode()))
    }

    /// The code to display, once the client random has been verified.
    /// Never available after a failed verification.
    pub fn short_authentication_code(&mut self) -> Option<ShortAuthenticationCode> {
        let code = match &self.state {
            ServerState::Verified(verified) => verified.compute_short_authentication_code(),
            ServerState::CodeComputed(code) => return Some(*code),
            _ => return None,
        };
        self.state = ServerState::CodeComputed(code);
        Some(code)
    }
}

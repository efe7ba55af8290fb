//! Device transfer authentication.
//!
//! Two devices that just opened an unauthenticated local channel run a
//! three-message commit/reveal exchange and both display a short code:
//!
//! 1. client -> server: commitment to (client certificate, client random)
//! 2. server -> client: server random
//! 3. client -> server: client random (opens the commitment)
//!
//! The server rejects a commitment that does not open against the client
//! certificate it observed on the wire. Tampering with the server random is
//! NOT detected here: the two codes simply differ, and the user comparing them
//! is the last line of defense. Never auto-confirm a code.

#![forbid(unsafe_code)]

// Role state machines
pub mod client;
pub mod server;
pub mod session;

// Wire framing
pub mod wire;

// Supporting modules
pub mod errors;
pub mod identity;
pub mod config;
pub mod harness;

#[cfg(test)]
mod proptests;

pub use client::{Client, ClientExchanged};
pub use config::{ConfigError, HandshakeConfig};
pub use errors::{
    DeviceTransferAuthenticationError, HandshakeError, IdentityError, SessionError, WireError,
};
pub use identity::{IdentityCertificate, IdentityProvider, PrivateKey, SelfSignedIdentityProvider};
pub use server::{Server, VerifiedServer};
pub use session::{ClientSession, HandshakeState, ServerSession};
pub use wire::WireMessage;

pub use dtx_crypto::{Commitment, RandomNonce, ShortAuthenticationCode};

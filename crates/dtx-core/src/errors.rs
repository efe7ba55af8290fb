//! Error types for the device transfer handshake.
//!
//! Protocol misuse (calling an operation before its prerequisite) is not
//! represented here: the role types make it unrepresentable.

use thiserror::Error;

/// The revealed client random does not open the commitment against the
/// client certificate this side observed. The transfer must be aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceTransferAuthenticationError {
    #[error("commitment mismatch")]
    CommitmentMismatch,
}

/// Identity material errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),
}

/// Wire frame decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    #[error("unknown message kind: {0}")]
    UnknownKind(u8),

    #[error("invalid length for {kind}: expected {expected}, got {got}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Errors surfaced by the event-driven session wrappers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unexpected {message} in state {state}")]
    UnexpectedMessage {
        message: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Authentication(#[from] DeviceTransferAuthenticationError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Errors from a complete in-process handshake run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Authentication(#[from] DeviceTransferAuthenticationError),
}

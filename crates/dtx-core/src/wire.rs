//! Framing for the three handshake messages.
//!
//! frame = version (u8) || kind (u8) || payload
//!
//! Every payload has a fixed length, so a frame either decodes exactly or is
//! rejected. The transport carrying frames is out of scope here.

use bytes::{BufMut, Bytes, BytesMut};

use dtx_crypto::{Commitment, RandomNonce, COMMITMENT_LEN, NONCE_LEN};

use crate::errors::WireError;

/// Protocol version carried in every frame.
pub const PROTOCOL_VERSION: u8 = 1;

const HEADER_LEN: usize = 2;

/// Message kind byte values.
pub mod kinds {
    pub const COMMITMENT: u8 = 1;
    pub const SERVER_RANDOM: u8 = 2;
    pub const CLIENT_RANDOM: u8 = 3;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMessage {
    /// Message 1, client -> server.
    Commitment(Commitment),
    /// Message 2, server -> client.
    ServerRandom(RandomNonce),
    /// Message 3, client -> server.
    ClientRandom(RandomNonce),
}

impl WireMessage {
    pub fn name(&self) -> &'static str {
        match self {
            WireMessage::Commitment(_) => "commitment",
            WireMessage::ServerRandom(_) => "server random",
            WireMessage::ClientRandom(_) => "client random",
        }
    }

    pub fn encode(&self) -> Bytes {
        let (kind, payload): (u8, &[u8]) = match self {
            WireMessage::Commitment(c) => (kinds::COMMITMENT, &c.as_bytes()[..]),
            WireMessage::ServerRandom(r) => (kinds::SERVER_RANDOM, &r.as_bytes()[..]),
            WireMessage::ClientRandom(r) => (kinds::CLIENT_RANDOM, &r.as_bytes()[..]),
        };

        let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u8(kind);
        buf.extend_from_slice(payload);
        buf.freeze()
    }

    pub fn decode(frame: &[u8]) -> Result<Self, WireError> {
        if frame.len() < HEADER_LEN {
            return Err(WireError::InvalidLength {
                kind: "frame header",
                expected: HEADER_LEN,
                got: frame.len(),
            });
        }

        let (header, payload) = frame.split_at(HEADER_LEN);
        if header[0] != PROTOCOL_VERSION {
            return Err(WireError::UnsupportedVersion(header[0]));
        }

        match header[1] {
            kinds::COMMITMENT => {
                let bytes = fixed::<COMMITMENT_LEN>("commitment", payload)?;
                Ok(WireMessage::Commitment(Commitment::from_bytes(bytes)))
            }
            kinds::SERVER_RANDOM => {
                let bytes = fixed::<NONCE_LEN>("server random", payload)?;
                Ok(WireMessage::ServerRandom(RandomNonce::from_bytes(bytes)))
            }
            kinds::CLIENT_RANDOM => {
                let bytes = fixed::<NONCE_LEN>("client random", payload)?;
                Ok(WireMessage::ClientRandom(RandomNonce::from_bytes(bytes)))
            }
            other => Err(WireError::UnknownKind(other)),
        }
    }
}

fn fixed<const N: usize>(kind: &'static str, payload: &[u8]) -> Result<[u8; N], WireError> {
    payload.try_into().map_err(|_| WireError::InvalidLength {
        kind,
        expected: N,
        got: payload.len(),
    })
}

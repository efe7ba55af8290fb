#![forbid(unsafe_code)]

//! Leaf primitives for the device transfer handshake.
//!
//! Everything here is pure and synchronous. Role state machines live in
//! `dtx-core`.

pub mod hash;
pub mod transcript;
pub mod utils;

pub mod nonce;
pub mod commitment;
pub mod sas;

#[cfg(test)]
mod proptests;

pub use commitment::{Commitment, COMMITMENT_LEN};
pub use nonce::{RandomNonce, NONCE_LEN};
pub use sas::ShortAuthenticationCode;

use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(data);
    h.finalize().into()
}

/// Certificate fingerprint used in logs: fp = sha256(der_bytes).
pub fn fingerprint(der: &[u8]) -> [u8; 32] {
    sha256(der)
}

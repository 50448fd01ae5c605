//! The self-describing on-disk/on-wire envelope (spec.md §3).

use super::kdf::KdfParams;
use serde::{Deserialize, Serialize};

/// The current wire/format generation this build writes. Decryption of an
/// envelope whose `version` exceeds this is rejected with
/// `CoreError::UnsupportedVersion` (the forward-compat boundary).
pub const CURRENT_ENVELOPE_VERSION: u32 = 1;

/// The unit persisted to `manifest.enc` and transmitted to the remote
/// store. All binary fields are lowercase hex, per spec.md §6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded 128-bit nonce (only the first 96 bits are the actual
    /// AES-GCM nonce; the full width is retained for algorithmic agility).
    pub iv: String,
    /// Hex-encoded 256-bit salt.
    pub salt: String,
    /// Hex-encoded 128-bit authentication tag.
    pub auth_tag: String,
    /// Hex-encoded ciphertext.
    pub content: String,
}

impl Envelope {
    /// Serialize to the canonical on-disk/on-wire byte sequence.
    pub fn to_bytes(&self) -> Vec<u8> {
        // `serde_json` produces stable key ordering for a fixed struct
        // shape across calls on the same build, which is all the
        // Manifest Store needs ("a consistent on-disk byte sequence").
        serde_json::to_vec(self).expect("Envelope serialises infallibly")
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

//! The encryption/KDF envelope (SPEC_FULL.md §4.1).
//!
//! Grounded on the teacher's `commands::backup::{encrypt_content,
//! decrypt_content}` — same Argon2id → AES-256-GCM pipeline, same
//! intentionally-vague authentication-failure message — generalized into a
//! self-describing [`Envelope`] whose KDF parameters, salt and nonce are
//! first-class fields rather than folded inside the ciphertext.

mod envelope;
mod kdf;

pub use envelope::{Envelope, CURRENT_ENVELOPE_VERSION};
pub use kdf::{KdfParams, DEFAULT_KDF_PARAMS};

use crate::error::{CoreError, CoreResult};
use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

/// Derive a 32-byte AES-256 key from `password` using Argon2id, a salt, and
/// explicit parameters. Blocking — callers on an async runtime should run
/// this inside `tokio::task::spawn_blocking` (SPEC_FULL.md §2a, §5).
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> CoreResult<[u8; 32]> {
    kdf::derive(password, salt, params)
}

/// Encrypt `plaintext` under a key derived from `password`, generating a
/// fresh random salt and nonce. Returns a fully self-describing envelope.
pub fn encrypt(plaintext: &[u8], password: &str) -> CoreResult<Envelope> {
    encrypt_with_params(plaintext, password, DEFAULT_KDF_PARAMS)
}

/// Same as [`encrypt`] but with explicit KDF parameters — used by tests and
/// by algorithmic-agility upgrades that want to pin non-default params.
pub fn encrypt_with_params(
    plaintext: &[u8],
    password: &str,
    params: KdfParams,
) -> CoreResult<Envelope> {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt, &params)?;

    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);
    // AES-GCM uses a 96-bit (12-byte) nonce; spec.md's "128-bit iv" is the
    // field's storage width, the low 12 bytes are the actual GCM nonce.
    let nonce = Nonce::from_slice(&iv[..12]);

    let cipher = Aes256Gcm::new((&key).into());
    let mut out = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CoreError::AuthenticationFailed)?;

    // `aes-gcm` appends the 16-byte tag to the ciphertext; split it back out
    // so the envelope's `auth_tag` field is explicit per spec.md §3.
    let tag_start = out.len() - 16;
    let auth_tag = out.split_off(tag_start);

    Ok(Envelope {
        version: CURRENT_ENVELOPE_VERSION,
        kdf: "argon2id".to_string(),
        kdf_params: params,
        iv: hex::encode(iv),
        salt: hex::encode(salt),
        auth_tag: hex::encode(auth_tag),
        content: hex::encode(out),
    })
}

/// Decrypt `envelope` with a key re-derived from `password` and the
/// envelope's own stored parameters.
pub fn decrypt(envelope: &Envelope, password: &str) -> CoreResult<Vec<u8>> {
    if envelope.version > CURRENT_ENVELOPE_VERSION {
        return Err(CoreError::UnsupportedVersion {
            found: envelope.version,
            supported: CURRENT_ENVELOPE_VERSION,
        });
    }

    let salt = hex::decode(&envelope.salt).map_err(|_| CoreError::AuthenticationFailed)?;
    let iv = hex::decode(&envelope.iv).map_err(|_| CoreError::AuthenticationFailed)?;
    let tag = hex::decode(&envelope.auth_tag).map_err(|_| CoreError::AuthenticationFailed)?;
    let ciphertext = hex::decode(&envelope.content).map_err(|_| CoreError::AuthenticationFailed)?;

    let key = derive_key(password, &salt, &envelope.kdf_params)?;

    let mut combined = Vec::with_capacity(ciphertext.len() + tag.len());
    combined.extend_from_slice(&ciphertext);
    combined.extend_from_slice(&tag);

    let nonce_bytes = if iv.len() >= 12 { &iv[..12] } else { &iv[..] };
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new((&key).into());
    cipher
        .decrypt(nonce, combined.as_ref())
        .map_err(|_| CoreError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let env = encrypt(b"hello secrets", "correct horse battery staple").unwrap();
        let out = decrypt(&env, "correct horse battery staple").unwrap();
        assert_eq!(out, b"hello secrets");
    }

    #[test]
    fn wrong_password_fails_authentication() {
        let env = encrypt(b"payload", "right-password").unwrap();
        let err = decrypt(&env, "wrong-password").unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed));
    }

    #[test]
    fn fresh_iv_and_salt_every_encryption() {
        let a = encrypt(b"same plaintext", "same password").unwrap();
        let b = encrypt(b"same plaintext", "same password").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.content, b.content);
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let env = encrypt(b"json me", "pw").unwrap();
        let json = serde_json::to_string(&env).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.salt, env.salt);
        assert_eq!(back.iv, env.iv);
        assert_eq!(back.auth_tag, env.auth_tag);
        assert_eq!(back.content, env.content);
        let out = decrypt(&back, "pw").unwrap();
        assert_eq!(out, b"json me");
    }

    #[test]
    fn future_version_is_rejected() {
        let mut env = encrypt(b"x", "pw").unwrap();
        env.version = CURRENT_ENVELOPE_VERSION + 1;
        let err = decrypt(&env, "pw").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedVersion { .. }));
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let mut env = encrypt(b"tamper me", "pw").unwrap();
        let mut raw = hex::decode(&env.content).unwrap();
        let idx = raw.len() - 1;
        raw[idx] ^= 0xFF;
        env.content = hex::encode(raw);
        assert!(decrypt(&env, "pw").is_err());
    }
}

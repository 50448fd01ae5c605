//! Key Store (SPEC_FULL.md §4.2): generate, persist, and fingerprint the
//! per-project 128-bit key.
//!
//! Grounded on the teacher's `utils::fs::{has_secure_permissions,
//! set_secure_permissions}` for the `0600`/`0700` file-mode discipline,
//! generalized to atomic replace-and-rename writes per spec.md §5
//! ("Shared-resource policy") and shared with `store.rs` via
//! `utils::fs::atomic_write`. `Key` derives `zeroize`'s `Zeroize` /
//! `ZeroizeOnDrop` so key bytes don't linger in memory past their scope.

use crate::error::{CoreError, CoreResult};
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 128-bit project key, hex-encoded when persisted. Zeroized on drop so a
/// stack/heap copy doesn't outlive the scope that needed it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key(pub [u8; 16]);

impl Key {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Key(bytes)
    }

    pub fn from_hex(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        if s.len() != 32 {
            return Err(CoreError::InvalidName {
                kind: "key",
                name: "wrong length".to_string(),
            });
        }
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidName {
            kind: "key",
            name: s.to_string(),
        })?;
        let arr: [u8; 16] = bytes.try_into().map_err(|_| CoreError::InvalidName {
            kind: "key",
            name: "wrong length".to_string(),
        })?;
        Ok(Key(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Use the key's hex representation as the Argon2id-unrelated password
    /// material fed into manifest encryption — the project key *is* the
    /// encryption password for `manifest.enc` (spec.md never introduces a
    /// second passphrase for day-to-day reads/writes; the passphrase-keyed
    /// envelope is reserved for the recovery blob, §4.3.7).
    pub fn as_password(&self) -> String {
        self.to_hex()
    }

    /// Leading 64 bits of SHA-256(key), hex-encoded — safe to display and
    /// transmit.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }
}

/// Persists and retrieves the project key beneath a project-local config
/// directory (spec.md §6: `key` file, mode `0600`, inside a `0700` dir).
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: project_dir.into(),
        }
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join("key")
    }

    pub fn exists(&self) -> bool {
        self.key_path().exists()
    }

    /// Generate a fresh key and persist it, creating the `0700` directory
    /// if necessary. Used by `init`.
    pub fn create(&self) -> CoreResult<Key> {
        let key = Key::generate();
        self.persist(&key)?;
        Ok(key)
    }

    /// Read the current key. `CoreError::NotInitialised` if absent.
    pub fn get(&self) -> CoreResult<Key> {
        let path = self.key_path();
        let content = fs::read_to_string(&path).map_err(|_| CoreError::NotInitialised)?;
        Key::from_hex(&content)
    }

    /// Explicit reveal — identical to `get` but named separately so call
    /// sites document intent (spec.md §4.2 `show()`).
    pub fn show(&self) -> CoreResult<String> {
        self.get().map(|k| k.to_hex())
    }

    pub fn fingerprint(&self) -> CoreResult<String> {
        self.get().map(|k| k.fingerprint())
    }

    /// Atomically replace the key file with `key`, reusing
    /// `utils::fs::atomic_write` so the temp-file-then-rename discipline and
    /// its race-free `0600` creation mode live in one place rather than
    /// duplicated per call site.
    pub fn persist(&self, key: &Key) -> CoreResult<()> {
        crate::utils::fs::ensure_dir_0700(&self.dir).map_err(|_| CoreError::NotInitialised)?;
        let path = self.key_path();
        crate::utils::fs::atomic_write(&path, format!("{}\n", key.to_hex()).as_bytes(), 0o600)
            .map_err(|_| CoreError::NotInitialised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = KeyStore::new(dir.path().join(".vaultenv"));
        let key = store.create().unwrap();
        let reread = store.get().unwrap();
        assert_eq!(key.to_hex(), reread.to_hex());
    }

    #[test]
    fn missing_key_is_not_initialised() {
        let dir = tempdir().unwrap();
        let store = KeyStore::new(dir.path().join(".vaultenv"));
        assert!(matches!(store.get(), Err(CoreError::NotInitialised)));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let key = Key::from_hex(&"ab".repeat(16)).unwrap();
        assert_eq!(key.fingerprint(), key.fingerprint());
        assert_eq!(key.fingerprint().len(), 16); // 64 bits hex = 16 chars
    }

    #[cfg(unix)]
    #[test]
    fn key_file_has_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let store = KeyStore::new(dir.path().join(".vaultenv"));
        store.create().unwrap();
        let meta = fs::metadata(store.key_path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}

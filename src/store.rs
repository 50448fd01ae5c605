//! Manifest Store (SPEC_FULL.md §2 "Manifest Store"): load/save the
//! ciphertext manifest on disk as a consistent byte sequence.
//!
//! Grounded on the teacher's `commands::backup` read/write pair, generalized
//! to operate on [`crate::manifest::Manifest`] instead of a raw backup blob,
//! and on `utils::fs::{has_secure_permissions, set_secure_permissions}` for
//! the file-mode discipline — `manifest.enc` is mode `0644` per spec.md §6
//! (readable by others, since it is ciphertext; only `key` is `0600`).

use crate::crypto::{self, Envelope};
use crate::error::{CoreError, CoreResult};
use crate::manifest::Manifest;
use crate::utils::fs::atomic_write;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and decrypt the manifest under `password`. `NotInitialised` if
    /// the file is absent.
    pub fn load(&self, password: &str) -> CoreResult<Manifest> {
        let bytes = fs::read(&self.path).map_err(|_| CoreError::NotInitialised)?;
        let envelope = Envelope::from_bytes(&bytes).map_err(|_| CoreError::AuthenticationFailed)?;
        let plaintext = crypto::decrypt(&envelope, password)?;
        serde_json::from_slice(&plaintext).map_err(|_| CoreError::AuthenticationFailed)
    }

    /// Read the raw envelope bytes without decrypting, for rotation backup
    /// and drift/sync transport.
    pub fn read_envelope(&self) -> CoreResult<Envelope> {
        let bytes = fs::read(&self.path).map_err(|_| CoreError::NotInitialised)?;
        Envelope::from_bytes(&bytes).map_err(|_| CoreError::AuthenticationFailed)
    }

    /// Encrypt `manifest` under `password` and write it atomically, mode
    /// `0644`.
    pub fn save(&self, manifest: &Manifest, password: &str) -> CoreResult<()> {
        let plaintext =
            serde_json::to_vec(manifest).map_err(|_| CoreError::AuthenticationFailed)?;
        let envelope = crypto::encrypt(&plaintext, password)?;
        self.write_envelope(&envelope)
    }

    pub fn write_envelope(&self, envelope: &Envelope) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|_| CoreError::NotInitialised)?;
        }
        atomic_write(&self.path, &envelope.to_bytes(), 0o644)
            .map_err(|_| CoreError::NotInitialised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join(".vaultenv/manifest.enc"));
        let manifest = Manifest::empty();
        store.save(&manifest, "password").unwrap();
        let back = store.load("password").unwrap();
        assert_eq!(back.version, manifest.version);
    }

    #[test]
    fn missing_file_is_not_initialised() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join(".vaultenv/manifest.enc"));
        assert!(matches!(store.load("pw"), Err(CoreError::NotInitialised)));
    }

    #[test]
    fn on_disk_bytes_are_consistent_json() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join(".vaultenv/manifest.enc"));
        store.save(&Manifest::empty(), "pw").unwrap();
        let envelope = store.read_envelope().unwrap();
        assert_eq!(envelope.kdf, "argon2id");
    }
}

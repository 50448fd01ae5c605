//! Sync Arbiter (spec.md §4.4): deterministic version-based reconciliation
//! on load, best-effort cloud push on save. Never merges.

use super::remote::{decode_remote_manifest, CloudLink, RemoteClient};
use crate::crypto;
use crate::error::{CoreError, CoreResult};
use crate::keystore::Key;
use crate::manifest::Manifest;
use crate::store::ManifestStore;
use colored::Colorize;

/// Outcome of a load, distinguishing which side won so callers (and tests)
/// can assert on it without re-deriving it from version numbers.
pub enum LoadWinner {
    Local,
    Cloud,
    Empty,
}

pub struct LoadResult {
    pub manifest: Manifest,
    pub winner: LoadWinner,
}

pub struct SyncArbiter<'a> {
    store: &'a ManifestStore,
    key: &'a Key,
    link: Option<&'a CloudLink>,
}

impl<'a> SyncArbiter<'a> {
    pub fn new(store: &'a ManifestStore, key: &'a Key, link: Option<&'a CloudLink>) -> Self {
        Self { store, key, link }
    }

    /// Step 1-3 of spec.md §4.4. A genuinely missing local file, or any
    /// remote read/decrypt/transport failure, degrades that side to `None`
    /// rather than propagating — the arbiter always returns *some*
    /// manifest when the local side is readable. A local file that exists
    /// but fails to decrypt (wrong key, corruption) is a real error and
    /// propagates, since silently substituting cloud or empty data for an
    /// undecryptable local manifest would look like data loss.
    pub async fn load(&self) -> CoreResult<LoadResult> {
        let local = match self.store.load(&self.key.as_password()) {
            Ok(manifest) => Some(manifest),
            Err(CoreError::NotInitialised) => None,
            Err(e) => return Err(e),
        };

        let cloud = match self.link {
            Some(link) => self.fetch_cloud(link).await,
            None => None,
        };

        Ok(match (local, cloud) {
            (Some(local), Some(cloud)) => {
                let local_v = local.version_ordinal().unwrap_or(0);
                let cloud_v = cloud.version_ordinal().unwrap_or(0);
                if local_v > cloud_v {
                    LoadResult {
                        manifest: local,
                        winner: LoadWinner::Local,
                    }
                } else {
                    // Ties resolve to cloud.
                    LoadResult {
                        manifest: cloud,
                        winner: LoadWinner::Cloud,
                    }
                }
            }
            (Some(local), None) => LoadResult {
                manifest: local,
                winner: LoadWinner::Local,
            },
            (None, Some(cloud)) => LoadResult {
                manifest: cloud,
                winner: LoadWinner::Cloud,
            },
            (None, None) => LoadResult {
                manifest: Manifest::empty(),
                winner: LoadWinner::Empty,
            },
        })
    }

    /// Fetch and decrypt the remote manifest. Network/transport failures
    /// and parse errors degrade to `None` (best-effort, per spec.md §4.4).
    /// A key-fingerprint mismatch is different: it means this project
    /// directory and the linked cloud project disagree about which key is
    /// in force, so it's surfaced as a loud warning rather than swallowed —
    /// treating the cloud side as merely "unreachable" here would hide a
    /// misconfiguration that local-wins-on-tie-break would otherwise mask
    /// forever.
    async fn fetch_cloud(&self, link: &CloudLink) -> Option<Manifest> {
        let client = RemoteClient::new(link);
        // Best-effort heartbeat; ignore its own failure, it only gates
        // nothing further here (the arbiter does not special-case a
        // server-reported heartbeat failure beyond treating fetch failure
        // the same way).
        let _ = client.pulse(&link.project_id).await;

        let remote = client.fetch_manifest(&link.project_id).await.ok()?;

        match decode_remote_manifest(&remote, self.key) {
            Ok(manifest) => Some(manifest),
            Err(CoreError::KeyMismatch) => {
                eprintln!("{} {}", "⚠".yellow().bold(), CoreError::KeyMismatch.to_string().red());
                None
            }
            Err(_) => None,
        }
    }

    /// Step 1-2 of the save procedure: write local, then best-effort
    /// upload. Transport failures are swallowed — the local write already
    /// succeeded and is authoritative.
    pub async fn save(&self, manifest: &Manifest) {
        // The disk write always happens first and is the caller's
        // responsibility via `ManifestStore::save`/`ManifestEngine::save`;
        // the arbiter's `save` here is purely the best-effort cloud half.
        if let Some(link) = self.link {
            let client = RemoteClient::new(link);
            let plaintext = match serde_json::to_vec(manifest) {
                Ok(bytes) => bytes,
                Err(_) => return,
            };
            let envelope = match crypto::encrypt(&plaintext, &self.key.as_password()) {
                Ok(e) => e,
                Err(_) => return,
            };
            let encrypted_data = hex::encode(envelope.to_bytes());
            let _ = client
                .upload_manifest(&link.project_id, &encrypted_data, &self.key.fingerprint())
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn unlinked_project_loads_local_only() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.enc"));
        let key = Key::generate();
        let mut manifest = Manifest::empty();
        manifest.bump_version().unwrap();
        store.save(&manifest, &key.as_password()).unwrap();

        let arbiter = SyncArbiter::new(&store, &key, None);
        let result = arbiter.load().await.unwrap();
        assert!(matches!(result.winner, LoadWinner::Local));
        assert_eq!(result.manifest.version, "1");
    }

    #[tokio::test]
    async fn no_local_no_cloud_yields_empty_manifest() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.enc"));
        let key = Key::generate();
        let arbiter = SyncArbiter::new(&store, &key, None);
        let result = arbiter.load().await.unwrap();
        assert!(matches!(result.winner, LoadWinner::Empty));
    }

    #[tokio::test]
    async fn corrupt_local_file_propagates_instead_of_degrading() {
        let dir = tempdir().unwrap();
        let store = ManifestStore::new(dir.path().join("manifest.enc"));
        let key = Key::generate();
        let wrong_key = Key::generate();
        let mut manifest = Manifest::empty();
        manifest.bump_version().unwrap();
        store.save(&manifest, &wrong_key.as_password()).unwrap();

        let arbiter = SyncArbiter::new(&store, &key, None);
        let err = arbiter.load().await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed));
    }
}

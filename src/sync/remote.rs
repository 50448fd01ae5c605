//! Remote transport (SPEC_FULL.md §4.4 "added"): a thin async client for
//! the opaque cloud vault API the Sync Arbiter calls.
//!
//! Grounded on the teacher's `commands::migrate::{fetch_github_public_key,
//! upload_github_secret}` — same `reqwest::Client` + bearer-header +
//! typed-`serde`-payload shape — generalized from the teacher's
//! synchronous GitHub Actions client to the async `reqwest` client spec.md
//! §2a calls for, and pointed at the project vault's own API instead of
//! `api.github.com`.

use crate::crypto::{self, Envelope};
use crate::device;
use crate::error::{CoreError, CoreResult};
use crate::keystore::Key;
use crate::manifest::Manifest;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `cloud.json` (SPEC_FULL.md §6): which remote project this directory is
/// linked to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudLink {
    pub project_id: String,
    pub api_url: String,
    pub linked_at: String,
}

impl CloudLink {
    /// Read `cloud.json` beneath `paths`, if present and parseable. Unlike
    /// [`crate::commands::cloud::load_link`] this never errors — an absent
    /// or malformed link simply means the engine treats the project as
    /// unlinked for this load/save cycle.
    pub fn read(paths: &crate::paths::ProjectPaths) -> Option<Self> {
        let content = std::fs::read_to_string(paths.cloud_file()).ok()?;
        serde_json::from_str(&content).ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoteManifestEnvelope {
    pub encrypted_data: String,
    pub version: u64,
    pub updated_at: String,
    pub updated_by: String,
    pub key_fingerprint: String,
}

/// Decrypt a fetched manifest, refusing to proceed if the remote's key
/// fingerprint doesn't match `key` (spec.md §7's key-mismatch error kind) —
/// a cloud project linked under a different project key decrypts to
/// garbage, not a usable manifest, so this is checked before the expensive
/// KDF/AES-GCM pass.
pub fn decode_remote_manifest(remote: &RemoteManifestEnvelope, key: &Key) -> CoreResult<Manifest> {
    if remote.key_fingerprint != key.fingerprint() {
        return Err(CoreError::KeyMismatch);
    }
    let bytes = hex::decode(&remote.encrypted_data).map_err(|_| CoreError::AuthenticationFailed)?;
    let envelope = Envelope::from_bytes(&bytes).map_err(|_| CoreError::AuthenticationFailed)?;
    let plaintext = crypto::decrypt(&envelope, &key.as_password())?;
    serde_json::from_slice(&plaintext).map_err(|_| CoreError::AuthenticationFailed)
}

#[derive(Debug, Deserialize)]
struct FetchManifestResponse {
    manifest: RemoteManifestEnvelope,
}

#[derive(Debug, Serialize)]
struct UploadManifestRequest<'a> {
    project_id: &'a str,
    encrypted_data: &'a str,
    key_fingerprint: &'a str,
}

#[derive(Debug, Deserialize)]
struct PulseResponse {
    #[allow(dead_code)]
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub version: u64,
    pub updated_at: String,
    pub updated_by: String,
    pub key_fingerprint: String,
}

#[derive(Debug, Serialize)]
struct RollbackRequest {
    version: u64,
}

/// `VAULTENV_TOKEN` short-circuits interactively-stored credentials for
/// unattended use. `VAULTENV_SERVICE_TOKEN` is accepted as a synonym, per
/// the teacher's pattern of also honouring a CI-style token env var.
fn access_token() -> Option<String> {
    std::env::var("VAULTENV_TOKEN")
        .ok()
        .or_else(|| std::env::var("VAULTENV_SERVICE_TOKEN").ok())
}

pub struct RemoteClient {
    http: reqwest::Client,
    api_url: String,
}

impl RemoteClient {
    pub fn new(link: &CloudLink) -> Self {
        let api_url = std::env::var("VAULTENV_API_URL").unwrap_or_else(|_| link.api_url.clone());
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_url,
        }
    }

    fn bearer(&self) -> CoreResult<String> {
        access_token().ok_or_else(|| CoreError::NetworkUnreachable("no access token available".to_string()))
    }

    fn metadata_header(&self) -> String {
        let meta = device::metadata(&chrono::Utc::now().to_rfc3339());
        serde_json::to_string(&meta).unwrap_or_default()
    }

    pub async fn fetch_manifest(&self, project_id: &str) -> CoreResult<RemoteManifestEnvelope> {
        let token = self.bearer()?;
        let url = format!("{}/projects/{}/manifest", self.api_url, project_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("X-Vaultenv-Metadata", self.metadata_header())
            .send()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::NetworkUnreachable(format!(
                "fetchManifest: {}",
                response.status()
            )));
        }

        response
            .json::<FetchManifestResponse>()
            .await
            .map(|r| r.manifest)
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))
    }

    pub async fn upload_manifest(
        &self,
        project_id: &str,
        encrypted_data: &str,
        key_fingerprint: &str,
    ) -> CoreResult<RemoteManifestEnvelope> {
        let token = self.bearer()?;
        let url = format!("{}/projects/{}/manifest", self.api_url, project_id);
        let payload = UploadManifestRequest {
            project_id,
            encrypted_data,
            key_fingerprint,
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .header("X-Vaultenv-Metadata", self.metadata_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::NetworkUnreachable(format!(
                "uploadManifest: {}",
                response.status()
            )));
        }

        response
            .json::<FetchManifestResponse>()
            .await
            .map(|r| r.manifest)
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))
    }

    /// Best-effort heartbeat. Short, server-controlled timeout per
    /// spec.md §5; network errors are the caller's signal to treat the
    /// cloud side as absent, never fatal.
    pub async fn pulse(&self, project_id: &str) -> CoreResult<()> {
        let token = self.bearer()?;
        let url = format!("{}/projects/{}/pulse", self.api_url, project_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::NetworkUnreachable(format!("pulse: {}", response.status())));
        }
        response
            .json::<PulseResponse>()
            .await
            .map(|_| ())
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))
    }

    pub async fn fetch_history(&self, project_id: &str) -> CoreResult<Vec<HistoryEntry>> {
        let token = self.bearer()?;
        let url = format!("{}/projects/{}/history", self.api_url, project_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("X-Vaultenv-Metadata", self.metadata_header())
            .send()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))?;

        response
            .json::<Vec<HistoryEntry>>()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))
    }

    pub async fn rollback(&self, project_id: &str, version: u64) -> CoreResult<()> {
        let token = self.bearer()?;
        let url = format!("{}/projects/{}/rollback", self.api_url, project_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("X-Vaultenv-Metadata", self.metadata_header())
            .json(&RollbackRequest { version })
            .send()
            .await
            .map_err(|e| CoreError::NetworkUnreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CoreError::NetworkUnreachable(format!("rollback: {}", response.status())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_link_round_trips_through_json() {
        let link = CloudLink {
            project_id: "proj_123".to_string(),
            api_url: "https://vault.example.com".to_string(),
            linked_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&link).unwrap();
        let back: CloudLink = serde_json::from_str(&json).unwrap();
        assert_eq!(back.project_id, link.project_id);
    }

    fn envelope_for(key: &Key, manifest: &Manifest) -> RemoteManifestEnvelope {
        let plaintext = serde_json::to_vec(manifest).unwrap();
        let envelope = crypto::encrypt(&plaintext, &key.as_password()).unwrap();
        RemoteManifestEnvelope {
            encrypted_data: hex::encode(envelope.to_bytes()),
            version: 1,
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            updated_by: "tester".to_string(),
            key_fingerprint: key.fingerprint(),
        }
    }

    #[test]
    fn decode_remote_manifest_succeeds_with_matching_key() {
        let key = Key::generate();
        let mut manifest = Manifest::empty();
        manifest.bump_version().unwrap();
        let remote = envelope_for(&key, &manifest);

        let decoded = decode_remote_manifest(&remote, &key).unwrap();
        assert_eq!(decoded.version, manifest.version);
    }

    #[test]
    fn decode_remote_manifest_rejects_mismatched_key_fingerprint() {
        let key = Key::generate();
        let other_key = Key::generate();
        let manifest = Manifest::empty();
        let remote = envelope_for(&key, &manifest);

        let err = decode_remote_manifest(&remote, &other_key).unwrap_err();
        assert!(matches!(err, CoreError::KeyMismatch));
    }

    #[tokio::test]
    async fn missing_token_fails_fast_without_a_network_call() {
        std::env::remove_var("VAULTENV_TOKEN");
        std::env::remove_var("VAULTENV_SERVICE_TOKEN");
        let link = CloudLink {
            project_id: "p".to_string(),
            api_url: "https://example.invalid".to_string(),
            linked_at: "now".to_string(),
        };
        let client = RemoteClient::new(&link);
        let err = client.fetch_manifest("p").await.unwrap_err();
        assert!(matches!(err, CoreError::NetworkUnreachable(_)));
    }
}

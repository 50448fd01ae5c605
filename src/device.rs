//! Device Identity (SPEC_FULL.md §4.7): a persistent, non-identifying
//! device UUID plus an audit metadata envelope attached to authenticated
//! remote calls.
//!
//! Grounded on the `uuid` crate usage pattern from the pack's async example
//! repos (`uuid = { version = "1", features = ["v4", "serde"] }`), combined
//! with the teacher's `utils::fs` secure-permission helpers for the
//! `0600`/`0700` persistence the key store also uses. Hostname/OS-release
//! lookups follow `oneepicnight-Vision-Node`'s and `bedecarroll-unet`'s use
//! of the `hostname`/`sysinfo` crates rather than a stdlib-only stub.

use crate::paths::GlobalPaths;
use crate::utils::fs::{atomic_write, ensure_dir_0700};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::OnceLock;
use uuid::Uuid;

static DEVICE_ID_CACHE: OnceLock<Uuid> = OnceLock::new();

/// The audit envelope attached to every authenticated remote call as the
/// `X-Vaultenv-Metadata` header (SPEC_FULL.md §4.4). No PII.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub device_id: String,
    pub hostname: String,
    pub os: String,
    pub arch: String,
    pub os_release: String,
    pub runtime_version: String,
    pub cli_version: String,
    pub timestamp: String,
}

/// Return the cached device id for this process, generating and persisting
/// one on first use. A malformed or missing file triggers regeneration.
pub fn device_id() -> Uuid {
    if let Some(id) = DEVICE_ID_CACHE.get() {
        return *id;
    }
    let id = load_or_generate();
    *DEVICE_ID_CACHE.get_or_init(|| id)
}

fn load_or_generate() -> Uuid {
    let Some(paths) = GlobalPaths::new() else {
        return Uuid::new_v4();
    };
    let path = paths.device_id_file();

    if let Ok(content) = fs::read_to_string(&path) {
        if let Ok(id) = Uuid::parse_str(content.trim()) {
            return id;
        }
    }

    let id = Uuid::new_v4();
    if ensure_dir_0700(paths.dir()).is_ok() {
        let _ = atomic_write(&path, format!("{id}\n").as_bytes(), 0o600);
    }
    id
}

/// Build a fresh audit envelope for the current process, stamped with
/// `timestamp` (callers supply it — this module never calls a clock
/// directly so it stays deterministic under test).
pub fn metadata(timestamp: &str) -> DeviceMetadata {
    DeviceMetadata {
        device_id: device_id().to_string(),
        hostname: hostname(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        os_release: os_release(),
        runtime_version: option_env!("CARGO_PKG_RUST_VERSION")
            .unwrap_or("unknown")
            .to_string(),
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown-host".to_string())
}

fn os_release() -> String {
    sysinfo::System::long_os_version().unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_stable_within_process() {
        assert_eq!(device_id(), device_id());
    }

    #[test]
    fn metadata_contains_no_obvious_pii() {
        let meta = metadata("2026-01-01T00:00:00Z");
        assert!(!meta.hostname.contains('@'));
        assert_eq!(meta.timestamp, "2026-01-01T00:00:00Z");
    }
}

//! On-disk layout (SPEC_FULL.md §6): project-local `.vaultenv/` and the
//! user-global `~/.vaultenv/` state directory.

use std::path::PathBuf;

/// Project-local config root, rooted at `project_dir` (normally the current
/// working directory, but dependency-injectable per spec.md §9's "no
/// reliance on the process's current directory" guidance).
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: project_dir.into().join(".vaultenv"),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.root
    }

    pub fn key_file(&self) -> PathBuf {
        self.root.join("key")
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.root.join("manifest.enc")
    }

    pub fn cloud_file(&self) -> PathBuf {
        self.root.join("cloud.json")
    }

    pub fn sync_file(&self) -> PathBuf {
        self.root.join("sync.yaml")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    /// The local-override flat `.env` overlay (spec.md §4.3.2). Not part of
    /// the manifest; never written back.
    pub fn local_overrides_file(&self) -> PathBuf {
        self.root.join("local.env")
    }
}

/// User-global state beneath the user's home directory, mode `0700`.
pub struct GlobalPaths {
    root: PathBuf,
}

impl GlobalPaths {
    pub fn new() -> Option<Self> {
        dirs::home_dir().map(|home| Self {
            root: home.join(".vaultenv"),
        })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.root
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join("credentials.json")
    }

    pub fn device_id_file(&self) -> PathBuf {
        self.root.join("device-id")
    }
}

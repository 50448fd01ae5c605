//! Shared helper for commands that need the project's cloud link
//! (`cloud.json`, spec.md §6).

use crate::paths::ProjectPaths;
use crate::sync::CloudLink;
use anyhow::{anyhow, Result};
use std::path::Path;

pub fn load_link(project_dir: &Path) -> Result<CloudLink> {
    let paths = ProjectPaths::new(project_dir);
    CloudLink::read(&paths).ok_or_else(|| {
        anyhow!(
            "project is not cloud-linked (no {} found)",
            paths.cloud_file().display()
        )
    })
}

//! Drift command — show local/cloud differences (spec.md §4.3.5).
//!
//! Generalizes the teacher's `commands::diff::output_pretty` presentation
//! style to the engine's [`crate::manifest::DriftReport`].

use crate::commands::cloud::load_link;
use crate::keystore::KeyStore;
use crate::manifest::ManifestEngine;
use crate::paths::ProjectPaths;
use crate::sync::{decode_remote_manifest, RemoteClient};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub async fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running drift in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let link = load_link(Path::new(&path))?;
    let paths = ProjectPaths::new(&path);
    let keystore = KeyStore::new(paths.dir().clone());
    let key = keystore.get()?;

    let client = RemoteClient::new(&link);
    let remote = client
        .fetch_manifest(&link.project_id)
        .await
        .context("Failed to fetch cloud manifest")?;
    let cloud = decode_remote_manifest(&remote, &key).context("Failed to decode cloud manifest")?;

    let report = engine.drift(&cloud);

    if report.local_only.is_empty() && report.cloud_only.is_empty() && report.modified.is_empty() {
        println!("{} No drift — local and cloud agree", "✓".green());
        return Ok(());
    }

    if !report.local_only.is_empty() {
        println!("{}", "Local only:".bold());
        for entry in &report.local_only {
            println!("  {} {}", "+".green(), entry.display_name);
        }
    }
    if !report.cloud_only.is_empty() {
        println!("{}", "Cloud only:".bold());
        for entry in &report.cloud_only {
            println!("  {} {}", "-".red(), entry.display_name);
        }
    }
    if !report.modified.is_empty() {
        println!("{}", "Modified:".bold());
        for entry in &report.modified {
            println!("  {} {}", "~".yellow(), entry.display_name);
        }
    }
    Ok(())
}

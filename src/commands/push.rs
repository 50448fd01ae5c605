//! Push command — upload the local manifest to the linked cloud project.

use crate::commands::cloud::load_link;
use crate::keystore::KeyStore;
use crate::manifest::ManifestEngine;
use crate::sync::RemoteClient;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub async fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running push in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let link = load_link(Path::new(&path))?;
    let keystore = KeyStore::new(crate::paths::ProjectPaths::new(&path).dir().clone());
    let key = keystore.get()?;

    let client = RemoteClient::new(&link);
    let plaintext = serde_json::to_vec(engine.manifest())?;
    let envelope = crate::crypto::encrypt(&plaintext, &key.as_password())?;
    let encrypted_data = hex::encode(envelope.to_bytes());

    client
        .upload_manifest(&link.project_id, &encrypted_data, &key.fingerprint())
        .await
        .context("Failed to upload manifest")?;

    println!("{} Pushed local manifest to cloud", "✓".green());
    Ok(())
}

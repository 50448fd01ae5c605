//! Pull command — overwrite the local manifest with the cloud copy.

use crate::commands::cloud::load_link;
use crate::keystore::KeyStore;
use crate::paths::ProjectPaths;
use crate::store::ManifestStore;
use crate::sync::{decode_remote_manifest, RemoteClient};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub async fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running pull in verbose mode".dimmed());
    }

    let link = load_link(Path::new(&path))?;
    let paths = ProjectPaths::new(&path);
    let keystore = KeyStore::new(paths.dir().clone());
    let key = keystore.get()?;

    let client = RemoteClient::new(&link);
    let remote = client
        .fetch_manifest(&link.project_id)
        .await
        .context("Failed to fetch cloud manifest")?;
    let manifest = decode_remote_manifest(&remote, &key).context("Failed to decode cloud manifest")?;

    let store = ManifestStore::new(paths.manifest_file());
    store.save(&manifest, &key.as_password())?;

    println!("{} Pulled cloud manifest (version {})", "✓".green(), remote.version);
    Ok(())
}

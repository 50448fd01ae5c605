//! Init command — create a new project: generate the key and an empty
//! manifest.

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;

pub fn run(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running init in verbose mode".dimmed());
    }

    ManifestEngine::init(&path).with_context(|| format!("Failed to initialise project at {}", path))?;

    println!("{} Project initialised at {}", "✓".green(), path);
    println!(
        "  {} Key written to {}/.vaultenv/key (mode 0600)",
        "→".cyan(),
        path
    );
    Ok(())
}

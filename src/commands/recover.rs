//! Recover-setup / recover-restore commands — the password-encrypted
//! project-key recovery blob (spec.md §4.3.7).

use crate::manifest::ManifestEngine;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Password;

pub async fn setup(path: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running recover-setup in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let password = Password::new()
        .with_prompt("Recovery passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases did not match")
        .interact()?;

    let blob = engine.recovery_setup(&password)?;
    println!("{} Recovery blob:", "✓".green());
    println!("{}", blob);
    Ok(())
}

pub async fn restore(path: String, blob: String, verbose: bool) -> Result<()> {
    if verbose {
        println!("{}", "Running recover-restore in verbose mode".dimmed());
    }

    let engine = ManifestEngine::open(&path).await.context("Failed to open project")?;
    let password = Password::new().with_prompt("Recovery passphrase").interact()?;

    engine.recovery_restore(&password, &blob)?;
    println!("{} Project key restored from recovery blob", "✓".green());
    Ok(())
}

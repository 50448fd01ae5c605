//! Doctor command — diagnose project setup issues.

use crate::paths::{GlobalPaths, ProjectPaths};
use anyhow::Result;
use colored::*;
use std::path::Path;

pub fn run(path: String, _verbose: bool) -> Result<()> {
    println!(
        "\n{}",
        "┌─ Diagnosing project setup ──────────────────────────┐".cyan()
    );
    println!(
        "{}\n",
        "└──────────────────────────────────────────────────────┘".cyan()
    );

    let mut issues = 0;
    let mut warnings = 0;
    let paths = ProjectPaths::new(&path);

    println!("{}", "Checking project key...".bold());
    let key_file = paths.key_file();
    if key_file.exists() {
        println!("  {} Key file exists at {}", "✓".green(), key_file.display());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&key_file)?.permissions().mode();
            if mode & 0o077 != 0 {
                println!(
                    "  {} Key file has {} permissions (should be 600)",
                    "⚠".yellow(),
                    format!("{:o}", mode & 0o777)
                );
                warnings += 1;
            } else {
                println!("  {} Key file has secure permissions (600)", "✓".green());
            }
        }
    } else {
        println!(
            "  {} No key file found — run `vaultenv init` to create one",
            "✗".red()
        );
        issues += 1;
    }

    println!("\n{}", "Checking manifest...".bold());
    if paths.manifest_file().exists() {
        println!("  {} Manifest exists at {}", "✓".green(), paths.manifest_file().display());
    } else {
        println!("  {} No manifest found", "✗".red());
        issues += 1;
    }

    println!("\n{}", "Checking cloud link...".bold());
    if paths.cloud_file().exists() {
        match crate::sync::CloudLink::read(&paths) {
            Some(link) => println!(
                "  {} Linked to project {} at {}",
                "✓".green(),
                link.project_id,
                link.api_url
            ),
            None => {
                println!("  {} cloud.json is present but malformed", "✗".red());
                issues += 1;
            }
        }
    } else {
        println!(
            "  {} Project is not cloud-linked (push/pull/drift unavailable)",
            "ℹ".cyan()
        );
    }

    println!("\n{}", "Checking policy configuration...".bold());
    if paths.config_file().exists() {
        match crate::policy::Policy::load(&paths.config_file()) {
            Ok(policy) => println!(
                "  {} config.yaml parses — {} protected key(s)",
                "✓".green(),
                policy.protected_keys.len()
            ),
            Err(e) => {
                println!("  {} config.yaml failed to parse: {}", "✗".red(), e);
                issues += 1;
            }
        }
    } else {
        println!("  {} No config.yaml — using default policy", "ℹ".cyan());
    }

    println!("\n{}", "Checking device identity...".bold());
    match GlobalPaths::new() {
        Some(global) if global.device_id_file().exists() => {
            println!("  {} Device id registered", "✓".green());
        }
        Some(_) => {
            println!(
                "  {} No device id yet — one will be generated on first use",
                "ℹ".cyan()
            );
        }
        None => {
            println!("  {} Could not resolve the user home directory", "⚠".yellow());
            warnings += 1;
        }
    }

    if Path::new(&path).join(".gitignore").exists() {
        let gitignore = std::fs::read_to_string(Path::new(&path).join(".gitignore"))?;
        if gitignore.contains(".vaultenv") {
            println!("\n{} .vaultenv/ is in .gitignore", "✓".green());
        } else {
            println!("\n{} .vaultenv/ is NOT in .gitignore (should be)", "✗".red());
            issues += 1;
        }
    }

    println!("\n{}", "Summary:".bold());
    if issues == 0 && warnings == 0 {
        println!("  {} 0 issues found", "✓".green());
        println!("\nOverall health: {} Excellent", "✓".green());
    } else {
        if issues > 0 {
            println!("  {} {} critical issue(s)", "🚨", issues);
        }
        if warnings > 0 {
            println!("  {} {} warning(s)", "⚠", warnings);
        }
        println!("\nOverall health: {} Needs attention", "⚠".yellow());
    }

    Ok(())
}

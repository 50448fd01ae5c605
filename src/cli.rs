//! CLI argument parsing for vaultenv.
//!
//! Uses clap derive macros for type-safe argument handling, exactly as the
//! teacher's `src/cli.rs`. Each variant is a thin transformer from parsed
//! arguments to a Secret Core call (SPEC_FULL.md §9's "plugin-like CLI
//! command registration" note) — not a runtime plugin system, just argument
//! parsing wired at startup.

use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────────────────────
// Cli: Top-level CLI structure
// ─────────────────────────────────────────────────────────────

/// vaultenv — encrypted, versioned environment-variable manifests with
/// synced cloud backup and in-memory process injection.
#[derive(Parser)]
#[command(
    name = "vaultenv",
    about = "Encrypted, versioned environment-variable manifests",
    version,
    author,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    pub path: String,
}

// ─────────────────────────────────────────────────────────────
// Commands: All available subcommands
// ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialise a new project: generate the key and an empty manifest.
    Init,

    /// Set a variable, optionally scoped to a service and/or scope.
    Set {
        key: String,
        value: String,
        #[arg(long, default_value = "_global")]
        service: String,
        #[arg(long)]
        scope: Option<String>,
    },

    /// Read a variable (masked unless `--reveal`).
    Get {
        key: String,
        #[arg(long, default_value = "_global")]
        service: String,
        #[arg(long)]
        scope: Option<String>,
        #[arg(long)]
        reveal: bool,
    },

    /// Remove a variable.
    Rm {
        key: String,
        #[arg(long, default_value = "_global")]
        service: String,
        #[arg(long)]
        scope: Option<String>,
    },

    /// List every resolved variable for a service/scope.
    Ls {
        #[arg(long, default_value = "_global")]
        service: String,
        #[arg(long)]
        scope: Option<String>,
        #[arg(long)]
        reveal: bool,
    },

    /// Rotate the project key, re-encrypting the manifest in place.
    Rotate,

    /// Produce a password-encrypted recovery blob for the project key.
    RecoverSetup,

    /// Install the project key from a recovery blob.
    RecoverRestore { blob: String },

    /// Push the local manifest to the linked cloud project.
    Push,

    /// Pull the cloud manifest, overwriting the local copy.
    Pull,

    /// Show local/cloud drift: what's local-only, cloud-only, or modified.
    Drift,

    /// Show the cloud project's version history.
    History,

    /// Roll the cloud project back to a prior version.
    Rollback { version: u64 },

    /// Run a command with secrets injected into its environment.
    #[command(trailing_var_arg = true)]
    Run {
        command: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
        #[arg(long, default_value = "_global")]
        service: String,
        #[arg(long)]
        scope: Option<String>,
    },

    /// Diagnose common setup issues.
    Doctor,
}

//! Structured error kinds for the Secret Core.
//!
//! Mirrors the shape of the teacher's `core::parser::ParseError`: a
//! `thiserror`-derived enum that converts into `anyhow::Error` automatically
//! at any `?` boundary, so command handlers can keep using
//! `anyhow::Context` without matching on variants unless they need to.

use thiserror::Error;

/// One variant per error kind in the Secret Core's error table.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The project has no key file yet — caller should run `init`.
    #[error("project not initialised — run `vaultenv init` first")]
    NotInitialised,

    /// AES-256-GCM tag verification failed on decrypt.
    #[error("authentication failed — wrong password/key or corrupted ciphertext")]
    AuthenticationFailed,

    /// `envelope.version` is newer than this build understands.
    #[error("unsupported envelope version {found} (this build supports up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A value was rejected by a policy-bound validation regex.
    #[error("value for '{key}' does not match the required pattern '{pattern}'")]
    ValidationFailed { key: String, pattern: String },

    /// `{{NAME}}` referenced a variable absent from the overlaid map.
    #[error("missing reference: {{{{{var}}}}} is not defined")]
    MissingReference { var: String },

    /// A reference chain revisited a key already being resolved.
    #[error("circular reference detected: {chain}")]
    CircularReference { chain: String },

    /// Post-rotation round-trip decryption disagreed with the pre-rotation
    /// plaintext.
    #[error("rotation verification failed — rolled back to the prior key and manifest")]
    VerificationFailed,

    /// Rollback after a rotation failure itself failed.
    #[error(
        "rotation failed and automatic rollback also failed — \
         manual recovery required from backup at {backup_path}"
    )]
    RotationCorrupt { backup_path: String },

    /// The cloud manifest's key fingerprint does not match the local key.
    #[error("cloud key fingerprint mismatch — this project directory may point at the wrong remote project")]
    KeyMismatch,

    /// A remote call failed. Swallowed during an implicit save; surfaced
    /// during explicit sync operations.
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The child process named in `run` could not be spawned at all.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A variable or service name failed the naming grammar.
    #[error("invalid {kind} name: '{name}'")]
    InvalidName { kind: &'static str, name: String },

    /// The on-disk manifest's sync `version` field was not a parseable
    /// non-negative integer (see SPEC_FULL.md §3).
    #[error("manifest version '{raw}' is not a valid numeric ordinal")]
    InvalidVersionOrdinal { raw: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

//! Configuration & Policy (SPEC_FULL.md §4.8): `protected_keys` and
//! per-variable `validation` regexes, consulted by the manifest engine's
//! mutation API.
//!
//! Generalized from the teacher's `core::config::Config` (`serde`-derived,
//! per-field `Default`, `load_from_path`) to `config.yaml` via `serde_yaml`
//! in place of the teacher's `.evnx.toml` — spec.md §6 fixes this file's
//! format as YAML. The teacher's directory-walking search is dropped: this
//! crate only ever reads `config.yaml` from the project's own
//! `.vaultenv/` root (SPEC_FULL.md §4.8).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Policy {
    #[serde(default)]
    pub protected_keys: Vec<String>,

    #[serde(default)]
    pub validation: HashMap<String, String>,
}

impl Policy {
    /// Load `config.yaml` at `path`. A missing file yields the empty,
    /// permissive default policy.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Policy::default());
        }
        let content = fs::read_to_string(path)?;
        let policy: Policy = serde_yaml::from_str(&content)?;
        Ok(policy)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn is_protected(&self, key: &str) -> bool {
        self.protected_keys.iter().any(|k| k == key)
    }

    /// Validate `value` against the regex bound to `key`, if any.
    pub fn validate(&self, key: &str, value: &str) -> crate::error::CoreResult<()> {
        let Some(pattern) = self.validation.get(key) else {
            return Ok(());
        };
        let re = Regex::new(pattern).map_err(|_| crate::error::CoreError::ValidationFailed {
            key: key.to_string(),
            pattern: pattern.clone(),
        })?;
        if re.is_match(value) {
            Ok(())
        } else {
            Err(crate::error::CoreError::ValidationFailed {
                key: key.to_string(),
                pattern: pattern.clone(),
            })
        }
    }
}

//! The manifest data model (spec.md §3): services × scopes × variables.

use crate::error::{CoreError, CoreResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The reserved service name shared across all services.
pub const GLOBAL_SERVICE: &str = "_global";

lazy_static! {
    static ref VAR_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref SERVICE_NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap();
}

pub fn validate_var_name(name: &str) -> CoreResult<()> {
    if VAR_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidName {
            kind: "variable",
            name: name.to_string(),
        })
    }
}

pub fn validate_service_name(name: &str) -> CoreResult<()> {
    if name == GLOBAL_SERVICE || SERVICE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidName {
            kind: "service",
            name: name.to_string(),
        })
    }
}

/// One of the three deployment tiers a manifest can overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Development,
    Staging,
    Production,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Development => "development",
            Scope::Staging => "staging",
            Scope::Production => "production",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "development" => Some(Scope::Development),
            "staging" => Some(Scope::Staging),
            "production" => Some(Scope::Production),
            _ => None,
        }
    }
}

/// map<var-name, value>
pub type VarMap = HashMap<String, String>;
/// map<service-name, map<var-name, value>>
pub type ServiceMap = HashMap<String, VarMap>;

/// The structured map of secrets, serialised into the envelope's plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Monotonic sync ordinal as a decimal-ASCII string (spec.md's Open
    /// Question, resolved in SPEC_FULL.md §3). Compared with
    /// [`Manifest::version_ordinal`], never lexicographically.
    pub version: String,

    #[serde(default)]
    pub services: ServiceMap,

    /// map<scope-name, map<service-name, map<var-name, value>>>
    #[serde(default)]
    pub scopes: HashMap<String, ServiceMap>,
}

impl Manifest {
    /// The schema format tag, distinct from the sync-ordinal `version`
    /// field above.
    pub const FORMAT_TAG: &'static str = "1.0";

    /// A fresh, empty manifest with `_global` present, as `init` produces.
    pub fn empty() -> Self {
        let mut services = ServiceMap::new();
        services.insert(GLOBAL_SERVICE.to_string(), VarMap::new());
        Manifest {
            version: "0".to_string(),
            services,
            scopes: HashMap::new(),
        }
    }

    /// Parse `version` as a numeric ordinal for arbiter comparison.
    /// `CoreError::InvalidVersionOrdinal` if it is not decimal digits.
    pub fn version_ordinal(&self) -> CoreResult<u64> {
        self.version
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidVersionOrdinal {
                raw: self.version.clone(),
            })
    }

    pub fn bump_version(&mut self) -> CoreResult<()> {
        let next = self.version_ordinal()?.saturating_add(1);
        self.version = next.to_string();
        Ok(())
    }

    pub fn service(&self, name: &str) -> Option<&VarMap> {
        self.services.get(name)
    }

    pub fn service_mut(&mut self, name: &str) -> &mut VarMap {
        self.services.entry(name.to_string()).or_default()
    }

    pub fn scope_service(&self, scope: &str, service: &str) -> Option<&VarMap> {
        self.scopes.get(scope).and_then(|s| s.get(service))
    }

    pub fn scope_service_mut(&mut self, scope: &str, service: &str) -> &mut VarMap {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .entry(service.to_string())
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_has_global_service() {
        let m = Manifest::empty();
        assert!(m.service(GLOBAL_SERVICE).is_some());
    }

    #[test]
    fn var_name_grammar() {
        assert!(validate_var_name("API_KEY").is_ok());
        assert!(validate_var_name("_private").is_ok());
        assert!(validate_var_name("1INVALID").is_err());
        assert!(validate_var_name("bad-name").is_err());
    }

    #[test]
    fn service_name_grammar() {
        assert!(validate_service_name("postgresql").is_ok());
        assert!(validate_service_name("my-service_1").is_ok());
        assert!(validate_service_name(GLOBAL_SERVICE).is_ok());
        assert!(validate_service_name("1bad").is_err());
    }

    #[test]
    fn version_ordinal_parses_decimal() {
        let mut m = Manifest::empty();
        assert_eq!(m.version_ordinal().unwrap(), 0);
        m.bump_version().unwrap();
        assert_eq!(m.version_ordinal().unwrap(), 1);
    }

    #[test]
    fn non_numeric_version_is_rejected() {
        let mut m = Manifest::empty();
        m.version = "1.0.3-beta".to_string();
        assert!(matches!(
            m.version_ordinal(),
            Err(CoreError::InvalidVersionOrdinal { .. })
        ));
    }
}

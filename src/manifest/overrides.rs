//! Local-only overrides (spec.md §4.3.2): an optional flat `.env`-style
//! overlay across all services. Never written into the manifest, never
//! uploaded.
//!
//! Grounded on the teacher's `core::parser::Parser`, reused verbatim — this
//! is the one place the Secret Core needs general `.env` parsing.

use crate::core::Parser;
use std::collections::HashMap;
use std::path::Path;

/// Read the local-override file at `path`. A missing file is not an error
/// and yields an empty overlay.
pub fn load(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    Parser::default().parse_file(path).map(|f| f.vars).unwrap_or_default()
}

//! SDK Surface (SPEC_FULL.md §4.6): a process-local, in-memory cache keyed
//! by `(work_dir, service, scope)` for in-process consumers that don't want
//! to shell out to the CLI.
//!
//! Grounded on spec.md §9's guidance that the cache be "a process-local
//! singleton with documented `clearCache`/`clearCacheFor` teardown" and
//! "a way to construct a scope-bounded engine for tests" — the cache itself
//! holds no engine state, only resolved maps, so tests build a fresh
//! [`Sdk`] per case instead of relying on a global.

use crate::error::CoreResult;
use crate::manifest::ManifestEngine;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    work_dir: PathBuf,
    service: String,
    scope: Option<String>,
}

/// Options identifying which project/service/scope a call resolves.
pub struct SecretsOptions {
    pub work_dir: PathBuf,
    pub service: String,
    pub scope: Option<String>,
}

/// Process-local secrets cache. Construct one per process (or per test) —
/// it is not a global singleton by itself, matching spec.md §9's
/// dependency-injection guidance.
#[derive(Default)]
pub struct Sdk {
    cache: Mutex<HashMap<CacheKey, HashMap<String, String>>>,
}

impl Sdk {
    pub fn new() -> Self {
        Self::default()
    }

    async fn resolve(&self, opts: &SecretsOptions) -> CoreResult<HashMap<String, String>> {
        let engine = ManifestEngine::open(&opts.work_dir).await?;
        engine.get_variables(&opts.service, opts.scope.as_deref())
    }

    fn key(opts: &SecretsOptions) -> CacheKey {
        CacheKey {
            work_dir: opts.work_dir.clone(),
            service: opts.service.clone(),
            scope: opts.scope.clone(),
        }
    }

    /// Return a defensive copy of the resolved secrets, populating the
    /// cache on a miss.
    pub async fn get_secrets(&self, opts: &SecretsOptions) -> CoreResult<HashMap<String, String>> {
        let key = Self::key(opts);
        {
            let cache = self.cache.lock().unwrap();
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }
        let resolved = self.resolve(opts).await?;
        self.cache.lock().unwrap().insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Write the resolved secrets into the ambient process environment.
    /// Existing keys are preserved unless `overwrite` is set.
    pub async fn load_secrets(&self, opts: &SecretsOptions, overwrite: bool) -> CoreResult<()> {
        let secrets = self.get_secrets(opts).await?;
        for (key, value) in secrets {
            if overwrite || std::env::var_os(&key).is_none() {
                std::env::set_var(key, value);
            }
        }
        Ok(())
    }

    /// Bind a client to the three coordinates for repeated `get`/`get_all`.
    pub fn create_client<'a>(&'a self, opts: SecretsOptions) -> SdkClient<'a> {
        SdkClient { sdk: self, opts }
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn clear_cache_for(&self, opts: &SecretsOptions) {
        self.cache.lock().unwrap().remove(&Self::key(opts));
    }
}

/// A client bound to one `(work_dir, service, scope)` coordinate.
pub struct SdkClient<'a> {
    sdk: &'a Sdk,
    opts: SecretsOptions,
}

impl SdkClient<'_> {
    pub async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.sdk.get_secrets(&self.opts).await?.get(key).cloned())
    }

    pub async fn get_all(&self) -> CoreResult<HashMap<String, String>> {
        self.sdk.get_secrets(&self.opts).await
    }

    pub async fn has(&self, key: &str) -> CoreResult<bool> {
        Ok(self.sdk.get_secrets(&self.opts).await?.contains_key(key))
    }

    pub async fn reload(&self) -> CoreResult<HashMap<String, String>> {
        self.sdk.clear_cache_for(&self.opts);
        self.sdk.get_secrets(&self.opts).await
    }
}

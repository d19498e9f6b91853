use gloo_storage::{LocalStorage, Storage};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "purr_pals_backend";

/// Where the hosted backend lives and the public key used to read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: option_env!("PURR_PALS_BACKEND_URL").unwrap_or_default().to_owned(),
            anon_key: option_env!("PURR_PALS_BACKEND_KEY").unwrap_or_default().to_owned(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    pub fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim().trim_end_matches('/'), collection)
    }

    /// Fills blank fields of `self` from `fallback`.
    fn or(self, fallback: BackendConfig) -> BackendConfig {
        BackendConfig {
            base_url: non_blank(self.base_url).unwrap_or(fallback.base_url),
            anon_key: non_blank(self.anon_key).unwrap_or(fallback.anon_key),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Resolves the backend to talk to, or `None` when nothing usable is set.
///
/// A value stored under `purr_pals_backend` in local storage overrides the
/// build-time defaults field by field.
pub fn load_backend_config() -> Option<BackendConfig> {
    let defaults = BackendConfig::default();
    let resolved = match LocalStorage::get::<BackendConfig>(STORAGE_KEY) {
        Ok(stored) => stored.or(defaults),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => defaults,
        Err(err) => {
            warn!("Ignoring stored backend config: {}", err);
            defaults
        }
    };
    resolve(resolved)
}

fn resolve(config: BackendConfig) -> Option<BackendConfig> {
    if config.is_configured() {
        Some(config)
    } else {
        debug!("No backend configured");
        None
    }
}

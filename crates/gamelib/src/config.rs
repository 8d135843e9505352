//! Catalog configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! seed_defaults = true
//!
//! [store]
//! kind = "postgres"
//!
//! [database]
//! url = "${DATABASE_URL}"
//! max_size = 8
//! ```
//!
//! `${VAR}` references in `database.url` are expanded from the environment.

use crate::error::{CatalogError, CatalogResult};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `database.url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Which record store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub kind: StoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_size: 16,
        }
    }
}

/// Configuration for a catalog process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    /// Seed the default games into an empty store on startup.
    pub seed_defaults: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            database: DatabaseConfig::default(),
            seed_defaults: true,
        }
    }
}

impl CatalogConfig {
    /// Create a new configuration with defaults (in-memory store, seeding on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a TOML config file.
    ///
    /// Only parsing and `${VAR}` expansion happen here. Call [`validate`](Self::validate)
    /// once overrides (`DATABASE_URL`, command-line flags) have been applied.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            CatalogError::Config(msg) => CatalogError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse a TOML document and expand `${VAR}` in `database.url`.
    pub fn from_toml_str(raw: &str) -> CatalogResult<Self> {
        let mut config: Self = toml::from_str(raw)
            .map_err(|e| CatalogError::Config(format!("failed to parse config: {e}")))?;
        if let Some(url) = config.database.url.as_mut() {
            *url = expand_env_vars(url)?;
        }
        Ok(config)
    }

    /// Let `DATABASE_URL` override `database.url`.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
        self
    }

    /// Select the store kind.
    pub fn store_kind(mut self, kind: StoreKind) -> Self {
        self.store.kind = kind;
        self
    }

    /// Set the database URL.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = Some(url.into());
        self
    }

    /// Set the maximum pool size.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.database.max_size = max_size;
        self
    }

    /// Enable or disable seeding of the default games.
    pub fn seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.database.max_size == 0 {
            return Err(CatalogError::Config(
                "database.max_size must be at least 1".to_string(),
            ));
        }
        if self.store.kind == StoreKind::Postgres
            && self
                .database
                .url
                .as_deref()
                .is_none_or(|u| u.trim().is_empty())
        {
            return Err(CatalogError::Config(format!(
                "store.kind = \"postgres\" needs database.url (or {DATABASE_URL_ENV})"
            )));
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> CatalogResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(len) = after.find('}') else {
            return Err(CatalogError::Config(format!(
                "unterminated env var reference: ${{{after}"
            )));
        };
        let name = &after[..len];
        if name.is_empty() {
            return Err(CatalogError::Config(
                "empty env var reference: ${}".to_string(),
            ));
        }
        let value = std::env::var(name).map_err(|_| {
            CatalogError::Config(format!("env var {name} is not set (referenced in config)"))
        })?;
        out.push_str(&value);
        rest = &after[len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

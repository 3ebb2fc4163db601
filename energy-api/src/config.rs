use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Prefix for the versioned API routes, e.g. `/api/v1`.
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            base_path: "/api/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub uri: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection once the pool is exhausted.
    pub acquire_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub idle_timeout_secs: u64,
    pub apply_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://postgres@localhost:5432/energy".to_string(),
            max_connections: 25,
            min_connections: 5,
            acquire_timeout_secs: 5,
            max_lifetime_secs: 60 * 60,
            idle_timeout_secs: 30 * 60,
            apply_schema: false,
        }
    }
}

impl DatabaseConfig {
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Read `ENERGY_API_CONFIG` (default `energy-api.toml`), then apply
    /// environment overrides. A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        // A .env file is optional.
        let _ = dotenvy::dotenv();

        let path = env::var("ENERGY_API_CONFIG").unwrap_or_else(|_| "energy-api.toml".to_string());
        let mut cfg = if Path::new(&path).exists() {
            let contents = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            Self::from_toml_str(&contents).with_context(|| format!("parsing {path}"))?
        } else {
            tracing::debug!(path = %path, "config file not found, using defaults");
            Self::default()
        };

        cfg.apply_overrides(|key| env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(uri) = non_empty("DB_URI") {
            self.database.uri = uri;
        }
        if let Some(max) = non_empty("DB_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse().context("DB_MAX_CONNECTIONS must be an integer")?;
        }
        if let Some(min) = non_empty("DB_MIN_CONNECTIONS") {
            self.database.min_connections = min.parse().context("DB_MIN_CONNECTIONS must be an integer")?;
        }
        if let Some(port) = non_empty("PORT") {
            let port: u16 = port.parse().context("PORT must be a port number")?;
            self.server.bind_addr = format!("0.0.0.0:{port}");
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        let base = &self.server.base_path;
        if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
            anyhow::bail!("server.base_path must start with '/' and not end with one, got {base:?}");
        }
        Ok(())
    }
}

//! Configuration loading.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Optional `shoplist.toml` (or `.json`/`.yaml`) in the working directory
//! 3. Environment variables with the `SHOPLIST_` prefix
//! 4. The legacy `DB_PATH` variable

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = "/app/data/shopping.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Process settings, loaded once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the working directory and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(
            File::with_name("shoplist").required(false),
            Environment::with_prefix("SHOPLIST"),
            std::env::var("DB_PATH").ok(),
        )
    }

    fn builder<F>(file: F, env: Environment, legacy_db_path: Option<String>) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let legacy_db_path = legacy_db_path.filter(|p| !p.trim().is_empty());

        Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .add_source(file)
            .add_source(env)
            .set_override_option("db_path", legacy_db_path)?
            .build()?
            .try_deserialize()
    }
}

//! # Configuration
//!
//! Where the ledger lives and how amounts are shown.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--data-dir`, `--backend`)
//! 2. Environment variables (`TALLY_*`)
//! 3. Config file (`tally.toml` in the data directory)
//! 4. Defaults (this file)
//!
//! ## Example `tally.toml`
//! ```toml
//! backend = "file"
//! storage_key = "sales-storage"
//! currency_prefix = "Rp"
//! ```
//!
//! Configuration is read once at startup and never changes afterwards.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tally_core::money::CURRENCY_PREFIX;
use tally_core::Money;
use tally_store::{
    DocumentStorage, FileStorage, MemoryStorage, SqliteConfig, SqliteStorage, DEFAULT_STORAGE_KEY,
};
use tracing::{debug, info};

use crate::error::CliError;

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// Name of the SQLite database file inside the data directory.
pub const DATABASE_FILE_NAME: &str = "tally.db";

pub const ENV_DATA_DIR: &str = "TALLY_DATA_DIR";
pub const ENV_BACKEND: &str = "TALLY_BACKEND";
pub const ENV_STORAGE_KEY: &str = "TALLY_STORAGE_KEY";

// =============================================================================
// Backend
// =============================================================================

/// Which durable storage holds the sales document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `tally.db` in the data directory
    #[default]
    Sqlite,

    /// `<key>.json` in the data directory
    File,

    /// Nothing survives the process (dry runs)
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "file" => Ok(Backend::File),
            "memory" => Ok(Backend::Memory),
            other => Err(format!(
                "unknown backend '{other}' (expected sqlite, file, or memory)"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Sqlite => "sqlite",
            Backend::File => "file",
            Backend::Memory => "memory",
        })
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<Backend>,
}

/// Contents of `tally.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend: Option<Backend>,
    pub storage_key: Option<String>,
    pub currency_prefix: Option<String>,
}

impl FileConfig {
    /// Reads `tally.toml` from `dir`. A missing file is an empty config.
    pub fn load(dir: &Path) -> Result<Self, CliError> {
        let path = dir.join(CONFIG_FILE_NAME);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FileConfig::default())
            }
            Err(err) => {
                return Err(CliError::config(format!(
                    "Could not read {}: {err}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), "Read config file");

        toml::from_str(&text)
            .map_err(|e| CliError::config(format!("Invalid {}: {e}", path.display())))
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the database, document files, and `tally.toml`
    pub data_dir: PathBuf,

    /// Storage backend
    pub backend: Backend,

    /// Key the sales document is stored under
    pub storage_key: String,

    /// Shown before every amount, e.g. "Rp 1.000"
    pub currency_prefix: String,
}

impl AppConfig {
    /// Resolves configuration from flags, the process environment, the
    /// config file, and defaults.
    pub fn resolve(overrides: &Overrides) -> Result<Self, CliError> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::resolve`] with an explicit environment lookup.
    pub fn resolve_with<F>(overrides: &Overrides, env: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match overrides.data_dir.clone() {
            Some(dir) => dir,
            None => match env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
                Some(dir) => PathBuf::from(dir),
                None => default_data_dir()?,
            },
        };

        let file = FileConfig::load(&data_dir)?;

        let backend = match overrides.backend {
            Some(backend) => backend,
            None => match env(ENV_BACKEND) {
                Some(value) => value
                    .parse()
                    .map_err(|e| CliError::config(format!("{ENV_BACKEND}: {e}")))?,
                None => file.backend.unwrap_or_default(),
            },
        };

        let storage_key = env(ENV_STORAGE_KEY)
            .or(file.storage_key)
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        let currency_prefix = file
            .currency_prefix
            .unwrap_or_else(|| CURRENCY_PREFIX.to_string());

        Ok(AppConfig {
            data_dir,
            backend,
            storage_key,
            currency_prefix,
        })
    }

    /// Formats an amount for display, e.g. "Rp 1.234.567".
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", self.currency_prefix, amount.grouped())
    }

    /// Opens the configured storage backend.
    ///
    /// ## Backend Locations
    /// ```text
    /// sqlite  → <data_dir>/tally.db
    /// file    → <data_dir>/<storage_key>.json
    /// memory  → nowhere
    /// ```
    pub async fn open_storage(&self) -> Result<Arc<dyn DocumentStorage>, CliError> {
        info!(backend = %self.backend, data_dir = %self.data_dir.display(), "Opening storage");

        let storage: Arc<dyn DocumentStorage> = match self.backend {
            Backend::Sqlite => {
                tokio::fs::create_dir_all(&self.data_dir).await?;
                let config = SqliteConfig::new(self.data_dir.join(DATABASE_FILE_NAME));
                Arc::new(SqliteStorage::new(config).await?)
            }
            Backend::File => Arc::new(FileStorage::new(&self.data_dir)),
            Backend::Memory => Arc::new(MemoryStorage::new()),
        };

        Ok(storage)
    }
}

/// Platform data directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.tally.ledger`
/// - **Windows**: `%APPDATA%\tally\ledger\data`
/// - **Linux**: `~/.local/share/ledger`
fn default_data_dir() -> Result<PathBuf, CliError> {
    ProjectDirs::from("com", "tally", "ledger")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            CliError::config(format!(
                "Could not determine app data directory; set {ENV_DATA_DIR} or pass --data-dir"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn in_dir(dir: &Path) -> Overrides {
        Overrides {
            data_dir: Some(dir.to_path_buf()),
            backend: None,
        }
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("sqlite".parse::<Backend>(), Ok(Backend::Sqlite));
        assert_eq!("FILE".parse::<Backend>(), Ok(Backend::File));
        assert_eq!(" memory ".parse::<Backend>(), Ok(Backend::Memory));
        assert!("postgres".parse::<Backend>().is_err());
        assert_eq!(Backend::File.to_string(), "file");
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve_with(&in_dir(dir.path()), env_of(&[])).unwrap();

        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.storage_key, "sales-storage");
        assert_eq!(config.currency_prefix, "Rp");
    }

    #[test]
    fn test_env_data_dir_used_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();

        let config =
            AppConfig::resolve_with(&Overrides::default(), env_of(&[(ENV_DATA_DIR, dir_str)]))
                .unwrap();
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn test_priority_flag_env_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "backend = \"file\"\nstorage_key = \"from-file\"\ncurrency_prefix = \"IDR\"\n",
        )
        .unwrap();

        // File only
        let config = AppConfig::resolve_with(&in_dir(dir.path()), env_of(&[])).unwrap();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.storage_key, "from-file");
        assert_eq!(config.currency_prefix, "IDR");

        // Env beats file
        let env = env_of(&[(ENV_BACKEND, "memory"), (ENV_STORAGE_KEY, "from-env")]);
        let config = AppConfig::resolve_with(&in_dir(dir.path()), env).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.storage_key, "from-env");

        // Flag beats env
        let overrides = Overrides {
            backend: Some(Backend::Sqlite),
            ..in_dir(dir.path())
        };
        let config =
            AppConfig::resolve_with(&overrides, env_of(&[(ENV_BACKEND, "memory")])).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
    }

    #[test]
    fn test_bad_sources_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let err = AppConfig::resolve_with(&in_dir(dir.path()), env_of(&[(ENV_BACKEND, "redis")]))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "colour = \"blue\"\n").unwrap();
        let err = AppConfig::resolve_with(&in_dir(dir.path()), env_of(&[])).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_format_money_uses_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::resolve_with(&in_dir(dir.path()), env_of(&[])).unwrap();

        assert_eq!(config.format_money(Money::from_units(1_234_567)), "Rp 1.234.567");
        assert_eq!(config.format_money(Money::from_units(-50)), "Rp -50");

        config.currency_prefix = "IDR".to_string();
        assert_eq!(config.format_money(Money::from_units(1000)), "IDR 1.000");
    }

    #[tokio::test]
    async fn test_open_each_backend() {
        let dir = tempfile::tempdir().unwrap();

        for backend in [Backend::Sqlite, Backend::File, Backend::Memory] {
            let overrides = Overrides {
                backend: Some(backend),
                ..in_dir(dir.path())
            };
            let config = AppConfig::resolve_with(&overrides, env_of(&[])).unwrap();
            let storage = config.open_storage().await.unwrap();

            assert_eq!(storage.name(), backend.to_string());
            storage.write("sales-storage", "{\"sales\":[]}").await.unwrap();
        }

        assert!(dir.path().join(DATABASE_FILE_NAME).exists());
        assert!(dir.path().join("sales-storage.json").exists());
    }
}

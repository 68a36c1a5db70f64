//! Runtime configuration: environment variables first, then `config.json`,
//! then defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

pub const DATA_DIR_ENV: &str = "CHOREUST_DATA_DIR";
pub const ALLOWED_EMAIL_ENV: &str = "CHOREUST_ALLOWED_EMAIL";
pub const LOG_FILE_ENV: &str = "CHOREUST_LOG_FILE";
/// `tracing_subscriber::EnvFilter` directives.
pub const LOG_ENV: &str = "CHOREUST_LOG";

const CONFIG_FILE: &str = "config.json";

/// Optional `config.json` in the data directory.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    allowed_email: Option<String>,
    log_file: Option<PathBuf>,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding tasks, users and the session file.
    pub data_dir: PathBuf,
    /// The single email allowed to sign in. `None` locks everyone out.
    pub allowed_email: Option<String>,
    /// Log destination for the TUI.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from the environment, falling back to
    /// `config.json` in the data directory.
    ///
    /// The data directory is determined in the following order:
    /// 1. `CHOREUST_DATA_DIR` environment variable.
    /// 2. `~/.local/share/choreust` (on Linux).
    /// 3. `./choreust` (fallback).
    pub fn load() -> Result<Config> {
        let data_dir = std::env::var(DATA_DIR_ENV).map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("choreust");
            p
        });
        let mut config = Config::load_from(data_dir)?;
        if let Ok(email) = std::env::var(ALLOWED_EMAIL_ENV) {
            config.allowed_email = Some(email);
        }
        if let Ok(path) = std::env::var(LOG_FILE_ENV) {
            config.log_file = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    /// Configuration rooted at `data_dir`, reading its `config.json` if present.
    pub fn load_from(data_dir: impl Into<PathBuf>) -> Result<Config> {
        let data_dir = data_dir.into();
        let path = data_dir.join(CONFIG_FILE);
        let file = if path.exists() {
            debug!(path = %path.display(), "reading config file");
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            FileConfig::default()
        };
        Ok(Config {
            data_dir,
            allowed_email: file.allowed_email,
            log_file: file.log_file,
        })
    }

    pub fn with_allowed_email(mut self, email: impl Into<String>) -> Self {
        self.allowed_email = Some(email.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Where the TUI writes its log when no file is configured.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("choreust.log"))
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}

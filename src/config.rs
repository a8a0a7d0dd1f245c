//! Application configuration.
//!
//! Values come from, highest priority first:
//! 1. Process environment variables
//! 2. A `.env` file in the app data directory (production users can drop one there)
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "docgen.db";
pub const DEFAULT_DRAFTS_KEY: &str = "documentDrafts";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Person who signs every generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signatory {
    pub name: String,
    pub title: String,
}

impl Default for Signatory {
    fn default() -> Self {
        Self {
            name: "Biplob Chakraborty".to_string(),
            title: "Founder & CEO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// SQLite file name, relative to `data_dir`.
    pub db_file: String,
    /// Key of the single blob holding every saved draft.
    pub drafts_key: String,
    pub signatory: Signatory,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl AppConfig {
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            db_file: DEFAULT_DB_FILE.to_string(),
            drafts_key: DEFAULT_DRAFTS_KEY.to_string(),
            signatory: Signatory::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Load configuration for the given app data directory (or the platform default),
    /// reading `<data dir>/.env` first if it exists.
    pub fn load(app_data_dir: Option<&Path>) -> Self {
        let data_dir = app_data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("DOCGEN_DATA_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let env_path = data_dir.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        }
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Build a configuration from `lookup` without touching the process environment.
    pub fn from_lookup<F>(default_data_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Signatory::default();
        Self {
            data_dir: non_empty("DOCGEN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(default_data_dir),
            db_file: non_empty("DOCGEN_DB_FILE").unwrap_or_else(|| DEFAULT_DB_FILE.to_string()),
            drafts_key: non_empty("DOCGEN_DRAFTS_KEY")
                .unwrap_or_else(|| DEFAULT_DRAFTS_KEY.to_string()),
            signatory: Signatory {
                name: non_empty("DOCGEN_SIGNATORY_NAME").unwrap_or(defaults.name),
                title: non_empty("DOCGEN_SIGNATORY_TITLE").unwrap_or(defaults.title),
            },
            log_filter: non_empty("DOCGEN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("docgen"))
        .unwrap_or_else(|| PathBuf::from("."))
}

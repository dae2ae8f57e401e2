//! Runtime configuration from the environment.
//!
//! `.env` is loaded by the binary before [`Config::from_env`] runs, so values
//! may come from either place.

use std::path::PathBuf;

pub const DB_ENV: &str = "CRICSHEET_DB";
pub const DATA_DIR_ENV: &str = "CRICSHEET_DATA_DIR";
pub const LOG_FILE_ENV: &str = "LOG_FILE_PATH";

pub const DEFAULT_DB_PATH: &str = "cricket.db";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "logs/cricsheet_etl.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Root folder holding one sub-folder of match documents per format.
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values are treated
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            db_path: get(DB_ENV, DEFAULT_DB_PATH),
            data_dir: get(DATA_DIR_ENV, DEFAULT_DATA_DIR),
            log_file_path: get(LOG_FILE_ENV, DEFAULT_LOG_FILE),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self
    }
}

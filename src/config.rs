//! Where the library lives and how chatty the logs are.
//!
//! Everything has a default, so a missing `config.toml` is the normal case. A
//! present but malformed file stops startup instead of being silently ignored.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".lyric-binder";
/// Optional settings file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// SQLite file holding the library.
const DB_FILE_NAME: &str = "library.sqlite";
/// Log file used while the terminal UI owns stderr.
const LOG_FILE_NAME: &str = "lyric-binder.log";
const DEFAULT_EXPORT_DIR: &str = "exports";
const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    export_dir: Option<PathBuf>,
    log_level: Option<String>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Where exports are written. Relative paths in the file resolve against
    /// `data_dir`.
    pub export_dir: PathBuf,
    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub log_level: String,
}

impl Config {
    /// Load settings from `data_dir`, or from `~/.lyric-binder` when no
    /// override is given.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Self::from_data_dir(data_dir)
    }

    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let file = read_config_file(&data_dir.join(CONFIG_FILE_NAME))?;

        let export_dir = match file.export_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => data_dir.join(dir),
            None => data_dir.join(DEFAULT_EXPORT_DIR),
        };

        Ok(Self {
            export_dir,
            log_level: file
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            data_dir,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Resolve `~/.lyric-binder`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

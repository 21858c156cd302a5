//! Runtime settings layered from an optional TOML file and `AGENDA_*`
//! environment variables. Command-line flags are applied on top by the binary.

use crate::error::Result;
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "agenda.toml";
pub const ENV_PREFIX: &str = "AGENDA";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Directory holding one JSON file per stored key.
    pub data_dir: PathBuf,
    /// RocksDB path, only honoured with the `storage-rocksdb` feature.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Overrides the clock's notion of today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl Settings {
    /// Loads settings from `path` (required when given, `agenda.toml` is
    /// optional otherwise) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };
        let settings = Config::builder()
            .set_default("data_dir", "agenda-data")?
            .set_default("log_level", "warn")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::{LoadError, SaveError};

/// Persistence collaborator that fetches and stores the settings object.
pub trait ConfigStore {
    /// Fetch the persisted settings.
    fn load(&self) -> Result<Config, LoadError>;

    /// Persist `config`. Returning `Ok` acknowledges the save.
    fn save(&self, config: &Config) -> Result<(), SaveError>;
}

/// Settings persisted as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Return the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Config, LoadError> {
        load_config_from_path(&self.path)
    }

    fn save(&self, config: &Config) -> Result<(), SaveError> {
        save_config_to_path(&self.path, config)
    }
}

/// Default location of the settings file.
pub fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("eventlist")
            .join("config.json");
    }

    std::env::temp_dir().join("eventlist").join("config.json")
}

fn load_config_from_path(path: &Path) -> Result<Config, LoadError> {
    let data = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no config at {}, starting empty", path.display());
            return Ok(Config::new());
        },
        Err(err) => return Err(err.into()),
    };

    let parsed = serde_json::from_str::<serde_json::Value>(&data)?;
    Config::from_value(parsed)
}

fn save_config_to_path(path: &Path, config: &Config) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let payload = serde_json::to_string_pretty(config)?;
    write_atomic(path, payload.as_bytes())?;
    log::debug!("config written to {}", path.display());

    Ok(())
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), std::io::Error> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

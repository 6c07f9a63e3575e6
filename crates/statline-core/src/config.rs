use std::fs;
use std::path::{Path, PathBuf};

use statline_types::{ConfigError, SyncConfig};

const CONFIG_FILE: &str = "statline.json";
const DATA_DIR_ENV: &str = "STATLINE_DATA_DIR";

/// `STATLINE_DATA_DIR`, or `<platform data dir>/statline`. Created if missing.
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var(DATA_DIR_ENV) {
        Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
        _ => dirs::data_dir()
            .ok_or_else(|| ConfigError::DataDirUnavailable {
                message: format!("no platform data directory; set {DATA_DIR_ENV}"),
            })?
            .join("statline"),
    };
    fs::create_dir_all(&dir).map_err(|e| io_error(&dir, &e))?;
    Ok(dir)
}

fn io_error(path: &Path, err: &std::io::Error) -> ConfigError {
    ConfigError::Io { path: path.display().to_string(), message: err.to_string() }
}

pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load `statline.json` from `dir`. A missing file yields defaults.
pub fn load_config_from(dir: &Path) -> Result<SyncConfig, ConfigError> {
    let path = config_path_in(dir);
    if !path.exists() {
        return Ok(SyncConfig::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| io_error(&path, &e))?;
    let config: SyncConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse { message: e.to_string() })?;
    config.validate()?;
    Ok(config)
}

pub fn save_config_to(dir: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
    config.validate()?;
    fs::create_dir_all(dir).map_err(|e| io_error(dir, &e))?;
    let config_path = config_path_in(dir);
    let temp_path = dir.join(format!("{CONFIG_FILE}.tmp"));

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Parse { message: e.to_string() })?;

    // Atomic write
    fs::write(&temp_path, content).map_err(|e| io_error(&temp_path, &e))?;
    fs::rename(&temp_path, &config_path).map_err(|e| io_error(&config_path, &e))
}

pub fn load_config() -> Result<SyncConfig, ConfigError> {
    load_config_from(&get_data_dir()?)
}

pub fn save_config(config: &SyncConfig) -> Result<(), ConfigError> {
    save_config_to(&get_data_dir()?, config)
}

/// Update specific fields in the config.
pub fn update_config<F>(updater: F) -> Result<SyncConfig, ConfigError>
where
    F: FnOnce(&mut SyncConfig),
{
    let dir = get_data_dir()?;
    let mut config = load_config_from(&dir)?;
    updater(&mut config);
    save_config_to(&dir, &config)?;
    Ok(config)
}

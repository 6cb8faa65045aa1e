use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "MANABITORE_DATA_DIR";

#[derive(Serialize, Deserialize, Default)]
struct Config {
    data_dir: Option<PathBuf>,
}

fn config_file_path() -> Result<PathBuf, AppError> {
    let config_dir = dirs::config_dir().ok_or(AppError::IoError(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Config directory not found",
    )))?;
    let app_config_dir = config_dir.join("manabitore");
    fs::create_dir_all(&app_config_dir)?;
    Ok(app_config_dir.join("config.toml"))
}

/// Where the progress record lives. The environment variable wins, then
/// the config file, then the default under the user config dir.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let dir = dir.trim();
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Ok(Some(dir)) = stored_data_dir() {
        return dir;
    }

    default_data_dir()
}

pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("manabitore")
}

fn stored_data_dir() -> Result<Option<PathBuf>, AppError> {
    let config_path = match config_file_path() {
        Ok(path) => path,
        Err(_) => return Ok(None),
    };

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|_| AppError::IoError(std::io::Error::other("Failed to parse config")))?;

    Ok(config.data_dir)
}

/// Persist a data-dir override into the config file.
pub fn save_data_dir(data_dir: &std::path::Path) -> Result<(), AppError> {
    let config_path = config_file_path()?;
    let config = Config {
        data_dir: Some(data_dir.to_path_buf()),
    };
    let toml_string = toml::to_string(&config)
        .map_err(|_| AppError::IoError(std::io::Error::other("Failed to serialize config")))?;

    fs::write(&config_path, toml_string)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/manabitore")),
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("data_dir = \"/tmp/manabitore\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = "data_dir = \"/var/lib/manabitore\"";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/manabitore")));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_env_var_takes_priority() {
        let original_env = std::env::var(DATA_DIR_ENV).ok();

        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/manabitore-env");
        }
        assert_eq!(resolve_data_dir(), PathBuf::from("/tmp/manabitore-env"));

        unsafe {
            if let Some(val) = original_env {
                std::env::set_var(DATA_DIR_ENV, val);
            } else {
                std::env::remove_var(DATA_DIR_ENV);
            }
        }
    }
}

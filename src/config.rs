use crate::errors::{JobchatError, JobchatResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search_url: String,
    pub chat_url: String,
    pub api_key: String,
    pub model: String,
    pub typing_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: "http://localhost:8000/api/search".to_string(),
            chat_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            typing_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config() -> JobchatResult<()> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path)
            .map_err(|e| JobchatError::config_error(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&config_str)
            .map_err(|e| JobchatError::config_error(format!("Failed to parse config: {}", e)))?
    } else {
        let config = Config::default();

        fs::create_dir_all(config_path.parent().unwrap())
            .map_err(|e| JobchatError::config_error(format!("Failed to create config directory: {}", e)))?;

        let config_str = serde_json::to_string_pretty(&config)
            .map_err(|e| JobchatError::config_error(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, config_str)
            .map_err(|e| JobchatError::config_error(format!("Failed to write config file: {}", e)))?;

        config
    };

    // Environment variables win over the file
    apply_env_overrides(&mut config);
    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;
    Ok(())
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = env::var("JOBCHAT_SEARCH_URL") {
        config.search_url = url;
    }
    if let Ok(url) = env::var("JOBCHAT_CHAT_URL") {
        config.chat_url = url;
    }
    if let Ok(key) = env::var("JOBCHAT_API_KEY") {
        config.api_key = key;
    }
}

fn get_config_path() -> JobchatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| JobchatError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("jobchat").join("config.json"))
}

fn validate_config(config: &Config) -> JobchatResult<()> {
    if config.search_url.is_empty() {
        return Err(JobchatError::config_error("search_url is required"));
    }

    if config.typing_timeout_secs == 0 {
        return Err(JobchatError::config_error("typing_timeout_secs must be greater than 0"));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

pub fn update_config(updated_config: Config) -> JobchatResult<()> {
    validate_config(&updated_config)?;

    let config_path = get_config_path()?;
    let config_str = serde_json::to_string_pretty(&updated_config)
        .map_err(|e| JobchatError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(&config_path, config_str)
        .map_err(|e| JobchatError::config_error(format!("Failed to write config file: {}", e)))?;

    *CONFIG.write().unwrap() = updated_config;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.search_url = "http://jobs.internal/api/search".to_string();
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.search_url, "http://jobs.internal/api/search");
        assert_eq!(loaded.typing_timeout_secs, 10);
    }

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_empty_search_url() {
        let mut config = Config::default();
        config.search_url = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let mut config = Config::default();
        config.typing_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_round_limits() {
        let config = Config::default();
        assert_eq!(config.typing_timeout_secs, 10);
    }
}

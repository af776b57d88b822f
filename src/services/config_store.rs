// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the inference endpoint; optional because public
    /// endpoints accept anonymous (rate-limited) requests.
    pub api_key: Option<String>,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_audio_model")]
    pub audio_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            image_model: default_image_model(),
            audio_model: default_audio_model(),
            text_model: default_text_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    crate::services::inference::DEFAULT_INFERENCE_URL.to_string()
}
fn default_image_model() -> String {
    crate::services::inference::DEFAULT_IMAGE_MODEL.to_string()
}
fn default_audio_model() -> String {
    crate::services::inference::DEFAULT_AUDIO_MODEL.to_string()
}
fn default_text_model() -> String {
    crate::services::inference::DEFAULT_TEXT_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    80
}

impl AppConfig {
    /// Apply environment overrides on top of whatever was loaded from disk.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("SYNTHSCAN_INFERENCE_URL") {
            if !url.trim().is_empty() {
                self.inference.base_url = url;
            }
        }
        if let Ok(key) = env::var("SYNTHSCAN_API_KEY") {
            if !key.trim().is_empty() {
                self.inference.api_key = Some(key);
            }
        }
        if let Ok(model) = env::var("SYNTHSCAN_IMAGE_MODEL") {
            if !model.trim().is_empty() {
                self.inference.image_model = model;
            }
        }
        if let Ok(model) = env::var("SYNTHSCAN_AUDIO_MODEL") {
            if !model.trim().is_empty() {
                self.inference.audio_model = model;
            }
        }
        if let Ok(model) = env::var("SYNTHSCAN_TEXT_MODEL") {
            if !model.trim().is_empty() {
                self.inference.text_model = model;
            }
        }
        self
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("synthscan"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)?;

        Ok(())
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &PathBuf, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Sort by modification time (oldest first)
        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        // Remove oldest entries
        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Get the inference API key from the config file
    pub fn get_api_key(&self) -> Result<Option<String>, String> {
        let config = self.load()?;
        Ok(config.inference.api_key)
    }

    /// Store the inference API key in the config file
    pub fn set_api_key(&self, key: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config.inference.api_key = Some(key.to_string());
        self.save(&config)
    }

    /// Delete the inference API key from the config file
    pub fn delete_api_key(&self) -> Result<(), String> {
        let mut config = self.load()?;
        config.inference.api_key = None;
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.inference.base_url.starts_with("https://"));
        assert!(config.inference.api_key.is_none());
        assert_eq!(config.inference.timeout_secs, 80);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            version: "1.0.0".to_string(),
            inference: InferenceConfig::default(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.version, "1.0.0");
        assert_eq!(parsed.inference.image_model, config.inference.image_model);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"version": "1", "inference": {"apiKey": "hf_x"}}"#).unwrap();
        assert_eq!(parsed.inference.api_key.as_deref(), Some("hf_x"));
        assert!(!parsed.inference.text_model.is_empty());
    }

    #[test]
    fn test_api_key_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        assert_eq!(store.get_api_key().unwrap(), None);

        store.set_api_key("hf_secret").unwrap();
        assert_eq!(store.get_api_key().unwrap().as_deref(), Some("hf_secret"));

        store.delete_api_key().unwrap();
        assert_eq!(store.get_api_key().unwrap(), None);
    }
}

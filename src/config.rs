use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::settings::Settings;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_autocorrect")]
    pub autocorrect: bool,
    #[serde(default = "default_ignore_punctuation")]
    pub ignore_punctuation: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_autocorrect() -> bool {
    false
}
fn default_ignore_punctuation() -> bool {
    false
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autocorrect: default_autocorrect(),
            ignore_punctuation: default_ignore_punctuation(),
            theme: default_theme(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("retype")
            .join("config.toml")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            autocorrect: self.autocorrect,
            ignore_punctuation: self.ignore_punctuation,
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.autocorrect = settings.autocorrect;
        self.ignore_punctuation = settings.ignore_punctuation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.autocorrect);
        assert!(!config.ignore_punctuation);
        assert_eq!(config.theme, "default");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let toml_str = r#"
autocorrect = true
word_count = 40
[extra]
whatever = "x"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.autocorrect);
        assert!(!config.ignore_punctuation);
    }

    #[test]
    fn test_settings_projection() {
        let mut config = Config::default();
        config.ignore_punctuation = true;
        assert_eq!(
            config.settings(),
            Settings {
                autocorrect: false,
                ignore_punctuation: true
            }
        );
        config.apply_settings(Settings {
            autocorrect: true,
            ignore_punctuation: false,
        });
        assert!(config.autocorrect);
        assert!(!config.ignore_punctuation);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.autocorrect = true;
        config.theme = "paper".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.autocorrect);
        assert_eq!(loaded.theme, "paper");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(!loaded.autocorrect);
    }
}

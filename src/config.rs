use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TodoError};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Path of the todo.txt file, `~` allowed
    #[serde(default = "default_file")]
    pub file: String,
    /// "dark" (default), "light", or the name of a theme in ~/.config/todo/themes
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Prefix today's date to tasks added from the CLI
    #[serde(default)]
    pub date_on_add: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            theme: default_theme(),
            date_on_add: false,
        }
    }
}

fn default_file() -> String {
    "~/todo.txt".into()
}

fn default_theme() -> String {
    "dark".into()
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TodoError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TodoError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("todo").join("config.toml"))
    }

    /// The todo.txt path with `~` expanded.
    pub fn todo_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.general.file).into_owned())
    }
}

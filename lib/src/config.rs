use crate::error::{Result, WebmarksError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding `bookmarks.json`; relative paths resolve against the default data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Folder that HTML imports are placed under
    #[serde(default = "default_import_root_folder")]
    pub import_root_folder: String,

    /// Extra attempts made when writing the store document fails
    #[serde(default = "default_write_retries")]
    pub write_retries: u32,

    /// Append log output to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            import_root_folder: default_import_root_folder(),
            write_retries: default_write_retries(),
            log_file: None,
        }
    }
}

fn default_import_root_folder() -> String {
    "Chrome导入".to_string()
}

fn default_write_retries() -> u32 {
    2
}

impl Config {
    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Option<Config> = serde_yaml::from_str(&contents)?;
        let config = config.unwrap_or_default();
        if config.import_root_folder.trim().is_empty() {
            return Err(WebmarksError::Config(
                "import_root_folder must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from default location (~/.config/webmarks/config.yml)
    /// Falls back to default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path();
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            log::debug!("No config at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    pub fn default_path() -> PathBuf {
        crate::utils::get_config_dir().join("config.yml")
    }

    /// Save configuration to a file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Directory the store document lives in
    pub fn resolve_data_dir(&self) -> PathBuf {
        let base = crate::utils::get_default_data_dir();
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.resolve_data_dir().join(crate::utils::STORE_FILE_NAME)
    }
}

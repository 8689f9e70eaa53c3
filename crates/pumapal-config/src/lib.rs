use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server used when neither the profile nor the command line names one.
pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile not found. Run 'pumapal profile set --name <NAME> --email <EMAIL>' first.")]
    NotFound,
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Profile has no {0}; set it with 'pumapal profile set'")]
    Missing(&'static str),
}

/// Student profile stored in ~/.pumapal/config.json
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub server: Option<String>, // Base URL, e.g. http://localhost:3000
}

impl ProfileConfig {
    /// Load config from default path (~/.pumapal/config.json)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path())
    }

    /// Load config from custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound
            } else {
                ConfigError::Read(e)
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like [`ProfileConfig::load_from`], but a missing file is an empty profile.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::NotFound) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    /// Save config to custom path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self)?)?;
        Ok(())
    }

    /// Get default config path (~/.pumapal/config.json)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .expect("Failed to get home directory")
            .join(".pumapal")
            .join("config.json")
    }

    pub fn require_name(&self) -> Result<&str, ConfigError> {
        self.name.as_deref().ok_or(ConfigError::Missing("name"))
    }

    pub fn require_email(&self) -> Result<&str, ConfigError> {
        self.email.as_deref().ok_or(ConfigError::Missing("email"))
    }

    /// Server URL from the profile, falling back to [`DEFAULT_SERVER`].
    pub fn server_url(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}

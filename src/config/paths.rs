/// Filesystem locations of the console and null devices
use crate::config::types::{Result, SystemError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONSOLE: &str = "/dev/console";
pub const DEFAULT_DEV_NULL: &str = "/dev/null";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPaths {
    /// Physical console device
    pub console: PathBuf,
    /// Null device
    pub dev_null: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self {
            console: PathBuf::from(DEFAULT_CONSOLE),
            dev_null: PathBuf::from(DEFAULT_DEV_NULL),
        }
    }
}

impl SystemPaths {
    /// Load paths from a JSON file; absent keys keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let paths: SystemPaths = serde_json::from_str(content)
            .map_err(|e| SystemError::Config(format!("Failed to parse paths JSON: {}", e)))?;

        paths.validate()?;
        Ok(paths)
    }

    /// Both locations must be absolute
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [("console", &self.console), ("dev_null", &self.dev_null)] {
            if !path.is_absolute() {
                return Err(SystemError::Config(format!(
                    "{} path must be absolute: {}",
                    name,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

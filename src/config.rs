//! Runtime configuration.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file); the binaries let command-line flags override each of them.

use crate::error::{AgriError, Result};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "AGRI_QA_DATA_DIR";
pub const ENV_CROP_CSV: &str = "AGRI_QA_CROP_CSV";
pub const ENV_RAIN_CSV: &str = "AGRI_QA_RAIN_CSV";
pub const ENV_MERGED_CSV: &str = "AGRI_QA_MERGED_CSV";
pub const ENV_BIND: &str = "AGRI_QA_BIND";

pub const DEFAULT_CROP_CSV: &str = "crop.csv";
pub const DEFAULT_RAIN_CSV: &str = "rain.csv";
pub const DEFAULT_MERGED_CSV: &str = "Merged_Agri_Rainfall_Data.csv";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Locations of the three source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub crop: PathBuf,
    pub rainfall: PathBuf,
    pub merged: PathBuf,
}

impl DataPaths {
    /// Resolve file names against a data directory. Absolute names are kept as-is.
    pub fn resolve(
        data_dir: &Path,
        crop: impl AsRef<Path>,
        rainfall: impl AsRef<Path>,
        merged: impl AsRef<Path>,
    ) -> Self {
        Self {
            crop: data_dir.join(crop),
            rainfall: data_dir.join(rainfall),
            merged: data_dir.join(merged),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub crop_file: String,
    pub rain_file: String,
    pub merged_file: String,
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            crop_file: DEFAULT_CROP_CSV.to_string(),
            rain_file: DEFAULT_RAIN_CSV.to_string(),
            merged_file: DEFAULT_MERGED_CSV.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            crop_file: get(ENV_CROP_CSV).unwrap_or(defaults.crop_file),
            rain_file: get(ENV_RAIN_CSV).unwrap_or(defaults.rain_file),
            merged_file: get(ENV_MERGED_CSV).unwrap_or(defaults.merged_file),
            bind: get(ENV_BIND).unwrap_or(defaults.bind),
        }
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths::resolve(&self.data_dir, &self.crop_file, &self.rain_file, &self.merged_file)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| AgriError::Config(format!("Invalid bind address '{}': {}", self.bind, e)))
    }
}

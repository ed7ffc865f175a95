// ABOUTME: Configuration management for the pattern library
// ABOUTME: Loads the base lookup directory and logging settings from YAML files and environment variables

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory that contains the `patterns/` tree
    #[serde(default = "default_base_lookup_dir")]
    pub base_lookup_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_base_lookup_dir() -> PathBuf {
    PathBuf::from("templates")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_lookup_dir: default_base_lookup_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            Self::from_file(&config_path)?
        } else {
            Config::default()
        };

        config.merge_env();
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("pattern-library.yaml"),
            PathBuf::from("pattern-library.yml"),
            PathBuf::from(".pattern-library.yaml"),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".pattern-library").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Default path (may not exist)
        PathBuf::from("pattern-library.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) {
        if let Ok(dir) = std::env::var("PATTERN_LIBRARY_BASE_DIR") {
            self.base_lookup_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("PATTERN_LIBRARY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PATTERN_LIBRARY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Root under which the `patterns/` directory is expected
    pub fn base_lookup_dir(&self) -> &Path {
        &self.base_lookup_dir
    }
}

/// Install a global tracing subscriber for the configured level and format
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "compact" => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized with level: {}", config.level);
    Ok(())
}

mod api;
mod validation;

use crate::api::DEFAULT_REFRESH_PATH;
use crate::cli::Args;
use crate::error::{Result, UnitrackError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, SessionConfig};
pub use validation::{expand_env_var_in_string, normalize_base_url, parse_bool_flag};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub refresh_path: String,
    pub verbose: bool,
    /// `None` means the default cache directory
    pub session_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::from_sources(args, |name| env::var(name).ok(), file_config)
    }

    /// Resolve every setting as CLI flag > environment > config file > default
    pub fn from_sources<F>(args: &Args, env_lookup: F, file_config: FileConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expand = |value: String| expand_env_var_in_string(&value, &env_lookup);

        let api_url = args
            .api_url
            .clone()
            .or_else(|| env_lookup("UNITRACK_API_URL"))
            .or_else(|| file_config.api.endpoint.clone().map(expand))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_base_url(&api_url).map_err(UnitrackError::ConfigError)?;

        let timeout_secs = match args.timeout {
            Some(secs) => secs,
            None => match env_lookup("UNITRACK_TIMEOUT") {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    UnitrackError::ConfigError(format!("UNITRACK_TIMEOUT is not a number: {}", raw))
                })?,
                None => file_config.api.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };
        if timeout_secs == 0 {
            return Err(UnitrackError::ConfigError(
                "request timeout must be at least one second".to_string(),
            ));
        }

        let refresh_path = env_lookup("UNITRACK_REFRESH_PATH")
            .or(file_config.api.refresh_path.clone())
            .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());

        let verbose = args.verbose
            || env_lookup("UNITRACK_VERBOSE")
                .and_then(|v| parse_bool_flag(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let session_dir = args
            .session_dir
            .clone()
            .or_else(|| env_lookup("UNITRACK_SESSION_DIR").map(PathBuf::from))
            .or_else(|| {
                file_config
                    .session
                    .store_dir
                    .clone()
                    .map(|dir| PathBuf::from(expand(dir)))
            });

        Ok(Config {
            api_url,
            timeout_secs,
            refresh_path,
            verbose,
            session_dir,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".unitrack.yaml"),
            PathBuf::from(".unitrack.yml"),
            PathBuf::from(".unitrack.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("unitrack");
            paths.push(config_dir.join("unitrack.yaml"));
            paths.push(config_dir.join("unitrack.yml"));
            paths.push(config_dir.join("unitrack.json"));
        }

        paths
    }
}

//! # Dashboard Configuration
//!
//! Environment-based configuration for the dashboard service and CLI.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;
use ugv_domain::{ColorTheme, DomainError};

/// Dataset file read when `DATA_PATH` is unset
pub const DEFAULT_DATA_PATH: &str = "ugv_mission_dataset_220rows.csv";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("Invalid COLOR_THEME: {0}")]
    InvalidTheme(#[from] DomainError),
}

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Mission dataset CSV
    pub data_path: PathBuf,

    /// Server bind address
    pub server_addr: SocketAddr,

    /// Logging level
    pub log_level: String,

    /// Default chart color scheme
    pub color_theme: ColorTheme,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let server_addr = addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value: addr.clone(), source })?;

        let color_theme = match lookup("COLOR_THEME") {
            Some(theme) => theme.parse()?,
            None => ColorTheme::default(),
        };

        Ok(Self {
            data_path: lookup("DATA_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
            server_addr,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            color_theme,
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}

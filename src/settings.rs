use std::{env, fmt};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra font files loaded on top of the system fonts
    pub font_dir: Option<String>,
    /// Family used for every piece of text on the cover
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Where the configuration values were read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// `.env` file loaded on top of the process environment
    DotEnv,
    /// process environment only
    Server,
}

impl ConfigSource {
    /// `ENV` unset or `file` selects the `.env` file.
    pub fn from_env_var(value: Option<&str>) -> Self {
        match value {
            None | Some("file") => ConfigSource::DotEnv,
            Some(_) => ConfigSource::Server,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::DotEnv => f.write_str("using .env file as environment variable"),
            ConfigSource::Server => f.write_str("using server environment as environment variable"),
        }
    }
}

/// Load the configuration. Runs before logging is set up, so the source is
/// returned for the caller to log.
pub fn get_config() -> Result<(Config, ConfigSource)> {
    let env_var = env::var("ENV").ok();
    let source = ConfigSource::from_env_var(env_var.as_deref());
    if source == ConfigSource::DotEnv {
        let _ = dotenvy::dotenv();
    }
    let config = envy::from_env::<Config>().context("invalid configuration")?;
    Ok((config, source))
}

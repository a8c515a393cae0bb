use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt;

use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu, InvalidDatabaseConfigSnafu};
use crate::leetcode::LeetCodeConfig;

/// Service configuration, read from the environment (and `.env` when present).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(flatten)]
    pub database: DatabaseConfig,
    #[serde(flatten)]
    pub leetcode: LeetCodeConfig,
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>()
            .context(ConfigLoadSnafu)?
            .validated()
    }

    pub fn from_vars<I>(vars: I) -> Result<Config, ApplicationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .context(ConfigLoadSnafu)?
            .validated()
    }

    fn validated(self) -> Result<Config, ApplicationError> {
        self.database
            .credentials()
            .context(InvalidDatabaseConfigSnafu)?;

        Ok(self)
    }
}

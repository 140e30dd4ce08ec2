use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    AdminConfig, AppConfig, CorsConfig, DatabaseConfig, JwtConfig, LogConfig, ServerConfig,
    StorageConfig,
};

pub const ENV_PREFIX: &str = "EDUDESK";

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
}

/// Settings file location: `EDUDESK_CONFIG` or `config/config.yaml`.
pub fn config_path() -> PathBuf {
    std::env::var(format!("{ENV_PREFIX}_CONFIG"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Settings {
    /// Defaults, then the YAML file at `path` if it exists, then `EDUDESK_*`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }
}

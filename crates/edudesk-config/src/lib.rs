//! # Edudesk Config
//!
//! Configuration types for the Edudesk API.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults (every section implements `Default`)
//! 2. an optional YAML file (`config/config.yaml`, or the path in `EDUDESK_CONFIG`)
//! 3. environment variables prefixed with `EDUDESK_`, using `__` between
//!    section and key, e.g. `EDUDESK_SERVER__PORT=9000` or
//!    `EDUDESK_JWT__SECRET=...`
//!
//! - [`server`]: HTTP listener, run mode and request timeout
//! - [`app`]: pagination defaults and password hashing cost
//! - [`jwt`]: token signing configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`storage`]: learning material storage
//! - [`log`]: log level and log file directory
//! - [`admin`]: bootstrap administrator account
//! - [`cors`]: allowed origins
//! - [`handle`] / [`watcher`]: shared, hot-reloadable settings
//!
//! # Example
//!
//! ```ignore
//! use edudesk_config::{Settings, SettingsHandle, spawn_watcher};
//!
//! let path = edudesk_config::config_path();
//! let settings = Settings::load(Some(path.as_path()))?;
//! let handle = SettingsHandle::new(settings);
//! spawn_watcher(path, handle.clone(), Duration::from_secs(5));
//! ```

pub mod admin;
pub mod app;
pub mod cors;
pub mod database;
pub mod handle;
pub mod jwt;
pub mod log;
pub mod server;
pub mod settings;
pub mod storage;
pub mod watcher;

pub use admin::AdminConfig;
pub use app::AppConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use handle::SettingsHandle;
pub use jwt::JwtConfig;
pub use log::LogConfig;
pub use server::{RunMode, ServerConfig};
pub use settings::{ENV_PREFIX, Settings, config_path};
pub use storage::StorageConfig;
pub use watcher::spawn_watcher;

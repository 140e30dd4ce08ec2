use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub dir: PathBuf,
    /// Write JSON logs to a daily rolling file in `dir`.
    pub file_enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_enabled: true,
        }
    }
}

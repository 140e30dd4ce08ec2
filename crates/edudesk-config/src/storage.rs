use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory learning material files are written to.
    pub base_dir: PathBuf,
    /// Maximum upload size in bytes.
    pub max_file_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("uploads"),
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{Settings, SettingsHandle};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

async fn stamp(path: &Path) -> Option<Stamp> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    Some(Stamp {
        modified: meta.modified().ok(),
        len: meta.len(),
    })
}

/// Polls `path` every `interval` and reloads `handle` when the file changes.
///
/// A file that fails to parse is logged and the previous settings are kept.
pub fn spawn_watcher(path: PathBuf, handle: SettingsHandle, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = stamp(&path).await;
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let current = stamp(&path).await;
            if current == last {
                continue;
            }
            last = current;

            if current.is_none() {
                debug!(path = %path.display(), "settings file removed, keeping current settings");
                continue;
            }

            match Settings::load(Some(&path)) {
                Ok(settings) => {
                    handle.replace(settings);
                    info!(path = %path.display(), "settings reloaded");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to reload settings");
                }
            }
        }
    })
}

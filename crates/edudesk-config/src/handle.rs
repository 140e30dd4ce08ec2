use std::sync::{Arc, PoisonError, RwLock};

use crate::Settings;

/// Shared, replaceable settings.
///
/// Readers take a cheap `Arc` snapshot; the watcher swaps in a new value
/// when the settings file changes. Values already read by an in-flight
/// request are not updated.
#[derive(Clone, Debug)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, settings: Settings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
    }
}

impl From<Settings> for SettingsHandle {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}

use log::{debug, info, warn};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

use crate::domain::Status;
use crate::ports::StatusPort;

pub const APP_NAME: &str = "proxyfetch";
const CONFIG_NAME: &str = "status";

#[derive(Debug, Error)]
pub enum StatusStoreError {
    #[error("Cannot load status: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("Cannot watch status file: {0}")]
    Watch(#[from] notify_debouncer_mini::notify::Error),
}

/// Status read from a TOML file through confy and kept in memory.
pub struct ConfyStatusStore {
    path: PathBuf,
    status: RwLock<Status>,
}

impl ConfyStatusStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StatusStoreError> {
        let path = path.into();
        let status = load(&path)?;

        Ok(Self {
            path,
            status: RwLock::new(status),
        })
    }

    /// Open the status file at confy's per-user location.
    pub fn open_default() -> Result<Self, StatusStoreError> {
        let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reload(&self) -> Result<(), StatusStoreError> {
        let status = load(&self.path)?;
        *self.status.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
        Ok(())
    }

    /// Reload the status whenever the file changes on disk, until the returned watcher is dropped.
    pub fn watch(self: &Arc<Self>) -> Result<StatusWatcher, StatusStoreError> {
        let store = Arc::clone(self);

        let mut debouncer = new_debouncer(Duration::from_secs(1), move |result: DebounceEventResult| match result {
            Ok(_) => match store.reload() {
                Ok(()) => info!("Reloaded proxy status from {}", store.path.display()),
                Err(e) => warn!("Failed to reload {}: {}", store.path.display(), e),
            },
            Err(error) => info!("File watch error: {:?}", error),
        })?;
        debouncer.watcher().watch(&self.path, RecursiveMode::NonRecursive)?;

        Ok(StatusWatcher { _debouncer: debouncer })
    }
}

pub struct StatusWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl StatusPort for ConfyStatusStore {
    fn status(&self) -> Status {
        self.status.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

fn load(path: &Path) -> Result<Status, StatusStoreError> {
    // confy would create a missing file, the status belongs to someone else
    if !path.exists() {
        debug!("No status file at {}, using an empty status", path.display());
        return Ok(Status::default());
    }

    Ok(confy::load_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_status_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("proxyfetch_{}_{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_empty_status() {
        let path = temp_status_file("missing");
        std::fs::remove_file(&path).ok();

        let store = ConfyStatusStore::open(&path).unwrap();

        assert_eq!(store.status(), Status::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_and_reload() {
        let path = temp_status_file("reload");
        std::fs::write(&path, "httpsProxy = \"http://proxyhost:8080\"\n").unwrap();

        let store = ConfyStatusStore::open(&path).unwrap();
        assert_eq!(store.status().configured_https_proxy(), Some("http://proxyhost:8080"));

        let updated = Status::default().with_http_proxy("http://h1").with_global_proxy(true);
        confy::store_path(&path, &updated).unwrap();
        store.reload().unwrap();

        assert_eq!(store.status(), updated);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_status_file("malformed");
        std::fs::write(&path, "globalProxy = \"yes please\"\n").unwrap();

        let result = ConfyStatusStore::open(&path);

        assert!(matches!(result, Err(StatusStoreError::Load(_))));
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_watch_picks_up_changes() {
        let path = temp_status_file("watch");
        std::fs::write(&path, "httpProxy = \"http://h1\"\n").unwrap();

        let store = Arc::new(ConfyStatusStore::open(&path).unwrap());
        let _watcher = store.watch().unwrap();

        std::fs::write(&path, "httpProxy = \"http://h2\"\n").unwrap();

        let mut seen = None;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(200)).await;
            seen = store.status().http_proxy;
            if seen.as_deref() == Some("http://h2") {
                break;
            }
        }

        assert_eq!(seen.as_deref(), Some("http://h2"));
        std::fs::remove_file(&path).ok();
    }
}

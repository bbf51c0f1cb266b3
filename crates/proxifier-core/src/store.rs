//! Routing config persistence
//!
//! The store holds one [`RoutingConfig`] value that is read whole and
//! replaced whole. Mutations always start from a fresh [`ConfigStore::get`]
//! so that a stale snapshot never overwrites a newer write wholesale.

use crate::config::{RoutingConfig, StoredConfig};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistent configuration store
pub trait ConfigStore {
    /// Read the current config, with defaults when nothing is stored
    fn get(&self) -> Result<RoutingConfig>;

    /// Replace the stored config
    fn set(&self, config: &RoutingConfig) -> Result<()>;

    /// Whether the stored value changed since the previous call
    ///
    /// Writes made through [`ConfigStore::set`] count as changes, like
    /// writes from any other process.
    fn poll_changed(&self) -> Result<bool>;

    /// Human-readable location for messages
    fn location(&self) -> String;
}

/// The config a fresh store reports
pub fn default_config() -> RoutingConfig {
    RoutingConfig::from(StoredConfig::default())
}

/// In-memory store, used for tests and dry runs
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    config: RoutingConfig,
    changed: bool,
    fail_writes: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding the default config
    pub fn new() -> Self {
        Self::with_config(default_config())
    }

    /// Create a store holding `config`
    pub fn with_config(config: RoutingConfig) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                config,
                changed: false,
                fail_writes: false,
            }),
        }
    }

    /// Make subsequent writes fail, simulating a rejected write
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Replace the value as another writer would
    pub fn replace_externally(&self, config: RoutingConfig) {
        let mut state = self.state.lock();
        state.config = config;
        state.changed = true;
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self) -> Result<RoutingConfig> {
        Ok(self.state.lock().config.clone())
    }

    fn set(&self, config: &RoutingConfig) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(Error::persistence("memory", "Writes are disabled"));
        }
        state.config = config.clone();
        state.changed = true;
        Ok(())
    }

    fn poll_changed(&self) -> Result<bool> {
        let mut state = self.state.lock();
        Ok(std::mem::take(&mut state.changed))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename
///
/// Missing parent directories are created. The temp file is removed if the
/// rename fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        e
    })
}

/// JSON document on disk
///
/// Writes go to a sibling temp file that is then renamed over the
/// document, so readers never see a partial write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Document bytes seen by the last `poll_changed`
    last_seen: Mutex<Option<Vec<u8>>>,
}

impl JsonFileStore {
    /// Open a store at `path`; the file need not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let initial = std::fs::read(&path).ok();
        Self {
            path,
            last_seen: Mutex::new(initial),
        }
    }

    /// Path of the JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, message: impl Into<String>) -> Error {
        Error::persistence(self.path.display().to_string(), message)
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self) -> Result<RoutingConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored config, using defaults");
                return Ok(default_config());
            }
            Err(e) => return Err(self.persistence_error(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(default_config());
        }

        RoutingConfig::from_json(&content)
            .map_err(|e| self.persistence_error(format!("Unreadable config: {e}")))
    }

    fn set(&self, config: &RoutingConfig) -> Result<()> {
        let json = config.to_json()?;
        write_atomic(&self.path, json.as_bytes())
            .map_err(|e| self.persistence_error(e.to_string()))?;

        info!(
            path = %self.path.display(),
            domains = config.domains.len(),
            "Saved routing config"
        );
        Ok(())
    }

    fn poll_changed(&self) -> Result<bool> {
        let current = match std::fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(self.persistence_error(e.to_string())),
        };

        let mut last_seen = self.last_seen.lock();
        if *last_seen == current {
            return Ok(false);
        }

        debug!(path = %self.path.display(), "Routing config changed on disk");
        *last_seen = current;
        Ok(true)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProxyEndpoint, ProxyKind};
    use crate::membership::DomainSet;

    fn sample() -> RoutingConfig {
        RoutingConfig::new(
            Some(ProxyEndpoint::new("proxy.local", 8080, ProxyKind::Http)),
            DomainSet::with_domains(["b.com", "a.com"]),
        )
    }

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryStore::new();
        let config = store.get().unwrap();
        let endpoint = config.endpoint.unwrap();
        assert_eq!(endpoint.host, "");
        assert_eq!(endpoint.port, 1080);
        assert_eq!(endpoint.kind, ProxyKind::Socks5);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn test_memory_store_change_flag() {
        let store = MemoryStore::new();
        assert!(!store.poll_changed().unwrap());

        store.set(&sample()).unwrap();
        assert!(store.poll_changed().unwrap());
        assert!(!store.poll_changed().unwrap());
    }

    #[test]
    fn test_memory_store_rejected_write() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let err = store.set(&sample()).unwrap_err();
        assert!(err.is_persistence());
        assert!(store.get().unwrap().domains.is_empty());
    }

    #[test]
    fn test_file_store_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("routing.json"));
        assert_eq!(store.get().unwrap(), default_config());
    }

    #[test]
    fn test_file_store_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested").join("routing.json"));

        store.set(&sample()).unwrap();
        let loaded = store.get().unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(loaded.domains.as_slice(), ["b.com", "a.com"]);
    }

    #[test]
    fn test_file_store_detects_external_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.json");
        let store = JsonFileStore::open(&path);
        assert!(!store.poll_changed().unwrap());

        std::fs::write(&path, r#"{"proxyHost":"h","websites":["x.com"]}"#).unwrap();
        assert!(store.poll_changed().unwrap());
        assert!(!store.poll_changed().unwrap());
        assert!(store.get().unwrap().domains.contains("x.com"));
    }

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.txt");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"two");
        assert!(!dir.path().join("a").join("b.txt.tmp").exists());
    }

    #[test]
    fn test_file_store_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.json");
        JsonFileStore::open(&path).set(&sample()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("routing.json.tmp").exists());
    }

    #[test]
    fn test_file_store_unreadable_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).get().unwrap_err();
        assert!(err.is_persistence());
    }
}

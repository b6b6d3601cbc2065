use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// String key-value store used for persisted UI state.
///
/// Implementations are accessed read-modify-write without locking; when two
/// processes share a backing file the last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Volatile store, mostly useful for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object of string values.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents. A missing file reads as empty; other IO errors
    /// are returned.
    fn read_raw(&self) -> anyhow::Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn parse_map(content: &str) -> anyhow::Result<BTreeMap<String, String>> {
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(content)?)
    }

    fn read_map(&self) -> anyhow::Result<BTreeMap<String, String>> {
        Self::parse_map(&self.read_raw()?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        // A corrupt backing file is replaced; an unreadable one is left alone.
        let content = self.read_raw()?;
        let mut map = Self::parse_map(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "discarding unreadable store: {e}");
            BTreeMap::new()
        });
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("store.json"));
        store.set("theme", "dark").unwrap();
        store.set("layout", "[]").unwrap();
        store.remove("layout").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(store.get("layout").unwrap().is_none());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.get("layout").unwrap().is_none());
        store.remove("layout").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_recovers_from_corrupt_file_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(store.get("layout").is_err());
        store.set("layout", "[]").unwrap();
        assert_eq!(store.get("layout").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_unreadable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        assert!(store.get("layout").is_err());
        assert!(store.set("layout", "[]").is_err());
        assert!(store.remove("layout").is_err());
        assert!(dir.path().is_dir());
    }
}

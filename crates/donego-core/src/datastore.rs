use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use donego_shared::KeyValueStore;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File-backed slot storage: one file per key inside the data directory.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened datastore");

        Ok(Self { data_dir })
    }

    pub fn slot_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(key))
    }
}

impl KeyValueStore for DataStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            debug!(file = %path.display(), "slot is empty");
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        debug!(file = %path.display(), bytes = raw.len(), "read slot");
        Ok(Some(raw))
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.slot_path(key)?;
        write_atomic(&path, value).with_context(|| format!("failed to save slot {key}"))
    }
}

#[tracing::instrument(skip(path, value))]
fn write_atomic(path: &Path, value: &str) -> anyhow::Result<()> {
    debug!(file = %path.display(), bytes = value.len(), "writing slot atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(value.as_bytes())?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

fn validate_key(key: &str) -> anyhow::Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(anyhow!("invalid storage key: {key:?}"))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_slot_reads_as_none() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path()).expect("open datastore");
        assert_eq!(store.get("donego.v1").expect("get"), None);
    }

    #[test]
    fn set_then_get_overwrites() {
        let temp = tempdir().expect("tempdir");
        let mut store = DataStore::open(temp.path()).expect("open datastore");

        store.set("donego.theme", "dark").expect("first write");
        store.set("donego.theme", "light").expect("second write");

        assert_eq!(
            store.get("donego.theme").expect("get").as_deref(),
            Some("light")
        );
        assert!(temp.path().join("donego.theme").is_file());
    }

    #[test]
    fn open_creates_nested_directory() {
        let temp = tempdir().expect("tempdir");
        let nested = temp.path().join("a").join("b");
        DataStore::open(&nested).expect("open datastore");
        assert!(nested.is_dir());
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let temp = tempdir().expect("tempdir");
        let mut store = DataStore::open(temp.path()).expect("open datastore");

        for key in ["", "../x", "a/b", ".hidden"] {
            assert!(store.set(key, "v").is_err(), "key {key:?}");
        }
    }
}

//! Disk-backed key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Directory for keys without a `::` namespace, such as `"profiles"`.
const ROOT_NAMESPACE: &str = "_root";

/// One JSON file per key.
///
/// Files live at `{data_dir}/{namespace}/{hash}.json` where `namespace` is
/// the key up to its first `::` and `hash` is the SHA-256 of the whole key.
/// The key itself is kept in the envelope, so a prefix scan only reads the
/// namespace directory it names.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: String,
    updated_at: DateTime<Utc>,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let namespace = namespace_of(key).unwrap_or(ROOT_NAMESPACE);
        self.data_dir
            .join(dir_name(namespace))
            .join(format!("{}.json", sha256_hex(key)))
    }

    fn collect_keys(dir: &Path, prefix: &str, keys: &mut Vec<String>) -> Result<(), StoreError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for file in entries {
            let path = file?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(Some(entry)) if entry.key.starts_with(prefix) => keys.push(entry.key),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                }
            }
        }
        Ok(())
    }

    fn read_entry(path: &Path) -> Result<Option<StoredEntry>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(Self::read_entry(&self.path_for(key))?.map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entry = StoredEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)?;

        // Write then rename so readers never see a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        if !self.data_dir.exists() {
            return Ok(keys);
        }

        match namespace_of(prefix) {
            Some(namespace) => {
                Self::collect_keys(&self.data_dir.join(dir_name(namespace)), prefix, &mut keys)?;
            }
            None => {
                for shard in fs::read_dir(&self.data_dir)? {
                    let shard = shard?.path();
                    if shard.is_dir() {
                        Self::collect_keys(&shard, prefix, &mut keys)?;
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// The part of `key` before its first `::`, if it has one.
fn namespace_of(key: &str) -> Option<&str> {
    key.split_once("::").map(|(namespace, _)| namespace)
}

/// A namespace made safe to use as a single path component.
fn dir_name(namespace: &str) -> String {
    let name: String = namespace
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() {
        ROOT_NAMESPACE.to_string()
    } else {
        name
    }
}

/// Compute SHA256 hash and return as hex string.
fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

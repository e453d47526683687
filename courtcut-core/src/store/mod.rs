// ============================================================================
// courtcut-core/src/store/mod.rs
// ============================================================================
//
// PERSISTENCE: Narrow key-value interface
//
// Goal zones, analysis records, sync offsets and coverage sessions are kept
// as opaque values under string keys. Nothing outside this module knows how
// keys map onto the file system. Read-modify-write sequences are serialized
// per key through `KeyValueStore::update`; unrelated keys never contend.

mod repos;

pub use repos::{Catalog, SyncPair};

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{CoreError, CoreResult};

/// One mutex per key, created on first use.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Runs `f` while holding the lock for `key`.
    pub fn with_key<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

/// Keyed byte storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<Vec<u8>>>;

    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()>;

    /// Removes `key`. Returns whether it existed.
    fn delete(&self, key: &str) -> CoreResult<bool>;

    /// All keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> CoreResult<Vec<String>>;

    fn key_locks(&self) -> &KeyLocks;

    /// Atomically replaces the value of `key` with `f(current)`. Returning
    /// `None` from `f` deletes the key.
    fn update<F>(&self, key: &str, f: F) -> CoreResult<()>
    where
        Self: Sized,
        F: FnOnce(Option<Vec<u8>>) -> CoreResult<Option<Vec<u8>>>,
    {
        self.key_locks().with_key(key, || {
            let current = self.get(key)?;
            match f(current)? {
                Some(value) => self.put(key, &value),
                None => self.delete(key).map(|_| ()),
            }
        })
    }
}

/// Store keeping one file per key under a root directory.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    locks: KeyLocks,
}

impl JsonFileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            CoreError::Store(format!("cannot create store at {}: {e}", root.display()))
        })?;
        log::debug!("Opened store at {}", root.display());
        Ok(Self {
            root,
            locks: KeyLocks::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        let mut file = tempfile::NamedTempFile::new_in(&self.root)?;
        file.write_all(value)?;
        file.as_file().sync_all()?;
        file.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> CoreResult<bool> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self, prefix: &str) -> CoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Some(key) = decode_key(stem) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn key_locks(&self) -> &KeyLocks {
        &self.locks
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    locks: KeyLocks,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.entries().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        self.entries().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> CoreResult<bool> {
        Ok(self.entries().remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> CoreResult<Vec<String>> {
        Ok(self
            .entries()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn key_locks(&self) -> &KeyLocks {
        &self.locks
    }
}

/// Percent-encodes everything outside `[A-Za-z0-9._-]` so any key maps to a
/// single flat file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_key(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

//! Persisted client storage
//!
//! A small string key/value store with the same role browser local storage
//! plays for a web front end: it survives restarts and holds the access
//! token, the decoded user and the last search.

use crate::error::{CoreError, CoreResult};
use crate::identity::SessionUser;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Well-known storage keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const USER: &str = "user";
    pub const SEARCH_PARAMS: &str = "searchParams";
    pub const HOTELS_LIST: &str = "hotelsList";
    pub const LAST_SEARCH: &str = "lastSearch";
    /// `Cookie` header value replayed on `/auth/refresh`
    pub const REFRESH_COOKIE: &str = "refreshCookie";
}

/// String key/value storage shared by the client and the pages
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Read a JSON value; entries that no longer parse are treated as absent
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> CoreResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring unreadable '{key}' in storage: {e}");
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> CoreResult<()> {
    store.set(key, &serde_json::to_string(value)?)
}

fn lock<T>(mutex: &Mutex<T>) -> CoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| CoreError::storage("storage lock poisoned"))
}

/// Volatile store, used by tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

/// JSON file backed store; every write rewrites the whole file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "storage.json";

    /// Open the store in `dir`, creating the directory if needed
    pub fn open(dir: &Path) -> CoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::FILE_NAME);

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Storage file {} is corrupt, starting empty: {e}", path.display());
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        debug!("Opened storage at {}", path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = lock(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Typed view over the credential entries of a store
pub struct Credentials<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Credentials<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> CoreResult<Option<String>> {
        Ok(self
            .store
            .get(keys::ACCESS_TOKEN)?
            .filter(|token| !token.is_empty()))
    }

    pub fn set_access_token(&self, token: &str) -> CoreResult<()> {
        self.store.set(keys::ACCESS_TOKEN, token)
    }

    pub fn user(&self) -> CoreResult<Option<SessionUser>> {
        load_json(self.store, keys::USER)
    }

    pub fn set_user(&self, user: &SessionUser) -> CoreResult<()> {
        save_json(self.store, keys::USER, user)
    }

    /// Forget the token and the user, as on logout or a failed refresh
    pub fn clear(&self) -> CoreResult<()> {
        self.store.remove(keys::ACCESS_TOKEN)?;
        self.store.remove(keys::USER)
    }
}

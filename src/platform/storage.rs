//! Key-value storage backends
//!
//! The browser build writes to LocalStorage; the native build keeps one
//! JSON file per key in a directory. Saves and settings use separate keys.

use std::collections::HashMap;

use thiserror::Error;

/// Failure talking to a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// No backend available (private browsing, no window)
    #[error("storage unavailable")]
    Unavailable,
    /// The backend refused the operation (quota, access denied)
    #[error("storage rejected {op} for {key:?}: {reason}")]
    Rejected {
        op: &'static str,
        key: String,
        reason: String,
    },
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal LocalStorage-shaped interface
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory storage (tests, and a fallback when nothing else is available)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, like a full LocalStorage quota
    pub fn read_only() -> Self {
        Self {
            items: HashMap::new(),
            reject_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check_writable(&self, op: &'static str, key: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::Rejected {
                op,
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable("set", key)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable("remove", key)?;
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{Storage, StorageError};

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect();
            self.dir.join(format!("{name}.json"))
        }
    }

    impl Storage for FileStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        /// Write to a temp file, then rename over the old value
        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.dir)?;
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path_for(key)) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{Storage, StorageError};

    /// Browser `window.localStorage`
    pub struct LocalStorage {
        inner: web_sys::Storage,
    }

    impl LocalStorage {
        /// Fails with `Unavailable` when the page has no usable LocalStorage
        pub fn open() -> Result<Self, StorageError> {
            let inner = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { inner })
        }
    }

    fn rejected(op: &'static str, key: &str, err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Rejected {
            op,
            key: key.to_string(),
            reason: format!("{err:?}"),
        }
    }

    impl Storage for LocalStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key).map_err(|e| rejected("get", key, e))
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner
                .set_item(key, value)
                .map_err(|e| rejected("set", key, e))
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner
                .remove_item(key)
                .map_err(|e| rejected("remove", key, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut storage = MemoryStorage::read_only();
        let err = storage.set_item("save", "{}").unwrap_err();
        assert!(matches!(err, StorageError::Rejected { op: "set", .. }));
        assert_eq!(storage.get_item("save").unwrap(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!("digit-puzzle-test-{}", std::process::id()));
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.get_item("digit/save").unwrap(), None);
        storage.set_item("digit/save", "{\"a\":1}").unwrap();
        assert_eq!(storage.get_item("digit/save").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.join("digit_save.json").exists());
        storage.remove_item("digit/save").unwrap();
        storage.remove_item("digit/save").unwrap();
        assert_eq!(storage.get_item("digit/save").unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

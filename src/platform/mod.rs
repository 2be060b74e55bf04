//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, files on native, memory in tests)
//! - Wall-clock time for save timestamps

pub mod storage;
pub mod time;

pub use storage::{MemoryStorage, Storage, StorageError};
pub use time::now_ms;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

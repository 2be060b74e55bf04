//! Save/load persistence with validation
//!
//! Features:
//! - Versioned JSON envelope (in-flight drags are never written)
//! - Whole-save validation on load; segments recomputed, never trusted
//! - Corruption detection with fallback to a fresh board

pub mod envelope;
pub mod validation;

pub use envelope::{PersistedBoard, PersistedPiece, PersistedPlacement, PersistedState, serialize};
pub use validation::{ValidationError, deserialize};

use thiserror::Error;

use crate::platform::{Storage, StorageError, now_ms};
use crate::puzzle::GameState;

/// Anything that can go wrong saving or loading
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed save JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid save: {0}")]
    Invalid(#[from] ValidationError),
}

/// Encode a state as save JSON
pub fn to_json(state: &GameState, timestamp: f64) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&serialize(state, timestamp))?)
}

/// Decode and validate save JSON
pub fn from_json(json: &str) -> Result<GameState, PersistError> {
    let saved: PersistedState = serde_json::from_str(json)?;
    Ok(deserialize(&saved)?)
}

/// Write the state under `key`
pub fn save<S: Storage + ?Sized>(
    storage: &mut S,
    key: &str,
    state: &GameState,
) -> Result<(), PersistError> {
    let json = to_json(state, now_ms())?;
    storage.set_item(key, &json)?;
    log::debug!(
        "Saved {} placed pieces under {key:?}",
        state.board().placed_pieces().len()
    );
    Ok(())
}

/// Read the state under `key` (Ok(None) when nothing is saved)
pub fn load<S: Storage + ?Sized>(storage: &S, key: &str) -> Result<Option<GameState>, PersistError> {
    match storage.get_item(key)? {
        Some(json) => Ok(Some(from_json(&json)?)),
        None => Ok(None),
    }
}

/// Load the saved state, or a fresh board if there is none or it is bad
pub fn load_or_reset<S: Storage + ?Sized>(storage: &S, key: &str) -> GameState {
    match load(storage, key) {
        Ok(Some(state)) => {
            log::info!(
                "Loaded saved board ({} placed, {} in inventory)",
                state.board().placed_pieces().len(),
                state.inventory().len()
            );
            state
        }
        Ok(None) => {
            log::info!("No saved board found, starting fresh");
            GameState::new()
        }
        Err(e) => {
            log::warn!("Discarding saved board: {e}");
            GameState::new()
        }
    }
}

/// Remove the save under `key`
pub fn clear<S: Storage + ?Sized>(storage: &mut S, key: &str) -> Result<(), PersistError> {
    storage.remove_item(key)?;
    log::info!("Saved board cleared");
    Ok(())
}

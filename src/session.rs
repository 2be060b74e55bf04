//! Puzzle session: the single owner of the game state
//!
//! Front ends never touch `GameState` fields; they send `Action`s through
//! [`PuzzleSession::dispatch`] and read the result. Each committed change is
//! written to storage, and a failed write only gets logged and remembered:
//! the in-memory state stays authoritative.

use crate::persistence::{self, PersistError};
use crate::platform::Storage;
use crate::puzzle::{Action, GameState, reduce};
use crate::settings::Settings;

pub struct PuzzleSession<S: Storage> {
    state: GameState,
    storage: S,
    settings: Settings,
    last_save_error: Option<String>,
}

impl<S: Storage> PuzzleSession<S> {
    /// Start from a fresh board, ignoring any save
    pub fn new(storage: S, settings: Settings) -> Self {
        Self {
            state: GameState::new(),
            storage,
            settings,
            last_save_error: None,
        }
    }

    /// Start from the saved board (or a fresh one if the save is missing or bad)
    pub fn restore(storage: S, settings: Settings) -> Self {
        let state = persistence::load_or_reset(&storage, &settings.save_key);
        Self {
            state,
            storage,
            settings,
            last_save_error: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Message from the most recent failed save, cleared by the next success
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Apply one action and persist the result
    pub fn dispatch(&mut self, action: Action) -> &GameState {
        let next = reduce(self.state.clone(), action);
        if next == self.state {
            return &self.state;
        }
        self.state = next;

        if cfg!(debug_assertions)
            && let Err(violation) = self.state.check_invariants()
        {
            log::error!("State invariant broken: {violation}");
        }

        // The save form of a mid-drag state is the board before pickup,
        // which was already written
        if self.settings.autosave && !self.state.drag().is_dragging() {
            self.persist();
        }
        &self.state
    }

    /// Replace the board with a save exported earlier (validated first)
    pub fn import_json(&mut self, json: &str) -> Result<(), PersistError> {
        let loaded = persistence::from_json(json)?;
        self.dispatch(Action::LoadState(Box::new(loaded)));
        Ok(())
    }

    /// Current board as save JSON
    pub fn export_json(&self) -> Result<String, PersistError> {
        persistence::to_json(&self.state, crate::platform::now_ms())
    }

    /// Write the current board now, regardless of autosave
    pub fn save(&mut self) -> Result<(), PersistError> {
        persistence::save(&mut self.storage, &self.settings.save_key, &self.state)
    }

    pub fn clear_save(&mut self) -> Result<(), PersistError> {
        persistence::clear(&mut self.storage, &self.settings.save_key)
    }

    fn persist(&mut self) {
        match self.save() {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                log::warn!("Autosave failed, continuing in memory: {e}");
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}

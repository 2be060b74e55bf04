//! Player settings and preferences
//!
//! Persisted separately from the board save.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;
use crate::platform::Storage;

/// Default storage key for the board save
pub const DEFAULT_SAVE_KEY: &str = "digit_puzzle_save";

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Saving ===
    /// Save the board after every change
    pub autosave: bool,
    /// Storage key for the board save
    pub save_key: String,

    // === Diagnostics ===
    /// Log filter for the native build (`RUST_LOG` wins when set)
    pub log_level: String,

    // === Display (read by the front end) ===
    /// Draw each piece's grab anchor
    pub show_anchor: bool,
    /// Label grid coordinates along the board edges
    pub show_grid_labels: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave: true,
            save_key: DEFAULT_SAVE_KEY.to_string(),

            log_level: "info".to_string(),

            show_anchor: false,
            show_grid_labels: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "digit_puzzle_settings";

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), PersistError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_defaults_when_missing() {
        let storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_round_trip() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            autosave: false,
            show_anchor: true,
            ..Settings::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"high_contrast":true}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert!(settings.high_contrast);
        assert!(settings.autosave);
        assert_eq!(settings.save_key, DEFAULT_SAVE_KEY);
    }

    #[test]
    fn test_malformed_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(Settings::STORAGE_KEY, "[1,2").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}

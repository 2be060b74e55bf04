//! Digit Puzzle - seven-segment pieces on a 5x4 edge grid
//!
//! Core modules:
//! - `puzzle`: Deterministic core (segments, rotation, occupancy, piece lifecycle)
//! - `persistence`: Versioned save format with validation on load
//! - `platform`: Browser/native platform abstraction (storage, time)
//! - `session`: Single owner of the game state, autosave after each action
//! - `settings`: Player preferences

pub mod persistence;
pub mod platform;
pub mod puzzle;
pub mod session;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::PuzzleSession;
pub use settings::Settings;

/// Board and piece constants
pub mod consts {
    /// Board width in cells
    pub const BOARD_WIDTH: i32 = 5;
    /// Board height in cells
    pub const BOARD_HEIGHT: i32 = 4;

    /// Horizontal segments: (WIDTH) * (HEIGHT + 1)
    pub const HORIZONTAL_SEGMENTS: usize = (BOARD_WIDTH * (BOARD_HEIGHT + 1)) as usize;
    /// Vertical segments: (WIDTH + 1) * HEIGHT
    pub const VERTICAL_SEGMENTS: usize = ((BOARD_WIDTH + 1) * BOARD_HEIGHT) as usize;
    /// Every distinct segment on the board
    pub const BOARD_SEGMENTS: usize = HORIZONTAL_SEGMENTS + VERTICAL_SEGMENTS;

    /// One piece per digit
    pub const PIECE_COUNT: u8 = 10;

    /// Save format version written by this build
    pub const SAVE_VERSION: &str = "1.0";
}

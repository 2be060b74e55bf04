//! Digit Puzzle entry point
//!
//! The browser build starts from `wasm_main`; the page drives the puzzle
//! through `digit_puzzle::web::WebPuzzle`.
//!
//! The native build is a line-oriented driver: one JSON action per stdin
//! line, the saved form of the board printed after each one.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    digit_puzzle::web::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Directory for native saves and settings
#[cfg(not(target_arch = "wasm32"))]
const DATA_DIR: &str = ".digit-puzzle";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::io::{BufRead, Write};

    use digit_puzzle::platform::FileStorage;
    use digit_puzzle::puzzle::Action;
    use digit_puzzle::{PuzzleSession, Settings};

    let storage = FileStorage::new(DATA_DIR);
    let settings = Settings::load(&storage);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();
    log::info!("Digit Puzzle (native) starting, data in {DATA_DIR}/");

    let mut session = PuzzleSession::restore(storage, settings);
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", session.export_json()?)?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let action: Action = match serde_json::from_str(line) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("Skipping unreadable action {line:?}: {e}");
                continue;
            }
        };

        let state = session.dispatch(action);
        if let Some(drag) = state.drag().active() {
            log::info!("{} in flight", drag.piece.id);
        }
        if let Some(err) = session.last_save_error() {
            log::warn!("Board not saved: {err}");
        }
        writeln!(out, "{}", session.export_json()?)?;
    }

    Ok(())
}

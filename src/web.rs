//! Browser bindings
//!
//! The page's drag/drop code owns pointer math and drawing. It talks to the
//! puzzle only through JSON actions and read-only queries on [`WebPuzzle`].

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::persistence::{PersistedState, serialize};
use crate::platform::{LocalStorage, MemoryStorage, Storage, now_ms};
use crate::puzzle::{Action, PieceId, anchor, bounding_box};
use crate::session::PuzzleSession;
use crate::settings::Settings;

/// Install the panic hook and console logger (call once at startup)
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialized by an earlier call
        return;
    }
    log::info!("Digit Puzzle starting...");
}

fn open_storage() -> Box<dyn Storage> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}, progress will not survive a reload");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct View<'a> {
    #[serde(flatten)]
    settled: PersistedState,
    dragging: Option<&'a str>,
    save_error: Option<&'a str>,
    settings: &'a Settings,
}

/// Geometry of one piece for drawing and grab offsets
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PieceGeometry {
    segments: Vec<String>,
    anchor: [f32; 2],
    bounds: Option<[i32; 4]>,
}

#[wasm_bindgen]
pub struct WebPuzzle {
    session: PuzzleSession<Box<dyn Storage>>,
}

#[wasm_bindgen]
impl WebPuzzle {
    /// Restore the saved board (or start fresh)
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebPuzzle {
        let storage = open_storage();
        let settings = Settings::load(&storage);
        WebPuzzle {
            session: PuzzleSession::restore(storage, settings),
        }
    }

    /// Apply a JSON action such as `{"type":"drop","position":{"x":2,"y":1}}`
    pub fn dispatch(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: Action = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("bad action: {e}")))?;
        self.session.dispatch(action);
        self.view_json()
    }

    /// Current state for rendering
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, JsValue> {
        let state = self.session.state();
        let view = View {
            settled: serialize(state, now_ms()),
            dragging: state.drag().active().map(|d| d.piece.id.as_str()),
            save_error: self.session.last_save_error(),
            settings: self.session.settings(),
        };
        serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Segments, anchor and bounds of a piece wherever it currently is
    #[wasm_bindgen(js_name = pieceGeometry)]
    pub fn piece_geometry(&self, piece_id: &str) -> Result<String, JsValue> {
        let id = PieceId::from(piece_id);
        let piece = self
            .session
            .state()
            .piece(&id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown piece {piece_id}")))?;
        let segments = piece.segments();
        let a = anchor(piece);
        let geometry = PieceGeometry {
            segments: segments.iter().map(|s| s.id()).collect(),
            anchor: [a.x, a.y],
            bounds: bounding_box(&segments).map(|b| [b.min_x, b.min_y, b.max_x, b.max_y]),
        };
        serde_json::to_string(&geometry).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Import a save exported earlier
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.session
            .import_json(json)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.session
            .export_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for WebPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

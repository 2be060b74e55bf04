//! Versioned save envelope
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "timestamp": 1700000000000,
//!   "board": {
//!     "placedPieces": [{ "pieceId": "piece-1", "number": 1, "rotation": 0, "position": { "x": 2, "y": 1 } }],
//!     "occupiedSegments": ["3,1,v", "3,2,v"]
//!   },
//!   "inventory": [{ "pieceId": "piece-0", "number": 0, "rotation": 0 }]
//! }
//! ```
//!
//! Numbers are kept wide here so out-of-range values reach validation
//! instead of failing inside serde.

use serde::{Deserialize, Serialize};

use crate::consts::SAVE_VERSION;
use crate::puzzle::{Action, BoardPosition, GameState, Piece, reduce};

/// A piece as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPiece {
    pub piece_id: String,
    pub number: i64,
    pub rotation: i64,
}

impl From<&Piece> for PersistedPiece {
    fn from(piece: &Piece) -> Self {
        Self {
            piece_id: piece.id.to_string(),
            number: i64::from(piece.number.value()),
            rotation: i64::from(piece.rotation.degrees()),
        }
    }
}

/// A placed piece as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPlacement {
    pub piece_id: String,
    pub number: i64,
    pub rotation: i64,
    pub position: BoardPosition,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBoard {
    pub placed_pieces: Vec<PersistedPlacement>,
    /// Informational; occupancy is rebuilt from placements on load
    #[serde(default)]
    pub occupied_segments: Vec<String>,
}

/// Complete save file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub version: String,
    /// Unix timestamp (ms) when written
    pub timestamp: f64,
    pub board: PersistedBoard,
    pub inventory: Vec<PersistedPiece>,
}

/// Build the save form of a state.
///
/// A piece still in flight is put back first, so reloading never
/// resurrects a half-finished drag.
pub fn serialize(state: &GameState, timestamp: f64) -> PersistedState {
    let settled;
    let state = if state.drag().is_dragging() {
        settled = reduce(state.clone(), Action::Cancel);
        &settled
    } else {
        state
    };

    let board = state.board();
    PersistedState {
        version: SAVE_VERSION.to_string(),
        timestamp,
        board: PersistedBoard {
            placed_pieces: board
                .placed_pieces()
                .iter()
                .map(|placed| {
                    let PersistedPiece {
                        piece_id,
                        number,
                        rotation,
                    } = PersistedPiece::from(&placed.piece);
                    PersistedPlacement {
                        piece_id,
                        number,
                        rotation,
                        position: placed.position,
                    }
                })
                .collect(),
            occupied_segments: board.occupied_segments().iter().map(|s| s.id()).collect(),
        },
        inventory: state.inventory().iter().map(PersistedPiece::from).collect(),
    }
}

//! Deterministic puzzle core
//!
//! All game logic lives here. This module must stay pure:
//! - No rendering, input capture or storage
//! - Segments are derived from `(number, rotation)`, never stored
//! - Stable iteration order (ordered occupancy set, ordered piece lists)

pub mod catalog;
pub mod geometry;
pub mod lifecycle;
pub mod occupancy;
pub mod piece;
pub mod segment;
pub mod state;

pub use catalog::{Digit, base_pattern};
pub use geometry::{
    BoundingBox, Direction, Rotation, anchor, bounding_box, grab_offset, placed_anchor,
    position_from_anchor, rotate_piece, rotate_segment_cw, rotate_segments,
};
pub use lifecycle::{Action, Source, reduce};
pub use occupancy::{Occupancy, OccupancyOp, collides, positions_of, update};
pub use piece::{BoardPosition, Piece, PieceId, PlacedPiece};
pub use segment::{Orientation, Segment, SegmentParseError, all_board_segments};
pub use state::{BoardState, Drag, DragState, GameState, InvariantViolation, Origin};

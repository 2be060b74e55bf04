//! Occupancy index: which board segments are covered
//!
//! The set is ordered so iteration (and the save format) is stable.

use std::collections::BTreeSet;

use super::piece::{BoardPosition, Piece};
use super::segment::Segment;

/// Covered board segments
pub type Occupancy = BTreeSet<Segment>;

/// Whether an update adds or frees a footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyOp {
    Add,
    Remove,
}

/// Absolute board segments of a piece at a position.
///
/// None when a coordinate overflows `i32`; such a position is off the board.
pub fn positions_of(piece: &Piece, position: BoardPosition) -> Option<Vec<Segment>> {
    piece
        .segments()
        .into_iter()
        .map(|seg| seg.translate(position.x, position.y))
        .collect()
}

/// True if any segment would leave the board or land on an occupied one
pub fn collides(piece: &Piece, position: BoardPosition, occupied: &Occupancy) -> bool {
    match positions_of(piece, position) {
        Some(segments) => segments
            .iter()
            .any(|seg| !seg.on_board() || occupied.contains(seg)),
        None => true,
    }
}

/// Functional add/remove of a piece footprint (idempotent per segment)
pub fn update(
    occupied: &Occupancy,
    piece: &Piece,
    position: BoardPosition,
    op: OccupancyOp,
) -> Occupancy {
    let mut next = occupied.clone();
    apply(&mut next, piece, position, op);
    next
}

/// In-place form of [`update`], used inside transitions that already own the set
pub(crate) fn apply(
    occupied: &mut Occupancy,
    piece: &Piece,
    position: BoardPosition,
    op: OccupancyOp,
) {
    let Some(segments) = positions_of(piece, position) else {
        return;
    };
    for seg in segments {
        match op {
            OccupancyOp::Add => {
                occupied.insert(seg);
            }
            OccupancyOp::Remove => {
                occupied.remove(&seg);
            }
        }
    }
}

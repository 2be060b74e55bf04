//! Pieces and board positions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::Digit;
use super::geometry::{Rotation, piece_segments};
use super::segment::Segment;

/// Stable piece identifier (`piece-0` .. `piece-9`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    pub fn for_digit(digit: Digit) -> Self {
        Self(format!("piece-{digit}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PieceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PieceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A digit piece. Its segments are always derived from `(number, rotation)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub number: Digit,
    pub rotation: Rotation,
}

impl Piece {
    /// Fresh unrotated piece for a digit
    pub fn new(number: Digit) -> Self {
        Self {
            id: PieceId::for_digit(number),
            number,
            rotation: Rotation::R0,
        }
    }

    /// Local segments with rotation applied
    pub fn segments(&self) -> Vec<Segment> {
        piece_segments(self.number, self.rotation)
    }
}

/// Top-left of a piece's local frame on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoardPosition {
    pub x: i32,
    pub y: i32,
}

impl BoardPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A piece sitting on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub position: BoardPosition,
}

impl PlacedPiece {
    /// Board segments covered by this piece (None if the position overflows)
    pub fn footprint(&self) -> Option<Vec<Segment>> {
        super::occupancy::positions_of(&self.piece, self.position)
    }
}

//! Rotation, bounding boxes and anchor points
//!
//! Rotation works in segment-edge coordinates about the grid origin:
//! - `(x, y, h)` -> `(y, -x - 1, v)`
//! - `(x, y, v)` -> `(y, -x, h)`
//!
//! A rotated set is then shifted so its minimum raw `x` and `y` are 0.
//! Rotation by 0 skips both steps, so base patterns keep their own offsets
//! (digit 1 starts at `x = 1`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{Digit, base_pattern};
use super::piece::{BoardPosition, Piece};
use super::segment::{Orientation, Segment};

/// Quarter-turn rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Number of clockwise quarter turns (0-3)
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Rotation reached after `turns` clockwise quarter turns from R0
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// Step one quarter turn in the given direction
    pub fn step(self, direction: Direction) -> Self {
        let turns = match direction {
            Direction::Clockwise => self.quarter_turns() + 1,
            Direction::CounterClockwise => self.quarter_turns() + 3,
        };
        Rotation::from_quarter_turns(turns)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees).ok_or_else(|| format!("invalid rotation: {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

/// Rotation direction requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Rotate one segment 90 degrees clockwise about the grid origin
#[inline]
pub fn rotate_segment_cw(segment: Segment) -> Segment {
    match segment.orientation {
        Orientation::Horizontal => Segment::v(segment.y, -segment.x - 1),
        Orientation::Vertical => Segment::h(segment.y, -segment.x),
    }
}

/// Rotate a segment set and renormalize it to the origin
pub fn rotate_segments(segments: &[Segment], rotation: Rotation) -> Vec<Segment> {
    if rotation == Rotation::R0 {
        return segments.to_vec();
    }

    let mut rotated: Vec<Segment> = segments.to_vec();
    for _ in 0..rotation.quarter_turns() {
        for seg in rotated.iter_mut() {
            *seg = rotate_segment_cw(*seg);
        }
    }
    normalize(&mut rotated);
    rotated
}

/// Shift segments so min raw x and min raw y are 0
fn normalize(segments: &mut [Segment]) {
    let Some(min_x) = segments.iter().map(|s| s.x).min() else {
        return;
    };
    let min_y = segments.iter().map(|s| s.y).min().unwrap_or(0);
    for seg in segments.iter_mut() {
        *seg = Segment::new(seg.x - min_x, seg.y - min_y, seg.orientation);
    }
}

/// Local segments of a digit at a rotation
pub fn piece_segments(number: Digit, rotation: Rotation) -> Vec<Segment> {
    rotate_segments(base_pattern(number), rotation)
}

/// Rotate a piece one quarter turn.
///
/// The rotation is recomputed from the base pattern every time, so four
/// steps in one direction land exactly on the starting shape.
pub fn rotate_piece(piece: &Piece, direction: Direction) -> Piece {
    Piece {
        rotation: piece.rotation.step(direction),
        ..piece.clone()
    }
}

/// Axis-aligned extent of a segment set in grid points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Bounding box of a segment set (None when empty).
///
/// Minimums use raw anchors; a horizontal segment reaches `x + 1` and a
/// vertical one reaches `y + 1`.
pub fn bounding_box(segments: &[Segment]) -> Option<BoundingBox> {
    let first = segments.first()?;
    let mut bbox = BoundingBox {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };
    for seg in segments {
        let (end_x, end_y) = match seg.orientation {
            Orientation::Horizontal => (seg.x + 1, seg.y),
            Orientation::Vertical => (seg.x, seg.y + 1),
        };
        bbox.min_x = bbox.min_x.min(seg.x);
        bbox.min_y = bbox.min_y.min(seg.y);
        bbox.max_x = bbox.max_x.max(end_x);
        bbox.max_y = bbox.max_y.max(end_y);
    }
    Some(bbox)
}

/// Per-digit nudge applied to the geometric center (unrotated frame)
const ANCHOR_TWEAKS: [(f32, f32); 10] = [
    (0.0, 0.05),
    (0.0, 0.0),
    (0.0, 0.0),
    (0.1, 0.0),
    (0.05, -0.1),
    (0.0, 0.0),
    (-0.05, 0.05),
    (0.1, -0.1),
    (0.0, 0.0),
    (0.05, -0.05),
];

/// Midpoint of a segment in grid units
#[inline]
pub fn midpoint(segment: &Segment) -> Vec2 {
    let (x, y) = (segment.x as f32, segment.y as f32);
    match segment.orientation {
        Orientation::Horizontal => Vec2::new(x + 0.5, y),
        Orientation::Vertical => Vec2::new(x, y + 0.5),
    }
}

/// Center of the box spanned by segment midpoints
fn midpoint_center(segments: &[Segment]) -> Vec2 {
    let mut points = segments.iter().map(midpoint);
    let Some(first) = points.next() else {
        return Vec2::ZERO;
    };
    let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    (min + max) * 0.5
}

/// Tweak vector turned with the piece (same point map as segment rotation)
fn rotated_tweak(number: Digit, rotation: Rotation) -> Vec2 {
    let (x, y) = ANCHOR_TWEAKS[number.value() as usize];
    let mut tweak = Vec2::new(x, y);
    for _ in 0..rotation.quarter_turns() {
        tweak = Vec2::new(tweak.y, -tweak.x);
    }
    tweak
}

/// Visual grab point of a piece in its local frame
pub fn anchor(piece: &Piece) -> Vec2 {
    midpoint_center(&piece.segments()) + rotated_tweak(piece.number, piece.rotation)
}

/// Visual grab point of a piece placed at `position`, in board units
pub fn placed_anchor(piece: &Piece, position: BoardPosition) -> Vec2 {
    anchor(piece) + Vec2::new(position.x as f32, position.y as f32)
}

/// Offset from the anchor to a grab point, both in local units
pub fn grab_offset(piece: &Piece, local_point: Vec2) -> Vec2 {
    local_point - anchor(piece)
}

/// Board position whose placed anchor is nearest to `point`
pub fn position_from_anchor(piece: &Piece, point: Vec2) -> BoardPosition {
    let origin = (point - anchor(piece)).round();
    BoardPosition::new(origin.x as i32, origin.y as i32)
}

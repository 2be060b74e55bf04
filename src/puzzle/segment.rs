//! Segment model for the edge grid
//!
//! A segment is one unit edge between two grid points:
//! - horizontal `(x, y)` spans `(x, y)`-`(x + 1, y)`
//! - vertical `(x, y)` spans `(x, y)`-`(x, y + 1)`
//!
//! The string id `"x,y,h"` / `"x,y,v"` is what the save format stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BOARD_HEIGHT, BOARD_SEGMENTS, BOARD_WIDTH};

/// Edge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Single-letter tag used in segment ids
    pub fn tag(&self) -> char {
        match self {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        }
    }
}

/// A unit edge of the grid graph (value type, identity = all three fields)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
}

impl Segment {
    pub const fn new(x: i32, y: i32, orientation: Orientation) -> Self {
        Self { x, y, orientation }
    }

    pub const fn h(x: i32, y: i32) -> Self {
        Self::new(x, y, Orientation::Horizontal)
    }

    pub const fn v(x: i32, y: i32) -> Self {
        Self::new(x, y, Orientation::Vertical)
    }

    /// Shift by a grid offset (None if a coordinate overflows)
    #[inline]
    pub fn translate(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.orientation,
        ))
    }

    /// Whether the segment lies on the board
    pub fn on_board(&self) -> bool {
        match self.orientation {
            Orientation::Horizontal => {
                (0..BOARD_WIDTH).contains(&self.x) && (0..=BOARD_HEIGHT).contains(&self.y)
            }
            Orientation::Vertical => {
                (0..=BOARD_WIDTH).contains(&self.x) && (0..BOARD_HEIGHT).contains(&self.y)
            }
        }
    }

    /// Stable string identity (`"x,y,h"`)
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.orientation.tag())
    }
}

/// A segment id that does not match `"x,y,h|v"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed segment id: {0:?}")]
pub struct SegmentParseError(pub String);

impl FromStr for Segment {
    type Err = SegmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SegmentParseError(s.to_string());
        let mut parts = s.split(',');
        let (Some(x), Some(y), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        let orientation = match tag.trim() {
            "h" => Orientation::Horizontal,
            "v" => Orientation::Vertical,
            _ => return Err(err()),
        };
        Ok(Self::new(x, y, orientation))
    }
}

/// Every segment of the board, horizontals first, row-major
pub fn all_board_segments() -> Vec<Segment> {
    let mut segments = Vec::with_capacity(BOARD_SEGMENTS);
    for y in 0..=BOARD_HEIGHT {
        for x in 0..BOARD_WIDTH {
            segments.push(Segment::h(x, y));
        }
    }
    for y in 0..BOARD_HEIGHT {
        for x in 0..=BOARD_WIDTH {
            segments.push(Segment::v(x, y));
        }
    }
    segments
}

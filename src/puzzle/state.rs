//! Game state: board, inventory and the in-flight piece
//!
//! Every piece lives in exactly one place: the inventory, the board, or the
//! drag. Fields are read through accessors; only the transition function in
//! `lifecycle` changes them.

use std::collections::HashSet;

use thiserror::Error;

use super::catalog::Digit;
use super::occupancy::{Occupancy, OccupancyOp, apply};
use super::piece::{BoardPosition, Piece, PieceId, PlacedPiece};

/// Placed pieces plus the segments they cover
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    pub(crate) placed: Vec<PlacedPiece>,
    pub(crate) occupied: Occupancy,
}

impl BoardState {
    pub fn placed_pieces(&self) -> &[PlacedPiece] {
        &self.placed
    }

    pub fn occupied_segments(&self) -> &Occupancy {
        &self.occupied
    }

    /// Find a placed piece by id
    pub fn find(&self, id: &PieceId) -> Option<&PlacedPiece> {
        self.placed.iter().find(|p| &p.piece.id == id)
    }

    pub(crate) fn index_of(&self, id: &PieceId) -> Option<usize> {
        self.placed.iter().position(|p| &p.piece.id == id)
    }

    /// Occupancy rebuilt from the placed pieces
    pub fn rebuilt_occupancy(&self) -> Occupancy {
        let mut occupied = Occupancy::new();
        for placed in &self.placed {
            apply(&mut occupied, &placed.piece, placed.position, OccupancyOp::Add);
        }
        occupied
    }
}

/// Where the in-flight piece came from (and where it goes back to)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Slot `index` in the inventory
    Inventory { index: usize },
    /// Slot `index` in the placed list, at `position`
    Board { index: usize, position: BoardPosition },
}

/// A piece lifted off the board or out of the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    /// Live piece (may be rotated while dragging)
    pub piece: Piece,
    pub origin: Origin,
    /// The piece as it was picked up
    pub snapshot: Piece,
}

/// Transient drag state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Drag),
}

impl DragState {
    pub fn active(&self) -> Option<&Drag> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(drag) => Some(drag),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

/// Root aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: BoardState,
    pub(crate) inventory: Vec<Piece>,
    pub(crate) drag: DragState,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A broken state invariant (always a bug, never user error)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("piece {0} appears more than once")]
    DuplicatePiece(PieceId),
    #[error("piece {id} placed at {position} leaves the board")]
    OffBoard { id: PieceId, position: BoardPosition },
    #[error("occupancy drifted: {missing} segments missing, {extra} extra")]
    OccupancyDrift { missing: usize, extra: usize },
    #[error("placed pieces overlap on segment {0}")]
    Overlap(String),
}

impl GameState {
    /// Initial state: all ten digits unrotated in the inventory
    pub fn new() -> Self {
        Self {
            board: BoardState::default(),
            inventory: Digit::all().map(Piece::new).collect(),
            drag: DragState::Idle,
        }
    }

    /// Assemble a state from parts that were validated elsewhere
    pub(crate) fn from_parts(placed: Vec<PlacedPiece>, inventory: Vec<Piece>) -> Self {
        let mut board = BoardState {
            placed,
            occupied: Occupancy::new(),
        };
        board.occupied = board.rebuilt_occupancy();
        Self {
            board,
            inventory,
            drag: DragState::Idle,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn inventory(&self) -> &[Piece] {
        &self.inventory
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Look up a piece wherever it currently is
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.inventory
            .iter()
            .find(|p| &p.id == id)
            .or_else(|| self.board.find(id).map(|placed| &placed.piece))
            .or_else(|| self.drag.active().map(|d| &d.piece).filter(|p| &p.id == id))
    }

    /// Check single ownership and that occupancy matches the placed pieces.
    ///
    /// While a piece is in flight it is held only by the drag; its footprint
    /// is absent from the occupancy, which the rebuilt set reflects.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        let ids = self
            .inventory
            .iter()
            .chain(self.board.placed.iter().map(|p| &p.piece))
            .chain(self.drag.active().map(|d| &d.piece))
            .map(|p| &p.id);
        for id in ids {
            if !seen.insert(id) {
                return Err(InvariantViolation::DuplicatePiece(id.clone()));
            }
        }

        let mut covered = Occupancy::new();
        for placed in &self.board.placed {
            let off_board = || InvariantViolation::OffBoard {
                id: placed.piece.id.clone(),
                position: placed.position,
            };
            for seg in placed.footprint().ok_or_else(off_board)? {
                if !seg.on_board() {
                    return Err(off_board());
                }
                if !covered.insert(seg) {
                    return Err(InvariantViolation::Overlap(seg.id()));
                }
            }
        }

        if covered != self.board.occupied {
            return Err(InvariantViolation::OccupancyDrift {
                missing: covered.difference(&self.board.occupied).count(),
                extra: self.board.occupied.difference(&covered).count(),
            });
        }
        Ok(())
    }
}

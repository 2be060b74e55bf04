//! Piece lifecycle transitions
//!
//! ```text
//! InInventory --pickUp--> InFlight --drop ok--> OnBoard
//!                         InFlight --drop blocked / cancel--> back where it came from
//! OnBoard --pickUp--> InFlight
//! OnBoard --returnToInventory--> InInventory
//! ```
//!
//! `reduce` is total: input that does not apply to the current state
//! (unknown id, wrong source, no drag) leaves the state unchanged.

use serde::{Deserialize, Serialize};

use super::geometry::{Direction, rotate_piece};
use super::occupancy::{OccupancyOp, apply, collides};
use super::piece::{BoardPosition, Piece, PieceId, PlacedPiece};
use super::state::{Drag, DragState, GameState, Origin};

/// Where a pickup starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    Inventory,
    /// The piece must currently sit at this position
    Board(BoardPosition),
}

/// Discrete player actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    PickUp { piece: PieceId, source: Source },
    Drop { position: BoardPosition },
    Cancel,
    Rotate { piece: PieceId, direction: Direction },
    ReturnToInventory { piece: PieceId },
    Reset,
    /// Replace everything with an already validated state
    #[serde(skip)]
    LoadState(Box<GameState>),
}

/// Apply one action, producing the next state
pub fn reduce(state: GameState, action: Action) -> GameState {
    match action {
        Action::PickUp { piece, source } => pick_up(state, &piece, source),
        Action::Drop { position } => drop_at(state, position),
        Action::Cancel => cancel(state),
        Action::Rotate { piece, direction } => rotate(state, &piece, direction),
        Action::ReturnToInventory { piece } => return_to_inventory(state, &piece),
        Action::Reset => GameState::new(),
        Action::LoadState(loaded) => *loaded,
    }
}

fn pick_up(mut state: GameState, id: &PieceId, source: Source) -> GameState {
    if let Some(drag) = state.drag.active() {
        log::debug!("pickUp {id} ignored: {} already in flight", drag.piece.id);
        return state;
    }

    let drag = match source {
        Source::Inventory => {
            let Some(index) = state.inventory.iter().position(|p| &p.id == id) else {
                log::debug!("pickUp {id} ignored: not in inventory");
                return state;
            };
            let piece = state.inventory.remove(index);
            Drag {
                snapshot: piece.clone(),
                piece,
                origin: Origin::Inventory { index },
            }
        }
        Source::Board(position) => {
            let Some(index) = state.board.index_of(id) else {
                log::debug!("pickUp {id} ignored: not on board");
                return state;
            };
            if state.board.placed[index].position != position {
                log::debug!("pickUp {id} ignored: not at {position}");
                return state;
            }
            let placed = state.board.placed.remove(index);
            apply(
                &mut state.board.occupied,
                &placed.piece,
                placed.position,
                OccupancyOp::Remove,
            );
            Drag {
                snapshot: placed.piece.clone(),
                piece: placed.piece,
                origin: Origin::Board { index, position },
            }
        }
    };

    state.drag = DragState::Dragging(drag);
    state
}

fn drop_at(mut state: GameState, position: BoardPosition) -> GameState {
    let DragState::Dragging(drag) = std::mem::take(&mut state.drag) else {
        log::debug!("drop at {position} ignored: nothing in flight");
        return state;
    };

    if collides(&drag.piece, position, &state.board.occupied) {
        log::debug!("drop of {} at {position} blocked, reverting", drag.piece.id);
        restore(&mut state, drag);
        return state;
    }

    apply(
        &mut state.board.occupied,
        &drag.piece,
        position,
        OccupancyOp::Add,
    );
    let placed = PlacedPiece {
        piece: drag.piece,
        position,
    };
    match drag.origin {
        Origin::Inventory { .. } => state.board.placed.push(placed),
        Origin::Board { index, .. } => {
            let index = index.min(state.board.placed.len());
            state.board.placed.insert(index, placed);
        }
    }
    state
}

fn cancel(mut state: GameState) -> GameState {
    match std::mem::take(&mut state.drag) {
        DragState::Idle => log::debug!("cancel ignored: nothing in flight"),
        DragState::Dragging(drag) => restore(&mut state, drag),
    }
    state
}

/// Put the snapshot back where the drag started.
///
/// A board pickup removed the snapshot's footprint, so the same footprint
/// goes back here even if the live piece was rotated in between.
fn restore(state: &mut GameState, drag: Drag) {
    match drag.origin {
        Origin::Inventory { index } => {
            let index = index.min(state.inventory.len());
            state.inventory.insert(index, drag.snapshot);
        }
        Origin::Board { index, position } => {
            apply(
                &mut state.board.occupied,
                &drag.snapshot,
                position,
                OccupancyOp::Add,
            );
            let index = index.min(state.board.placed.len());
            state.board.placed.insert(
                index,
                PlacedPiece {
                    piece: drag.snapshot,
                    position,
                },
            );
        }
    }
}

fn rotate(mut state: GameState, id: &PieceId, direction: Direction) -> GameState {
    if let DragState::Dragging(drag) = &mut state.drag
        && &drag.piece.id == id
    {
        drag.piece = rotate_piece(&drag.piece, direction);
        return state;
    }
    if let Some(piece) = state.inventory.iter_mut().find(|p| &p.id == id) {
        *piece = rotate_piece(piece, direction);
    } else {
        log::debug!("rotate {id} ignored: not in inventory or in flight");
    }
    state
}

fn return_to_inventory(mut state: GameState, id: &PieceId) -> GameState {
    let in_flight = state.drag.active().is_some_and(|d| &d.piece.id == id);
    if in_flight {
        if let DragState::Dragging(drag) = std::mem::take(&mut state.drag) {
            match drag.origin {
                Origin::Inventory { .. } => restore(&mut state, drag),
                // Footprint was freed at pickup
                Origin::Board { .. } => push_unique(&mut state.inventory, drag.snapshot),
            }
        }
        return state;
    }

    let Some(index) = state.board.index_of(id) else {
        log::debug!("returnToInventory {id} ignored: not on board");
        return state;
    };
    let placed = state.board.placed.remove(index);
    apply(
        &mut state.board.occupied,
        &placed.piece,
        placed.position,
        OccupancyOp::Remove,
    );
    push_unique(&mut state.inventory, placed.piece);
    state
}

fn push_unique(inventory: &mut Vec<Piece>, piece: Piece) {
    if inventory.iter().any(|p| p.id == piece.id) {
        log::warn!("{} already in inventory, not adding twice", piece.id);
        return;
    }
    inventory.push(piece);
}

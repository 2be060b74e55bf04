//! End-to-end board scenarios through the public API

use digit_puzzle::persistence::{self, deserialize, serialize};
use digit_puzzle::platform::MemoryStorage;
use digit_puzzle::puzzle::{
    Action, BoardPosition, Direction, GameState, Occupancy, PieceId, Rotation, Segment, Source,
    base_pattern, reduce,
};
use digit_puzzle::{PuzzleSession, Settings};
use proptest::prelude::*;

fn id(n: u8) -> PieceId {
    PieceId::from(format!("piece-{n}"))
}

fn apply_all(state: GameState, actions: Vec<Action>) -> GameState {
    actions.into_iter().fold(state, reduce)
}

#[test]
fn place_one_at_two_one() {
    let state = apply_all(
        GameState::new(),
        vec![
            Action::PickUp { piece: id(1), source: Source::Inventory },
            Action::Drop { position: BoardPosition::new(2, 1) },
        ],
    );

    assert_eq!(state.inventory().len(), 9);
    assert!(state.inventory().iter().all(|p| p.id != id(1)));

    let placed = state.board().placed_pieces();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].piece.id, id(1));
    assert_eq!(placed[0].position, BoardPosition::new(2, 1));

    let expected: Occupancy = [Segment::v(3, 1), Segment::v(3, 2)].into_iter().collect();
    assert_eq!(state.board().occupied_segments(), &expected);
    assert!(!state.drag().is_dragging());
}

#[test]
fn pick_up_and_redrop_in_place() {
    let placed = apply_all(
        GameState::new(),
        vec![
            Action::PickUp { piece: id(1), source: Source::Inventory },
            Action::Drop { position: BoardPosition::new(2, 1) },
        ],
    );
    let again = apply_all(
        placed.clone(),
        vec![
            Action::PickUp { piece: id(1), source: Source::Board(BoardPosition::new(2, 1)) },
            Action::Drop { position: BoardPosition::new(2, 1) },
        ],
    );
    assert_eq!(again, placed);
}

#[test]
fn reset_restores_base_shapes() {
    let messy = apply_all(
        GameState::new(),
        vec![
            Action::Rotate { piece: id(6), direction: Direction::Clockwise },
            Action::PickUp { piece: id(6), source: Source::Inventory },
            Action::Drop { position: BoardPosition::new(0, 0) },
            Action::PickUp { piece: id(2), source: Source::Inventory },
        ],
    );
    let state = reduce(messy, Action::Reset);
    assert_eq!(state.inventory().len(), 10);
    for piece in state.inventory() {
        assert_eq!(piece.rotation, Rotation::R0);
        assert_eq!(piece.segments(), base_pattern(piece.number));
    }
    assert!(state.board().placed_pieces().is_empty());
    assert!(state.board().occupied_segments().is_empty());
    assert!(!state.drag().is_dragging());
}

#[test]
fn session_survives_restart() {
    let mut session = PuzzleSession::new(MemoryStorage::new(), Settings::default());
    session.dispatch(Action::Rotate { piece: id(4), direction: Direction::CounterClockwise });
    session.dispatch(Action::PickUp { piece: id(4), source: Source::Inventory });
    session.dispatch(Action::Drop { position: BoardPosition::new(1, 2) });
    // Left mid-drag when the page closes
    session.dispatch(Action::PickUp { piece: id(9), source: Source::Inventory });

    let reopened = PuzzleSession::restore(session.storage().clone(), Settings::default());
    assert!(!reopened.state().drag().is_dragging());
    assert_eq!(reopened.state().inventory().len(), 9);
    assert_eq!(reopened.state().board().placed_pieces()[0].piece.rotation, Rotation::R270);
}

#[test]
fn corrupt_save_starts_fresh() {
    use digit_puzzle::platform::Storage;

    let mut storage = MemoryStorage::new();
    storage
        .set_item(&Settings::default().save_key, r#"{"version":"1.0","timestamp":0,"board":{"placedPieces":[{"pieceId":"piece-8","number":8,"rotation":0,"position":{"x":9,"y":9}}]},"inventory":[]}"#)
        .unwrap();
    assert_eq!(
        persistence::load_or_reset(&storage, &Settings::default().save_key),
        GameState::new()
    );
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let piece = (0u8..=9).prop_map(id);
    let pos = (0i32..5, 0i32..4).prop_map(|(x, y)| BoardPosition::new(x, y));
    prop_oneof![
        piece.clone().prop_map(|piece| Action::PickUp { piece, source: Source::Inventory }),
        pos.prop_map(|position| Action::Drop { position }),
        (piece.clone(), any::<bool>()).prop_map(|(piece, cw)| Action::Rotate {
            piece,
            direction: if cw { Direction::Clockwise } else { Direction::CounterClockwise },
        }),
        piece.prop_map(|piece| Action::ReturnToInventory { piece }),
    ]
}

proptest! {
    #[test]
    fn save_round_trip_is_structural(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let state = reduce(apply_all(GameState::new(), actions), Action::Cancel);
        let saved = serialize(&state, 0.0);
        let json = serde_json::to_string(&saved).unwrap();
        let reloaded = deserialize(&serde_json::from_str(&json).unwrap()).unwrap();
        prop_assert_eq!(reloaded, state);
    }
}

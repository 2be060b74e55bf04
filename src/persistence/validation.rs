//! Load-time validation
//!
//! A save is accepted whole or not at all. Segments are always recomputed
//! from `(number, rotation)`; the stored occupancy list is only compared
//! against the rebuilt one.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use super::envelope::PersistedState;
use crate::consts::SAVE_VERSION;
use crate::puzzle::{
    BoardPosition, Digit, GameState, Occupancy, Piece, PieceId, PlacedPiece, Rotation, Segment,
    positions_of,
};

/// Why a save was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported save version {0:?}")]
    UnsupportedVersion(String),
    #[error("piece {piece_id}: number {number} is not a digit")]
    DigitOutOfRange { piece_id: String, number: i64 },
    #[error("piece {piece_id}: rotation {rotation} is not 0, 90, 180 or 270")]
    InvalidRotation { piece_id: String, rotation: i64 },
    #[error("piece {0} appears more than once")]
    DuplicatePiece(String),
    #[error("piece {piece_id} does not belong to digit {number}")]
    MismatchedId { piece_id: String, number: u8 },
    #[error("save is missing piece {0}")]
    MissingPiece(String),
    #[error("piece {piece_id} at {position} leaves the board")]
    OffBoard {
        piece_id: String,
        position: BoardPosition,
    },
    #[error("piece {piece_id} overlaps segment {segment}")]
    Overlap { piece_id: String, segment: String },
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

fn check_version(version: &str) -> Result<(), ValidationError> {
    if major(version) != major(SAVE_VERSION) {
        return Err(ValidationError::UnsupportedVersion(version.to_string()));
    }
    Ok(())
}

fn piece_from(piece_id: &str, number: i64, rotation: i64) -> Result<Piece, ValidationError> {
    let digit = u8::try_from(number)
        .ok()
        .and_then(Digit::new)
        .ok_or_else(|| ValidationError::DigitOutOfRange {
            piece_id: piece_id.to_string(),
            number,
        })?;
    if PieceId::for_digit(digit).as_str() != piece_id {
        return Err(ValidationError::MismatchedId {
            piece_id: piece_id.to_string(),
            number: digit.value(),
        });
    }
    let rotation = u16::try_from(rotation)
        .ok()
        .and_then(Rotation::from_degrees)
        .ok_or_else(|| ValidationError::InvalidRotation {
            piece_id: piece_id.to_string(),
            rotation,
        })?;
    Ok(Piece {
        id: PieceId::from(piece_id),
        number: digit,
        rotation,
    })
}

fn claim<'a>(seen: &mut HashSet<&'a str>, piece_id: &'a str) -> Result<(), ValidationError> {
    if !seen.insert(piece_id) {
        return Err(ValidationError::DuplicatePiece(piece_id.to_string()));
    }
    Ok(())
}

/// Rebuild a game state from a save, rejecting anything inconsistent
pub fn deserialize(saved: &PersistedState) -> Result<GameState, ValidationError> {
    check_version(&saved.version)?;

    let mut seen = HashSet::new();

    let mut inventory = Vec::with_capacity(saved.inventory.len());
    for stored in &saved.inventory {
        claim(&mut seen, &stored.piece_id)?;
        inventory.push(piece_from(&stored.piece_id, stored.number, stored.rotation)?);
    }

    let mut covered = Occupancy::new();
    let mut placed = Vec::with_capacity(saved.board.placed_pieces.len());
    for stored in &saved.board.placed_pieces {
        claim(&mut seen, &stored.piece_id)?;
        let piece = piece_from(&stored.piece_id, stored.number, stored.rotation)?;
        let off_board = || ValidationError::OffBoard {
            piece_id: stored.piece_id.clone(),
            position: stored.position,
        };
        for seg in positions_of(&piece, stored.position).ok_or_else(off_board)? {
            if !seg.on_board() {
                return Err(off_board());
            }
            if !covered.insert(seg) {
                return Err(ValidationError::Overlap {
                    piece_id: stored.piece_id.clone(),
                    segment: seg.id(),
                });
            }
        }
        placed.push(PlacedPiece {
            piece,
            position: stored.position,
        });
    }

    // Ids are unique and tied to their digit, so this leaves exactly one per digit
    if let Some(missing) = Digit::all()
        .map(PieceId::for_digit)
        .find(|id| !seen.contains(id.as_str()))
    {
        return Err(ValidationError::MissingPiece(missing.to_string()));
    }

    let state = GameState::from_parts(placed, inventory);

    let stored: Result<BTreeSet<Segment>, _> = saved
        .board
        .occupied_segments
        .iter()
        .map(|id| id.parse::<Segment>())
        .collect();
    match stored {
        Ok(stored) if &stored == state.board().occupied_segments() => {}
        Ok(stored) => log::warn!(
            "stored occupancy ({} segments) disagrees with placements ({}), using placements",
            stored.len(),
            state.board().occupied_segments().len()
        ),
        Err(e) => log::warn!("ignoring stored occupancy: {e}"),
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::envelope::{PersistedPiece, PersistedPlacement, serialize};

    fn fresh() -> PersistedState {
        serialize(&GameState::new(), 0.0)
    }

    fn with_placement(number: i64, rotation: i64, x: i32, y: i32) -> PersistedState {
        let mut saved = fresh();
        let id = format!("piece-{number}");
        saved.inventory.retain(|p| p.piece_id != id);
        saved.board.placed_pieces.push(PersistedPlacement {
            piece_id: id,
            number,
            rotation,
            position: BoardPosition::new(x, y),
        });
        saved
    }

    #[test]
    fn test_fresh_round_trip() {
        assert_eq!(deserialize(&fresh()), Ok(GameState::new()));
    }

    #[test]
    fn test_rebuilds_occupancy_from_placements() {
        let mut saved = with_placement(1, 0, 2, 1);
        saved.board.occupied_segments = vec!["0,0,h".into(), "garbage".into()];
        let state = deserialize(&saved).unwrap();
        let expected: Occupancy = [Segment::v(3, 1), Segment::v(3, 2)].into_iter().collect();
        assert_eq!(state.board().occupied_segments(), &expected);
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_digit() {
        let mut saved = fresh();
        saved.inventory[3].number = 12;
        assert!(matches!(
            deserialize(&saved),
            Err(ValidationError::DigitOutOfRange { number: 12, .. })
        ));
        saved.inventory[3].number = -1;
        assert!(matches!(
            deserialize(&saved),
            Err(ValidationError::DigitOutOfRange { number: -1, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_rotation() {
        for rotation in [45, 360, -90] {
            let saved = with_placement(2, rotation, 0, 0);
            assert_eq!(
                deserialize(&saved),
                Err(ValidationError::InvalidRotation {
                    piece_id: "piece-2".into(),
                    rotation,
                })
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_across_board_and_inventory() {
        let mut saved = with_placement(5, 0, 0, 0);
        saved.inventory.push(PersistedPiece {
            piece_id: "piece-5".into(),
            number: 5,
            rotation: 0,
        });
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::DuplicatePiece("piece-5".into()))
        );
    }

    #[test]
    fn test_rejects_off_board() {
        let saved = with_placement(8, 0, 4, 3);
        assert!(matches!(deserialize(&saved), Err(ValidationError::OffBoard { .. })));
    }

    #[test]
    fn test_rejects_overflowing_position() {
        let saved = with_placement(1, 0, i32::MAX, 0);
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::OffBoard {
                piece_id: "piece-1".into(),
                position: BoardPosition::new(i32::MAX, 0),
            })
        );
    }

    #[test]
    fn test_rejects_missing_piece() {
        let mut saved = fresh();
        saved.inventory.retain(|p| p.piece_id != "piece-6");
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::MissingPiece("piece-6".into()))
        );

        saved.inventory.clear();
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::MissingPiece("piece-0".into()))
        );
    }

    #[test]
    fn test_rejects_id_not_matching_digit() {
        let mut saved = fresh();
        saved.inventory[3].number = 8;
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::MismatchedId {
                piece_id: "piece-3".into(),
                number: 8,
            })
        );

        let mut saved = fresh();
        saved.inventory[3].piece_id = "zzz".into();
        assert!(matches!(
            deserialize(&saved),
            Err(ValidationError::MismatchedId { number: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_overlap() {
        let mut saved = with_placement(8, 0, 0, 0);
        saved.inventory.retain(|p| p.piece_id != "piece-7");
        saved.board.placed_pieces.push(PersistedPlacement {
            piece_id: "piece-7".into(),
            number: 7,
            rotation: 0,
            position: BoardPosition::new(0, 0),
        });
        assert!(matches!(deserialize(&saved), Err(ValidationError::Overlap { .. })));
    }

    #[test]
    fn test_version_major_must_match() {
        let mut saved = fresh();
        saved.version = "1.7".into();
        assert!(deserialize(&saved).is_ok());
        saved.version = "2.0".into();
        assert_eq!(
            deserialize(&saved),
            Err(ValidationError::UnsupportedVersion("2.0".into()))
        );
    }
}

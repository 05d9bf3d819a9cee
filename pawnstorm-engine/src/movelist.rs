//! MoveList types used in Pawnstorm engine.
//!
//! The underlying type of each list may change, so type aliases keep changes easy.

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MoveInfo, Square, MAX_DESTINATIONS, MAX_MOVES};

/// SquareList holds the destinations of a single piece, at most `MAX_DESTINATIONS`.
pub type SquareList = ArrayVec<Square, MAX_DESTINATIONS>;
/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
/// MoveHistory is the sequence of moves applied over a game, with metadata.
pub type MoveHistory = Vec<MoveInfo>;

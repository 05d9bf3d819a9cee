//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! A simple debugging and testing function used to count
//! the number of nodes at a specific depth.

use std::ops::{Add, AddAssign};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::coretypes::Move;
use crate::movelist::MoveList;
use crate::position::Position;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

// Count the number of nodes at a certain depth.
// This ignores higher terminal nodes.
// In other words, it counts the number of paths to the given depth.
pub fn perft(position: Position, ply: u8, threads: usize) -> PerftInfo {
    // Guard easy to calculate inputs.
    if ply == 0 {
        // Ever only 1 position at 0 ply.
        return PerftInfo::new(1);
    } else if ply <= 2 || threads <= 1 {
        // Simple enough to not require threads, or single threaded.
        return perft_recurse(&position, ply);
    }
    debug_assert!(ply > 2);
    debug_assert!(threads > 1);

    let legal_moves = position.get_legal_moves();
    // Guard no moves to search.
    if legal_moves.is_empty() {
        return PerftInfo::new(0);
    }

    let legal_moves = Arc::new(Mutex::new(legal_moves));
    let mut handles = Vec::with_capacity(threads);

    // Each thread works on its own copy of the position.
    for _ in 0..threads {
        let legal_moves = Arc::clone(&legal_moves);
        handles.push(thread::spawn(move || {
            perft_executor(position, ply, legal_moves)
        }));
    }

    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(perft_info) => perft_info,
            Err(panic) => std::panic::resume_unwind(panic),
        })
        .fold(PerftInfo::new(0), |acc, perft_info| acc + perft_info)
}

/// perft_executor works by stealing one move at a time from given moves list and running perft on that move.
/// When there are no moves left to steal, this function returns the data it has collected.
/// params:
/// position - position to evaluate moves on.
/// ply - ply of provided position. Must be greater than 1.
/// moves - synchronous access to list of moves to steal from. Moves must be legal for given position.
fn perft_executor(position: Position, ply: u8, moves: Arc<Mutex<MoveList>>) -> PerftInfo {
    debug_assert!(ply > 1);
    let mut perft_info = PerftInfo::new(0);

    while let Some(move_) = steal(&moves) {
        let mut child = position;
        child.do_move(move_);
        perft_info += perft_recurse(&child, ply - 1);
    }

    perft_info
}

/// Pop one move from the shared list. A poisoned list still holds valid moves.
fn steal(moves: &Mutex<MoveList>) -> Option<Move> {
    let mut guard = moves.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.pop()
}

/// Ply must be non-zero.
fn perft_recurse(position: &Position, ply: u8) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    let legal_moves = position.get_legal_moves();
    if ply == 1 {
        // If we reach the depth before the end,
        // return the count of legal moves.
        PerftInfo::new(legal_moves.len() as u64)
    } else {
        let mut perft_info = PerftInfo::new(0);
        for legal_move in legal_moves {
            let mut child = *position;
            child.do_move(legal_move);
            perft_info += perft_recurse(&child, ply - 1);
        }
        perft_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_start_position_shallow() {
        let position = Position::start_position();
        assert_eq!(perft(position, 0, 1).nodes, 1);
        assert_eq!(perft(position, 1, 1).nodes, 20);
        assert_eq!(perft(position, 2, 1).nodes, 400);
    }

    #[test]
    fn perft_threads_agree() {
        let position = Position::start_position();
        let single = perft(position, 3, 1);
        let multi = perft(position, 3, 4);
        assert_eq!(single.nodes, 8_902);
        assert_eq!(single, multi);
    }
}

//! Performance Test (perft)
//!
//! Tests to ensure move generation passes Perft test by checking against pre-determined results.
//! [Perft Results](https://www.chessprogramming.org/Perft_Results)

use std::thread::available_parallelism;

use pawnstorm_engine::perft::*;
use pawnstorm_engine::*;

const ONE_THREAD: usize = 1;

fn cpu_threads() -> usize {
    available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1)
}

/// Run single and multithreaded perft `expected_nodes.len()` times.
/// The index of each expected_node value is its ply.
fn perft_tester(position: Position, expected_nodes: Vec<u64>) {
    for (ply, expected_node) in expected_nodes.into_iter().enumerate() {
        let single_thread_result = perft(position, ply as u8, ONE_THREAD);
        let multi_thread_result = perft(position, ply as u8, cpu_threads());

        println!("perft({ply}): {single_thread_result:?}");
        assert_eq!(single_thread_result.nodes, expected_node);
        assert_eq!(single_thread_result, multi_thread_result);
    }
}

#[test]
fn perft_starting_position() {
    perft_tester(Position::start_position(), vec![1, 20, 400, 8_902]);
}

#[test]
fn perft_starting_position_ply_4() {
    let ply4 = perft(Position::start_position(), 4, cpu_threads());
    println!("perft(4): {:?}", ply4);
    assert_eq!(ply4.nodes, 197_281);
}

#[test]
fn perft_after_double_push_counts_en_passant_window() {
    // After 1. e4 d5 2. e5 f5, exd6 and exf6 are not both available: only the
    // pawn that just moved can be taken en passant.
    let mut position = Position::start_position();
    for move_ in ["e2e4", "d7d5", "e4e5", "f7f5"] {
        position.apply_move(move_.parse().unwrap()).unwrap();
    }
    let moves = position.get_legal_moves();
    assert!(moves.contains(&"e5f6".parse().unwrap()));
    assert!(!moves.contains(&"e5d6".parse().unwrap()));
    assert_eq!(perft(position, 1, ONE_THREAD).nodes, moves.len() as u64);
}

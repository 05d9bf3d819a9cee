//! Offset tables describing how each piece kind steps across the board.
//!
//! Offsets are (files, ranks) pairs, added to a Square with `Square::offset`.

/// The 8 jumps of a knight.
#[rustfmt::skip]
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    ( 1, -2), ( 1, 2), ( 2, -1), ( 2, 1),
];

/// The 8 adjacent squares of a king.
#[rustfmt::skip]
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Ray directions of a bishop.
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Ray directions of a rook.
pub const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// File offsets of a pawn's diagonal captures.
pub const PAWN_CAPTURE_FILES: [i8; 2] = [-1, 1];

//! A [mailbox](https://www.chessprogramming.org/Mailbox) is a square-centric
//! representation of a chess board.
//!
//! A Mailbox is an array of size Files x Ranks where each index holds a
//! signed piece tag, zero for an empty square.

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::coretypes::{Color, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS, NUM_SQUARES};

/// Classic 8x8 square board representation of Chess board.
/// Index starts at A1.
/// A1 = idx 0
/// B1 = idx 1
/// A2 = idx 8
/// H8 = idx 63
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Mailbox {
    board: [Piece; Self::SIZE],
}

impl Mailbox {
    pub const FILES: usize = NUM_FILES;
    pub const RANKS: usize = NUM_RANKS;
    pub const SIZE: usize = NUM_SQUARES;

    /// Creates an empty Mailbox, where all squares are empty.
    pub fn new() -> Self {
        Mailbox {
            board: [Piece::EMPTY; Self::SIZE],
        }
    }

    /// Create Mailbox with pieces arranged in starting chess position.
    pub fn start_position() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; NUM_FILES] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut mb = Self::new();

        for color in Color::iter() {
            for (file, piece_kind) in (0..).zip(BACK_RANK) {
                mb[Square::new(file, color.back_rank())] = Piece::new(color, piece_kind);
                mb[Square::new(file, color.pawn_rank())] = Piece::new(color, Pawn);
            }
        }

        mb
    }

    /// Create a Mailbox holding only the given pieces.
    /// Panics if any square is out of bounds.
    pub fn with_pieces<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        let mut mb = Self::new();
        for (square, piece) in pieces {
            mb[square] = piece;
        }
        mb
    }

    /// Moves whatever is on from to to, leaving from empty.
    /// Anything on to is overwritten. Both squares must be valid.
    pub fn relocate(&mut self, from: Square, to: Square) {
        let piece = self[from];
        self[from] = Piece::EMPTY;
        self[to] = piece;
    }

    /// Scans the board for the king of color, returning the first one found.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::iter().find(|&square| self[square] == king)
    }

    /// Iterates over all squares holding a piece of color.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        Square::iter().filter(move |&square| self[square].is_color(color))
    }

    /// Returns pretty-printed chess board representation of Self.
    /// The chess board has borders and file/rank indicators.
    pub fn pretty(&self) -> String {
        self.pretty_with(&[], false)
    }

    /// Pretty-printed board where each square in highlights is bracketed.
    /// Pieces are printed as letters, or as Unicode glyphs if unicode is set.
    pub fn pretty_with(&self, highlights: &[Square], unicode: bool) -> String {
        const RANK_SEP: &str = "+---+---+---+---+---+---+---+---+\n";
        let mut pretty = String::with_capacity(700);

        pretty.push_str(RANK_SEP);
        for rank in (0..Self::RANKS as i8).rev() {
            pretty.push('|');

            for file in 0..Self::FILES as i8 {
                let square = Square::new(file, rank);
                let piece = self[square];
                let symbol = match (unicode, piece.is_empty()) {
                    (_, true) => ' ',
                    (true, false) => piece.to_unicode(),
                    (false, false) => piece.to_char(),
                };
                let (open, close) = match highlights.contains(&square) {
                    true => ('[', ']'),
                    false => (' ', ' '),
                };
                pretty.push(open);
                pretty.push(symbol);
                pretty.push(close);
                pretty.push('|');
            }
            pretty.push(' ');
            pretty.push_str(&(rank + 1).to_string());
            pretty.push('\n');
            pretty.push_str(RANK_SEP);
        }
        pretty.push_str("  a   b   c   d   e   f   g   h\n");

        pretty
    }
}

/// Square must be valid, an out of bounds square will panic.
impl Index<Square> for Mailbox {
    type Output = Piece;
    fn index(&self, square: Square) -> &Self::Output {
        &self.board[square.idx()]
    }
}

impl IndexMut<Square> for Mailbox {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.board[square.idx()]
    }
}

/// Default value is that of a standard starting chess position.
impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::start_position()
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

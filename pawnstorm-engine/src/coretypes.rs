//! The fundamental and simple types of `pawnstorm_engine`.

use std::fmt::{self, Display, Write};
use std::mem::replace;
use std::ops::Not;
use std::str::FromStr;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // a, b, c, d, e, f, g, h
pub const NUM_RANKS: usize = 8; // 1, 2, 3, 4, 5, 6, 7, 8
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

// The most destinations a single piece can have, a queen in the center of an empty board.
pub const MAX_DESTINATIONS: usize = 27;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Color can represent the color of a piece, or a player.
/// White owns the positive piece tags and starts on rank 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

/// Kinds of chess pieces. Discriminants are the magnitude of a piece tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

/// A signed piece tag.
/// Zero is an empty square, the magnitude is the PieceKind and the sign is the owner:
/// positive for White, negative for Black.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Piece(i8);

/// A board coordinate as a (file, rank) pair.
/// A Square may be constructed out of bounds, so anything reading the board
/// through it must check `is_valid` first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Square {
    file: i8,
    rank: i8,
}

/// Which rook a king castles with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Castling bookkeeping for a game.
/// Records, per origin square, whether the piece that started there has ever moved.
/// A bit is set for the square index of every `from` square a move was played from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Castling(u64);

/// Move
/// Coordinate form of moving a single chess piece, a chess "half move" or "ply".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
}

/// Enum describing the kind of a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MoveKind {
    /// Move resulted in a capture.
    Capture(PieceKind),
    /// No special moves or captures, simply moved to empty square.
    Quiet,
    /// This move was the special castling move.
    Castle(CastleSide),
    /// En passant capture.
    EnPassant,
}

/// MoveInfo contains extra properties of a move in context of the position it was played in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MoveInfo {
    /// Original square of moving piece.
    pub(crate) from: Square,
    /// Target square of moving piece.
    pub(crate) to: Square,
    /// The piece that was moved.
    pub(crate) piece: Piece,
    /// Flag if move was a regular or special move.
    pub(crate) move_kind: MoveKind,
}

/// Outcome of a game. Only checkmate ends a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GameState {
    #[default]
    InProgress,
    WhiteWins,
    BlackWins,
}

//////////////////////
/// Implementations //
//////////////////////

impl Color {
    /// Sign of the piece tags this color owns.
    pub const fn sign(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank direction pawns of this color advance in.
    pub const fn forward(&self) -> i8 {
        self.sign()
    }

    /// Rank the pieces of this color start on.
    pub const fn back_rank(&self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank the pawns of this color start on, and may double push from.
    pub const fn pawn_rank(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn of this color must stand on to capture en passant.
    pub const fn en_passant_rank(&self) -> i8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }

    pub const fn iter() -> ColorIterator {
        ColorIterator::new()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

pub struct ColorIterator {
    maybe_color: Option<Color>,
}

impl ColorIterator {
    pub const fn new() -> Self {
        Self {
            maybe_color: Some(Color::White),
        }
    }
}

impl Iterator for ColorIterator {
    type Item = Color;
    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.maybe_color {
            Some(Color::White) => Some(Color::Black),
            Some(Color::Black) | None => None,
        };
        replace(&mut self.maybe_color, value)
    }
}

impl PieceKind {
    /// Letter for this piece kind, uppercase.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// PieceKind variants cover the magnitudes 1-6 inclusive.
    pub const fn from_magnitude(value: i8) -> Option<Self> {
        use PieceKind::*;
        match value {
            1 => Some(Pawn),
            2 => Some(Knight),
            3 => Some(Bishop),
            4 => Some(Rook),
            5 => Some(Queen),
            6 => Some(King),
            _ => None,
        }
    }
}

impl Piece {
    /// The empty square tag.
    pub const EMPTY: Piece = Piece(0);

    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece(color.sign() * piece_kind as i8)
    }

    /// Raw signed tag of this piece.
    pub const fn tag(&self) -> i8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Owner of this piece as a sign: 1 for White, -1 for Black, 0 for empty.
    pub const fn sign(&self) -> i8 {
        self.0.signum()
    }

    /// Owner of this piece, None for empty.
    pub const fn color(&self) -> Option<Color> {
        match self.sign() {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            _ => None,
        }
    }

    /// Kind of this piece, from the magnitude of its tag. None for empty.
    pub const fn kind(&self) -> Option<PieceKind> {
        PieceKind::from_magnitude(self.0.wrapping_abs())
    }

    /// Returns true if this piece belongs to color.
    pub const fn is_color(&self, color: Color) -> bool {
        self.sign() == color.sign()
    }

    /// Returns true if this square holds a piece of the opponent of color.
    pub const fn is_enemy_of(&self, color: Color) -> bool {
        self.sign() == -color.sign()
    }

    /// Returns true if this is exactly the given piece.
    pub fn is(&self, color: Color, piece_kind: PieceKind) -> bool {
        *self == Piece::new(color, piece_kind)
    }

    /// Letter representation, uppercase for White and lowercase for Black, '.' for empty.
    pub fn to_char(&self) -> char {
        match (self.color(), self.kind()) {
            (Some(Color::White), Some(piece_kind)) => piece_kind.to_char(),
            (Some(Color::Black), Some(piece_kind)) => piece_kind.to_char().to_ascii_lowercase(),
            _ => '.',
        }
    }

    /// Unicode chess glyph representation, '·' for empty.
    pub fn to_unicode(&self) -> char {
        use Color::*;
        use PieceKind::*;
        match (self.color(), self.kind()) {
            (Some(White), Some(King)) => '♔',
            (Some(White), Some(Queen)) => '♕',
            (Some(White), Some(Rook)) => '♖',
            (Some(White), Some(Bishop)) => '♗',
            (Some(White), Some(Knight)) => '♘',
            (Some(White), Some(Pawn)) => '♙',
            (Some(Black), Some(King)) => '♚',
            (Some(Black), Some(Queen)) => '♛',
            (Some(Black), Some(Rook)) => '♜',
            (Some(Black), Some(Bishop)) => '♝',
            (Some(Black), Some(Knight)) => '♞',
            (Some(Black), Some(Pawn)) => '♟',
            _ => '·',
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl Square {
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// 0-based file, a = 0.
    pub const fn file(&self) -> i8 {
        self.file
    }

    /// 0-based rank, 1 = 0.
    pub const fn rank(&self) -> i8 {
        self.rank
    }

    /// A square is valid if both file and rank are within 0-7.
    pub const fn is_valid(&self) -> bool {
        self.file >= 0 && self.file < NUM_FILES as i8 && self.rank >= 0 && self.rank < NUM_RANKS as i8
    }

    /// Returns self if valid, or an InvalidSquare error.
    pub fn checked(self) -> error::Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err((
                ErrorKind::InvalidSquare,
                format!("file {} rank {}", self.file, self.rank),
            )
                .into())
        }
    }

    /// Index of this square in a rank-major board array, a1 = 0, b1 = 1, a2 = 8.
    /// Panics if the square is out of bounds.
    pub const fn idx(&self) -> usize {
        assert!(self.is_valid(), "square out of bounds");
        self.rank as usize * NUM_FILES + self.file as usize
    }

    /// Inverse of `idx`, None for values greater than 63.
    pub const fn from_idx(idx: usize) -> Option<Self> {
        if idx < NUM_SQUARES {
            Some(Self::new((idx % NUM_FILES) as i8, (idx / NUM_FILES) as i8))
        } else {
            None
        }
    }

    /// Square displaced by (files, ranks). The result may be out of bounds.
    pub const fn offset(&self, files: i8, ranks: i8) -> Self {
        Self::new(self.file + files, self.rank + ranks)
    }

    /// Square on the same rank as self, at a different file.
    pub const fn with_file(&self, file: i8) -> Self {
        Self::new(file, self.rank)
    }

    pub const fn iter() -> SquareIterator {
        SquareIterator { idx: 0 }
    }
}

/// Iterates over all 64 valid squares, a1 to h8.
pub struct SquareIterator {
    idx: usize,
}

impl Iterator for SquareIterator {
    type Item = Square;
    fn next(&mut self) -> Option<Self::Item> {
        let maybe_square = Square::from_idx(self.idx);
        if maybe_square.is_some() {
            self.idx += 1;
        }
        maybe_square
    }
}

/// Declares a named constant on Square for every board coordinate.
macro_rules! square_constants {
    ($($name:ident = ($file:expr, $rank:expr)),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square::new($file, $rank);)*
        }
    };
}

#[rustfmt::skip]
square_constants! {
    A1 = (0, 0), B1 = (1, 0), C1 = (2, 0), D1 = (3, 0), E1 = (4, 0), F1 = (5, 0), G1 = (6, 0), H1 = (7, 0),
    A2 = (0, 1), B2 = (1, 1), C2 = (2, 1), D2 = (3, 1), E2 = (4, 1), F2 = (5, 1), G2 = (6, 1), H2 = (7, 1),
    A3 = (0, 2), B3 = (1, 2), C3 = (2, 2), D3 = (3, 2), E3 = (4, 2), F3 = (5, 2), G3 = (6, 2), H3 = (7, 2),
    A4 = (0, 3), B4 = (1, 3), C4 = (2, 3), D4 = (3, 3), E4 = (4, 3), F4 = (5, 3), G4 = (6, 3), H4 = (7, 3),
    A5 = (0, 4), B5 = (1, 4), C5 = (2, 4), D5 = (3, 4), E5 = (4, 4), F5 = (5, 4), G5 = (6, 4), H5 = (7, 4),
    A6 = (0, 5), B6 = (1, 5), C6 = (2, 5), D6 = (3, 5), E6 = (4, 5), F6 = (5, 5), G6 = (6, 5), H6 = (7, 5),
    A7 = (0, 6), B7 = (1, 6), C7 = (2, 6), D7 = (3, 6), E7 = (4, 6), F7 = (5, 6), G7 = (6, 6), H7 = (7, 6),
    A8 = (0, 7), B8 = (1, 7), C8 = (2, 7), D8 = (3, 7), E8 = (4, 7), F8 = (5, 7), G8 = (6, 7), H8 = (7, 7),
}

/// Square::= <fileLetter><rankNumber>
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err((ErrorKind::ParseSquareMalformed, "expected two characters").into());
        };
        if !('a'..='h').contains(&file) {
            return Err((ErrorKind::ParseSquareMalformed, "file char not of abcdefgh").into());
        }
        if !('1'..='8').contains(&rank) {
            return Err((ErrorKind::ParseSquareMalformed, "rank char not of 12345678").into());
        }
        Ok(Square::new(
            (file as u8 - b'a') as i8,
            (rank as u8 - b'1') as i8,
        ))
    }
}

/// Valid squares display as "e4", invalid ones as their raw coordinates.
impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            let file = (b'a' + self.file as u8) as char;
            let rank = (b'1' + self.rank as u8) as char;
            write!(f, "{file}{rank}")
        } else {
            write!(f, "({},{})", self.file, self.rank)
        }
    }
}

impl CastleSide {
    /// File the castling rook starts on.
    pub const fn rook_file(&self) -> i8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    /// File the castling rook lands on.
    pub const fn rook_destination_file(&self) -> i8 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    /// File direction the king travels in.
    pub const fn direction(&self) -> i8 {
        match self {
            CastleSide::KingSide => 1,
            CastleSide::QueenSide => -1,
        }
    }

    /// Side a two-file king move castles towards.
    pub const fn from_king_move(from: Square, to: Square) -> Option<Self> {
        match to.file() - from.file() {
            2 => Some(CastleSide::KingSide),
            -2 => Some(CastleSide::QueenSide),
            _ => None,
        }
    }
}

impl Castling {
    /// No square has been moved from, the initial chess position.
    pub const NONE: Castling = Castling(0u64);

    pub const fn start_position() -> Self {
        Self::NONE
    }

    /// Returns true if a piece has ever moved away from square.
    /// Out of bounds squares have never been moved from.
    pub const fn has_moved(&self, square: Square) -> bool {
        square.is_valid() && self.0 & (1u64 << square.idx()) != 0
    }

    /// Record that the piece on square has moved.
    /// Panics if the square is out of bounds.
    pub fn set_moved(&mut self, square: Square) {
        self.0 |= 1u64 << square.idx();
    }

    /// Returns true if neither king_square nor the rook square for side have moved.
    pub const fn is_unmoved(&self, king_square: Square, side: CastleSide) -> bool {
        let rook_square = king_square.with_file(side.rook_file());
        !self.has_moved(king_square) && !self.has_moved(rook_square)
    }
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
}

impl From<MoveInfo> for Move {
    fn from(move_info: MoveInfo) -> Self {
        Self::new(move_info.from, move_info.to)
    }
}

/// Parses `Pure Algebraic Coordinate Notation` without promotions, "e2e4".
impl FromStr for Move {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        if !s.is_ascii() || s.len() != 4 {
            return Err((ErrorKind::ParseMoveMalformed, "expected four characters").into());
        }
        let from: Square = s[0..2]
            .parse()
            .map_err(|err| error::Error::new(ErrorKind::ParseMoveMalformed, err))?;
        let to: Square = s[2..4]
            .parse()
            .map_err(|err| error::Error::new(ErrorKind::ParseMoveMalformed, err))?;
        Ok(Self::new(from, to))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl MoveInfo {
    pub const fn new(move_: Move, piece: Piece, move_kind: MoveKind) -> Self {
        Self {
            from: move_.from,
            to: move_.to,
            piece,
            move_kind,
        }
    }

    /// Get this MoveInfo's inner Move.
    pub const fn move_(&self) -> Move {
        Move::new(self.from, self.to)
    }

    // Immutable Getters
    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
    pub const fn piece(&self) -> Piece {
        self.piece
    }
    pub const fn move_kind(&self) -> &MoveKind {
        &self.move_kind
    }

    /// Returns true if this MoveInfo came from a capturing move, including en passant.
    pub fn is_capture(&self) -> bool {
        matches!(self.move_kind, MoveKind::Capture(_) | MoveKind::EnPassant)
    }

    /// Returns the piece kind of the captured piece, if any.
    pub fn captured(&self) -> Option<PieceKind> {
        match self.move_kind {
            MoveKind::Capture(piece_kind) => Some(piece_kind),
            MoveKind::EnPassant => Some(PieceKind::Pawn),
            _ => None,
        }
    }
}

impl Display for MoveInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.piece, self.move_())?;
        match self.move_kind {
            MoveKind::Quiet => Ok(()),
            MoveKind::Capture(piece_kind) => write!(f, " x{}", piece_kind.to_char()),
            MoveKind::Castle(CastleSide::KingSide) => f.write_str(" O-O"),
            MoveKind::Castle(CastleSide::QueenSide) => f.write_str(" O-O-O"),
            MoveKind::EnPassant => f.write_str(" e.p."),
        }
    }
}

impl GameState {
    /// Returns true once the game has been decided.
    pub const fn is_over(&self) -> bool {
        !matches!(self, GameState::InProgress)
    }

    /// The state reached when color is checkmated.
    pub const fn mated(color: Color) -> Self {
        match color {
            Color::White => GameState::BlackWins,
            Color::Black => GameState::WhiteWins,
        }
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameState::InProgress => f.write_str("in progress"),
            GameState::WhiteWins => f.write_str("White wins by checkmate"),
            GameState::BlackWins => f.write_str("Black wins by checkmate"),
        }
    }
}

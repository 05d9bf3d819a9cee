//! Holds Position struct, the most important data structure for the engine.
//! Position represents a chess position along with the history needed to
//! generate its special moves.

use std::fmt::{self, Display};

use crate::boardrepr::Mailbox;
use crate::coretypes::{CastleSide, Castling, Color, Move, MoveInfo, MoveKind, Piece, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::error::{self, ErrorKind};
use crate::legality;
use crate::movegen::{self, MoveContext};
use crate::movelist::{MoveList, SquareList};

/// struct Position
/// A complete data set that can represent any chess position reachable by this engine.
/// # Members:
/// * mailbox - square-centric container of all pieces.
/// * side_to_move - Color of player whose turn it is.
/// * castling - Origin squares that have been moved from, which decide castling rights.
/// * en_passant - Square passed over by the last move if it was a double pawn push.
/// * last_move - The most recently applied move, if any.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Position {
    pub(crate) mailbox: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) last_move: Option<MoveInfo>,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self::from_mailbox(Mailbox::start_position(), White)
    }

    /// A position with the given pieces, where no piece has moved yet.
    pub fn from_mailbox(mailbox: Mailbox, side_to_move: Color) -> Self {
        Self {
            mailbox,
            side_to_move,
            castling: Castling::start_position(),
            en_passant: None,
            last_move: None,
        }
    }

    /// Const getters.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> &Castling {
        &self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn last_move(&self) -> Option<MoveInfo> {
        self.last_move
    }

    /// History needed to generate castling and en passant moves from this position.
    pub fn context(&self) -> MoveContext {
        MoveContext::new(self.castling, self.en_passant)
    }

    /// Pseudo-legal destinations for the piece on square, special moves included.
    pub fn pseudo_moves(&self, square: Square) -> error::Result<SquareList> {
        movegen::pseudo_moves(&self.mailbox, square, Some(&self.context()))
    }

    /// Legal destinations for the piece on square, special moves included.
    /// Pieces of either color can be queried.
    pub fn legal_moves(&self, square: Square) -> error::Result<SquareList> {
        legality::legal_moves(&self.mailbox, square, Some(&self.context()))
    }

    /// Returns true if `move_` is a legal move for the side to move.
    pub fn is_legal_move(&self, move_: Move) -> error::Result<bool> {
        let from = move_.from.checked()?;
        let to = move_.to.checked()?;
        if !self.mailbox[from].is_color(self.side_to_move) {
            return Ok(false);
        }
        Ok(self.legal_moves(from)?.contains(&to))
    }

    /// Returns a list of all legal moves for the side to move.
    pub fn get_legal_moves(&self) -> MoveList {
        let mut legal_moves = MoveList::new();
        for from in self.mailbox.squares_of(self.side_to_move) {
            if let Ok(destinations) = self.legal_moves(from) {
                legal_moves.extend(destinations.into_iter().map(|to| Move::new(from, to)));
            }
        }
        legal_moves
    }

    /// Returns true if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        legality::is_in_check(&self.mailbox, self.side_to_move)
    }

    /// Returns true if `color` is checkmated.
    pub fn is_checkmate(&self, color: Color) -> bool {
        legality::is_checkmate(&self.mailbox, color)
    }

    /// Returns true if the side to move is not in check but has no legal move.
    /// Stalemate is not a terminal state for a game, this is informational only.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && !legality::has_legal_moves(&self.mailbox, self.side_to_move)
    }

    /// Apply a move to self, in place.
    /// `apply_move` does not check if the move is legal, it executes it while assuming legality,
    /// so `move_` must come from this position's legal moves.
    /// Only the squares are validated, before anything is changed: an out of bounds square or
    /// an empty `from` square is an error and leaves self untouched.
    pub fn apply_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        move_.from.checked()?;
        move_.to.checked()?;
        if self.mailbox[move_.from].is_empty() {
            return Err((ErrorKind::GameIllegalMove, format!("no piece on {}", move_.from)).into());
        }
        Ok(self.do_move(move_))
    }

    /// Generates a new Position from applying move on current Position.
    pub fn make_move(&self, move_: Move) -> error::Result<Self> {
        let mut position = *self;
        position.apply_move(move_)?;
        Ok(position)
    }

    /// Unchecked move application, both squares must be valid and `from` occupied.
    pub(crate) fn do_move(&mut self, move_: Move) -> MoveInfo {
        let Move { from, to } = move_;
        let piece = self.mailbox[from];
        let is_pawn = piece.kind() == Some(Pawn);
        let mut move_kind = match self.mailbox[to].kind() {
            Some(captured) => MoveKind::Capture(captured),
            None => MoveKind::Quiet,
        };

        // Castling rights are tracked by the square a piece leaves.
        self.castling.set_moved(from);

        if piece.kind() == Some(King) {
            if let Some(side) = CastleSide::from_king_move(from, to) {
                let rook_from = from.with_file(side.rook_file());
                let rook_to = from.with_file(side.rook_destination_file());
                self.mailbox.relocate(rook_from, rook_to);
                move_kind = MoveKind::Castle(side);
            }
        }

        // The captured pawn is beside the moving pawn, on the file it moves to.
        if is_pawn && self.en_passant == Some(to) {
            self.mailbox[Square::new(to.file(), from.rank())] = Piece::EMPTY;
            move_kind = MoveKind::EnPassant;
        }

        self.update_en_passant(from, to, is_pawn);
        self.mailbox.relocate(from, to);

        let move_info = MoveInfo::new(move_, piece, move_kind);
        self.last_move = Some(move_info);
        self.side_to_move = !self.side_to_move;
        move_info
    }

    /// En Passant square is set to the skipped square after any double pawn push.
    /// Any other kind of move sets it to None.
    fn update_en_passant(&mut self, from: Square, to: Square, is_pawn: bool) {
        self.en_passant = match is_pawn && (to.rank() - from.rank()).abs() == 2 {
            true => Some(Square::new(to.file(), (from.rank() + to.rank()) / 2)),
            false => None,
        };
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and the side to move.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{} to move", self.mailbox, self.side_to_move)?;
        if let Some(last_move) = self.last_move {
            write!(f, ", last move {last_move}")?;
        }
        Ok(())
    }
}

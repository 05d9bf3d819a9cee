//! Check detection and the legal move filter.
//!
//! Legality is decided by copy-make: the candidate move is played on a copy of
//! the board and the copy is tested for check. Attacks are found by generating
//! the context-free pseudo moves of every opposing piece, so nothing here ever
//! asks for castling moves.

use crate::boardrepr::Mailbox;
use crate::coretypes::{Color, Piece, PieceKind, Square};
use crate::error;
use crate::movegen::{self, MoveContext};
use crate::movelist::SquareList;

/// Returns true if any piece of `attacker` has `target` among its context-free pseudo moves.
pub fn is_attacked_by(mailbox: &Mailbox, target: Square, attacker: Color) -> bool {
    mailbox.squares_of(attacker).any(|from| {
        movegen::pseudo_moves(mailbox, from, None)
            .map_or(false, |moves| moves.contains(&target))
    })
}

/// Returns true if the king of `color` is attacked.
///
/// # Panics
/// Check detection requires a king of `color` on the board. A missing king is
/// an internal consistency failure, not a game condition, and panics.
pub fn is_in_check(mailbox: &Mailbox, color: Color) -> bool {
    let Some(king) = mailbox.king_square(color) else {
        panic!("{color} king is missing from the board, check detection requires one");
    };
    is_attacked_by(mailbox, king, !color)
}

/// Returns true if the side owning the piece on `from` is in check after relocating
/// that piece to `to`. Nothing else on the board changes. Both squares must be valid
/// and `from` must hold a piece.
pub(crate) fn is_in_check_after(mailbox: &Mailbox, from: Square, to: Square) -> bool {
    simulate(mailbox, from, to, None)
}

/// Plays the move on a copy of the board, optionally clearing an en passant victim,
/// and tests the mover for check.
fn simulate(mailbox: &Mailbox, from: Square, to: Square, captured: Option<Square>) -> bool {
    debug_assert!(!mailbox[from].is_empty());
    let color = match mailbox[from].color() {
        Some(color) => color,
        None => return false,
    };
    let mut board = *mailbox;
    if let Some(captured) = captured {
        board[captured] = Piece::EMPTY;
    }
    board.relocate(from, to);
    is_in_check(&board, color)
}

/// Returns true if moving the piece on `from` to `to` does not leave its own king in check.
/// The move is applied mechanically: the piece is relocated and `from` cleared, so
/// this does not check that `to` is a pseudo-legal destination.
/// An empty `from` is never legal.
pub fn is_legal(mailbox: &Mailbox, from: Square, to: Square) -> error::Result<bool> {
    let from = from.checked()?;
    let to = to.checked()?;
    if mailbox[from].is_empty() {
        return Ok(false);
    }
    Ok(!simulate(mailbox, from, to, None))
}

/// Generate all legal destinations for the piece on `from`.
///
/// Without a context, castling and en passant are never generated.
/// With one, they are included, and an en passant capture is tested with the
/// captured pawn removed from the simulated board.
pub fn legal_moves(
    mailbox: &Mailbox,
    from: Square,
    context: Option<&MoveContext>,
) -> error::Result<SquareList> {
    let mut moves = movegen::pseudo_moves(mailbox, from, context)?;
    if moves.is_empty() {
        return Ok(moves);
    }

    let is_pawn = mailbox[from].kind() == Some(PieceKind::Pawn);
    let en_passant = context
        .and_then(|context| context.en_passant)
        .filter(|_| is_pawn);

    moves.retain(|to| {
        let captured = en_passant
            .filter(|target| *target == *to)
            .map(|target| Square::new(target.file(), from.rank()));
        !simulate(mailbox, from, *to, captured)
    });
    Ok(moves)
}

/// Returns true if any piece of `color` has a context-free legal move.
pub fn has_legal_moves(mailbox: &Mailbox, color: Color) -> bool {
    mailbox.squares_of(color).any(|from| {
        legal_moves(mailbox, from, None).map_or(false, |moves| !moves.is_empty())
    })
}

/// Returns true if `color` is in check and has no legal move to escape it.
pub fn is_checkmate(mailbox: &Mailbox, color: Color) -> bool {
    is_in_check(mailbox, color) && !has_legal_moves(mailbox, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{Castling, Color::*, PieceKind::*};

    fn piece(color: Color, piece_kind: PieceKind) -> Piece {
        Piece::new(color, piece_kind)
    }

    #[test]
    fn start_position_is_quiet() {
        let mb = Mailbox::start_position();
        assert!(!is_in_check(&mb, White));
        assert!(!is_in_check(&mb, Black));
        assert!(!is_checkmate(&mb, White));
        assert!(!is_checkmate(&mb, Black));
    }

    #[test]
    fn each_piece_kind_gives_check() {
        let attackers = [
            (Square::D5, piece(Black, Pawn)),
            (Square::F2, piece(Black, Knight)),
            (Square::A8, piece(Black, Bishop)),
            (Square::E1, piece(Black, Rook)),
            (Square::H4, piece(Black, Queen)),
            (Square::E5, piece(Black, King)),
        ];
        for attacker in attackers {
            let mut mb = Mailbox::with_pieces([(Square::E4, piece(White, King)), attacker]);
            if attacker.1.kind() != Some(King) {
                mb[Square::H8] = piece(Black, King);
            }
            assert!(is_in_check(&mb, White), "{:?} should give check", attacker);
            if attacker.1.kind() != Some(King) {
                assert!(!is_in_check(&mb, Black));
            }
        }
    }

    #[test]
    fn pawn_push_is_not_an_attack() {
        let mb = Mailbox::with_pieces([
            (Square::E4, piece(White, King)),
            (Square::E5, piece(Black, Pawn)),
            (Square::H8, piece(Black, King)),
        ]);
        assert!(!is_in_check(&mb, White));
    }

    #[test]
    #[should_panic]
    fn missing_king_panics() {
        let mb = Mailbox::with_pieces([(Square::E4, piece(Black, King))]);
        is_in_check(&mb, White);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin() {
        let mb = Mailbox::with_pieces([
            (Square::E1, piece(White, King)),
            (Square::E2, piece(White, Knight)),
            (Square::E8, piece(Black, Rook)),
            (Square::A8, piece(Black, King)),
        ]);
        assert!(!is_legal(&mb, Square::E2, Square::C3).unwrap());
        assert!(legal_moves(&mb, Square::E2, None).unwrap().is_empty());

        // The king can step off the file but not along it.
        let king_moves = legal_moves(&mb, Square::E1, None).unwrap();
        assert!(king_moves.contains(&Square::D1));
        assert!(king_moves.contains(&Square::F2));
        assert!(!king_moves.contains(&Square::E2));
    }

    #[test]
    fn is_legal_rejects_bad_input() {
        let mb = Mailbox::start_position();
        assert!(!is_legal(&mb, Square::E4, Square::E5).unwrap());
        let err = is_legal(&mb, Square::E2, Square::new(4, 8)).unwrap_err();
        assert_eq!(err.kind(), error::ErrorKind::InvalidSquare);
        assert!(legal_moves(&mb, Square::new(-1, 0), None).is_err());
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let mb = Mailbox::with_pieces([
            (Square::E1, piece(White, King)),
            (Square::E2, piece(Black, Queen)),
            (Square::E3, piece(Black, Rook)),
            (Square::A8, piece(Black, King)),
        ]);
        assert!(is_checkmate(&mb, White));
        assert!(!is_checkmate(&mb, Black));
    }

    #[test]
    fn back_rank_mate() {
        let mb = Mailbox::with_pieces([
            (Square::G1, piece(White, King)),
            (Square::F2, piece(White, Pawn)),
            (Square::G2, piece(White, Pawn)),
            (Square::H2, piece(White, Pawn)),
            (Square::D1, piece(Black, Rook)),
            (Square::G8, piece(Black, King)),
        ]);
        assert!(is_in_check(&mb, White));
        assert!(is_checkmate(&mb, White));
        assert!(!is_checkmate(&mb, Black));

        // A defender that can block breaks the mate.
        let mut defended = mb;
        defended[Square::C3] = piece(White, Bishop);
        assert!(!is_checkmate(&defended, White));
    }

    #[test]
    fn stalemate_is_not_checkmate() {
        let mb = Mailbox::with_pieces([
            (Square::A8, piece(Black, King)),
            (Square::B6, piece(White, Queen)),
            (Square::C7, piece(White, King)),
        ]);
        assert!(!is_in_check(&mb, Black));
        assert!(!has_legal_moves(&mb, Black));
        assert!(!is_checkmate(&mb, Black));
    }

    #[test]
    fn en_passant_that_exposes_king_is_illegal() {
        // Both pawns leave the fifth rank, opening the rook onto the king.
        let mb = Mailbox::with_pieces([
            (Square::A5, piece(White, King)),
            (Square::B5, piece(White, Pawn)),
            (Square::C5, piece(Black, Pawn)),
            (Square::H5, piece(Black, Rook)),
            (Square::E8, piece(Black, King)),
        ]);
        let context = MoveContext::new(Castling::NONE, Some(Square::C6));
        let pseudo = movegen::pseudo_moves(&mb, Square::B5, Some(&context)).unwrap();
        assert!(pseudo.contains(&Square::C6));

        let legal = legal_moves(&mb, Square::B5, Some(&context)).unwrap();
        assert!(!legal.contains(&Square::C6));
        assert!(legal.contains(&Square::B6));
    }

    #[test]
    fn en_passant_can_capture_checking_pawn() {
        let mb = Mailbox::with_pieces([
            (Square::E5, piece(Black, King)),
            (Square::D4, piece(White, Pawn)),
            (Square::C4, piece(Black, Pawn)),
            (Square::H1, piece(White, King)),
        ]);
        assert!(is_in_check(&mb, Black));
        let context = MoveContext::new(Castling::NONE, Some(Square::D3));
        let legal = legal_moves(&mb, Square::C4, Some(&context)).unwrap();
        assert_eq!(legal.as_slice(), &[Square::D3]);
    }

    #[test]
    fn variants_agree_without_special_moves() {
        let mb = Mailbox::start_position();
        let context = MoveContext::default();
        for square in Square::iter() {
            let plain = legal_moves(&mb, square, None).unwrap();
            let full = legal_moves(&mb, square, Some(&context)).unwrap();
            assert_eq!(plain, full);
        }
    }
}

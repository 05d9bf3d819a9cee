//! Pseudo-legal move generation.
//!
//! Moves are generated per square as a list of destination squares. These
//! moves follow how each piece moves and respect occupancy, but do not
//! consider whether the mover's king is left in check.
//!
//! En passant and castling depend on game history, which is passed in as an
//! optional `MoveContext`. Without a context those moves are never generated,
//! which lets check detection call into generation without recursing into
//! castling, since castling itself consults check detection.

use crate::boardrepr::Mailbox;
use crate::coretypes::{CastleSide, Castling, Color, PieceKind, PieceKind::*, Square};
use crate::error;
use crate::legality;
use crate::movelist::SquareList;

pub mod rays;
pub mod tables;

/// History needed to generate special moves.
/// * castling - which origin squares have been moved from.
/// * en_passant - square passed over by the last double pawn push, if the last move was one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct MoveContext {
    pub castling: Castling,
    pub en_passant: Option<Square>,
}

impl MoveContext {
    pub const fn new(castling: Castling, en_passant: Option<Square>) -> Self {
        Self {
            castling,
            en_passant,
        }
    }
}

/// Generate all pseudo-legal destinations for the piece on `from`.
/// An empty square has no moves. An out of bounds `from` is an InvalidSquare error.
pub fn pseudo_moves(
    mailbox: &Mailbox,
    from: Square,
    context: Option<&MoveContext>,
) -> error::Result<SquareList> {
    let from = from.checked()?;
    let piece = mailbox[from];
    let mut moves = SquareList::new();

    let (Some(color), Some(piece_kind)) = (piece.color(), piece.kind()) else {
        return Ok(moves);
    };

    match piece_kind {
        Pawn => {
            let en_passant = context.and_then(|context| context.en_passant);
            pawn_pseudo_moves(&mut moves, mailbox, from, color, en_passant);
        }
        Knight => step_pseudo_moves(&mut moves, mailbox, from, color, &tables::KNIGHT_OFFSETS),
        Bishop => rays::diagonal_rays(&mut moves, mailbox, from, color),
        Rook => rays::orthogonal_rays(&mut moves, mailbox, from, color),
        Queen => {
            rays::diagonal_rays(&mut moves, mailbox, from, color);
            rays::orthogonal_rays(&mut moves, mailbox, from, color);
        }
        King => {
            step_pseudo_moves(&mut moves, mailbox, from, color, &tables::KING_OFFSETS);
            if let Some(context) = context {
                castling_pseudo_moves(&mut moves, mailbox, from, color, context.castling);
            }
        }
    }

    Ok(moves)
}

/// Generate pushes, captures and en passant captures for the pawn on `from`.
/// params:
/// moves - list to append to.
/// color - color of the pawn.
/// en_passant - Optional en-passant target square.
fn pawn_pseudo_moves(
    moves: &mut SquareList,
    mailbox: &Mailbox,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
) {
    let forward = color.forward();

    // A pawn on the far rank has nowhere to go, promotion is not modeled.
    let single_push = from.offset(0, forward);
    if single_push.is_valid() && mailbox[single_push].is_empty() {
        moves.push(single_push);

        let double_push = single_push.offset(0, forward);
        if from.rank() == color.pawn_rank() && mailbox[double_push].is_empty() {
            moves.push(double_push);
        }
    }

    for files in tables::PAWN_CAPTURE_FILES {
        let attack = from.offset(files, forward);
        if attack.is_valid() && mailbox[attack].is_enemy_of(color) {
            moves.push(attack);
        }
    }

    if let Some(target) = en_passant {
        let is_adjacent_diagonal =
            target.rank() == from.rank() + forward && (target.file() - from.file()).abs() == 1;
        if from.rank() == color.en_passant_rank()
            && is_adjacent_diagonal
            && target.is_valid()
            && mailbox[target].is_empty()
        {
            moves.push(target);
        }
    }
}

/// Generate single step moves, for knights and kings.
/// Each destination is valid if empty or held by the opposing color.
fn step_pseudo_moves(
    moves: &mut SquareList,
    mailbox: &Mailbox,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
) {
    for &(files, ranks) in offsets {
        let to = from.offset(files, ranks);
        if to.is_valid() && !mailbox[to].is_color(color) {
            moves.push(to);
        }
    }
}

/// Generate castling moves for the king on `king`, appended as the king's destination square.
/// Castling towards a side is allowed when:
/// * neither the king's square nor that side's rook square have been moved from,
/// * that side's rook is still on its square,
/// * all squares between king and rook are empty,
/// * the king is not in check,
/// * the square the king passes over is not attacked.
fn castling_pseudo_moves(
    moves: &mut SquareList,
    mailbox: &Mailbox,
    king: Square,
    color: Color,
    castling: Castling,
) {
    if king != Square::new(4, color.back_rank()) {
        return;
    }
    let mut in_check: Option<bool> = None;

    for side in [CastleSide::KingSide, CastleSide::QueenSide] {
        let rook = king.with_file(side.rook_file());
        if !castling.is_unmoved(king, side) || !mailbox[rook].is(color, PieceKind::Rook) {
            continue;
        }

        let (low, high) = (king.file().min(rook.file()), king.file().max(rook.file()));
        let path_is_empty = (low + 1..high).all(|file| mailbox[king.with_file(file)].is_empty());
        if !path_is_empty {
            continue;
        }

        if *in_check.get_or_insert_with(|| legality::is_in_check(mailbox, color)) {
            return;
        }

        let pass = king.offset(side.direction(), 0);
        if legality::is_in_check_after(mailbox, king, pass) {
            continue;
        }

        moves.push(king.offset(2 * side.direction(), 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{Color::*, Piece};

    fn sorted(moves: SquareList) -> Vec<Square> {
        let mut moves = moves.to_vec();
        moves.sort();
        moves
    }

    #[test]
    fn empty_square_has_no_moves() {
        let mb = Mailbox::start_position();
        let moves = pseudo_moves(&mb, Square::E4, None).unwrap();
        assert!(moves.is_empty());
    }

    #[test]
    fn out_of_bounds_square_is_an_error() {
        let mb = Mailbox::start_position();
        let err = pseudo_moves(&mb, Square::new(8, 1), None).unwrap_err();
        assert_eq!(err.kind(), error::ErrorKind::InvalidSquare);
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let mb = Mailbox::start_position();
        let moves = sorted(pseudo_moves(&mb, Square::E2, None).unwrap());
        assert_eq!(moves, sorted([Square::E3, Square::E4].into_iter().collect()));

        let black = sorted(pseudo_moves(&mb, Square::D7, None).unwrap());
        assert_eq!(black, sorted([Square::D6, Square::D5].into_iter().collect()));

        let mb = Mailbox::with_pieces([
            (Square::E4, Piece::new(White, Pawn)),
            (Square::E5, Piece::new(Black, Pawn)),
            (Square::D5, Piece::new(Black, Knight)),
            (Square::F5, Piece::new(White, Knight)),
        ]);
        // Blocked forward, captures only the enemy knight.
        let moves = pseudo_moves(&mb, Square::E4, None).unwrap();
        assert_eq!(moves.as_slice(), &[Square::D5]);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let mb = Mailbox::with_pieces([
            (Square::C2, Piece::new(White, Pawn)),
            (Square::C4, Piece::new(Black, Bishop)),
            (Square::F2, Piece::new(White, Pawn)),
            (Square::F3, Piece::new(Black, Bishop)),
        ]);
        assert_eq!(pseudo_moves(&mb, Square::C2, None).unwrap().as_slice(), &[Square::C3]);
        assert!(pseudo_moves(&mb, Square::F2, None).unwrap().is_empty());
    }

    #[test]
    fn pawn_on_last_rank_has_no_moves() {
        let mb = Mailbox::with_pieces([(Square::A8, Piece::new(White, Pawn))]);
        assert!(pseudo_moves(&mb, Square::A8, None).unwrap().is_empty());
    }

    #[test]
    fn en_passant_requires_context() {
        let mb = Mailbox::with_pieces([
            (Square::E5, Piece::new(White, Pawn)),
            (Square::D5, Piece::new(Black, Pawn)),
        ]);
        let context = MoveContext::new(Castling::NONE, Some(Square::D6));

        let plain = pseudo_moves(&mb, Square::E5, None).unwrap();
        assert_eq!(plain.as_slice(), &[Square::E6]);

        let special = sorted(pseudo_moves(&mb, Square::E5, Some(&context)).unwrap());
        assert_eq!(special, sorted([Square::E6, Square::D6].into_iter().collect()));

        // The black pawn cannot use a target behind itself.
        let black = pseudo_moves(&mb, Square::D5, Some(&context)).unwrap();
        assert_eq!(black.as_slice(), &[Square::D4]);
    }

    #[test]
    fn en_passant_only_from_adjacent_file() {
        let mb = Mailbox::with_pieces([(Square::B4, Piece::new(Black, Pawn))]);
        let far = MoveContext::new(Castling::NONE, Some(Square::D3));
        let near = MoveContext::new(Castling::NONE, Some(Square::C3));
        assert_eq!(pseudo_moves(&mb, Square::B4, Some(&far)).unwrap().len(), 1);
        assert_eq!(pseudo_moves(&mb, Square::B4, Some(&near)).unwrap().len(), 2);
    }

    #[test]
    fn knight_jumps() {
        let mb = Mailbox::start_position();
        let moves = sorted(pseudo_moves(&mb, Square::G1, None).unwrap());
        assert_eq!(moves, sorted([Square::F3, Square::H3].into_iter().collect()));

        let mb = Mailbox::with_pieces([(Square::D4, Piece::new(Black, Knight))]);
        assert_eq!(pseudo_moves(&mb, Square::D4, None).unwrap().len(), 8);
    }

    #[test]
    fn queen_is_rook_and_bishop() {
        let mb = Mailbox::with_pieces([(Square::D4, Piece::new(White, Queen))]);
        assert_eq!(pseudo_moves(&mb, Square::D4, None).unwrap().len(), 27);

        let start = Mailbox::start_position();
        assert!(pseudo_moves(&start, Square::D1, None).unwrap().is_empty());
        assert!(pseudo_moves(&start, Square::C8, None).unwrap().is_empty());
        assert!(pseudo_moves(&start, Square::H1, None).unwrap().is_empty());
    }

    #[test]
    fn king_steps_and_castles() {
        let mb = Mailbox::with_pieces([
            (Square::E1, Piece::new(White, King)),
            (Square::H1, Piece::new(White, Rook)),
            (Square::A1, Piece::new(White, Rook)),
            (Square::E8, Piece::new(Black, King)),
        ]);
        let plain = pseudo_moves(&mb, Square::E1, None).unwrap();
        assert_eq!(plain.len(), 5);

        let context = MoveContext::default();
        let special = pseudo_moves(&mb, Square::E1, Some(&context)).unwrap();
        assert_eq!(special.len(), 7);
        assert!(special.contains(&Square::G1));
        assert!(special.contains(&Square::C1));
    }

    #[test]
    fn castling_blocked_by_pieces_and_attacks() {
        let mut mb = Mailbox::with_pieces([
            (Square::E8, Piece::new(Black, King)),
            (Square::H8, Piece::new(Black, Rook)),
            (Square::A8, Piece::new(Black, Rook)),
            (Square::B8, Piece::new(Black, Knight)),
            (Square::E1, Piece::new(White, King)),
            (Square::F1, Piece::new(White, Rook)),
        ]);
        let context = MoveContext::default();

        // Queenside blocked by the knight, kingside passes over the attacked f8.
        let moves = pseudo_moves(&mb, Square::E8, Some(&context)).unwrap();
        assert!(!moves.contains(&Square::C8));
        assert!(!moves.contains(&Square::G8));

        // Attacking the e-file puts the king in check, no castling either way.
        mb.relocate(Square::F1, Square::E2);
        mb[Square::B8] = Piece::EMPTY;
        let moves = pseudo_moves(&mb, Square::E8, Some(&context)).unwrap();
        assert!(!moves.contains(&Square::C8));
        assert!(!moves.contains(&Square::G8));

        // No attack at all, both sides are open.
        mb[Square::E2] = Piece::EMPTY;
        let moves = pseudo_moves(&mb, Square::E8, Some(&context)).unwrap();
        assert!(moves.contains(&Square::C8));
        assert!(moves.contains(&Square::G8));
    }

    #[test]
    fn castling_needs_unmoved_king_and_rook() {
        let mb = Mailbox::with_pieces([
            (Square::E1, Piece::new(White, King)),
            (Square::H1, Piece::new(White, Rook)),
            (Square::A1, Piece::new(White, Rook)),
            (Square::E8, Piece::new(Black, King)),
        ]);

        let mut castling = Castling::NONE;
        castling.set_moved(Square::H1);
        let context = MoveContext::new(castling, None);
        let moves = pseudo_moves(&mb, Square::E1, Some(&context)).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(moves.contains(&Square::C1));

        castling.set_moved(Square::E1);
        let context = MoveContext::new(castling, None);
        let moves = pseudo_moves(&mb, Square::E1, Some(&context)).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(!moves.contains(&Square::C1));
    }

    #[test]
    fn castling_needs_rook_on_its_square() {
        let mb = Mailbox::with_pieces([
            (Square::E1, Piece::new(White, King)),
            (Square::H1, Piece::new(Black, Bishop)),
            (Square::E8, Piece::new(Black, King)),
        ]);
        let moves = pseudo_moves(&mb, Square::E1, Some(&MoveContext::default())).unwrap();
        assert!(!moves.contains(&Square::G1));
        assert!(!moves.contains(&Square::C1));
    }
}

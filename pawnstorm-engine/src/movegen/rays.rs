//! Ray casting for sliding pieces.

use crate::boardrepr::Mailbox;
use crate::coretypes::{Color, Square};
use crate::movegen::tables::{DIAGONALS, ORTHOGONALS};
use crate::movelist::SquareList;

/// Walk from origin exclusive in one direction, a square at a time.
/// Empty squares are pushed. The first occupied square ends the ray, and is
/// pushed only if it holds a piece of the opposing color.
fn ray_scan(
    moves: &mut SquareList,
    mailbox: &Mailbox,
    origin: Square,
    color: Color,
    (files, ranks): (i8, i8),
) {
    let mut square = origin.offset(files, ranks);
    while square.is_valid() {
        let target = mailbox[square];
        if !target.is_empty() {
            if target.is_enemy_of(color) {
                moves.push(square);
            }
            return;
        }
        moves.push(square);
        square = square.offset(files, ranks);
    }
}

/// Push all squares reached along the 4 diagonal rays, as a bishop moves.
pub(crate) fn diagonal_rays(moves: &mut SquareList, mailbox: &Mailbox, origin: Square, color: Color) {
    for direction in DIAGONALS {
        ray_scan(moves, mailbox, origin, color, direction);
    }
}

/// Push all squares reached along the 4 orthogonal rays, as a rook moves.
pub(crate) fn orthogonal_rays(moves: &mut SquareList, mailbox: &Mailbox, origin: Square, color: Color) {
    for direction in ORTHOGONALS {
        ray_scan(moves, mailbox, origin, color, direction);
    }
}

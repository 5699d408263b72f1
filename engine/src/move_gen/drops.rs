use strum::IntoEnumIterator;

use super::{attacks, legal_moves_with, DropMateCheck, MoveList};
use crate::bitboard::{BitBoard, Square};
use crate::position::{Move, PieceKind, Position, Side, HAND_KINDS};

/// Drops for `side`: hand kinds in `HAND_KINDS` order, then empty squares in
/// row-major order.
pub fn gen_drop_moves(
    position: &Position,
    side: Side,
    drop_mate: DropMateCheck,
    moves: &mut MoveList,
) {
    let hand = position.hand(side);
    let own_soldiers = position.board().squares_of(PieceKind::Soldier, side);

    for kind in HAND_KINDS {
        if hand.get(kind) == 0 {
            continue;
        }
        for to in Square::iter() {
            if position.piece_at(to).is_some() {
                continue;
            }
            if kind == PieceKind::Soldier
                && !soldier_drop_allowed(position, side, to, own_soldiers, drop_mate)
            {
                continue;
            }
            moves.push(Move::drop(kind, to));
        }
    }
}

fn soldier_drop_allowed(
    position: &Position,
    side: Side,
    to: Square,
    own_soldiers: BitBoard,
    drop_mate: DropMateCheck,
) -> bool {
    if to.row() == side.last_row() {
        return false;
    }
    if !(own_soldiers & BitBoard::file_mask(to.col())).is_empty() {
        return false;
    }
    match drop_mate {
        DropMateCheck::Enabled => !is_soldier_drop_mate(position, side, to),
        DropMateCheck::Disabled => true,
    }
}

/// Whether dropping a soldier on `to` leaves the opponent in check with no
/// legal reply.
fn is_soldier_drop_mate(position: &Position, side: Side, to: Square) -> bool {
    let next = position.play_as(side, Move::drop(PieceKind::Soldier, to));
    let opponent = side.opposite();
    if !attacks::is_in_check(&next, opponent) {
        return false;
    }
    legal_moves_with(&next, opponent, DropMateCheck::Disabled).is_empty()
}

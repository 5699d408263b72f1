use super::MoveList;
use crate::bitboard::Square;
use crate::movement;
use crate::position::{Move, Piece, PieceKind, Position, Side};

/// Pseudo-legal board moves for `side`, with promotion variants expanded.
pub fn gen_board_moves(position: &Position, side: Side, moves: &mut MoveList) {
    let board = position.board();
    for (from, piece) in board.pieces(side) {
        for to in movement::targets(piece, from) {
            if matches!(board.get(to), Some(target) if target.owner == side) {
                continue;
            }
            push_with_promotions(piece, from, to, moves);
        }
    }
}

fn push_with_promotions(piece: Piece, from: Square, to: Square, moves: &mut MoveList) {
    let side = piece.owner;
    let in_camp = side.in_enemy_camp(from.row()) || side.in_enemy_camp(to.row());

    if !piece.kind.is_promotable() || !in_camp {
        moves.push(Move::new(from, to));
        return;
    }

    // A soldier on the last rank could never move again.
    if piece.kind == PieceKind::Soldier && to.row() == side.last_row() {
        moves.push(Move::with_promotion(from, to));
        return;
    }

    moves.push(Move::new(from, to));
    moves.push(Move::with_promotion(from, to));
}

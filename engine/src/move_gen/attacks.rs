use crate::bitboard::{BitBoard, Square};
use crate::movement;
use crate::position::{Position, Side};

/// Every square `by` could step onto, friendly-occupied squares included.
pub fn attacked_squares(position: &Position, by: Side) -> BitBoard {
    position
        .board()
        .pieces(by)
        .fold(BitBoard::empty(), |acc, (square, piece)| {
            acc | movement::attacks(piece, square)
        })
}

pub fn is_attacked(position: &Position, square: Square, by: Side) -> bool {
    position
        .board()
        .pieces(by)
        .any(|(from, piece)| movement::targets(piece, from).any(|to| to == square))
}

/// Squares of the opponent's pieces attacking `side`'s king. Empty when the
/// king is missing.
pub fn checkers(position: &Position, side: Side) -> BitBoard {
    let Some(king_square) = position.board().find_king(side) else {
        return BitBoard::empty();
    };

    position
        .board()
        .pieces(side.opposite())
        .filter(|&(from, piece)| movement::attacks(piece, from).is_square_set(king_square))
        .map(|(from, _)| from)
        .collect()
}

/// Whether `side`'s king can be captured. A missing king counts as attacked.
pub fn is_in_check(position: &Position, side: Side) -> bool {
    match position.board().find_king(side) {
        Some(king_square) => is_attacked(position, king_square, side.opposite()),
        None => true,
    }
}

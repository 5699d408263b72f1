//! One-step movement table.
//!
//! Every piece moves exactly one square, so a piece's reach is a fixed list of
//! displacements. Displacements are stored as `(forward, sideways)` and turned
//! into board `(row, col)` deltas using the owner's forward direction.

use crate::bitboard::{BitBoard, Square};
use crate::position::{Piece, PieceKind, Side};

/// `(rows forward, columns)` relative to the owner.
pub type Step = (i8, i8);

const KING_STEPS: &[Step] = &[
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

// Shared by the runner and both promoted kinds: no backward diagonals.
const RUNNER_STEPS: &[Step] = &[(1, 0), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0)];

// No sideways steps and no straight step back.
const DIAGONAL_STEPS: &[Step] = &[(1, 0), (1, -1), (1, 1), (-1, -1), (-1, 1)];

const SOLDIER_STEPS: &[Step] = &[(1, 0)];

/// Indexed by `PieceKind::index`.
const MOVEMENT_TABLE: [&[Step]; 6] = [
    KING_STEPS,
    RUNNER_STEPS,
    DIAGONAL_STEPS,
    SOLDIER_STEPS,
    RUNNER_STEPS,
    RUNNER_STEPS,
];

pub fn steps(kind: PieceKind) -> &'static [Step] {
    MOVEMENT_TABLE[kind.index()]
}

/// Board `(row, col)` deltas for `kind` owned by `side`.
pub fn displacements(kind: PieceKind, side: Side) -> impl Iterator<Item = (i8, i8)> {
    let forward = side.forward();
    steps(kind)
        .iter()
        .map(move |&(ahead, sideways)| (ahead * forward, sideways))
}

/// On-board squares `piece` standing on `from` can step to, in table order.
pub fn targets(piece: Piece, from: Square) -> impl Iterator<Item = Square> {
    displacements(piece.kind, piece.owner).filter_map(move |(d_row, d_col)| from.offset(d_row, d_col))
}

pub fn attacks(piece: Piece, from: Square) -> BitBoard {
    targets(piece, from).collect()
}

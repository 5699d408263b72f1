//! Fixed-shape numeric encoding of a position and a dense index over moves.
//!
//! Piece planes are laid out `owner_offset + kind_index`, First at offset 0
//! and Second at offset 6, with kinds in `PieceKind` order.

use serde::{Deserialize, Serialize};

use crate::bitboard::{Square, COLS, NUM_SQUARES, ROWS};
use crate::move_gen::legal_moves;
use crate::position::{Hands, Move, PieceKind, Position, Side};

pub const NUM_KINDS: usize = 6;
pub const NUM_PIECE_PLANES: usize = NUM_KINDS * 2;
/// Piece planes plus the side-to-move plane.
pub const NUM_TENSOR_PLANES: usize = NUM_PIECE_PLANES + 1;

const BOARD_ACTIONS: usize = NUM_SQUARES * NUM_SQUARES * 2;
/// Board moves `(from, to, promote)` followed by drops `(kind, to)`.
pub const ACTION_SIZE: usize = BOARD_ACTIONS + DROP_KINDS.len() * NUM_SQUARES;

const DROP_KINDS: [PieceKind; 3] = [PieceKind::Soldier, PieceKind::Diagonal, PieceKind::Runner];

pub type Plane = [[u8; COLS]; ROWS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub planes: [Plane; NUM_PIECE_PLANES],
    pub hands: Hands,
    pub turn: Side,
}

impl Features {
    /// Row-major `f32` planes: the 12 piece planes then a plane of ones when
    /// First is to move, zeros otherwise.
    pub fn to_tensor(&self) -> Vec<f32> {
        let turn_value = match self.turn {
            Side::First => 1.0,
            Side::Second => 0.0,
        };

        let mut tensor = Vec::with_capacity(NUM_TENSOR_PLANES * NUM_SQUARES);
        for plane in &self.planes {
            tensor.extend(plane.iter().flatten().map(|&cell| f32::from(cell)));
        }
        tensor.extend(std::iter::repeat(turn_value).take(NUM_SQUARES));
        tensor
    }
}

pub const fn plane_index(kind: PieceKind, owner: Side) -> usize {
    let offset = match owner {
        Side::First => 0,
        Side::Second => NUM_KINDS,
    };
    offset + kind.index()
}

impl Position {
    pub fn features(&self) -> Features {
        let mut planes = [[[0; COLS]; ROWS]; NUM_PIECE_PLANES];
        for side in [Side::First, Side::Second] {
            for (square, piece) in self.board().pieces(side) {
                planes[plane_index(piece.kind, piece.owner)][square.row()][square.col()] = 1;
            }
        }

        Features {
            planes,
            hands: *self.hands(),
            turn: self.turn(),
        }
    }

    /// Action indices of every legal move for the side to move, in
    /// generation order. Empty once the game is over.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_game_over() {
            return vec![];
        }
        legal_moves(self, self.turn())
            .iter()
            .filter_map(|&mve| action_index(mve))
            .collect()
    }
}

/// `None` only for drops of a kind that can never be in hand.
pub fn action_index(mve: Move) -> Option<usize> {
    match mve {
        Move::Board { from, to, promote } => {
            Some((from as usize * NUM_SQUARES + to as usize) * 2 + usize::from(promote))
        }
        Move::Drop { kind, to } => {
            let kind_idx = DROP_KINDS.iter().position(|&k| k == kind)?;
            Some(BOARD_ACTIONS + kind_idx * NUM_SQUARES + to as usize)
        }
    }
}

pub fn action_to_move(action: usize) -> Option<Move> {
    if action >= ACTION_SIZE {
        return None;
    }

    if action >= BOARD_ACTIONS {
        let drop_idx = action - BOARD_ACTIONS;
        let kind = DROP_KINDS[drop_idx / NUM_SQUARES];
        let to = Square::from_index(drop_idx % NUM_SQUARES)?;
        return Some(Move::drop(kind, to));
    }

    let pair = action / 2;
    let from = Square::from_index(pair / NUM_SQUARES)?;
    let to = Square::from_index(pair % NUM_SQUARES)?;
    Some(Move::Board {
        from,
        to,
        promote: action % 2 == 1,
    })
}

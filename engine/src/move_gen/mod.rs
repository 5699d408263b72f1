pub mod attacks;
pub mod candidates;
pub mod drops;

use arrayvec::ArrayVec;

use crate::bitboard::BitBoard;
use crate::position::{Move, Position, Side};

/// Upper bound on legal moves in any position. A side owns at most the king
/// plus 4 diagonals, 4 runners and 6 soldiers. On the board that is at most
/// 8 + 4 * 10 + 4 * 6 + 6 * 6 = 108 moves, with a diagonal's five targets
/// doubled by promotion and every soldier counted as promoted. Drops add at
/// most three kinds over 28 empty squares, for 192 in total.
pub const MAX_MOVES: usize = 256;

pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Whether soldier drops that deliver checkmate are filtered out.
///
/// The filter needs the opponent's full reply list, which is generated with
/// `Disabled` so the check only ever runs one level deep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropMateCheck {
    Enabled,
    Disabled,
}

pub trait GenerateMoves {
    fn gen_moves(&self, position: &Position) -> MoveList;
    fn gen_checkers(&self, position: &Position) -> BitBoard;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MoveGen;

impl GenerateMoves for MoveGen {
    fn gen_moves(&self, position: &Position) -> MoveList {
        legal_moves(position, position.turn())
    }

    fn gen_checkers(&self, position: &Position) -> BitBoard {
        attacks::checkers(position, position.turn())
    }
}

pub static MOVE_GEN: MoveGen = MoveGen;

/// Every legal move for `side`: board moves in row-major order of the moving
/// piece, then drops by hand kind and row-major target.
pub fn legal_moves(position: &Position, side: Side) -> MoveList {
    legal_moves_with(position, side, DropMateCheck::Enabled)
}

pub fn legal_moves_with(position: &Position, side: Side, drop_mate: DropMateCheck) -> MoveList {
    let mut moves = MoveList::new();
    candidates::gen_board_moves(position, side, &mut moves);
    drops::gen_drop_moves(position, side, drop_mate, &mut moves);

    moves.retain(|mve| !attacks::is_in_check(&position.play_as(side, *mve), side));
    moves
}

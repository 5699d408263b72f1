use log::{debug, trace};

use super::{Move, Piece, PieceKind, Position, PositionError, Side, Winner};
use crate::move_gen::{attacks, legal_moves};

impl Position {
    /// Plays a move from `legal_moves(self, self.turn())` and returns the
    /// resulting position, with `winner` set when the move ends the game.
    pub fn apply_move(&self, mve: Move) -> Result<Position, PositionError> {
        if let Some(winner) = self.winner {
            return Err(PositionError::GameAlreadyOver(winner));
        }

        let mover = self.turn;
        if !legal_moves(self, mover).contains(&mve) {
            trace!("rejected {} for {} in {:?}", mve, mover, self);
            return Err(PositionError::IllegalMove(mve));
        }

        let mut next = self.play_unchecked(mve);
        if next.winner.is_some() {
            debug!("{} captured the opposing king with {}", mover, mve);
            return Ok(next);
        }

        let opponent = next.turn;
        if legal_moves(&next, opponent).is_empty() {
            let winner = if attacks::is_in_check(&next, opponent) {
                Winner::from(mover)
            } else {
                Winner::Draw
            };
            debug!("{} has no legal reply to {}, result: {}", opponent, mve, winner);
            next.winner = Some(winner);
        }

        Ok(next)
    }

    /// Plays `mve` for the side to move without checking legality and
    /// without looking for checkmate or stalemate.
    pub fn play_unchecked(&self, mve: Move) -> Position {
        self.play_as(self.turn, mve)
    }

    /// The raw transition: placement, capture into hand, promotion, then
    /// either a king-capture win or the turn passing to the opponent.
    pub(crate) fn play_as(&self, mover: Side, mve: Move) -> Position {
        let mut next = self.clone();

        match mve {
            Move::Drop { kind, to } => {
                next.board.set(to, Some(Piece::new(kind, mover)));
                next.hands.get_mut(mover).remove(kind);
            }
            Move::Board { from, to, promote } => {
                let Some(piece) = next.board.take(from) else {
                    debug_assert!(false, "no piece at {} for {:?}", from, mve);
                    return next;
                };

                if let Some(captured) = next.board.get(to) {
                    if captured.owner != mover && captured.kind != PieceKind::King {
                        next.hands.get_mut(mover).add(captured.kind.demoted());
                    }
                }

                let kind = if promote && piece.kind.is_promotable() {
                    piece.kind.promoted()
                } else {
                    piece.kind
                };
                next.board.set(to, Some(Piece::new(kind, piece.owner)));
            }
        }

        if next.board.find_king(mover.opposite()).is_none() {
            next.winner = Some(Winner::from(mover));
            return next;
        }

        next.turn = mover.opposite();
        next.move_number = next.move_number.saturating_add(1);
        next
    }
}

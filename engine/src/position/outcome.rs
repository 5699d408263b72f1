use std::fmt;

use super::{Position, Winner};
use crate::move_gen::{attacks, legal_moves};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    FirstWins,
    SecondWins,
    Draw,
}

impl From<Option<Winner>> for GameStatus {
    fn from(winner: Option<Winner>) -> Self {
        match winner {
            None => GameStatus::Ongoing,
            Some(Winner::First) => GameStatus::FirstWins,
            Some(Winner::Second) => GameStatus::SecondWins,
            Some(Winner::Draw) => GameStatus::Draw,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::FirstWins => "first wins",
            GameStatus::SecondWins => "second wins",
            GameStatus::Draw => "draw",
        };
        write!(f, "{}", s)
    }
}

impl Position {
    pub fn status(&self) -> GameStatus {
        self.winner.into()
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Classifies the position from scratch, ignoring the stored winner.
    ///
    /// A missing king loses. Otherwise a side to move with no legal moves
    /// loses when in check and draws when not.
    pub fn evaluate_outcome(&self) -> Option<Winner> {
        for side in [self.turn, self.turn.opposite()] {
            if self.board.find_king(side).is_none() {
                return Some(Winner::from(side.opposite()));
            }
        }

        if !legal_moves(self, self.turn).is_empty() {
            return None;
        }

        if attacks::is_in_check(self, self.turn) {
            Some(Winner::from(self.turn.opposite()))
        } else {
            Some(Winner::Draw)
        }
    }
}

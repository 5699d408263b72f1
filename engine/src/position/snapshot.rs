use serde::{Deserialize, Serialize};

use super::{Board, Hands, Piece, Position, Side, Winner};
use crate::bitboard::{Square, COLS, ROWS};

/// Plain-data view of a position for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Vec<Vec<Option<Piece>>>,
    pub hands: Hands,
    pub turn: Side,
    pub move_number: u16,
    pub winner: Option<Winner>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("board rows: want 6 got {0}")]
    Rows(usize),

    #[error("board row {0}: want 5 cells got {1}")]
    Cols(usize, usize),

    #[error("move number: want >= 1 got {0}")]
    MoveNumber(u16),
}

impl Position {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.rows().iter().map(|row| row.to_vec()).collect(),
            hands: self.hands,
            turn: self.turn,
            move_number: self.move_number,
            winner: self.winner,
        }
    }
}

impl TryFrom<Snapshot> for Position {
    type Error = SnapshotError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        if snapshot.board.len() != ROWS {
            return Err(SnapshotError::Rows(snapshot.board.len()));
        }
        if snapshot.move_number == 0 {
            return Err(SnapshotError::MoveNumber(snapshot.move_number));
        }

        let mut board = Board::default();
        for (row_idx, row) in snapshot.board.iter().enumerate() {
            if row.len() != COLS {
                return Err(SnapshotError::Cols(row_idx, row.len()));
            }
            for (col_idx, &cell) in row.iter().enumerate() {
                if let Some(square) = Square::new(row_idx, col_idx) {
                    board.set(square, cell);
                }
            }
        }

        Ok(Position {
            board,
            hands: snapshot.hands,
            turn: snapshot.turn,
            move_number: snapshot.move_number,
            winner: snapshot.winner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use crate::position::{Move, PieceKind};
    use testresult::TestResult;

    #[test]
    fn test_snapshot_start() {
        let snapshot = Position::start().snapshot();

        assert_eq!(snapshot.board.len(), ROWS);
        assert!(snapshot.board.iter().all(|row| row.len() == COLS));
        assert_eq!(
            snapshot.board[5][2],
            Some(Piece::new(PieceKind::King, Side::First))
        );
        assert_eq!(snapshot.board[1][0], None);
        assert_eq!(snapshot.turn, Side::First);
        assert_eq!(snapshot.move_number, 1);
        assert_eq!(snapshot.winner, None);
    }

    #[test]
    fn test_json_keys() -> TestResult {
        let json = serde_json::to_value(Position::start().snapshot())?;

        assert_eq!(json["moveNumber"], 1);
        assert_eq!(json["turn"], "First");
        assert!(json["winner"].is_null());
        assert_eq!(json["hands"]["second"]["soldier"], 0);
        assert_eq!(json["board"][0][2]["kind"], "King");
        assert_eq!(json["board"][0][2]["owner"], "Second");
        assert!(json["board"][1][0].is_null());
        Ok(())
    }

    #[test]
    fn test_json_round_trip_after_game_end() -> TestResult {
        let position = Position::from_sfen("5/5/2l2/2D2/5/L4 b P 7")?;
        let over = position.apply_move(Move::new(C3, C4))?;

        let json = serde_json::to_string(&over.snapshot())?;
        let back = Position::try_from(serde_json::from_str::<Snapshot>(&json)?)?;

        assert_eq!(back, over);
        assert_eq!(back.winner(), Some(Winner::First));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut snapshot = Position::start().snapshot();
        snapshot.board.pop();
        assert_eq!(Position::try_from(snapshot), Err(SnapshotError::Rows(5)));

        let mut snapshot = Position::start().snapshot();
        snapshot.board[3].push(None);
        assert_eq!(Position::try_from(snapshot), Err(SnapshotError::Cols(3, 6)));
    }

    #[test]
    fn test_rejects_zero_move_number() {
        let mut snapshot = Position::start().snapshot();
        snapshot.move_number = 0;
        assert_eq!(
            Position::try_from(snapshot),
            Err(SnapshotError::MoveNumber(0))
        );
    }
}

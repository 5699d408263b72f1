use super::{Board, Hand, Hands, Piece, PieceKind, Position, Side, HAND_KINDS};
use crate::bitboard::{Square, COLS, ROWS};

pub const START_SFEN: &str = "cdldc/5/1ppp1/1PPP1/5/CDLDC b - 1";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SfenError {
    #[error("piece char: got {0}")]
    FromCharPiece(char),

    #[error("num fields: want 4 got {0}")]
    NumFields(usize),

    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("side to move: want 'b'|'w' got {0}")]
    SideToMove(String),

    #[error("hand: got {0}, err at {1}")]
    Hand(String, usize),

    #[error("move number: want 1 <= x < 65_536 got {0}")]
    MoveNumber(String),
}

impl Position {
    pub fn from_sfen(sfen: &str) -> Result<Self, SfenError> {
        let fields = sfen.split_whitespace().collect::<Vec<&str>>();

        if fields.len() != 4 {
            Err(SfenError::NumFields(fields.len()))?
        }

        let board = board_from_sfen(fields[0])?;

        let turn = match fields[1] {
            "b" => Side::First,
            "w" => Side::Second,
            _ => Err(SfenError::SideToMove(fields[1].to_string()))?,
        };

        let hands = hands_from_sfen(fields[2])?;

        let move_number = fields[3]
            .parse::<u16>()
            .map_err(|_| SfenError::MoveNumber(fields[3].to_string()))?;
        if move_number == 0 {
            Err(SfenError::MoveNumber(fields[3].to_string()))?
        }

        Ok(Position {
            board,
            hands,
            turn,
            move_number,
            winner: None,
        })
    }

    /// The winner is not encoded; a parsed position is always ongoing until
    /// a move is applied or `evaluate_outcome` is asked.
    pub fn to_sfen(&self) -> String {
        let mut pieces = String::with_capacity((COLS + 1) * ROWS);

        for (row_idx, row) in self.board.rows().iter().enumerate() {
            let mut empty_count = 0;
            for cell in row {
                match cell {
                    Some(piece) => {
                        if empty_count != 0 {
                            pieces += &empty_count.to_string();
                            empty_count = 0;
                        }
                        pieces.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count != 0 {
                pieces += &empty_count.to_string();
            }
            if row_idx != ROWS - 1 {
                pieces.push('/');
            }
        }

        let side_to_move = match self.turn {
            Side::First => 'b',
            Side::Second => 'w',
        };

        format!(
            "{} {} {} {}",
            pieces,
            side_to_move,
            hands_to_sfen(&self.hands),
            self.move_number
        )
    }
}

fn board_from_sfen(pieces_str: &str) -> Result<Board, SfenError> {
    let err = |idx: usize| SfenError::PiecePlacement(pieces_str.to_string(), idx);

    let mut board = Board::default();
    let mut row = 0;
    let mut col = 0;

    for (ch_idx, ch) in pieces_str.chars().enumerate() {
        if ch == '/' {
            if col != COLS {
                Err(err(ch_idx))?
            }
            row += 1;
            col = 0;
        } else if let Some(digit) = ch.to_digit(10) {
            col += digit as usize;
            if digit == 0 || col > COLS {
                Err(err(ch_idx))?
            }
        } else {
            let kind = PieceKind::try_from(ch).map_err(|_| err(ch_idx))?;
            let owner = if ch.is_ascii_uppercase() {
                Side::First
            } else {
                Side::Second
            };
            let square = Square::new(row, col).ok_or_else(|| err(ch_idx))?;
            board.set(square, Some(Piece::new(kind, owner)));
            col += 1;
        }
    }

    if row != ROWS - 1 || col != COLS {
        Err(err(pieces_str.len()))?
    }

    Ok(board)
}

fn hands_from_sfen(hands_str: &str) -> Result<Hands, SfenError> {
    let mut hands = Hands::default();
    if hands_str == "-" {
        return Ok(hands);
    }

    let err = |idx: usize| SfenError::Hand(hands_str.to_string(), idx);
    let mut count: Option<u8> = None;

    for (ch_idx, ch) in hands_str.chars().enumerate() {
        if let Some(digit) = ch.to_digit(10) {
            let next = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|c| c.checked_add(digit as u8))
                .ok_or_else(|| err(ch_idx))?;
            count = Some(next);
            continue;
        }

        let kind = PieceKind::try_from(ch).map_err(|_| err(ch_idx))?;
        if !HAND_KINDS.contains(&kind) {
            Err(err(ch_idx))?
        }
        let side = if ch.is_ascii_uppercase() {
            Side::First
        } else {
            Side::Second
        };

        let hand = hands.get_mut(side);
        let total = hand
            .get(kind)
            .checked_add(count.take().unwrap_or(1))
            .ok_or_else(|| err(ch_idx))?;
        hand.set(kind, total);
    }

    if count.is_some() || hands_str.is_empty() {
        Err(err(hands_str.len()))?
    }

    Ok(hands)
}

fn hand_to_sfen(out: &mut String, hand: &Hand, side: Side) {
    for kind in [PieceKind::Runner, PieceKind::Diagonal, PieceKind::Soldier] {
        let count = hand.get(kind);
        if count == 0 {
            continue;
        }
        if count > 1 {
            *out += &count.to_string();
        }
        out.push(Piece::new(kind, side).to_char());
    }
}

fn hands_to_sfen(hands: &Hands) -> String {
    let mut out = String::new();
    hand_to_sfen(&mut out, &hands.first, Side::First);
    hand_to_sfen(&mut out, &hands.second, Side::Second);

    if out.is_empty() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_start_sfen() -> TestResult {
        let parsed = Position::from_sfen(START_SFEN)?;
        assert_eq!(parsed, Position::start());
        assert_eq!(Position::start().to_sfen(), START_SFEN);
        Ok(())
    }

    #[test_case("-", Hands::default() ; "empty")]
    #[test_case("P", Hands { first: Hand { soldier: 1, diagonal: 0, runner: 0 }, second: Hand::default() } ; "one soldier")]
    #[test_case("2Pcd", Hands {
        first: Hand { soldier: 2, diagonal: 0, runner: 0 },
        second: Hand { soldier: 0, diagonal: 1, runner: 1 },
    } ; "mixed")]
    #[test_case("D2p", Hands {
        first: Hand { soldier: 0, diagonal: 0, runner: 1 },
        second: Hand { soldier: 2, diagonal: 0, runner: 0 },
    } ; "both sides")]
    fn test_hands_from_sfen(inp: &str, want: Hands) -> TestResult {
        assert_eq!(hands_from_sfen(inp)?, want);
        Ok(())
    }

    #[test_case("L" ; "king")]
    #[test_case("H" ; "promoted")]
    #[test_case("2" ; "dangling count")]
    #[test_case("x" ; "unknown")]
    #[test_case("" ; "empty string")]
    fn test_hands_from_sfen_invalid(inp: &str) {
        assert!(matches!(hands_from_sfen(inp), Err(SfenError::Hand(_, _))));
    }

    #[test]
    fn test_board_from_sfen() -> TestResult {
        let board = board_from_sfen("l4/5/2h2/1U3/5/4L")?;

        assert_eq!(board.get(A6), Some(Piece::new(PieceKind::King, Side::Second)));
        assert_eq!(
            board.get(C4),
            Some(Piece::new(PieceKind::PromotedSoldier, Side::Second))
        );
        assert_eq!(
            board.get(B3),
            Some(Piece::new(PieceKind::PromotedDiagonal, Side::First))
        );
        assert_eq!(board.get(E1), Some(Piece::new(PieceKind::King, Side::First)));
        assert_eq!(board.pieces(Side::First).count(), 2);
        assert_eq!(board.pieces(Side::Second).count(), 2);
        Ok(())
    }

    #[test_case("l4/5/5/5/5" ; "too few rows")]
    #[test_case("l4/5/5/5/5/5/5" ; "too many rows")]
    #[test_case("l5/5/5/5/5/5" ; "row too long")]
    #[test_case("l3/5/5/5/5/5" ; "row too short")]
    #[test_case("lx3/5/5/5/5/5" ; "unknown piece")]
    #[test_case("l04/5/5/5/5/5" ; "zero")]
    fn test_board_from_sfen_invalid(inp: &str) {
        assert!(matches!(board_from_sfen(inp), Err(SfenError::PiecePlacement(_, _))));
    }

    #[test_case("cdldc/5/1ppp1/1PPP1/5/CDLDC b -", SfenError::NumFields(3) ; "missing field")]
    #[test_case("cdldc/5/1ppp1/1PPP1/5/CDLDC x - 1", SfenError::SideToMove("x".to_string()) ; "bad side")]
    #[test_case("cdldc/5/1ppp1/1PPP1/5/CDLDC b - 0", SfenError::MoveNumber("0".to_string()) ; "zero move number")]
    #[test_case("cdldc/5/1ppp1/1PPP1/5/CDLDC b - abc", SfenError::MoveNumber("abc".to_string()) ; "bad move number")]
    fn test_from_sfen_invalid(inp: &str, want: SfenError) {
        assert_eq!(Position::from_sfen(inp), Err(want));
    }

    #[test_case("cdldc/5/1ppp1/1PPP1/5/CDLDC b - 1" ; "start")]
    #[test_case("l4/5/2h2/1U3/5/4L w 2Pdc 17" ; "promoted pieces and hands")]
    #[test_case("5/5/2D2/5/5/4L w - 9" ; "missing king")]
    #[test_case("cdl1c/5/1pDp1/1P2u/5/C1L1C b DPp 12" ; "midgame")]
    fn test_to_sfen_string(sfen: &str) -> TestResult {
        let position = Position::from_sfen(sfen)?;
        assert_eq!(position.to_sfen(), sfen);
        Ok(())
    }

    #[test]
    fn test_winner_not_encoded() -> TestResult {
        let position = Position::from_sfen("5/5/2l2/2D2/5/L4 b - 7")?;
        let over = position.apply_move(crate::position::Move::new(C3, C4))?;

        let reparsed = Position::from_sfen(&over.to_sfen())?;
        assert_eq!(reparsed.winner(), None);
        assert_eq!(reparsed.board(), over.board());
        Ok(())
    }
}

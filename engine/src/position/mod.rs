use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::bitboard::{BitBoard, Square, COLS, ROWS};

mod apply;
mod outcome;
mod sfen;
mod snapshot;

pub use self::outcome::GameStatus;
pub use self::sfen::{SfenError, START_SFEN};
pub use self::snapshot::{Snapshot, SnapshotError};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PositionError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("game is already over, winner: {0}")]
    GameAlreadyOver(Winner),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Row delta of one step forward.
    pub const fn forward(self) -> i8 {
        match self {
            Side::First => -1,
            Side::Second => 1,
        }
    }

    /// The row furthest from this side, the opponent's back rank.
    pub const fn last_row(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => ROWS - 1,
        }
    }

    pub const fn back_row(self) -> usize {
        match self {
            Side::First => ROWS - 1,
            Side::Second => 0,
        }
    }

    /// Whether `row` is one of the two rows nearest the opponent's back rank.
    pub const fn in_enemy_camp(self, row: usize) -> bool {
        match self {
            Side::First => row <= 1,
            Side::Second => row >= ROWS - 2,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    King,
    Runner,
    Diagonal,
    Soldier,
    PromotedSoldier,
    PromotedDiagonal,
}

/// Kinds that can sit in a hand, in drop generation order.
pub const HAND_KINDS: [PieceKind; 3] = [PieceKind::Soldier, PieceKind::Diagonal, PieceKind::Runner];

impl PieceKind {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_promotable(self) -> bool {
        matches!(self, PieceKind::Soldier | PieceKind::Diagonal)
    }

    pub const fn promoted(self) -> PieceKind {
        match self {
            PieceKind::Soldier => PieceKind::PromotedSoldier,
            PieceKind::Diagonal => PieceKind::PromotedDiagonal,
            kind => kind,
        }
    }

    pub const fn demoted(self) -> PieceKind {
        match self {
            PieceKind::PromotedSoldier => PieceKind::Soldier,
            PieceKind::PromotedDiagonal => PieceKind::Diagonal,
            kind => kind,
        }
    }
}

impl From<PieceKind> for char {
    fn from(kind: PieceKind) -> char {
        match kind {
            PieceKind::King => 'l',
            PieceKind::Runner => 'd',
            PieceKind::Diagonal => 'c',
            PieceKind::Soldier => 'p',
            PieceKind::PromotedSoldier => 'h',
            PieceKind::PromotedDiagonal => 'u',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = SfenError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'l' => Ok(PieceKind::King),
            'd' => Ok(PieceKind::Runner),
            'c' => Ok(PieceKind::Diagonal),
            'p' => Ok(PieceKind::Soldier),
            'h' => Ok(PieceKind::PromotedSoldier),
            'u' => Ok(PieceKind::PromotedDiagonal),
            _ => Err(SfenError::FromCharPiece(value)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, owner: Side) -> Self {
        Self { kind, owner }
    }

    /// Uppercase for First, lowercase for Second.
    pub fn to_char(self) -> char {
        let ch: char = self.kind.into();
        match self.owner {
            Side::First => ch.to_ascii_uppercase(),
            Side::Second => ch,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Deserialize, Serialize)]
pub struct Hand {
    pub soldier: u8,
    pub diagonal: u8,
    pub runner: u8,
}

impl Hand {
    /// Count held of `kind`. Promoted kinds are counted as their base kind.
    pub fn get(&self, kind: PieceKind) -> u8 {
        match kind.demoted() {
            PieceKind::Soldier => self.soldier,
            PieceKind::Diagonal => self.diagonal,
            PieceKind::Runner => self.runner,
            _ => 0,
        }
    }

    fn slot_mut(&mut self, kind: PieceKind) -> Option<&mut u8> {
        match kind.demoted() {
            PieceKind::Soldier => Some(&mut self.soldier),
            PieceKind::Diagonal => Some(&mut self.diagonal),
            PieceKind::Runner => Some(&mut self.runner),
            _ => None,
        }
    }

    /// Adds one demoted `kind`. Kings never enter a hand.
    pub fn add(&mut self, kind: PieceKind) {
        if let Some(count) = self.slot_mut(kind) {
            *count = count.saturating_add(1);
        }
    }

    pub fn remove(&mut self, kind: PieceKind) {
        if let Some(count) = self.slot_mut(kind) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn set(&mut self, kind: PieceKind, count: u8) {
        if let Some(slot) = self.slot_mut(kind) {
            *slot = count;
        }
    }

    pub fn is_empty(&self) -> bool {
        HAND_KINDS.iter().all(|&kind| self.get(kind) == 0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, Deserialize, Serialize)]
pub struct Hands {
    pub first: Hand,
    pub second: Hand,
}

impl Hands {
    pub fn get(&self, side: Side) -> &Hand {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut Hand {
        match side {
            Side::First => &mut self.first,
            Side::Second => &mut self.second,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Winner {
    First,
    Second,
    Draw,
}

impl Winner {
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::First => Some(Side::First),
            Winner::Second => Some(Side::Second),
            Winner::Draw => None,
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::First => Winner::First,
            Side::Second => Winner::Second,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Hash)]
pub struct Board([[Option<Piece>; COLS]; ROWS]);

impl Board {
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.0[square.row()][square.col()]
    }

    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.0[square.row()][square.col()] = piece;
    }

    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.0[square.row()][square.col()].take()
    }

    pub fn rows(&self) -> &[[Option<Piece>; COLS]; ROWS] {
        &self.0
    }

    /// Pieces owned by `side` in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| match self.get(square) {
            Some(piece) if piece.owner == side => Some((square, piece)),
            _ => None,
        })
    }

    pub fn find_king(&self, side: Side) -> Option<Square> {
        self.pieces(side)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Squares holding `side`'s pieces of exactly `kind`.
    pub fn squares_of(&self, kind: PieceKind, side: Side) -> BitBoard {
        self.pieces(side)
            .filter(|(_, piece)| piece.kind == kind)
            .map(|(square, _)| square)
            .collect()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) hands: Hands,
    pub(crate) turn: Side,
    pub(crate) move_number: u16,
    pub(crate) winner: Option<Winner>,
}

const BACK_RANK: [PieceKind; COLS] = [
    PieceKind::Diagonal,
    PieceKind::Runner,
    PieceKind::King,
    PieceKind::Runner,
    PieceKind::Diagonal,
];
const SOLDIER_COLS: [usize; 3] = [1, 2, 3];

impl Position {
    pub fn start() -> Self {
        let mut position = Position::empty(Side::First);
        for side in Side::iter() {
            let soldier_row = (side.back_row() as i8 + 2 * side.forward()) as usize;
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                if let Some(square) = Square::new(side.back_row(), col) {
                    position.board.set(square, Some(Piece::new(kind, side)));
                }
            }
            for col in SOLDIER_COLS {
                if let Some(square) = Square::new(soldier_row, col) {
                    position
                        .board
                        .set(square, Some(Piece::new(PieceKind::Soldier, side)));
                }
            }
        }
        position
    }

    /// An empty board with empty hands, `turn` to move.
    pub fn empty(turn: Side) -> Self {
        Self {
            board: Board::default(),
            hands: Hands::default(),
            turn,
            move_number: 1,
            winner: None,
        }
    }

    pub fn with_piece(mut self, square: Square, kind: PieceKind, owner: Side) -> Self {
        self.board.set(square, Some(Piece::new(kind, owner)));
        self
    }

    pub fn with_hand(mut self, side: Side, kind: PieceKind, count: u8) -> Self {
        self.hands.get_mut(side).set(kind, count);
        self
    }

    pub fn with_move_number(mut self, move_number: u16) -> Self {
        self.move_number = move_number.max(1);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }

    pub fn hand(&self, side: Side) -> &Hand {
        self.hands.get(side)
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn move_number(&self) -> u16 {
        self.move_number
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity((COLS + 1) * ROWS);
        for (row_idx, row) in self.board.rows().iter().enumerate() {
            for cell in row {
                board_str.push(cell.map_or('.', Piece::to_char));
            }
            if row_idx != ROWS - 1 {
                board_str.push('\n');
            }
        }
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sfen())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Move {
    Board {
        from: Square,
        to: Square,
        promote: bool,
    },
    Drop {
        kind: PieceKind,
        to: Square,
    },
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move::Board {
            from,
            to,
            promote: false,
        }
    }

    pub fn with_promotion(from: Square, to: Square) -> Move {
        Move::Board {
            from,
            to,
            promote: true,
        }
    }

    pub fn drop(kind: PieceKind, to: Square) -> Move {
        Move::Drop { kind, to }
    }

    pub fn to(&self) -> Square {
        match *self {
            Move::Board { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    pub fn is_drop(&self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    pub fn is_promotion(&self) -> bool {
        matches!(self, Move::Board { promote: true, .. })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Board { from, to, promote } => {
                write!(f, "{} -> {}", from, to)?;
                if *promote {
                    write!(f, " (promote)")?;
                }
                Ok(())
            }
            Move::Drop { kind, to } => write!(f, "{} drop -> {}", kind, to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Board { from, to, promote } => {
                let suffix = if *promote { "+" } else { "" };
                write!(
                    f,
                    "{}{}{}",
                    from.to_string().to_lowercase(),
                    to.to_string().to_lowercase(),
                    suffix
                )
            }
            Move::Drop { kind, to } => {
                let kind_ch: char = (*kind).into();
                write!(
                    f,
                    "{}*{}",
                    kind_ch.to_ascii_uppercase(),
                    to.to_string().to_lowercase()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use test_case::test_case;

    #[test]
    fn test_display() {
        let got = Position::start();
        let want = "cdldc\n.....\n.ppp.\n.PPP.\n.....\nCDLDC";

        assert_eq!(format!("{}", got), want);
    }

    #[test]
    fn test_start() {
        let pos = Position::start();

        assert_eq!(pos.turn(), Side::First);
        assert_eq!(pos.move_number(), 1);
        assert_eq!(pos.winner(), None);
        assert!(pos.hand(Side::First).is_empty());
        assert!(pos.hand(Side::Second).is_empty());

        assert_eq!(pos.board().find_king(Side::First), Some(C1));
        assert_eq!(pos.board().find_king(Side::Second), Some(C6));
        assert_eq!(
            pos.piece_at(A1),
            Some(Piece::new(PieceKind::Diagonal, Side::First))
        );
        assert_eq!(
            pos.piece_at(D6),
            Some(Piece::new(PieceKind::Runner, Side::Second))
        );
        assert_eq!(
            pos.board().squares_of(PieceKind::Soldier, Side::First),
            BitBoard::from_squares(&[B3, C3, D3])
        );
        assert_eq!(
            pos.board().squares_of(PieceKind::Soldier, Side::Second),
            BitBoard::from_squares(&[B4, C4, D4])
        );
    }

    #[test_case(Side::First, 0, true)]
    #[test_case(Side::First, 1, true)]
    #[test_case(Side::First, 2, false)]
    #[test_case(Side::Second, 4, true)]
    #[test_case(Side::Second, 5, true)]
    #[test_case(Side::Second, 3, false)]
    fn test_in_enemy_camp(side: Side, row: usize, want: bool) {
        assert_eq!(side.in_enemy_camp(row), want);
    }

    #[test]
    fn test_promote_demote() {
        assert_eq!(PieceKind::Soldier.promoted(), PieceKind::PromotedSoldier);
        assert_eq!(PieceKind::Diagonal.promoted(), PieceKind::PromotedDiagonal);
        assert_eq!(PieceKind::Runner.promoted(), PieceKind::Runner);
        assert_eq!(PieceKind::PromotedSoldier.demoted(), PieceKind::Soldier);
        assert_eq!(PieceKind::PromotedDiagonal.demoted(), PieceKind::Diagonal);
        assert_eq!(PieceKind::King.demoted(), PieceKind::King);
    }

    #[test]
    fn test_hand_ignores_kings_and_demotes() {
        let mut hand = Hand::default();
        hand.add(PieceKind::King);
        assert!(hand.is_empty());

        hand.add(PieceKind::PromotedSoldier);
        assert_eq!(hand.get(PieceKind::Soldier), 1);

        hand.remove(PieceKind::Soldier);
        hand.remove(PieceKind::Soldier);
        assert_eq!(hand.get(PieceKind::Soldier), 0);
    }

    #[test_case(Move::new(C3, C4), "c3c4" ; "board move")]
    #[test_case(Move::with_promotion(B2, B1), "b2b1+" ; "promotion")]
    #[test_case(Move::drop(PieceKind::Soldier, E4), "P*e4" ; "drop")]
    fn test_move_display(mve: Move, want: &str) {
        assert_eq!(mve.to_string(), want);
    }

    #[test_case(Move::new(A1, A2), "A1 -> A2" ; "no promotion")]
    #[test_case(Move::with_promotion(C2, C1), "C2 -> C1 (promote)" ; "with promotion")]
    #[test_case(Move::drop(PieceKind::Runner, D3), "Runner drop -> D3" ; "drop")]
    fn test_move_debug(mve: Move, want: &str) {
        assert_eq!(format!("{:?}", mve), want);
    }
}

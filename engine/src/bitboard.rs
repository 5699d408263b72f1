use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

pub const ROWS: usize = 6;
pub const COLS: usize = 5;
pub const NUM_SQUARES: usize = ROWS * COLS;

/// Squares in row-major order. Row 0 is Second's back rank, so `A6` is index 0
/// and `E1` (First's back rank, right hand side) is index 29.
#[allow(dead_code)]
#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, FromRepr, Display, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    A6, B6, C6, D6, E6,
    A5, B5, C5, D5, E5,
    A4, B4, C4, D4, E4,
    A3, B3, C3, D3, E3,
    A2, B2, C2, D2, E2,
    A1, B1, C1, D1, E1,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Square> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        Square::from_repr((row * COLS + col) as u8)
    }

    pub const fn row(self) -> usize {
        self as usize / COLS
    }

    pub const fn col(self) -> usize {
        self as usize % COLS
    }

    /// The square `d_row` rows and `d_col` columns away, if it is on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Square::new(row as usize, col as usize)
    }

    pub(crate) fn from_index(idx: usize) -> Option<Square> {
        u8::try_from(idx).ok().and_then(Square::from_repr)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct BitBoard(u32);

impl BitBoard {
    const BOARD_MASK: u32 = (1 << NUM_SQUARES) - 1;

    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn full() -> Self {
        BitBoard(Self::BOARD_MASK)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << (square as u8))
    }

    pub fn from_squares(squares: &[Square]) -> Self {
        BitBoard(squares.iter().fold(0, |board, sq| board | 1 << (*sq as u8)))
    }

    /// Every square of column `col`.
    pub fn file_mask(col: usize) -> Self {
        (0..ROWS)
            .filter_map(|row| Square::new(row, col))
            .fold(BitBoard::empty(), |acc, sq| acc | BitBoard::from_square(sq))
    }

    pub fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u32
    }

    pub fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u32)
    }

    pub fn is_square_set(&self, square: Square) -> bool {
        self.0 & 1 << (square as u32) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn num_squares_set(self) -> u32 {
        self.0.count_ones()
    }

    pub fn get_lsb(&self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Square::from_index(self.0.trailing_zeros() as usize)
    }

    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.get_lsb()?;
        self.0 &= self.0 - 1;
        Some(lsb)
    }

    pub fn to_squares(self) -> Vec<Square> {
        self.into_iter().collect()
    }
}

impl IntoIterator for BitBoard {
    type Item = Square;
    type IntoIter = BitBoardIter;

    fn into_iter(self) -> Self::IntoIter {
        BitBoardIter(self)
    }
}

/// Squares of a bitboard in ascending (row-major) order.
pub struct BitBoardIter(BitBoard);

impl Iterator for BitBoardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }
}

impl FromIterator<Square> for BitBoard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter()
            .fold(BitBoard::empty(), |acc, sq| acc | BitBoard::from_square(sq))
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ other.0)
    }
}

impl BitXorAssign for BitBoard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    // Bits above the last square stay clear.
    fn not(self) -> Self::Output {
        BitBoard(!self.0 & Self::BOARD_MASK)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(NUM_SQUARES + ROWS - 1);

        for row in 0..ROWS {
            for col in 0..COLS {
                let ch = match Square::new(row, col) {
                    Some(square) if self.is_square_set(square) => 'X',
                    _ => '.',
                };
                board_str.push(ch);
            }
            if row != ROWS - 1 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}

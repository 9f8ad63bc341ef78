//! Active falling piece

use crate::board::{Board, BOARD_WIDTH};
use crate::tetromino::{Shape, TetrominoType};

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Current matrix; replaced wholesale on rotation
    pub shape: Shape,
    /// Offset (row, col) of the matrix's top-left corner.
    /// Row 0 is the top, increases downward
    pub row: i32,
    pub col: i32,
}

impl Piece {
    /// Create a new piece at the spawn position: top row, horizontally centered
    pub fn spawn(kind: TetrominoType) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            row: 0,
            col: ((BOARD_WIDTH - shape.cols()) / 2) as i32,
        }
    }

    /// Absolute (row, col) positions of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(r, c)| (self.row + r as i32, self.col + c as i32))
    }

    /// The same piece shifted by (drow, dcol)
    pub fn moved(&self, drow: i32, dcol: i32) -> Piece {
        Piece {
            row: self.row + drow,
            col: self.col + dcol,
            ..*self
        }
    }

    /// The same piece rotated clockwise in place, with no offset adjustment
    pub fn rotated(&self) -> Piece {
        Piece {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid_position(self, self.row, self.col)
    }

    /// Lowest row this piece can fall to from its current offset
    pub fn drop_row(&self, board: &Board) -> i32 {
        let mut row = self.row;
        while board.is_valid_position(self, row + 1, self.col) {
            row += 1;
        }
        row
    }
}

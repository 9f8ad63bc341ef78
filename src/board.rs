//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use serde::Serialize;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = Self::index(row, col)?;
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some((row, col)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_HEIGHT && col < BOARD_WIDTH).then_some((row, col))
    }

    /// Check whether `piece` fits with its matrix placed at (row, col).
    ///
    /// Cells above the top edge are allowed and skip the occupancy check,
    /// since pieces may enter partially off-screen.
    pub fn is_valid_position(&self, piece: &Piece, row: i32, col: i32) -> bool {
        piece.shape.cells().all(|(dr, dc)| {
            let r = row + dr as i32;
            let c = col + dc as i32;
            if c < 0 || c >= BOARD_WIDTH as i32 || r >= BOARD_HEIGHT as i32 {
                return false;
            }
            r < 0 || self.cells[r as usize][c as usize].is_empty()
        })
    }

    /// Lock a piece onto the board at its current offset.
    /// Cells still above the top edge are dropped.
    pub fn commit(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            if row >= 0 {
                self.set(row, col, Cell::Filled(piece.kind));
            }
        }
    }

    /// Clear completed lines and return the number cleared
    pub fn clear_full_lines(&mut self) -> usize {
        let mut write_row = BOARD_HEIGHT;

        // Compact from the bottom up so surviving rows keep their order
        for read_row in (0..BOARD_HEIGHT).rev() {
            if !self.is_line_full(read_row) {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        // Everything above the last kept row is fresh space
        for row in 0..write_row {
            self.cells[row] = [Cell::Empty; BOARD_WIDTH];
        }

        write_row
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(Cell::is_filled)
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, except: &[i32]) {
        for col in 0..BOARD_WIDTH as i32 {
            if !except.contains(&col) {
                board.set(row, col, Cell::Filled(TetrominoType::J));
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(!board.set(0, BOARD_WIDTH as i32, Cell::Filled(TetrominoType::I)));
    }

    #[test]
    fn test_valid_position_bounds() {
        let board = Board::new();
        let o = Piece::spawn(TetrominoType::O);
        assert!(board.is_valid_position(&o, 0, 0));
        assert!(board.is_valid_position(&o, 18, 8));
        assert!(!board.is_valid_position(&o, 0, -1));
        assert!(!board.is_valid_position(&o, 0, 9));
        assert!(!board.is_valid_position(&o, 19, 0));
    }

    #[test]
    fn test_cells_above_top_skip_occupancy() {
        let mut board = Board::new();
        board.set(0, 4, Cell::Filled(TetrominoType::T));
        let o = Piece::spawn(TetrominoType::O);
        // Bottom half of the O would land on (0, 4)
        assert!(!board.is_valid_position(&o, -1, 4));
        // Entirely above the board is fine
        assert!(board.is_valid_position(&o, -2, 4));
    }

    #[test]
    fn test_commit_drops_cells_above_top() {
        let mut board = Board::new();
        let mut o = Piece::spawn(TetrominoType::O);
        o.row = -1;
        board.commit(&o);
        assert_eq!(board.get(0, 4), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(board.get(0, 5), Some(Cell::Filled(TetrominoType::O)));
        let filled = board.rows().flatten().filter(|c| c.is_filled()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row(&mut board, 19, &[]);
        board.set(18, 0, Cell::Filled(TetrominoType::S));
        board.set(17, 3, Cell::Filled(TetrominoType::L));

        let cleared = board.clear_full_lines();
        assert_eq!(cleared, 1);
        assert_eq!(board.get(19, 0), Some(Cell::Filled(TetrominoType::S)));
        assert_eq!(board.get(18, 3), Some(Cell::Filled(TetrominoType::L)));
        assert!(board.get(18, 0).unwrap().is_empty());
        assert!(board.rows().next().unwrap().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_clear_full_row_in_the_middle() {
        let mut board = Board::new();
        fill_row(&mut board, 19, &[0]);
        fill_row(&mut board, 18, &[]);
        fill_row(&mut board, 17, &[1, 2]);

        assert_eq!(board.clear_full_lines(), 1);
        // Row 17 slid down into 18, row 19 untouched
        assert!(board.get(18, 1).unwrap().is_empty());
        assert!(board.get(18, 0).unwrap().is_filled());
        assert!(board.get(19, 0).unwrap().is_empty());
        assert!(board.get(19, 1).unwrap().is_filled());
        assert!(board.rows().take(18).flatten().all(Cell::is_empty));
    }

    #[test]
    fn test_clear_non_adjacent_lines() {
        let mut board = Board::new();
        fill_row(&mut board, 19, &[]);
        fill_row(&mut board, 18, &[5]);
        fill_row(&mut board, 17, &[]);

        assert_eq!(board.clear_full_lines(), 2);
        assert!(board.get(19, 5).unwrap().is_empty());
        assert!(board.get(19, 0).unwrap().is_filled());
        assert!(board.rows().take(19).flatten().all(Cell::is_empty));
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new();
        fill_row(&mut board, 19, &[9]);
        let before = board.clone();
        assert_eq!(board.clear_full_lines(), 0);
        assert_eq!(board, before);
    }
}

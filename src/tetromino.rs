//! Tetromino definitions and shapes
//!
//! Each of the 7 tetrominoes has a fixed spawn matrix. Rotation never mutates a
//! matrix; it produces a new one.

use serde::{Deserialize, Serialize};

/// Largest matrix dimension any tetromino needs
pub const MAX_SHAPE: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Display color as an RGB triple
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            TetrominoType::I => (0, 240, 240),
            TetrominoType::O => (240, 240, 0),
            TetrominoType::T => (160, 0, 240),
            TetrominoType::S => (0, 240, 0),
            TetrominoType::Z => (240, 0, 0),
            TetrominoType::J => (0, 0, 240),
            TetrominoType::L => (255, 165, 0),
        }
    }

    /// Spawn-orientation matrix, row 0 on top
    pub fn shape(self) -> Shape {
        SHAPES[self as usize]
    }

    pub fn letter(self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::O => 'O',
            TetrominoType::T => 'T',
            TetrominoType::S => 'S',
            TetrominoType::Z => 'Z',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
        }
    }

    /// Parse a single letter, case-insensitive
    pub fn from_letter(c: char) -> Option<TetrominoType> {
        TetrominoType::ALL
            .into_iter()
            .find(|kind| kind.letter() == c.to_ascii_uppercase())
    }
}

// Indexed by `TetrominoType as usize`
const SHAPES: [Shape; 7] = [
    Shape::from_rows(&[&[1, 1, 1, 1]]),
    Shape::from_rows(&[&[1, 1], &[1, 1]]),
    Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
    Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
    Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
    Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
    Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
];

/// A small binary matrix describing which cells of a piece are occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: [[bool; MAX_SHAPE]; MAX_SHAPE],
}

impl Shape {
    const fn from_rows(rows: &[&[u8]]) -> Self {
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        let mut r = 0;
        while r < rows.len() {
            let mut c = 0;
            while c < rows[r].len() {
                cells[r][c] = rows[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: rows.len(),
            cols: rows[0].len(),
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row][col]
    }

    /// Occupied (row, col) positions within the matrix
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (r, c))
        })
    }

    /// Rotate 90 degrees clockwise: transpose, then reverse each row.
    pub fn rotated_cw(&self) -> Shape {
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for r in 0..self.rows {
            for c in 0..self.cols {
                cells[c][self.rows - 1 - r] = self.cells[r][c];
            }
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

//! Read-only view of a game for renderers and replays

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, Phase};
use crate::score::Score;
use crate::tetromino::TetrominoType;
use serde::Serialize;

/// The falling piece in board coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveView {
    pub kind: TetrominoType,
    pub row: i32,
    pub col: i32,
    /// Absolute (row, col) of each occupied cell
    pub cells: Vec<(i32, i32)>,
}

/// The preview piece, in its own matrix coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextView {
    pub kind: TetrominoType,
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Locked cells, [row][col] with row 0 on top
    pub grid: [[Option<TetrominoType>; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active: ActiveView,
    /// Landing row of the active piece; absent once the game is over
    pub ghost_row: Option<i32>,
    pub next: NextView,
    pub score: Score,
    pub phase: Phase,
    pub paused: bool,
    pub drop_interval_ms: u64,
    pub pieces_locked: u64,
    pub revision: u64,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let mut grid = [[None; BOARD_WIDTH]; BOARD_HEIGHT];
        for (row, cells) in game.board().rows().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Cell::Filled(kind) = cell {
                    grid[row][col] = Some(*kind);
                }
            }
        }

        let active = game.active();
        let next = game.next();
        Self {
            grid,
            active: ActiveView {
                kind: active.kind,
                row: active.row,
                col: active.col,
                cells: active.cells().collect(),
            },
            ghost_row: (!game.is_over()).then(|| game.ghost_row()),
            next: NextView {
                kind: next.kind,
                rows: next.shape.rows(),
                cols: next.shape.cols(),
                cells: next.shape.cells().collect(),
            },
            score: *game.score(),
            phase: game.phase(),
            paused: game.is_paused(),
            drop_interval_ms: game.drop_interval().as_millis() as u64,
            pieces_locked: game.pieces_locked(),
            revision: game.revision(),
        }
    }

    /// Whether the active piece covers (row, col)
    pub fn is_active(&self, row: i32, col: i32) -> bool {
        self.active.cells.contains(&(row, col))
    }

    /// Whether the ghost piece covers (row, col)
    pub fn is_ghost(&self, row: i32, col: i32) -> bool {
        let Some(ghost_row) = self.ghost_row else {
            return false;
        };
        let shift = ghost_row - self.active.row;
        self.active.cells.contains(&(row - shift, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::game::GameConfig;
    use crate::generator::PieceGenerator;

    fn game_with(board: Board) -> Game {
        let generator =
            PieceGenerator::sequence(vec![TetrominoType::O, TetrominoType::T]).unwrap();
        Game::with_board(board, generator, GameConfig::default())
    }

    #[test]
    fn test_snapshot_reflects_board_and_pieces() {
        let mut board = Board::new();
        board.set(19, 0, Cell::Filled(TetrominoType::L));
        let snapshot = game_with(board).snapshot();

        assert_eq!(snapshot.grid[19][0], Some(TetrominoType::L));
        assert_eq!(snapshot.grid[19][1], None);
        assert_eq!(snapshot.active.kind, TetrominoType::O);
        assert_eq!(snapshot.active.cells, vec![(0, 4), (0, 5), (1, 4), (1, 5)]);
        assert_eq!(snapshot.next.kind, TetrominoType::T);
        assert_eq!((snapshot.next.rows, snapshot.next.cols), (2, 3));
        assert_eq!(snapshot.ghost_row, Some(18));
        assert_eq!(snapshot.score.level, 1);
        assert_eq!(snapshot.drop_interval_ms, 800);
    }

    #[test]
    fn test_ghost_cells() {
        let snapshot = game_with(Board::new()).snapshot();
        assert!(snapshot.is_ghost(19, 4));
        assert!(snapshot.is_ghost(18, 5));
        assert!(!snapshot.is_ghost(17, 4));
        assert!(snapshot.is_active(0, 4));
        assert!(!snapshot.is_active(19, 4));
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut game = game_with(Board::new());
        let first = game.snapshot().revision;
        game.move_piece(1, 0);
        assert!(game.snapshot().revision > first);
    }

    #[test]
    fn test_serializes_to_json() {
        let snapshot = game_with(Board::new()).snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["phase"], "Falling");
        assert_eq!(value["score"]["level"], 1);
        assert_eq!(value["active"]["kind"], "O");
        assert_eq!(value["grid"].as_array().unwrap().len(), BOARD_HEIGHT);
    }
}

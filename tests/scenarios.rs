//! End-to-end engine scenarios through the public API

use blockdrop::board::{Board, Cell, BOARD_HEIGHT, BOARD_WIDTH};
use blockdrop::game::{Action, Game, GameConfig, Phase};
use blockdrop::generator::{PieceGenerator, RandomizerKind};
use blockdrop::replay;
use blockdrop::tetromino::TetrominoType::{self, *};

fn scripted(board: Board, pieces: &[TetrominoType]) -> Game {
    let generator = PieceGenerator::sequence(pieces.to_vec()).unwrap();
    Game::with_board(board, generator, GameConfig::default())
}

fn occupied(board: &Board) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    for (row, cells_in_row) in board.rows().enumerate() {
        for (col, cell) in cells_in_row.iter().enumerate() {
            if cell.is_filled() {
                cells.push((row as i32, col as i32));
            }
        }
    }
    cells
}

#[test]
fn o_piece_hard_drop_lands_on_floor() {
    let mut game = scripted(Board::new(), &[O, T]);
    let center = game.active().col;
    assert_eq!(center, 4);

    game.hard_drop();

    assert_eq!(
        occupied(game.board()),
        vec![(18, center), (18, center + 1), (19, center), (19, center + 1)]
    );
    assert_eq!(game.score().points, 0);
    assert_eq!(game.score().lines, 0);
    assert_eq!(game.score().level, 1);
    assert_eq!(game.phase(), Phase::Falling);
    assert_eq!(game.active().kind, T);
}

#[test]
fn horizontal_i_completes_bottom_row() {
    let mut board = Board::new();
    for col in [0, 1, 2, 7, 8, 9] {
        board.set(BOARD_HEIGHT as i32 - 1, col, Cell::Filled(L));
    }
    // Something above the cleared row to watch it shift down
    board.set(BOARD_HEIGHT as i32 - 2, 0, Cell::Filled(S));

    let mut game = scripted(board, &[I, O]);
    let level_before = game.score().level;
    game.hard_drop();

    assert_eq!(game.score().lines, 1);
    assert_eq!(game.score().points, 100 * u64::from(level_before));
    assert_eq!(occupied(game.board()), vec![(19, 0)]);
    assert_eq!(game.board().get(19, 0), Some(Cell::Filled(S)));
}

#[test]
fn walls_reject_sideways_moves() {
    let mut game = scripted(Board::new(), &[T]);
    while game.move_piece(-1, 0) {}
    assert_eq!(game.active().col, 0);
    assert!(!game.move_piece(-1, 0));

    while game.move_piece(1, 0) {}
    let width = game.active().shape.cols() as i32;
    assert_eq!(game.active().col, BOARD_WIDTH as i32 - width);
    assert!(!game.move_piece(1, 0));
    assert_eq!(game.pieces_locked(), 0);
}

#[test]
fn four_rotations_restore_every_piece() {
    for kind in TetrominoType::ALL {
        let mut game = scripted(Board::new(), &[kind]);
        // Room to turn the long bar
        game.move_piece(0, 1);
        game.move_piece(0, 1);
        let before = *game.active();
        for _ in 0..4 {
            assert!(game.rotate(), "{kind:?}");
        }
        assert_eq!(*game.active(), before, "{kind:?}");
    }
}

#[test]
fn blocked_spawn_ends_game_until_reset() {
    let mut board = Board::new();
    for row in 2..BOARD_HEIGHT as i32 {
        for col in 1..BOARD_WIDTH as i32 {
            board.set(row, col, Cell::Filled(Z));
        }
    }
    let mut game = scripted(board, &[T, T]);
    assert_eq!(game.phase(), Phase::Falling);

    // The T locks in rows 0-1 and the next T has nowhere to go
    game.apply(Action::HardDrop);
    assert_eq!(game.phase(), Phase::GameOver);

    let frozen = game.snapshot();
    for action in [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::Rotate,
        Action::HardDrop,
        Action::PauseToggle,
    ] {
        game.apply(action);
    }
    assert_eq!(game.snapshot(), frozen);
    assert_eq!(frozen.ghost_row, None);

    game.apply(Action::Reset);
    assert_eq!(game.phase(), Phase::Falling);
    assert!(game.board().is_empty());
    assert_eq!(game.score().points, 0);
    assert_eq!(game.score().level, 1);
}

#[test]
fn seeded_games_replay_identically() {
    let steps = replay::parse_inputs("hlluh rrh duuh tttth llllh rrrrh").unwrap();
    let config = GameConfig {
        randomizer: RandomizerKind::Uniform,
        ..GameConfig::default()
    };

    let mut first = Game::with_seed(config, 1234);
    let mut second = Game::with_seed(config, 1234);
    replay::run(&mut first, &steps);
    replay::run(&mut second, &steps);

    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.pieces_locked(), 7);
}

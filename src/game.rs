//! Core game state and logic

use crate::board::Board;
use crate::generator::{PieceGenerator, RandomizerKind};
use crate::gravity::{Gravity, GravityConfig};
use crate::piece::Piece;
use crate::score::Score;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::mem;
use std::time::Duration;
use tracing::{debug, info};

/// Lock-and-advance state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// The active piece is falling and accepts input
    Falling,
    /// The active piece is being written into the board
    Locking,
    /// The next piece had no room to spawn; only reset leaves this state
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    PauseToggle,
    Reset,
}

/// Tunables for a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity: GravityConfig,
    pub randomizer: RandomizerKind,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// Current falling piece
    active: Piece,
    /// Look-ahead piece shown in the preview
    next: Piece,
    generator: PieceGenerator,
    score: Score,
    gravity: Gravity,
    phase: Phase,
    paused: bool,
    /// Pieces locked since the last reset
    pieces_locked: u64,
    /// Bumped on every observable change
    revision: u64,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create a new game whose piece order is fixed by `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        debug!(seed, randomizer = ?config.randomizer, "seeding piece generator");
        Self::with_board(
            Board::new(),
            PieceGenerator::new(config.randomizer, seed),
            config,
        )
    }

    /// Start from an arbitrary board and piece source
    pub fn with_board(board: Board, mut generator: PieceGenerator, config: GameConfig) -> Self {
        let active = generator.next();
        let next = generator.next();
        let phase = if active.fits(&board) {
            Phase::Falling
        } else {
            Phase::GameOver
        };
        Self {
            board,
            active,
            next,
            generator,
            score: Score::new(),
            gravity: Gravity::new(config.gravity),
            phase,
            paused: false,
            pieces_locked: 0,
            revision: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current gravity interval
    pub fn drop_interval(&self) -> Duration {
        self.gravity.interval()
    }

    /// Row the active piece would land on if hard dropped
    pub fn ghost_row(&self) -> i32 {
        self.active.drop_row(&self.board)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Whether moves, rotations and gravity are currently accepted
    fn is_playable(&self) -> bool {
        self.phase == Phase::Falling && !self.paused
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Process an action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.move_piece(-1, 0);
            }
            Action::MoveRight => {
                self.move_piece(1, 0);
            }
            Action::SoftDrop => {
                self.move_piece(0, 1);
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::HardDrop => self.hard_drop(),
            Action::PauseToggle => self.toggle_pause(),
            Action::Reset => self.reset(),
        }
    }

    /// Try to shift the active piece by (dx, dy). Returns true if it moved.
    ///
    /// A rejected downward move means the piece has landed, and it is locked.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if !self.is_playable() {
            return false;
        }
        let moved = self.active.moved(dy, dx);
        if moved.fits(&self.board) {
            self.active = moved;
            self.touch();
            return true;
        }
        if dy > 0 {
            self.lock_and_advance();
        }
        false
    }

    /// Rotate clockwise. A rotation that collides is discarded, with no kicks.
    pub fn rotate(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let rotated = self.active.rotated();
        if !rotated.fits(&self.board) {
            return false;
        }
        self.active = rotated;
        self.touch();
        true
    }

    /// Drop straight to the lowest valid row and lock immediately
    pub fn hard_drop(&mut self) {
        if !self.is_playable() {
            return;
        }
        self.active.row = self.active.drop_row(&self.board);
        self.lock_and_advance();
    }

    /// One gravity step
    pub fn tick(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Advance gravity by `dt` of wall-clock time
    pub fn update(&mut self, dt: Duration) {
        if !self.is_playable() {
            return;
        }
        let due = self.gravity.advance(dt);
        for _ in 0..due {
            let locked = self.pieces_locked;
            self.tick();
            // A fresh piece starts with a full interval
            if self.pieces_locked != locked || !self.is_playable() {
                break;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
        self.touch();
    }

    /// Start over with an empty board and fresh counters
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.score = Score::new();
        self.gravity.restart();
        self.active = self.generator.next();
        self.next = self.generator.next();
        self.phase = Phase::Falling;
        self.paused = false;
        self.pieces_locked = 0;
        info!("game reset");
        self.touch();
    }

    /// Lock the active piece, clear lines, and promote the next piece
    fn lock_and_advance(&mut self) {
        self.phase = Phase::Locking;
        self.board.commit(&self.active);
        self.pieces_locked += 1;
        debug!(
            kind = ?self.active.kind,
            row = self.active.row,
            col = self.active.col,
            "piece locked"
        );

        let cleared = self.board.clear_full_lines() as u32;
        if cleared > 0 {
            let level_before = self.score.level;
            let gained = self.score.on_lines_cleared(cleared);
            self.gravity.set_level(self.score.level);
            debug!(cleared, gained, total = self.score.lines, "lines cleared");
            if self.score.level != level_before {
                info!(
                    level = self.score.level,
                    interval_ms = self.gravity.interval().as_millis() as u64,
                    "level up"
                );
            }
        }

        let fresh = self.generator.next();
        self.active = mem::replace(&mut self.next, fresh);
        self.gravity.reset();

        // Game over is only detected once the promoted piece has no room
        if self.active.fits(&self.board) {
            self.phase = Phase::Falling;
        } else {
            self.phase = Phase::GameOver;
            info!(
                score = self.score.points,
                lines = self.score.lines,
                level = self.score.level,
                "game over"
            );
        }
        self.touch();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

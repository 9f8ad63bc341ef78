//! BLOCKDROP - a falling-block puzzle in the terminal

mod input;
mod settings;
mod ui;

use anyhow::{Context, Result};
use blockdrop::board::Board;
use blockdrop::game::{Action, Game, GameConfig};
use blockdrop::generator::{PieceGenerator, RandomizerKind};
use blockdrop::replay;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::{Command, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing_subscriber::filter::Directive;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Play options when no subcommand is given
    #[command(flatten)]
    play: PlayArgs,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play in the terminal (the default)
    Play(PlayArgs),
    /// Run an input script headless and print the final snapshot as JSON
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Seed for the piece generator
    #[arg(long)]
    seed: Option<u64>,
    /// Override the configured randomizer
    #[arg(long, value_enum)]
    randomizer: Option<RandomizerKind>,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    /// Input script: l r d u h t p x (left, right, soft drop, rotate, hard drop, tick, pause, reset)
    #[arg(long)]
    inputs: String,
    /// Seed for the piece generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Randomizer to use (uniform unless given)
    #[arg(long, value_enum)]
    randomizer: Option<RandomizerKind>,
    /// Deal this fixed piece order instead, e.g. "OITZ"
    #[arg(long)]
    pieces: Option<String>,
}

/// Get the blockdrop temp directory, creating it if needed
fn blockdrop_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockdrop");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Generate session ID for this instance
    let session_id: u32 = rand::random();
    let log_dir = blockdrop_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so the terminal UI stays clean
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "blockdrop=debug"
                        .parse::<Directive>()
                        .context("invalid log directive")?,
                ),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKDROP starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings_path = cli
        .config
        .clone()
        .or_else(Settings::default_path)
        .context("Could not determine a settings path; pass --config")?;
    let mut settings = Settings::load(&settings_path);

    match cli.mode.unwrap_or(Mode::Play(cli.play)) {
        Mode::Play(args) => play(&args, &mut settings, &settings_path),
        Mode::Replay(args) => run_replay(&args),
    }
}

fn game_config(settings: &Settings, randomizer: Option<RandomizerKind>) -> GameConfig {
    let mut config = settings.gameplay.game_config();
    if let Some(randomizer) = randomizer {
        config.randomizer = randomizer;
    }
    config
}

/// Replays ignore the settings file so the same flags give the same output anywhere
fn run_replay(args: &ReplayArgs) -> Result<()> {
    let config = GameConfig {
        randomizer: args.randomizer.unwrap_or_default(),
        ..GameConfig::default()
    };
    let steps = replay::parse_inputs(&args.inputs)?;

    let mut game = match &args.pieces {
        Some(list) => {
            let generator = PieceGenerator::sequence(replay::parse_pieces(list)?)
                .context("--pieces must name at least one piece")?;
            Game::with_board(Board::new(), generator, config)
        }
        None => Game::with_seed(config, args.seed),
    };
    replay::run(&mut game, &steps);

    let json = serde_json::to_string_pretty(&game.snapshot()).context("Failed to encode snapshot")?;
    println!("{json}");
    Ok(())
}

fn play(args: &PlayArgs, settings: &mut Settings, settings_path: &Path) -> Result<()> {
    let config = game_config(settings, args.randomizer);
    let game = match args.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    };

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, game, settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    let game = result?;
    // Finished games were already recorded when they ended
    if !game.is_over() {
        record_high_score(&game, settings);
    }

    // Save settings (including any new high scores)
    if let Err(e) = settings.save(settings_path) {
        tracing::warn!("Could not save settings: {:#}", e);
        eprintln!("Warning: Could not save settings: {:#}", e);
    }

    let score = game.score();
    println!("\nThanks for playing BLOCKDROP!");
    println!("Final Score: {}", score.points);
    println!("Level: {} | Lines: {}", score.level, score.lines);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut game: Game,
    settings: &mut Settings,
) -> Result<Game> {
    let mut input = InputHandler::from_settings(settings);
    let mut last_frame = Instant::now();
    let mut drawn_revision = None;
    let mut was_over = false;

    loop {
        // Redraw only when something changed
        if drawn_revision != Some(game.revision()) {
            let snapshot = game.snapshot();
            terminal.draw(|frame| ui::render_game(frame, &snapshot, settings))?;
            drawn_revision = Some(snapshot.revision);
        }

        let mut commands = Vec::new();
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        commands.extend(input.key_down(key));
                    }
                    KeyEventKind::Release => input.key_up(key),
                },
                Event::Resize(_, _) => drawn_revision = None,
                _ => {}
            }
        }
        commands.extend(input.update());

        for command in commands {
            match command {
                Command::Quit => {
                    tracing::info!("Quit requested");
                    return Ok(game);
                }
                Command::Game(action) => {
                    apply_action(&mut game, action, &mut was_over, settings);
                }
            }
        }

        let now = Instant::now();
        game.update(now - last_frame);
        last_frame = now;
        note_game_over(&game, &mut was_over, settings);
    }
}

/// Apply a player action, banking the score of any game it ends or throws away
fn apply_action(game: &mut Game, action: Action, was_over: &mut bool, settings: &mut Settings) {
    // Resetting mid-game discards the running score
    if action == Action::Reset && !game.is_over() {
        record_high_score(game, settings);
    }
    game.apply(action);
    note_game_over(game, was_over, settings);
}

/// Bank the score once per finished game, before a reset wipes it
fn note_game_over(game: &Game, was_over: &mut bool, settings: &mut Settings) {
    if game.is_over() && !*was_over {
        record_high_score(game, settings);
    }
    *was_over = game.is_over();
}

/// Add the game's score to the high score table if it finished with points
fn record_high_score(game: &Game, settings: &mut Settings) {
    if settings.add_high_score(game.score()) {
        tracing::info!(score = game.score().points, "New high score entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdrop::board::{Cell, BOARD_HEIGHT};
    use blockdrop::tetromino::TetrominoType;

    #[test]
    fn test_play_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["blockdrop", "--seed", "5"]).unwrap();
        assert!(cli.mode.is_none());
        assert_eq!(cli.play.seed, Some(5));

        let cli = Cli::try_parse_from(["blockdrop", "--randomizer", "bag"]).unwrap();
        assert_eq!(cli.play.randomizer, Some(RandomizerKind::Bag));
    }

    #[test]
    fn test_play_subcommand_still_parses() {
        let cli = Cli::try_parse_from(["blockdrop", "play", "--seed", "5"]).unwrap();
        match cli.mode {
            Some(Mode::Play(args)) => assert_eq!(args.seed, Some(5)),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_replay_parses_with_config() {
        let cli = Cli::try_parse_from([
            "blockdrop", "replay", "--inputs", "hh", "--seed", "3", "--config", "x.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.mode {
            Some(Mode::Replay(args)) => {
                assert_eq!(args.inputs, "hh");
                assert_eq!(args.seed, 3);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_reset_mid_game_records_score() {
        let mut board = Board::new();
        for col in [0, 1, 2, 7, 8, 9] {
            board.set(BOARD_HEIGHT as i32 - 1, col, Cell::Filled(TetrominoType::L));
        }
        let generator = PieceGenerator::sequence(vec![TetrominoType::I]).unwrap();
        let mut game = Game::with_board(board, generator, GameConfig::default());
        let mut settings = Settings::default();
        let mut was_over = false;

        apply_action(&mut game, Action::HardDrop, &mut was_over, &mut settings);
        assert_eq!(game.score().points, 100);
        assert!(settings.high_scores.is_empty());

        apply_action(&mut game, Action::Reset, &mut was_over, &mut settings);
        assert_eq!(game.score().points, 0);
        assert_eq!(settings.best_score(), Some(100));
        assert_eq!(settings.high_scores.len(), 1);
    }

    #[test]
    fn test_reset_of_scoreless_game_records_nothing() {
        let mut board = Board::new();
        board.set(0, 4, Cell::Filled(TetrominoType::J));
        let generator = PieceGenerator::sequence(vec![TetrominoType::O]).unwrap();
        let mut game = Game::with_board(board, generator, GameConfig::default());
        let mut settings = Settings::default();
        let mut was_over = game.is_over();

        // Zero-point games never enter the table
        apply_action(&mut game, Action::Reset, &mut was_over, &mut settings);
        assert!(settings.high_scores.is_empty());
        assert!(!was_over);
    }
}

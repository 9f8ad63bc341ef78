//! Headless replays driven by a compact input script
//!
//! Each letter is one step: `l` left, `r` right, `d` soft drop, `u` rotate,
//! `h` hard drop, `t` gravity tick, `p` pause toggle, `x` reset.
//! Whitespace is ignored.

use crate::game::{Action, Game};
use crate::tetromino::TetrominoType;
use anyhow::{bail, Result};

/// A single scripted step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Action(Action),
    /// Advance gravity by exactly one row
    Tick,
}

/// Parse an input script into steps
pub fn parse_inputs(script: &str) -> Result<Vec<Step>> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(pos, c)| {
            let step = match c.to_ascii_lowercase() {
                'l' => Step::Action(Action::MoveLeft),
                'r' => Step::Action(Action::MoveRight),
                'd' => Step::Action(Action::SoftDrop),
                'u' => Step::Action(Action::Rotate),
                'h' => Step::Action(Action::HardDrop),
                'p' => Step::Action(Action::PauseToggle),
                'x' => Step::Action(Action::Reset),
                't' => Step::Tick,
                other => bail!("unknown input {other:?} at position {pos}"),
            };
            Ok(step)
        })
        .collect()
}

/// Parse a piece list such as `"OITZ"`
pub fn parse_pieces(list: &str) -> Result<Vec<TetrominoType>> {
    list.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match TetrominoType::from_letter(c) {
            Some(kind) => Ok(kind),
            None => bail!("unknown piece {c:?}"),
        })
        .collect()
}

/// Run every step against `game`
pub fn run(game: &mut Game, steps: &[Step]) {
    for step in steps {
        match *step {
            Step::Action(action) => game.apply(action),
            Step::Tick => {
                game.tick();
            }
        }
    }
    tracing::debug!(
        steps = steps.len(),
        revision = game.revision(),
        "replay finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inputs() {
        let steps = parse_inputs("lr d\nUh t").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Action(Action::MoveLeft),
                Step::Action(Action::MoveRight),
                Step::Action(Action::SoftDrop),
                Step::Action(Action::Rotate),
                Step::Action(Action::HardDrop),
                Step::Tick,
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        let err = parse_inputs("llq").unwrap_err();
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_parse_pieces() {
        use TetrominoType::*;
        assert_eq!(parse_pieces("oi t").unwrap(), vec![O, I, T]);
        assert!(parse_pieces("OX").is_err());
    }
}

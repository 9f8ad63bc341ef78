//! Input handling with DAS (Delayed Auto Shift) and ARR (Auto Repeat Rate)
//!
//! Uses a polling-based approach that doesn't rely on key release events,
//! which are unreliable on Linux terminals.

use crate::settings::Settings;
use blockdrop::game::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Action),
    Quit,
}

/// Input handler with DAS/ARR support
pub struct InputHandler {
    /// Held state for the auto-repeating keys
    left_state: Option<KeyPressState>,
    right_state: Option<KeyPressState>,
    down_state: Option<KeyPressState>,
    /// Key bindings
    bindings: KeyBindings,
    /// DAS duration
    das: Duration,
    /// ARR duration
    arr: Duration,
}

#[derive(Debug, Clone)]
struct KeyPressState {
    first_press: Instant,
    last_seen: Instant,
    das_triggered: bool,
    last_arr: Option<Instant>,
}

impl KeyPressState {
    fn new(now: Instant) -> Self {
        Self {
            first_press: now,
            last_seen: now,
            das_triggered: false,
            last_arr: None,
        }
    }
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub reset: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
            "ctrl" | "control" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
            "alt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!("Ignoring unknown key binding {:?}", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            pause: Self::parse_keys(&settings.keys.pause),
            reset: Self::parse_keys(&settings.keys.reset),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            left_state: None,
            right_state: None,
            down_state: None,
            bindings: KeyBindings::from_settings(settings),
            das: Duration::from_millis(settings.gameplay.das_ms),
            arr: Duration::from_millis(settings.gameplay.arr_ms),
        }
    }

    /// Handle a key press event - returns immediate commands
    pub fn key_down(&mut self, key: KeyEvent) -> Vec<Command> {
        self.key_down_at(key, Instant::now())
    }

    fn key_down_at(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Command::Quit];
        }

        let code = normalize_key(key.code);
        let bindings = &self.bindings;

        let mut commands = Vec::new();
        if bindings.move_left.contains(&code) {
            if press(&mut self.left_state, now) {
                commands.push(Command::Game(Action::MoveLeft));
            }
            // Cancel opposite direction
            self.right_state = None;
        } else if bindings.move_right.contains(&code) {
            if press(&mut self.right_state, now) {
                commands.push(Command::Game(Action::MoveRight));
            }
            self.left_state = None;
        } else if bindings.soft_drop.contains(&code) {
            if press(&mut self.down_state, now) {
                commands.push(Command::Game(Action::SoftDrop));
            }
        } else if bindings.hard_drop.contains(&code) {
            commands.push(Command::Game(Action::HardDrop));
        } else if bindings.rotate.contains(&code) {
            commands.push(Command::Game(Action::Rotate));
        } else if bindings.pause.contains(&code) {
            self.clear();
            commands.push(Command::Game(Action::PauseToggle));
        } else if bindings.reset.contains(&code) {
            self.clear();
            commands.push(Command::Game(Action::Reset));
        } else if bindings.quit.contains(&code) {
            commands.push(Command::Quit);
        }

        commands
    }

    /// Handle a key release event (may not be called on Linux)
    pub fn key_up(&mut self, key: KeyEvent) {
        let code = normalize_key(key.code);

        if self.bindings.move_left.contains(&code) {
            self.left_state = None;
        } else if self.bindings.move_right.contains(&code) {
            self.right_state = None;
        } else if self.bindings.soft_drop.contains(&code) {
            self.down_state = None;
        }
    }

    /// Update held keys and return repeat commands (call every frame)
    pub fn update(&mut self) -> Vec<Command> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> Vec<Command> {
        let (das, arr) = (self.das, self.arr);
        let mut commands = Vec::new();

        for (state, action) in [
            (&mut self.left_state, Action::MoveLeft),
            (&mut self.right_state, Action::MoveRight),
            (&mut self.down_state, Action::SoftDrop),
        ] {
            // No recent key event means the key was released
            if state
                .as_ref()
                .is_some_and(|s| now.duration_since(s.last_seen) > KEY_TIMEOUT)
            {
                *state = None;
            }
            if let Some(s) = state {
                if process_das_arr(s, now, das, arr) {
                    commands.push(Command::Game(action));
                }
            }
        }

        commands
    }

    /// Clear all held keys (useful for pause/resume)
    pub fn clear(&mut self) {
        self.left_state = None;
        self.right_state = None;
        self.down_state = None;
    }
}

/// Register a press of a repeating key; true if this is a fresh press
fn press(state: &mut Option<KeyPressState>, now: Instant) -> bool {
    match state {
        Some(held) => {
            held.last_seen = now;
            false
        }
        None => {
            *state = Some(KeyPressState::new(now));
            true
        }
    }
}

/// Process DAS/ARR logic for a key state, returns true if should trigger action
fn process_das_arr(state: &mut KeyPressState, now: Instant, das: Duration, arr: Duration) -> bool {
    let held_duration = now.duration_since(state.first_press);

    if held_duration >= das {
        if !state.das_triggered {
            // First trigger after DAS
            state.das_triggered = true;
            state.last_arr = Some(now);
            return true;
        } else if let Some(last) = state.last_arr {
            // Subsequent ARR triggers
            if now.duration_since(last) >= arr {
                state.last_arr = Some(now);
                return true;
            }
        }
    }

    false
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

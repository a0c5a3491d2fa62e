//! Keyboard input: key bindings and the input thread
//!
//! The input thread is the only producer on the command queue besides the
//! gravity timer. It never touches game state.

use crate::game::Command;
use crate::settings::Settings;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the input thread waits for an event before checking for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Key bindings configuration - supports multiple keys per command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub move_down: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub new_game: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let key = Self::parse_key(s);
                if key.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key name");
                }
                key
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: Self::parse_keys(&keys.move_left),
            move_right: Self::parse_keys(&keys.move_right),
            move_down: Self::parse_keys(&keys.move_down),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            rotate: Self::parse_keys(&keys.rotate),
            rotate_ccw: Self::parse_keys(&keys.rotate_ccw),
            new_game: Self::parse_keys(&keys.new_game),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    /// Map a key press to a command
    pub fn command_for(&self, key: KeyEvent) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let table = [
            (&self.move_left, Command::MoveLeft),
            (&self.move_right, Command::MoveRight),
            (&self.move_down, Command::MoveDown),
            (&self.hard_drop, Command::HardDrop),
            (&self.rotate, Command::Rotate),
            (&self.rotate_ccw, Command::RotateCounterClockwise),
            (&self.new_game, Command::NewGame),
            (&self.quit, Command::Quit),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, command)| command)
    }

    /// Short help lines for the side panel
    pub fn help(&self) -> Vec<(String, &'static str)> {
        [
            (&self.move_left, "left"),
            (&self.move_right, "right"),
            (&self.move_down, "down"),
            (&self.hard_drop, "drop"),
            (&self.rotate, "rotate"),
            (&self.rotate_ccw, "rotate ccw"),
            (&self.new_game, "new game"),
            (&self.quit, "quit"),
        ]
        .into_iter()
        .filter_map(|(keys, label)| keys.first().map(|key| (key_label(*key), label)))
        .collect()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Handle to the running input thread
pub struct InputThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl InputThread {
    /// Start polling the terminal, pushing mapped commands into `tx`.
    ///
    /// The thread exits when stopped, when the receiver is dropped, or on
    /// a terminal read error.
    pub fn spawn(bindings: KeyBindings, tx: Sender<Command>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || -> io::Result<()> {
            while !flag.load(Ordering::Relaxed) {
                if !event::poll(POLL_INTERVAL)? {
                    continue;
                }
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = bindings.command_for(key) {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
            }
            tracing::debug!("input thread finished");
            Ok(())
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the thread to finish and wait for it
    pub fn stop(mut self) -> io::Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> io::Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("input thread panicked"))),
            None => Ok(()),
        }
    }
}

impl Drop for InputThread {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!("input thread: {}", e);
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Display name for a key
fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        _ => "?".to_string(),
    }
}

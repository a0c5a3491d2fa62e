//! The command loop
//!
//! One consumer applies commands strictly in the order they are dequeued.
//! Key presses arrive from the input thread; gravity is a `Tick` injected
//! whenever the queue stays quiet for the rest of the gravity interval.

use crate::game::{Command, Game};
use crate::input::{InputThread, KeyBindings};
use crate::ui::{self, View};
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

pub struct App {
    game: Game,
    bindings: KeyBindings,
    gravity: Duration,
    /// When the falling piece last moved down (or spawned)
    last_fall: Instant,
}

impl App {
    pub fn new(game: Game, bindings: KeyBindings, gravity: Duration) -> Self {
        Self {
            game,
            bindings,
            gravity,
            last_fall: Instant::now(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run until `Quit`, drawing to `terminal`
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let (tx, rx) = mpsc::channel();
        let input = InputThread::spawn(self.bindings.clone(), tx);

        let result = self.command_loop(terminal, &rx);
        // Surface an input failure only if the loop itself was fine
        let stopped = input.stop();
        result.and(stopped)
    }

    fn command_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        rx: &Receiver<Command>,
    ) -> io::Result<()> {
        let help = self.bindings.help();
        self.start(Instant::now());

        loop {
            let next = self.game.peek_next();
            let view = View {
                next: (!self.game.is_game_over()).then_some(&next),
                help: &help,
            };
            terminal.draw(|frame| ui::render_game(frame, &self.game, &view))?;

            let wait = self.until_gravity(Instant::now());
            let command = match rx.recv_timeout(wait) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => Command::Tick,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("input channel closed");
                    return Ok(());
                }
            };

            if self.step(command, Instant::now()).is_break() {
                tracing::info!(lines = self.game.lines_cleared(), "quit");
                return Ok(());
            }
        }
    }

    /// Spawn the first piece
    pub fn start(&mut self, now: Instant) {
        if self.game.spawn() {
            self.last_fall = now;
        }
    }

    /// Apply one command, then spawn if the piece was locked
    pub fn step(&mut self, command: Command, now: Instant) -> ControlFlow<()> {
        let before = self.game.active_piece().map(|active| active.anchor);
        self.game.apply(command)?;

        match command {
            Command::Tick => self.last_fall = now,
            Command::MoveDown if self.game.active_piece().map(|a| a.anchor) != before => {
                self.last_fall = now;
            }
            _ => {}
        }

        if self.game.needs_spawn() && self.game.spawn() {
            self.last_fall = now;
        }
        ControlFlow::Continue(())
    }

    /// Time left before the next gravity tick
    pub fn until_gravity(&self, now: Instant) -> Duration {
        self.gravity
            .saturating_sub(now.saturating_duration_since(self.last_fall))
    }
}

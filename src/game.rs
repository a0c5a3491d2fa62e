//! Core game state and logic

use crate::bag::{Bag, PieceColors};
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Placement};
use crate::error::ConfigError;
use crate::piece::{Piece, Point, RotationDirection};
use crate::tetromino::TetrominoType;
use std::ops::ControlFlow;

/// Commands the game can process, one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    NewGame,
    Rotate,
    RotateCounterClockwise,
    MoveLeft,
    MoveRight,
    MoveDown,
    HardDrop,
    /// Gravity; behaves exactly like `MoveDown`
    Tick,
}

/// The falling piece and where its pivot sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub piece: Piece,
    pub anchor: Point,
}

impl ActivePiece {
    /// Absolute board cells occupied by the piece
    pub fn cells(&self) -> [Point; 4] {
        self.piece.cells(self.anchor)
    }
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Between a lock (or a new game) and the next spawn
    NoActivePiece,
    Active(ActivePiece),
    /// Terminal until `NewGame`
    GameOver,
}

/// Everything needed to build a game session
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub pieces: Vec<TetrominoType>,
    pub colors: PieceColors,
    /// Fixed seed for a reproducible piece sequence
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            pieces: TetrominoType::all().to_vec(),
            colors: PieceColors::default(),
            seed: None,
        }
    }
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    bag: Bag,
    state: GameState,
    /// Rows cleared since the last new game
    lines_cleared: u64,
}

impl Game {
    /// Create a game; nothing is spawned until `spawn` is called
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let board = Board::new(config.width, config.height)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut bag = Bag::with_pieces(&config.pieces, seed)?;
        *bag.colors_mut() = config.colors.clone();

        tracing::info!(
            width = config.width,
            height = config.height,
            pieces = config.pieces.len(),
            seed,
            "game created"
        );

        Ok(Self {
            board,
            bag,
            state: GameState::NoActivePiece,
            lines_cleared: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for embedding applications and test setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        match &self.state {
            GameState::Active(active) => Some(active),
            _ => None,
        }
    }

    /// Cells of the falling piece, if any
    pub fn active_cells(&self) -> Option<[Point; 4]> {
        self.active_piece().map(ActivePiece::cells)
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// True when the driver should call `spawn`
    pub fn needs_spawn(&self) -> bool {
        self.state == GameState::NoActivePiece
    }

    pub fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    /// The piece the next spawn will use
    pub fn peek_next(&mut self) -> Piece {
        self.bag.next_piece()
    }

    /// Horizontally centred on the top row
    pub fn spawn_anchor(&self) -> Point {
        Point::new(self.board.width() as i32 / 2, 0)
    }

    /// Process a command. Only `Quit` breaks.
    pub fn apply(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Quit => return ControlFlow::Break(()),
            Command::NewGame => self.new_game(),
            Command::Rotate => {
                self.rotate(RotationDirection::Clockwise);
            }
            Command::RotateCounterClockwise => {
                self.rotate(RotationDirection::CounterClockwise);
            }
            Command::MoveLeft => {
                self.try_move(Point::LEFT);
            }
            Command::MoveRight => {
                self.try_move(Point::RIGHT);
            }
            Command::MoveDown | Command::Tick => {
                self.move_down_or_lock();
            }
            Command::HardDrop => self.hard_drop(),
        }
        ControlFlow::Continue(())
    }

    /// Clear the board and wait for the next spawn. The bag keeps its
    /// position so fairness carries across games.
    pub fn new_game(&mut self) {
        self.board.reset();
        self.state = GameState::NoActivePiece;
        self.lines_cleared = 0;
        tracing::info!("new game");
    }

    /// Deal the next piece at the spawn anchor. Returns false if nothing
    /// was spawned; a blocked spawn ends the game.
    pub fn spawn(&mut self) -> bool {
        if self.state != GameState::NoActivePiece {
            return false;
        }

        let piece = self.bag.take_next_piece();
        let mut anchor = self.spawn_anchor();
        let (valid, shift) = self.board.validity_shift(&piece, anchor);
        if !valid {
            anchor = anchor + shift;
        }

        if self.board.overlaps(&piece, anchor) {
            self.state = GameState::GameOver;
            tracing::info!(
                kind = %piece.kind(),
                lines = self.lines_cleared,
                "game over: spawn blocked"
            );
            return false;
        }

        tracing::debug!(kind = %piece.kind(), x = anchor.x, y = anchor.y, "spawned");
        self.state = GameState::Active(ActivePiece { piece, anchor });
        true
    }

    /// Shift the falling piece if the target is in bounds and free
    pub fn try_move(&mut self, offset: Point) -> bool {
        let GameState::Active(active) = &mut self.state else {
            return false;
        };

        let target = active.anchor + offset;
        if self.board.place(&active.piece, target) == Placement::Valid {
            active.anchor = target;
            true
        } else {
            false
        }
    }

    /// One step down; a blocked step locks the piece. Returns true if the
    /// piece moved.
    pub fn move_down_or_lock(&mut self) -> bool {
        if self.active_piece().is_none() {
            return false;
        }
        if self.try_move(Point::DOWN) {
            true
        } else {
            self.lock();
            false
        }
    }

    /// Drop straight to the floor and lock
    pub fn hard_drop(&mut self) {
        if self.active_piece().is_none() {
            return;
        }
        // A piece cannot fall further than the board is tall
        for _ in 0..self.board.height() {
            if !self.try_move(Point::DOWN) {
                break;
            }
        }
        self.lock();
    }

    /// Rotate in place, or with a single bounds correction if the turn
    /// pushes the piece off the board. Overlap rejects the turn.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        let GameState::Active(active) = self.state else {
            return false;
        };

        let rotated = active.piece.rotate(direction);
        let anchor = match self.board.place(&rotated, active.anchor) {
            Placement::Valid => Some(active.anchor),
            Placement::Invalid => {
                let (_, shift) = self.board.validity_shift(&rotated, active.anchor);
                let kicked = active.anchor + shift;
                (self.board.place(&rotated, kicked) == Placement::Valid).then_some(kicked)
            }
            Placement::Overlapped => None,
        };

        match anchor {
            Some(anchor) => {
                self.state = GameState::Active(ActivePiece {
                    piece: rotated,
                    anchor,
                });
                true
            }
            None => {
                tracing::trace!(kind = %rotated.kind(), ?direction, "rotation rejected");
                false
            }
        }
    }

    /// Freeze the falling piece into the board
    fn lock(&mut self) {
        let GameState::Active(active) = self.state else {
            return;
        };

        let cleared = self.board.lock(&active.piece, active.anchor);
        self.lines_cleared += cleared as u64;
        self.state = GameState::NoActivePiece;
        tracing::debug!(
            kind = %active.piece.kind(),
            x = active.anchor.x,
            y = active.anchor.y,
            cleared,
            "locked"
        );
    }
}

//! Falling-block puzzle engine
//!
//! The engine (`board`, `piece`, `tetromino`, `bag`, `game`) is synchronous
//! and never renders. `input`, `ui` and `app` are the terminal front end
//! that feeds it commands and draws its state.

pub mod app;
pub mod bag;
pub mod board;
pub mod color;
pub mod error;
pub mod game;
pub mod input;
pub mod piece;
pub mod settings;
pub mod tetromino;
pub mod ui;

pub use bag::{Bag, PieceColors};
pub use board::{Board, Cell, Placement};
pub use error::ConfigError;
pub use game::{ActivePiece, Command, Game, GameConfig, GameState};
pub use piece::{Piece, Point, RotationDirection};
pub use settings::Settings;
pub use tetromino::TetrominoType;

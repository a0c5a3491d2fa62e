//! Setup-time errors
//!
//! Gameplay never fails; these only come out of configuration and
//! construction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board width must be at least 1")]
    ZeroWidth,
    #[error("board height must be at least 1")]
    ZeroHeight,
    #[error("board is {width}x{height}; each side may be at most {max}")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("the piece catalog needs at least one piece")]
    NoPieces,
    #[error("unknown piece: {0}")]
    UnknownPiece(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("gravity interval must be at least 1 ms")]
    ZeroGravity,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

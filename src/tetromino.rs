//! Tetromino catalog
//!
//! The seven canonical four-cell shapes, each given as offsets from a pivot
//! at the origin. Board space has row 0 at the top, so `y` grows downward.

use crate::piece::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // long bar
    J,
    L,
    O, // square
    S,
    T,
    Z,
}

impl TetrominoType {
    /// Get all tetromino types in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Offsets of the four cells relative to the pivot, `(x, y)` with y down.
    pub fn shape(&self) -> [Point; 4] {
        match self {
            // .X.
            // .X.
            // .O.
            // .X.
            TetrominoType::I => [
                Point::new(0, -2),
                Point::new(0, -1),
                Point::new(0, 0),
                Point::new(0, 1),
            ],
            // .X
            // .O
            // XX
            TetrominoType::J => [
                Point::new(0, -1),
                Point::new(0, 0),
                Point::new(-1, 1),
                Point::new(0, 1),
            ],
            // X.
            // X.
            // XX
            TetrominoType::L => [
                Point::new(-1, -1),
                Point::new(-1, 0),
                Point::new(-1, 1),
                Point::new(0, 1),
            ],
            // XX
            // XO
            TetrominoType::O => [
                Point::new(-1, -1),
                Point::new(0, -1),
                Point::new(-1, 0),
                Point::new(0, 0),
            ],
            // X.
            // XO
            // .X
            TetrominoType::S => [
                Point::new(-1, -1),
                Point::new(-1, 0),
                Point::new(0, 0),
                Point::new(0, 1),
            ],
            // .X.
            // XOX
            TetrominoType::T => [
                Point::new(0, -1),
                Point::new(-1, 0),
                Point::new(0, 0),
                Point::new(1, 0),
            ],
            // .X
            // XO
            // X.
            TetrominoType::Z => [
                Point::new(0, -1),
                Point::new(-1, 0),
                Point::new(0, 0),
                Point::new(-1, 1),
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }
}

impl fmt::Display for TetrominoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TetrominoType {
    type Err = String;

    /// Parse a single-letter identity, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" => Ok(TetrominoType::I),
            "J" => Ok(TetrominoType::J),
            "L" => Ok(TetrominoType::L),
            "O" => Ok(TetrominoType::O),
            "S" => Ok(TetrominoType::S),
            "T" => Ok(TetrominoType::T),
            "Z" => Ok(TetrominoType::Z),
            _ => Err(s.to_string()),
        }
    }
}

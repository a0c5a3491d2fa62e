//! Piece geometry: points, pieces and rotation

use crate::tetromino::TetrominoType;
use ratatui::style::Color;
use std::ops::Add;

/// An integer offset or absolute cell coordinate. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const LEFT: Point = Point::new(-1, 0);
    pub const RIGHT: Point = Point::new(1, 0);
    pub const DOWN: Point = Point::new(0, 1);
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// A tetromino value: identity, four pivot-relative offsets and a color.
///
/// Pieces are immutable; rotating yields a new piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: TetrominoType,
    points: [Point; 4],
    color: Color,
}

impl Piece {
    /// Build a piece in its catalog orientation
    pub fn new(kind: TetrominoType, color: Color) -> Self {
        Self {
            kind,
            points: kind.shape(),
            color,
        }
    }

    pub fn kind(&self) -> TetrominoType {
        self.kind
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Rotate 90 degrees about the pivot.
    ///
    /// Clockwise maps `(x, y)` to `(y, -x)`, counter-clockwise to `(-y, x)`.
    pub fn rotate(&self, direction: RotationDirection) -> Piece {
        let points = self.points.map(|p| match direction {
            RotationDirection::Clockwise => Point::new(p.y, -p.x),
            RotationDirection::CounterClockwise => Point::new(-p.y, p.x),
        });
        Piece { points, ..*self }
    }

    /// Absolute board cells when the pivot sits at `anchor`
    pub fn cells(&self, anchor: Point) -> [Point; 4] {
        self.points.map(|p| anchor + p)
    }
}

//! Game board representation, placement rules and the line-clear sweep

use crate::color::darken;
use crate::error::ConfigError;
use crate::piece::{Piece, Point};
use ratatui::style::Color;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Largest width or height a board may have. Keeps coordinates within `i32`
/// and the rendered board (two columns per cell) within a terminal `u16`.
pub const MAX_BOARD_SIZE: usize = 255;

/// A cell on the board - either empty or locked with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Locked(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Cell::Locked(_))
    }

    pub fn color(&self) -> Color {
        match self {
            Cell::Empty => Color::Reset,
            Cell::Locked(color) => *color,
        }
    }
}

/// Outcome of trying a piece at an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Valid,
    /// At least one cell is outside the board
    Invalid,
    /// In bounds, but at least one cell is already locked
    Overlapped,
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as rows[row][col], row 0 is the top
    rows: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            rows: vec![vec![Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::check_size(width, height)?;
        Ok(Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        })
    }

    /// Validate board dimensions without building a board
    pub fn check_size(width: usize, height: usize) -> Result<(), ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if width > MAX_BOARD_SIZE || height > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                width,
                height,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Empty every cell; dimensions are unchanged
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::Empty);
        }
    }

    /// Get the cell at a position, None if out of bounds
    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        let (col, row) = self.index(point)?;
        Some(&self.rows[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, point: Point, cell: Cell) -> bool {
        match self.cell_at_mut(point) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    fn cell_at_mut(&mut self, point: Point) -> Option<&mut Cell> {
        let (col, row) = self.index(point)?;
        Some(&mut self.rows[row][col])
    }

    fn index(&self, point: Point) -> Option<(usize, usize)> {
        let col = usize::try_from(point.x).ok()?;
        let row = usize::try_from(point.y).ok()?;
        (col < self.width && row < self.height).then_some((col, row))
    }

    /// Classify a placement. Bounds are checked before overlap, so a piece
    /// hanging off the board is `Invalid` even if it also overlaps.
    pub fn place(&self, piece: &Piece, anchor: Point) -> Placement {
        if !self.validity_shift(piece, anchor).0 {
            Placement::Invalid
        } else if self.overlaps(piece, anchor) {
            Placement::Overlapped
        } else {
            Placement::Valid
        }
    }

    /// Whether every cell is in bounds (locked cells are ignored), and the
    /// translation that would pull the piece's overflow back onto the board.
    ///
    /// Per axis only one direction is corrected: a negative overflow wins
    /// over an overflow past the far edge.
    pub fn validity_shift(&self, piece: &Piece, anchor: Point) -> (bool, Point) {
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        let (mut lo_x, mut lo_y) = (0, 0);
        let (mut hi_x, mut hi_y) = (max_x, max_y);
        let mut valid = true;

        for cell in piece.cells(anchor) {
            if self.cell_at(cell).is_none() {
                valid = false;
                lo_x = lo_x.min(cell.x);
                lo_y = lo_y.min(cell.y);
                hi_x = hi_x.max(cell.x);
                hi_y = hi_y.max(cell.y);
            }
        }

        let shift = Point::new(
            axis_shift(lo_x, hi_x, max_x),
            axis_shift(lo_y, hi_y, max_y),
        );
        (valid, shift)
    }

    /// True if any in-bounds cell of the piece is locked. Cells off the
    /// board never count as overlap.
    pub fn overlaps(&self, piece: &Piece, anchor: Point) -> bool {
        piece
            .cells(anchor)
            .into_iter()
            .filter_map(|cell| self.cell_at(cell))
            .any(Cell::is_locked)
    }

    /// Freeze the piece into the board with a darkened color, then sweep the
    /// rows it touched. Returns the number of rows cleared.
    pub fn lock(&mut self, piece: &Piece, anchor: Point) -> usize {
        let color = darken(piece.color());
        let mut top = self.height as i32;
        let mut bottom = -1;

        for point in piece.cells(anchor) {
            if let Some(cell) = self.cell_at_mut(point) {
                *cell = Cell::Locked(color);
                top = top.min(point.y);
                bottom = bottom.max(point.y);
            }
        }

        // Scan upward from the lowest touched row. Clearing a row pulls the
        // next one into the same index, so the scan stays put and the
        // touched range (now one row lower) shrinks from the top.
        let mut cleared = 0;
        let mut sweep = bottom;
        while sweep >= top {
            let row = sweep as usize;
            if self.is_row_full(row) {
                self.clear_line(row);
                cleared += 1;
                top += 1;
            } else {
                sweep -= 1;
            }
        }

        if cleared > 0 {
            tracing::debug!(cleared, "lines cleared");
        }
        cleared
    }

    /// Remove a row: every row above moves down by one and an empty row
    /// appears at the top.
    pub fn clear_line(&mut self, row: usize) {
        if row >= self.height {
            return;
        }
        self.rows[..=row].rotate_right(1);
        self.rows[0].fill(Cell::Empty);
    }

    /// Check if a row is completely locked
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|cells| cells.iter().all(Cell::is_locked))
    }

    /// Check if the board has no locked cells
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Cell::is_empty)
    }

    /// Number of locked cells on the board
    pub fn locked_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_locked()).count()
    }
}

/// Translation that brings `[lo, hi]` back inside `[0, max]`, favouring
/// the low edge.
fn axis_shift(lo: i32, hi: i32, max: i32) -> i32 {
    if lo < 0 {
        -lo
    } else if hi > max {
        max - hi
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::RotationDirection;
    use crate::tetromino::TetrominoType;

    const COLOR: Color = Color::Rgb(128, 48, 192);

    fn piece(kind: TetrominoType) -> Piece {
        Piece::new(kind, COLOR)
    }

    fn fill_row(board: &mut Board, row: usize, except: Option<usize>) {
        for col in 0..board.width() {
            if Some(col) != except {
                board.rows[row][col] = Cell::Locked(Color::Gray);
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert!(matches!(Board::new(0, 20), Err(ConfigError::ZeroWidth)));
        assert!(matches!(Board::new(10, 0), Err(ConfigError::ZeroHeight)));
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert!(matches!(
            Board::new(40_000, 20),
            Err(ConfigError::BoardTooLarge { width: 40_000, .. })
        ));
        assert!(matches!(
            Board::new(10, MAX_BOARD_SIZE + 1),
            Err(ConfigError::BoardTooLarge { height: 256, .. })
        ));

        let board = Board::new(MAX_BOARD_SIZE, MAX_BOARD_SIZE).unwrap();
        assert_eq!(board.width(), MAX_BOARD_SIZE);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(Point::new(5, 5), Cell::Locked(Color::Red)));
        assert_eq!(board.cell_at(Point::new(5, 5)), Some(&Cell::Locked(Color::Red)));
        assert!(!board.set(Point::new(10, 5), Cell::Locked(Color::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::default();
        assert_eq!(board.cell_at(Point::new(-1, 0)), None);
        assert_eq!(board.cell_at(Point::new(0, -1)), None);
        assert_eq!(board.cell_at(Point::new(10, 0)), None);
        assert_eq!(board.cell_at(Point::new(0, 20)), None);
        assert_eq!(board.cell_at(Point::new(9, 19)), Some(&Cell::Empty));
    }

    #[test]
    fn test_place_valid_invalid_overlapped() {
        let mut board = Board::default();
        let t = piece(TetrominoType::T);
        assert_eq!(board.place(&t, Point::new(5, 5)), Placement::Valid);
        assert_eq!(board.place(&t, Point::new(0, 5)), Placement::Invalid);
        assert_eq!(board.place(&t, Point::new(5, 0)), Placement::Invalid);

        board.rows[5][5] = Cell::Locked(Color::Gray);
        assert_eq!(board.place(&t, Point::new(5, 5)), Placement::Overlapped);
    }

    #[test]
    fn test_invalid_wins_over_overlap() {
        let mut board = Board::default();
        board.rows[5][0] = Cell::Locked(Color::Gray);
        // T at x=0 overlaps (0,5) and also sticks out at x=-1
        let t = piece(TetrominoType::T);
        assert!(board.overlaps(&t, Point::new(0, 5)));
        assert_eq!(board.place(&t, Point::new(0, 5)), Placement::Invalid);
    }

    #[test]
    fn test_overlap_ignores_out_of_bounds_cells() {
        let board = Board::default();
        let i = piece(TetrominoType::I);
        assert!(!board.overlaps(&i, Point::new(-3, -3)));
    }

    #[test]
    fn test_validity_shift_left_edge() {
        let board = Board::default();
        // Horizontal I: offsets x -2..=1
        let i = piece(TetrominoType::I).rotate(RotationDirection::Clockwise);
        let (valid, shift) = board.validity_shift(&i, Point::new(0, 5));
        assert!(!valid);
        let fixed = Point::new(0, 5) + shift;
        assert_eq!(board.place(&i, fixed), Placement::Valid);
        assert_eq!(shift.y, 0);
    }

    #[test]
    fn test_validity_shift_right_and_bottom_edges() {
        let board = Board::default();
        let i = piece(TetrominoType::I);
        let (valid, shift) = board.validity_shift(&i, Point::new(9, 19));
        assert!(!valid);
        // Offsets y -2..=1, so one row past the floor
        assert_eq!(shift, Point::new(0, -1));

        let i = i.rotate(RotationDirection::Clockwise);
        let cells = i.cells(Point::new(9, 5));
        let max_x = cells.iter().map(|p| p.x).max().unwrap();
        let (_, shift) = board.validity_shift(&i, Point::new(9, 5));
        assert_eq!(shift, Point::new(9 - max_x, 0));
    }

    #[test]
    fn test_validity_shift_top_edge() {
        let board = Board::default();
        let i = piece(TetrominoType::I);
        let (valid, shift) = board.validity_shift(&i, Point::new(5, 0));
        assert!(!valid);
        assert_eq!(shift, Point::new(0, 2));
    }

    #[test]
    fn test_validity_shift_in_bounds_is_zero() {
        let board = Board::default();
        let o = piece(TetrominoType::O);
        assert_eq!(
            board.validity_shift(&o, Point::new(4, 4)),
            (true, Point::default())
        );
    }

    #[test]
    fn test_lock_darkens_color() {
        let mut board = Board::default();
        let o = piece(TetrominoType::O);
        board.lock(&o, Point::new(1, 19));
        assert_eq!(
            board.cell_at(Point::new(0, 18)),
            Some(&Cell::Locked(Color::Rgb(96, 36, 144)))
        );
        assert_eq!(board.locked_count(), 4);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Some(5));
        board.rows[18][0] = Cell::Locked(Color::Red);

        // Vertical I with its lowest cell filling the gap
        let i = piece(TetrominoType::I);
        let cleared = board.lock(&i, Point::new(5, 18));
        assert_eq!(cleared, 1);

        // The block from row 18 moved to row 19
        assert_eq!(board.cell_at(Point::new(0, 19)), Some(&Cell::Locked(Color::Red)));
        // The remaining three I cells moved down one row too
        for y in 17..=19 {
            assert!(board.cell_at(Point::new(5, y)).unwrap().is_locked());
        }
        assert!(board.cell_at(Point::new(5, 16)).unwrap().is_empty());
        assert!(board.rows[0].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_tetris_clears_four_rows_at_once() {
        let mut board = Board::default();
        for row in 16..20 {
            fill_row(&mut board, row, Some(9));
        }
        board.rows[15][0] = Cell::Locked(Color::Red);
        board.rows[14][1] = Cell::Locked(Color::Blue);

        let i = piece(TetrominoType::I);
        let cleared = board.lock(&i, Point::new(9, 18));
        assert_eq!(cleared, 4);

        assert_eq!(board.cell_at(Point::new(0, 19)), Some(&Cell::Locked(Color::Red)));
        assert_eq!(board.cell_at(Point::new(1, 18)), Some(&Cell::Locked(Color::Blue)));
        assert_eq!(board.locked_count(), 2);
    }

    #[test]
    fn test_non_adjacent_full_rows() {
        let mut board = Board::default();
        // Rows 19 and 17 need column 4, row 18 stays partial
        fill_row(&mut board, 19, Some(4));
        fill_row(&mut board, 18, Some(4));
        board.rows[18][0] = Cell::Empty;
        fill_row(&mut board, 17, Some(4));

        let i = piece(TetrominoType::I);
        let cleared = board.lock(&i, Point::new(4, 18));
        assert_eq!(cleared, 2);

        // Old row 18 (missing only column 0) ends up on the floor
        assert!(board.cell_at(Point::new(0, 19)).unwrap().is_empty());
        assert!(board.cell_at(Point::new(4, 19)).unwrap().is_locked());
        assert!((1..10).all(|x| board.cell_at(Point::new(x, 19)).unwrap().is_locked()));
        // Top cell of the I (row 16) lands on row 18
        assert!(board.cell_at(Point::new(4, 18)).unwrap().is_locked());
        assert_eq!(board.locked_count(), 10);
    }

    #[test]
    fn test_clear_line_preserves_order_above() {
        let mut board = Board::default();
        board.rows[2][0] = Cell::Locked(Color::Red);
        board.rows[3][0] = Cell::Locked(Color::Green);
        board.rows[4][0] = Cell::Locked(Color::Blue);
        board.clear_line(10);
        assert_eq!(board.rows[3][0], Cell::Locked(Color::Red));
        assert_eq!(board.rows[4][0], Cell::Locked(Color::Green));
        assert_eq!(board.rows[5][0], Cell::Locked(Color::Blue));
        assert!(board.rows[0].iter().all(Cell::is_empty));
    }

    #[test]
    fn test_reset_keeps_dimensions() {
        let mut board = Board::new(6, 8).unwrap();
        fill_row(&mut board, 7, None);
        board.reset();
        assert!(board.is_empty());
        assert_eq!((board.width(), board.height()), (6, 8));
    }
}

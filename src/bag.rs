//! 7-bag randomizer for piece generation
//!
//! Every identity in the catalog is dealt exactly once per bag. The bag is
//! reshuffled lazily, only when a draw finds it exhausted, so any run of
//! consecutive draws aligned to a bag boundary holds each identity once.

use crate::color::DEFAULT_PIECE_COLOR;
use crate::error::ConfigError;
use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use ratatui::style::Color;
use std::collections::HashMap;

/// Identity -> display color mapping handed out with every drawn piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceColors {
    default: Color,
    overrides: HashMap<TetrominoType, Color>,
}

impl Default for PieceColors {
    fn default() -> Self {
        Self::uniform(DEFAULT_PIECE_COLOR)
    }
}

impl PieceColors {
    /// Same color for every identity
    pub fn uniform(color: Color) -> Self {
        Self {
            default: color,
            overrides: HashMap::new(),
        }
    }

    pub fn get(&self, kind: TetrominoType) -> Color {
        self.overrides.get(&kind).copied().unwrap_or(self.default)
    }

    pub fn set(&mut self, kind: TetrominoType, color: Color) {
        self.overrides.insert(kind, color);
    }

    /// Replace the fallback color and drop every per-identity override
    pub fn set_all(&mut self, color: Color) {
        self.default = color;
        self.overrides.clear();
    }
}

/// The bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Current permutation of the catalog
    order: Vec<TetrominoType>,
    /// Index of the next identity to deal; equal to `order.len()` when spent
    cursor: usize,
    colors: PieceColors,
    rng: ChaCha8Rng,
}

impl Bag {
    /// Create a bag over the full catalog with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag over the full catalog with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::build(TetrominoType::all().to_vec(), seed)
    }

    /// Create a bag over a custom set of identities
    pub fn with_pieces(pieces: &[TetrominoType], seed: u64) -> Result<Self, ConfigError> {
        if pieces.is_empty() {
            return Err(ConfigError::NoPieces);
        }
        Ok(Self::build(pieces.to_vec(), seed))
    }

    fn build(order: Vec<TetrominoType>, seed: u64) -> Self {
        let cursor = order.len();
        Self {
            order,
            cursor,
            colors: PieceColors::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Number of identities dealt per bag
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn colors_mut(&mut self) -> &mut PieceColors {
        &mut self.colors
    }

    /// Peek at the next piece without dealing it
    pub fn next_piece(&mut self) -> Piece {
        if self.cursor >= self.order.len() {
            self.reshuffle();
        }
        let kind = self.order[self.cursor];
        Piece::new(kind, self.colors.get(kind))
    }

    /// Deal the next piece
    pub fn take_next_piece(&mut self) -> Piece {
        let piece = self.next_piece();
        self.cursor += 1;
        piece
    }

    /// Fisher-Yates: walk i from the last index down to 1, swapping with a
    /// uniform index in `0..=i`.
    fn reshuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        tracing::trace!(order = ?self.order, "bag reshuffled");
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = Bag::with_seed(7);
        let mut pieces = Vec::new();

        for _ in 0..7 {
            pieces.push(bag.take_next_piece().kind());
        }

        let unique: HashSet<_> = pieces.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut bag = Bag::with_seed(42);
        let peeked = bag.next_piece();
        assert_eq!(bag.next_piece(), peeked);
        assert_eq!(bag.take_next_piece(), peeked);
    }

    #[test]
    fn test_many_bags_are_fair() {
        let mut bag = Bag::with_seed(1);
        for _ in 0..50 {
            let group: HashSet<_> = (0..7).map(|_| bag.take_next_piece().kind()).collect();
            assert_eq!(group.len(), 7);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Bag::with_seed(99);
        let mut b = Bag::with_seed(99);
        for _ in 0..21 {
            assert_eq!(a.take_next_piece(), b.take_next_piece());
        }
    }

    #[test]
    fn test_custom_piece_set() {
        let mut bag = Bag::with_pieces(&[TetrominoType::I, TetrominoType::O], 3).unwrap();
        assert_eq!(bag.len(), 2);
        for _ in 0..10 {
            let pair: HashSet<_> = (0..2).map(|_| bag.take_next_piece().kind()).collect();
            assert_eq!(pair.len(), 2);
        }
    }

    #[test]
    fn test_empty_piece_set_is_rejected() {
        assert!(matches!(Bag::with_pieces(&[], 0), Err(ConfigError::NoPieces)));
    }

    #[test]
    fn test_colors_follow_mapping() {
        let mut bag = Bag::with_pieces(&[TetrominoType::T], 0).unwrap();
        assert_eq!(bag.next_piece().color(), DEFAULT_PIECE_COLOR);

        bag.colors_mut().set(TetrominoType::T, Color::Green);
        assert_eq!(bag.take_next_piece().color(), Color::Green);

        bag.colors_mut().set_all(Color::Blue);
        assert_eq!(bag.take_next_piece().color(), Color::Blue);
    }
}

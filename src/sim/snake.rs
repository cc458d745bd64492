//! The player's snake

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Direction;

/// Ordered body segments (head first) plus heading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    pub body: VecDeque<IVec2>,
    pub direction: Direction,
    /// Heading committed at the next tick
    pub pending_direction: Direction,
}

impl Snake {
    /// Three horizontal cells centered on `center`, heading right
    pub fn new(center: IVec2) -> Self {
        let mut snake = Self {
            body: VecDeque::with_capacity(16),
            direction: Direction::Right,
            pending_direction: Direction::Right,
        };
        snake.reset(center);
        snake
    }

    pub fn reset(&mut self, center: IVec2) {
        self.body.clear();
        self.body.extend([
            center + IVec2::new(1, 0),
            center,
            center - IVec2::new(1, 0),
        ]);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
    }

    #[inline]
    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }

    /// Queue a heading change.
    ///
    /// A reversal is ignored while the snake is longer than one cell.
    /// Returns whether the request was accepted.
    pub fn request_direction(&mut self, dir: Direction) -> bool {
        if self.body.len() > 1 && dir.is_opposite(self.direction) {
            return false;
        }
        self.pending_direction = dir;
        true
    }

    /// Index of the first non-head segment on `cell`
    pub fn collision_index(&self, cell: IVec2) -> Option<usize> {
        self.body.iter().skip(1).position(|&s| s == cell).map(|i| i + 1)
    }
}

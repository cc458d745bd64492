//! Grid geometry for bounded and toroidal boards
//!
//! Cells are `IVec2` with `x` growing right and `y` growing down.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// 8-connected moves in the fixed exploration order NW, N, NE, W, E, SW, S, SE.
///
/// The mouse relies on this order for deterministic BFS and tie-breaking.
pub const NEIGHBOURS_8: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Snake heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step for this heading
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Square board of side `size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: i32,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    /// Number of cells on the board
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size && cell.y < self.size
    }

    /// Wrap a cell onto the torus
    #[inline]
    pub fn wrap(&self, cell: IVec2) -> IVec2 {
        IVec2::new(cell.x.rem_euclid(self.size), cell.y.rem_euclid(self.size))
    }

    /// Resolve a cell under the given boundary mode.
    ///
    /// Toroidal mode always succeeds with the wrapped cell. Clamped mode
    /// returns the cell unchanged, or `None` when it lies off the board.
    pub fn wrap_or_reject(&self, cell: IVec2, wrap: bool) -> Option<IVec2> {
        if wrap {
            Some(self.wrap(cell))
        } else if self.contains(cell) {
            Some(cell)
        } else {
            None
        }
    }

    /// Row-major index of an on-board cell
    #[inline]
    pub fn index(&self, cell: IVec2) -> usize {
        (cell.y * self.size + cell.x) as usize
    }

    /// Chebyshev distance between two cells
    pub fn chebyshev(&self, a: IVec2, b: IVec2, torus: bool) -> i32 {
        if torus {
            let dx = torus_delta(a.x, b.x, self.size);
            let dy = torus_delta(a.y, b.y, self.size);
            dx.max(dy)
        } else {
            (a.x - b.x).abs().max((a.y - b.y).abs())
        }
    }

    /// Distance from a cell to the closest board edge (0 on the edge)
    pub fn edge_distance(&self, cell: IVec2) -> i32 {
        let last = self.size - 1;
        cell.x.min(last - cell.x).min(cell.y).min(last - cell.y)
    }

    /// Whether the cell sits on a vertical edge (x = 0 or x = size - 1)
    #[inline]
    pub fn on_vertical_edge(&self, cell: IVec2) -> bool {
        cell.x == 0 || cell.x == self.size - 1
    }
}

/// Shortest distance between two coordinates on a ring of `n` cells
#[inline]
pub fn torus_delta(a: i32, b: i32, n: i32) -> i32 {
    let d = (a - b).abs();
    d.min(n - d)
}

/// Shortest signed delta on a ring of `n` cells
#[inline]
pub fn torus_signed_delta(d: i32, n: i32) -> i32 {
    (d + n / 2).rem_euclid(n) - n / 2
}

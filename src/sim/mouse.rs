//! The mouse: an autonomous critter that flees the snake and forages items
//!
//! Decision priority per step:
//! 1. Escape through a wall when a cherry has armed a one-time wrap
//! 2. Flee when the snake head is within the alert distance
//! 3. Walk the shortest 8-connected path to the nearest item
//! 4. Random safe step, or stay put when boxed in

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, NEIGHBOURS_8, torus_signed_delta};
use super::items::Item;

/// Mouse entity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mouse {
    pub pos: IVec2,
    /// Extra lives: a hit costs one instead of the mouse being eaten
    pub hp: u32,
    /// Banana boost in cells per second
    pub boost_amount: f64,
    pub boost_until_ms: f64,
    /// One-time permission to cross a solid wall
    pub cherry_armed: bool,
    /// Snake head within alert distance (recomputed every decision)
    pub alert: bool,
}

impl Mouse {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            hp: 0,
            boost_amount: 0.0,
            boost_until_ms: 0.0,
            cherry_armed: false,
            alert: false,
        }
    }

    /// Boost currently in effect
    pub fn active_boost(&self, now_ms: f64) -> f64 {
        if now_ms < self.boost_until_ms {
            self.boost_amount
        } else {
            0.0
        }
    }

    /// Pick this step's move (a delta in {-1, 0, 1}²)
    pub fn decide<R: Rng + ?Sized>(&mut self, view: &Surroundings<'_>, rng: &mut R) -> IVec2 {
        let head = view.snake.front().copied();
        self.alert = head
            .map(|h| view.grid.chebyshev(self.pos, h, view.wrap) <= view.alert_dist)
            .unwrap_or(false);

        if !view.wrap && self.cherry_armed {
            if let Some(mv) = self.escape_move(view, rng) {
                return mv;
            }
        }

        if self.alert {
            if let Some(mv) = head.and_then(|h| self.flee_move(view, h)) {
                return mv;
            }
        }

        // A zero step means the mouse stands on an item; it wanders instead
        if let Some(step) = path_step_to_nearest_item(view, self.pos) {
            if step != IVec2::ZERO && view.is_safe(self.pos + step) {
                return step;
            }
        }

        self.random_safe_move(view, rng)
    }

    /// Head for the wall while a cherry wrap is armed
    fn escape_move<R: Rng + ?Sized>(&self, view: &Surroundings<'_>, rng: &mut R) -> Option<IVec2> {
        let exits: Vec<IVec2> = NEIGHBOURS_8
            .iter()
            .copied()
            .filter(|d| !view.grid.contains(self.pos + *d))
            .collect();

        if !exits.is_empty() {
            let cardinal: Vec<IVec2> = exits
                .iter()
                .copied()
                .filter(|d| d.x == 0 || d.y == 0)
                .collect();
            let mut candidates = if cardinal.is_empty() { exits } else { cardinal };

            let vertical_edge = view.grid.on_vertical_edge(self.pos);
            let preferred: Vec<IVec2> = candidates
                .iter()
                .copied()
                .filter(|d| if vertical_edge { d.y == 0 } else { d.x == 0 })
                .collect();
            if !preferred.is_empty() {
                candidates = preferred;
            }
            return candidates.choose(rng).copied();
        }

        // Not on an edge yet: approach the closest one
        NEIGHBOURS_8
            .iter()
            .copied()
            .filter(|d| view.is_safe(self.pos + *d))
            .min_by_key(|d| view.grid.edge_distance(self.pos + *d))
    }

    /// Safe neighbour farthest from the snake head (first maximum wins)
    fn flee_move(&self, view: &Surroundings<'_>, head: IVec2) -> Option<IVec2> {
        let mut best: Option<(IVec2, i32)> = None;
        for d in NEIGHBOURS_8 {
            let mut target = self.pos + d;
            if view.wrap {
                target = view.grid.wrap(target);
            }
            if !view.is_safe(target) {
                continue;
            }
            let score = view.grid.chebyshev(target, head, view.wrap);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((d, score));
            }
        }
        best.map(|(d, _)| d)
    }

    fn random_safe_move<R: Rng + ?Sized>(&self, view: &Surroundings<'_>, rng: &mut R) -> IVec2 {
        let safe: Vec<IVec2> = NEIGHBOURS_8
            .iter()
            .copied()
            .filter(|d| view.is_safe(self.pos + *d))
            .collect();
        safe.choose(rng).copied().unwrap_or(IVec2::ZERO)
    }

    /// Where a move lands, and whether it spends the cherry wrap.
    ///
    /// Leaving the board is allowed under global wrap, or once with an armed
    /// cherry; in the cherry case only the axis that crossed the wall wraps.
    /// Returns `None` when the wall blocks the move.
    pub fn resolve_destination(&self, grid: Grid, wrap: bool, mv: IVec2) -> Option<(IVec2, bool)> {
        let target = self.pos + mv;
        if grid.contains(target) {
            return Some((target, false));
        }
        if wrap {
            return Some((grid.wrap(target), false));
        }
        if !self.cherry_armed {
            return None;
        }

        let wrapped = grid.wrap(target);
        let mut dest = self.pos;
        if target.x < 0 || target.x >= grid.size {
            dest.x = wrapped.x;
        }
        if target.y < 0 || target.y >= grid.size {
            dest.y = wrapped.y;
        }
        Some((dest, true))
    }
}

/// What the mouse can see when deciding
pub struct Surroundings<'a> {
    pub grid: Grid,
    pub wrap: bool,
    /// Snake body, head first
    pub snake: &'a VecDeque<IVec2>,
    pub items: &'a [Item],
    pub alert_dist: i32,
    /// Snake occupancy, row-major
    blocked: Vec<bool>,
}

impl<'a> Surroundings<'a> {
    pub fn new(
        grid: Grid,
        wrap: bool,
        snake: &'a VecDeque<IVec2>,
        items: &'a [Item],
        alert_dist: i32,
    ) -> Self {
        let mut blocked = vec![false; grid.cell_count()];
        for &segment in snake {
            if grid.contains(segment) {
                blocked[grid.index(segment)] = true;
            }
        }
        Self {
            grid,
            wrap,
            snake,
            items,
            alert_dist,
            blocked,
        }
    }

    /// On the board (or wrappable) and not under the snake
    pub fn is_safe(&self, cell: IVec2) -> bool {
        if !self.wrap && !self.grid.contains(cell) {
            return false;
        }
        let cell = self.grid.wrap(cell);
        !self.blocked[self.grid.index(cell)]
    }
}

/// BFS from `start` to the closest item; returns the first unit step.
///
/// Neighbours are explored in [`NEIGHBOURS_8`] order so the chosen path is
/// deterministic. Returns `Some(IVec2::ZERO)` when `start` already holds an
/// item and `None` when no item is reachable.
pub fn path_step_to_nearest_item(view: &Surroundings<'_>, start: IVec2) -> Option<IVec2> {
    let grid = view.grid;
    if view.items.is_empty() {
        return None;
    }
    let start = if view.wrap { grid.wrap(start) } else { start };
    if !grid.contains(start) {
        return None;
    }

    let cells = grid.cell_count();
    let mut goals = vec![false; cells];
    for item in view.items {
        if grid.contains(item.pos) {
            goals[grid.index(item.pos)] = true;
        }
    }

    let mut visited = vec![false; cells];
    let mut prev: Vec<Option<IVec2>> = vec![None; cells];
    let mut queue = VecDeque::new();
    visited[grid.index(start)] = true;
    queue.push_back(start);

    while let Some(cur) = queue.pop_front() {
        if goals[grid.index(cur)] {
            return Some(first_step(grid, view.wrap, &prev, start, cur));
        }
        for d in NEIGHBOURS_8 {
            let Some(next) = grid.wrap_or_reject(cur + d, view.wrap) else {
                continue;
            };
            let idx = grid.index(next);
            if visited[idx] || !view.is_safe(next) {
                continue;
            }
            visited[idx] = true;
            prev[idx] = Some(cur);
            queue.push_back(next);
        }
    }
    None
}

/// Walk the predecessor chain back to the node right after `start`
fn first_step(grid: Grid, wrap: bool, prev: &[Option<IVec2>], start: IVec2, goal: IVec2) -> IVec2 {
    let mut node = goal;
    while let Some(parent) = prev[grid.index(node)] {
        if parent == start {
            let mut delta = node - start;
            if wrap {
                delta = IVec2::new(
                    torus_signed_delta(delta.x, grid.size),
                    torus_signed_delta(delta.y, grid.size),
                );
            }
            return delta.signum();
        }
        node = parent;
    }
    IVec2::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::items::ItemKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn apple(x: i32, y: i32) -> Item {
        Item {
            id: 1,
            kind: ItemKind::Apple,
            pos: IVec2::new(x, y),
        }
    }

    fn body(cells: &[(i32, i32)]) -> VecDeque<IVec2> {
        cells.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn test_flee_maximises_distance() {
        let grid = Grid::new(24);
        let snake = body(&[(10, 10), (9, 10), (8, 10)]);
        let items = [apple(0, 0)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let mut mouse = Mouse::new(IVec2::new(12, 10));
        let mut rng = Pcg32::seed_from_u64(1);

        let mv = mouse.decide(&view, &mut rng);
        assert!(mouse.alert);
        // East moves all reach distance 3; NE comes first in enumeration order
        assert_eq!(mv, IVec2::new(1, -1));
        assert_eq!(grid.chebyshev(mouse.pos + mv, snake[0], false), 3);
    }

    #[test]
    fn test_flee_skips_snake_and_walls() {
        let grid = Grid::new(24);
        // Mouse in the top-left corner, head right beside it
        let snake = body(&[(1, 0), (2, 0), (3, 0)]);
        let items = [apple(20, 20)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let mut mouse = Mouse::new(IVec2::new(0, 0));
        let mut rng = Pcg32::seed_from_u64(1);

        let mv = mouse.decide(&view, &mut rng);
        assert!(view.is_safe(mouse.pos + mv));
        assert!([IVec2::new(0, 1), IVec2::new(1, 1)].contains(&mv));
        // (0,1) and (1,1) are both at distance 1; (0,1) is enumerated first
        assert_eq!(mv, IVec2::new(0, 1));
    }

    #[test]
    fn test_forage_walks_toward_apple() {
        let grid = Grid::new(24);
        let snake = body(&[(20, 20), (19, 20), (18, 20)]);
        let items = [apple(5, 2)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let mut mouse = Mouse::new(IVec2::new(2, 2));
        let mut rng = Pcg32::seed_from_u64(1);

        // Several shortest paths exist; BFS order reaches the NE branch first
        assert_eq!(mouse.decide(&view, &mut rng), IVec2::new(1, -1));
        assert!(!mouse.alert);
    }

    #[test]
    fn test_forage_takes_torus_shortcut() {
        let grid = Grid::new(24);
        let snake = body(&[(12, 12), (11, 12), (10, 12)]);
        let items = [apple(23, 5)];
        let view = Surroundings::new(grid, true, &snake, &items, 3);
        assert_eq!(
            path_step_to_nearest_item(&view, IVec2::new(0, 5)),
            Some(IVec2::new(-1, 0))
        );
    }

    #[test]
    fn test_bfs_routes_around_snake() {
        let grid = Grid::new(24);
        // A wall of snake between mouse and apple, open at the bottom
        let cells: Vec<(i32, i32)> = (0..10).map(|y| (5, y)).collect();
        let snake = body(&cells);
        let items = [apple(8, 0)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let step = path_step_to_nearest_item(&view, IVec2::new(3, 0)).unwrap();
        // Must head down toward the gap
        assert_eq!(step.y, 1);
    }

    #[test]
    fn test_standing_on_item_steps_off() {
        let grid = Grid::new(24);
        let snake = body(&[(20, 20), (19, 20), (18, 20)]);
        let items = [apple(4, 4)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        assert_eq!(
            path_step_to_nearest_item(&view, IVec2::new(4, 4)),
            Some(IVec2::ZERO)
        );

        for seed in 0..10 {
            let mut mouse = Mouse::new(IVec2::new(4, 4));
            let mut rng = Pcg32::seed_from_u64(seed);
            let mv = mouse.decide(&view, &mut rng);
            assert_ne!(mv, IVec2::ZERO);
            assert!(view.is_safe(mouse.pos + mv));
        }
    }

    #[test]
    fn test_unreachable_item_falls_back_to_random_safe() {
        let grid = Grid::new(24);
        // Mouse fenced into the 2x2 top-left corner
        let snake = body(&[(2, 0), (2, 1), (2, 2), (1, 2), (0, 2)]);
        let items = [apple(10, 10)];
        let view = Surroundings::new(grid, false, &snake, &items, 0);
        assert_eq!(path_step_to_nearest_item(&view, IVec2::new(0, 0)), None);

        let safe = [IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(1, 1)];
        for seed in 0..10 {
            let mut mouse = Mouse::new(IVec2::new(0, 0));
            let mut rng = Pcg32::seed_from_u64(seed);
            assert!(safe.contains(&mouse.decide(&view, &mut rng)));
        }
    }

    #[test]
    fn test_boxed_in_mouse_stays() {
        let grid = Grid::new(24);
        let snake = body(&[(1, 0), (1, 1), (0, 1)]);
        let items: [Item; 0] = [];
        let view = Surroundings::new(grid, false, &snake, &items, 0);
        let mut mouse = Mouse::new(IVec2::new(0, 0));
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(mouse.decide(&view, &mut rng), IVec2::ZERO);
    }

    #[test]
    fn test_armed_mouse_exits_through_wall() {
        let grid = Grid::new(24);
        let snake = body(&[(20, 20), (19, 20), (18, 20)]);
        let items = [apple(5, 5)];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let mut mouse = Mouse::new(IVec2::new(0, 7));
        mouse.cherry_armed = true;
        let mut rng = Pcg32::seed_from_u64(1);

        let mv = mouse.decide(&view, &mut rng);
        assert_eq!(mv, IVec2::new(-1, 0));
        let (dest, used) = mouse.resolve_destination(grid, false, mv).unwrap();
        assert_eq!(dest, IVec2::new(23, 7));
        assert!(used);
    }

    #[test]
    fn test_armed_mouse_in_corner_prefers_horizontal_exit() {
        let grid = Grid::new(24);
        let snake = body(&[(20, 20)]);
        let items: [Item; 0] = [];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        for seed in 0..10 {
            let mut mouse = Mouse::new(IVec2::new(0, 0));
            mouse.cherry_armed = true;
            let mut rng = Pcg32::seed_from_u64(seed);
            assert_eq!(mouse.decide(&view, &mut rng), IVec2::new(-1, 0));
        }
    }

    #[test]
    fn test_armed_mouse_approaches_nearest_edge() {
        let grid = Grid::new(24);
        let snake = body(&[(20, 20)]);
        let items: [Item; 0] = [];
        let view = Surroundings::new(grid, false, &snake, &items, 3);
        let mut mouse = Mouse::new(IVec2::new(2, 10));
        mouse.cherry_armed = true;
        let mut rng = Pcg32::seed_from_u64(1);
        // NW, W and SW all reach x = 1; NW is first
        assert_eq!(mouse.decide(&view, &mut rng), IVec2::new(-1, -1));
    }

    #[test]
    fn test_wall_blocks_unarmed_mouse() {
        let grid = Grid::new(24);
        let mouse = Mouse::new(IVec2::new(23, 3));
        assert_eq!(mouse.resolve_destination(grid, false, IVec2::new(1, 0)), None);
        assert_eq!(
            mouse.resolve_destination(grid, true, IVec2::new(1, 1)),
            Some((IVec2::new(0, 4), false))
        );
    }

    #[test]
    fn test_cherry_wrap_is_axis_locked() {
        let grid = Grid::new(24);
        let mut mouse = Mouse::new(IVec2::new(23, 3));
        mouse.cherry_armed = true;
        assert_eq!(
            mouse.resolve_destination(grid, false, IVec2::new(1, 1)),
            Some((IVec2::new(0, 3), true))
        );
    }

    #[test]
    fn test_boost_expires() {
        let mut mouse = Mouse::new(IVec2::ZERO);
        mouse.boost_amount = 2.0;
        mouse.boost_until_ms = 1000.0;
        assert_eq!(mouse.active_boost(999.0), 2.0);
        assert_eq!(mouse.active_boost(1000.0), 0.0);
    }
}

//! Per-frame renderer input

use std::collections::VecDeque;

use glam::IVec2;

use crate::sim::{Direction, GamePhase, GameState, Grid, Item, ItemKind, Mouse};

/// Borrowed view of everything the renderer draws
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub grid: Grid,
    pub phase: GamePhase,
    pub items: &'a [Item],
    pub mouse: &'a Mouse,
    pub snake: &'a VecDeque<IVec2>,
    pub heading: Direction,
    pub wrap_walls: bool,
}

impl<'a> FrameView<'a> {
    pub fn from_state(state: &'a GameState) -> Self {
        Self {
            grid: state.grid,
            phase: state.phase,
            items: state.items.items(),
            mouse: &state.mouse,
            snake: &state.snake.body,
            heading: state.snake.direction,
            wrap_walls: state.wrap_walls,
        }
    }

    /// Text rendering, one row per line.
    ///
    /// Later layers win: items, then the mouse, then the snake.
    pub fn to_ascii(&self) -> String {
        let size = self.grid.size as usize;
        let mut cells = vec![b'.'; size * size];
        let mut put = |cell: IVec2, glyph: u8| {
            if self.grid.contains(cell) {
                cells[self.grid.index(cell)] = glyph;
            }
        };

        for item in self.items {
            let glyph = match item.kind {
                ItemKind::Apple => b'a',
                ItemKind::Banana => b'b',
                ItemKind::Orange => b'o',
                ItemKind::Pear { .. } => b'p',
                ItemKind::Cherry => b'c',
            };
            put(item.pos, glyph);
        }
        put(self.mouse.pos, b'm');
        for &segment in self.snake.iter().skip(1) {
            put(segment, b's');
        }
        if let Some(&head) = self.snake.front() {
            let glyph = match self.heading {
                Direction::Up => b'^',
                Direction::Down => b'v',
                Direction::Left => b'<',
                Direction::Right => b'>',
            };
            put(head, glyph);
        }

        let mut out = String::with_capacity(size * (size + 1));
        for row in cells.chunks(size) {
            out.extend(row.iter().map(|&b| b as char));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_ascii_layers() {
        let tuning = Tuning {
            grid: 6,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 1, 0);
        state.items.clear();
        state.items.insert(ItemKind::Apple, IVec2::new(0, 0));
        state.mouse = Mouse::new(IVec2::new(5, 5));

        let board = FrameView::from_state(&state).to_ascii();
        let rows: Vec<&str> = board.lines().collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], "a.....");
        assert_eq!(rows[3], "..ss>.");
        assert_eq!(rows[5], ".....m");
    }
}

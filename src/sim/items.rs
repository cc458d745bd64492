//! Consumable items: spawning, lookup and consumption effects
//!
//! Items live in an id-ordered arena. Consumption never touches session
//! state directly; it returns an [`Effect`] the engine applies.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::tuning::Tuning;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Always present; +1 score for the snake
    Apple,
    /// Slows the snake, speeds up the mouse
    Banana,
    /// +1 hit point
    Orange,
    /// Teleports to the other member of the pair
    Pear { pair_id: u32 },
    /// +1 score and a one-step wrap when walls are solid
    Cherry,
}

impl ItemKind {
    /// Anything other than the apple; at most one special is on the board
    pub fn is_special(&self) -> bool {
        !matches!(self, ItemKind::Apple)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Apple => "apple",
            ItemKind::Banana => "banana",
            ItemKind::Orange => "orange",
            ItemKind::Pear { .. } => "pear",
            ItemKind::Cherry => "cherry",
        }
    }
}

/// The four equally likely special spawns (a pear pair counts once)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Banana,
    Orange,
    PearPair,
    Cherry,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 4] = [
        SpecialKind::Banana,
        SpecialKind::Orange,
        SpecialKind::PearPair,
        SpecialKind::Cherry,
    ];
}

/// An item on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: IVec2,
}

/// Who is eating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumer {
    Snake,
    Mouse,
}

/// Inputs a consumption needs from outside the registry
#[derive(Debug, Clone, Copy)]
pub struct ConsumeContext<'a> {
    pub consumer: Consumer,
    pub tuning: &'a Tuning,
    /// Stored high score (scales banana duration)
    pub high_score: u64,
    /// Global wrap mode
    pub wrap: bool,
}

/// A timed speed change (slow for the snake, boost for the mouse)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedEffect {
    /// Cells per second
    pub amount: f64,
    pub duration_ms: f64,
}

/// What eating an item does to the consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: ItemKind,
    pub score: u64,
    /// Hit points gained (the engine applies any cap)
    pub hp: u32,
    pub speed: Option<SpeedEffect>,
    /// Destination for a pear teleport
    pub teleport: Option<IVec2>,
    /// Grant a one-step wrap through the wall
    pub arm_wrap: bool,
}

impl Effect {
    fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            score: 0,
            hp: 0,
            speed: None,
            teleport: None,
            arm_wrap: false,
        }
    }
}

/// Active items plus the spawn rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRegistry {
    grid: Grid,
    /// Sorted by id
    items: Vec<Item>,
    next_id: u32,
}

impl ItemRegistry {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn item_at(&self, pos: IVec2) -> Option<&Item> {
        self.items.iter().find(|it| it.pos == pos)
    }

    pub fn apple_count(&self) -> usize {
        self.items
            .iter()
            .filter(|it| it.kind == ItemKind::Apple)
            .count()
    }

    pub fn special_present(&self) -> bool {
        self.items.iter().any(|it| it.kind.is_special())
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, kind: ItemKind, pos: IVec2) {
        let id = self.next_entity_id();
        self.items.push(Item { id, kind, pos });
    }

    fn is_free(&self, cell: IVec2, blocked: &HashSet<IVec2>) -> bool {
        !blocked.contains(&cell) && self.item_at(cell).is_none()
    }

    fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> IVec2 {
        IVec2::new(
            rng.random_range(0..self.grid.size),
            rng.random_range(0..self.grid.size),
        )
    }

    /// Rejection-sample a free cell, giving up after N² draws and returning
    /// the last draw.
    pub fn spawn_at_empty<R: Rng + ?Sized>(&self, blocked: &HashSet<IVec2>, rng: &mut R) -> IVec2 {
        let attempts = self.grid.cell_count();
        let mut cell = self.random_cell(rng);
        for _ in 1..attempts {
            if self.is_free(cell, blocked) {
                break;
            }
            cell = self.random_cell(rng);
        }
        cell
    }

    /// Pick a free cell on one of the four edges, or any free cell
    pub fn spawn_at_edge<R: Rng + ?Sized>(&self, blocked: &HashSet<IVec2>, rng: &mut R) -> IVec2 {
        let last = self.grid.size - 1;
        for _ in 0..self.grid.cell_count() {
            let along = rng.random_range(0..self.grid.size);
            let cell = match rng.random_range(0..4) {
                0 => IVec2::new(0, along),
                1 => IVec2::new(last, along),
                2 => IVec2::new(along, 0),
                _ => IVec2::new(along, last),
            };
            if self.is_free(cell, blocked) {
                return cell;
            }
        }
        self.spawn_at_empty(blocked, rng)
    }

    /// Make sure exactly one apple is on the board
    pub fn ensure_apple<R: Rng + ?Sized>(&mut self, blocked: &HashSet<IVec2>, rng: &mut R) {
        if self.apple_count() == 0 {
            let cell = self.spawn_at_empty(blocked, rng);
            self.push(ItemKind::Apple, cell);
        }
    }

    /// Spawn one random special unless one is already present
    pub fn maybe_spawn_special<R: Rng + ?Sized>(&mut self, blocked: &HashSet<IVec2>, rng: &mut R) {
        if self.special_present() {
            return;
        }
        let kind = SpecialKind::ALL[rng.random_range(0..SpecialKind::ALL.len())];
        self.spawn_special(kind, blocked, rng);
    }

    /// Place a specific special
    pub fn spawn_special<R: Rng + ?Sized>(
        &mut self,
        kind: SpecialKind,
        blocked: &HashSet<IVec2>,
        rng: &mut R,
    ) {
        match kind {
            SpecialKind::Banana => {
                let cell = self.spawn_at_empty(blocked, rng);
                self.push(ItemKind::Banana, cell);
            }
            SpecialKind::Orange => {
                let cell = self.spawn_at_empty(blocked, rng);
                self.push(ItemKind::Orange, cell);
            }
            SpecialKind::PearPair => {
                let pair_id = self.next_entity_id();
                let first = self.spawn_at_empty(blocked, rng);
                self.push(ItemKind::Pear { pair_id }, first);
                // The first pear is now an item, so the second lands elsewhere
                let second = self.spawn_at_empty(blocked, rng);
                self.push(ItemKind::Pear { pair_id }, second);
            }
            SpecialKind::Cherry => {
                let cell = self.spawn_at_edge(blocked, rng);
                self.push(ItemKind::Cherry, cell);
            }
        }
        log::debug!("Spawned special {:?}", kind);
    }

    /// Eat the item at `pos`, if any.
    ///
    /// `blocked` holds the cells replacement spawns must avoid besides the
    /// items themselves (the snake body). The consumer's own cell is always
    /// avoided.
    pub fn consume<R: Rng + ?Sized>(
        &mut self,
        pos: IVec2,
        ctx: &ConsumeContext<'_>,
        blocked: &HashSet<IVec2>,
        rng: &mut R,
    ) -> Option<Effect> {
        let item = self.item_at(pos)?.clone();
        let snake = ctx.consumer == Consumer::Snake;
        let mut effect = Effect::new(item.kind);

        match item.kind {
            ItemKind::Apple => {
                self.items.retain(|it| it.id != item.id);
                let mut blocked = blocked.clone();
                blocked.insert(pos);
                self.ensure_apple(&blocked, rng);
                self.maybe_spawn_special(&blocked, rng);
                if snake {
                    effect.score = 1;
                }
            }
            ItemKind::Banana => {
                self.items.retain(|it| it.id != item.id);
                effect.speed = Some(SpeedEffect {
                    amount: ctx.tuning.banana_slow,
                    duration_ms: ctx.tuning.banana_duration_ms(ctx.high_score),
                });
            }
            ItemKind::Orange => {
                self.items.retain(|it| it.id != item.id);
                effect.hp = 1;
            }
            ItemKind::Pear { pair_id } => {
                let partner = self
                    .items
                    .iter()
                    .find(|it| it.kind == item.kind && it.id != item.id)
                    .map(|it| it.pos);
                // Both members go at once
                self.items
                    .retain(|it| it.kind != ItemKind::Pear { pair_id });
                effect.teleport = Some(partner.unwrap_or(pos));
            }
            ItemKind::Cherry => {
                self.items.retain(|it| it.id != item.id);
                if snake {
                    effect.score = 1;
                }
                effect.arm_wrap = !ctx.wrap;
            }
        }

        log::debug!("{:?} ate {} at ({}, {})", ctx.consumer, item.kind.name(), pos.x, pos.y);
        Some(effect)
    }

    /// Place an item directly (restores and scripted setups)
    pub fn insert(&mut self, kind: ItemKind, pos: IVec2) {
        self.push(kind, pos);
    }

    /// Allocate a pairing id for hand-placed pears
    pub fn new_pair_id(&mut self) -> u32 {
        self.next_entity_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(tuning: &Tuning, consumer: Consumer, wrap: bool) -> ConsumeContext<'_> {
        ConsumeContext {
            consumer,
            tuning,
            high_score: 10,
            wrap,
        }
    }

    #[test]
    fn test_ensure_apple_spawns_exactly_one() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut registry = ItemRegistry::new(Grid::new(24));
        let blocked = HashSet::new();
        registry.ensure_apple(&blocked, &mut rng);
        registry.ensure_apple(&blocked, &mut rng);
        assert_eq!(registry.apple_count(), 1);
        assert_eq!(registry.items().len(), 1);
    }

    #[test]
    fn test_spawn_avoids_blocked_cells() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut registry = ItemRegistry::new(Grid::new(24));
        registry.insert(ItemKind::Banana, IVec2::new(12, 0));
        // Left half of the board is taken
        let blocked: HashSet<IVec2> = (0..24)
            .flat_map(|y| (0..12).map(move |x| IVec2::new(x, y)))
            .collect();
        for _ in 0..50 {
            let cell = registry.spawn_at_empty(&blocked, &mut rng);
            assert!(cell.x >= 12);
            assert_ne!(cell, IVec2::new(12, 0));
        }
    }

    #[test]
    fn test_full_board_falls_back_to_any_cell() {
        let mut rng = Pcg32::seed_from_u64(3);
        let grid = Grid::new(4);
        let registry = ItemRegistry::new(grid);
        let blocked: HashSet<IVec2> = (0..4)
            .flat_map(|y| (0..4).map(move |x| IVec2::new(x, y)))
            .collect();
        let cell = registry.spawn_at_empty(&blocked, &mut rng);
        assert!(grid.contains(cell));
        let cell = registry.spawn_at_edge(&blocked, &mut rng);
        assert!(grid.contains(cell));
    }

    #[test]
    fn test_only_one_special_at_a_time() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut registry = ItemRegistry::new(Grid::new(24));
        let blocked = HashSet::new();
        for _ in 0..10 {
            registry.maybe_spawn_special(&blocked, &mut rng);
        }
        let specials: Vec<_> = registry
            .items()
            .iter()
            .filter(|it| it.kind.is_special())
            .collect();
        match specials[0].kind {
            ItemKind::Pear { .. } => assert_eq!(specials.len(), 2),
            _ => assert_eq!(specials.len(), 1),
        }
    }

    #[test]
    fn test_cherry_spawns_on_edge() {
        let grid = Grid::new(24);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut registry = ItemRegistry::new(grid);
            registry.spawn_special(SpecialKind::Cherry, &HashSet::new(), &mut rng);
            let cherry = &registry.items()[0];
            assert_eq!(cherry.kind, ItemKind::Cherry);
            assert_eq!(grid.edge_distance(cherry.pos), 0);
        }
    }

    #[test]
    fn test_pears_share_pair_id_and_distinct_cells() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut registry = ItemRegistry::new(Grid::new(24));
        registry.spawn_special(SpecialKind::PearPair, &HashSet::new(), &mut rng);
        let items = registry.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, items[1].kind);
        assert!(matches!(items[0].kind, ItemKind::Pear { .. }));
        assert_ne!(items[0].pos, items[1].pos);
    }

    #[test]
    fn test_pear_consumption_removes_pair_and_teleports() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut registry = ItemRegistry::new(Grid::new(24));
        let pair_id = registry.new_pair_id();
        registry.insert(ItemKind::Apple, IVec2::new(1, 1));
        registry.insert(ItemKind::Pear { pair_id }, IVec2::new(5, 5));
        registry.insert(ItemKind::Pear { pair_id }, IVec2::new(20, 2));

        let effect = registry
            .consume(
                IVec2::new(20, 2),
                &ctx(&tuning, Consumer::Snake, false),
                &HashSet::new(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(effect.teleport, Some(IVec2::new(5, 5)));
        assert_eq!(effect.score, 0);
        assert_eq!(registry.items().len(), 1);
        assert_eq!(registry.apple_count(), 1);
    }

    #[test]
    fn test_apple_effects_differ_by_consumer() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for (consumer, score) in [(Consumer::Snake, 1), (Consumer::Mouse, 0)] {
            let mut registry = ItemRegistry::new(Grid::new(24));
            registry.insert(ItemKind::Apple, IVec2::new(3, 3));
            let effect = registry
                .consume(
                    IVec2::new(3, 3),
                    &ctx(&tuning, consumer, false),
                    &HashSet::new(),
                    &mut rng,
                )
                .unwrap();
            assert_eq!(effect.score, score);
            assert_eq!(registry.apple_count(), 1);
            assert!(registry.special_present());
            // Nothing respawns under the consumer
            assert!(registry.item_at(IVec2::new(3, 3)).is_none());
        }
    }

    #[test]
    fn test_banana_orange_cherry_effects() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(13);
        let mut registry = ItemRegistry::new(Grid::new(24));
        registry.insert(ItemKind::Banana, IVec2::new(1, 0));
        registry.insert(ItemKind::Orange, IVec2::new(2, 0));
        registry.insert(ItemKind::Cherry, IVec2::new(3, 0));
        let blocked = HashSet::new();

        let banana = registry
            .consume(IVec2::new(1, 0), &ctx(&tuning, Consumer::Mouse, false), &blocked, &mut rng)
            .unwrap();
        assert_eq!(
            banana.speed,
            Some(SpeedEffect {
                amount: 2.0,
                duration_ms: 4500.0
            })
        );

        let orange = registry
            .consume(IVec2::new(2, 0), &ctx(&tuning, Consumer::Snake, false), &blocked, &mut rng)
            .unwrap();
        assert_eq!(orange.hp, 1);

        let cherry = registry
            .consume(IVec2::new(3, 0), &ctx(&tuning, Consumer::Snake, true), &blocked, &mut rng)
            .unwrap();
        assert_eq!(cherry.score, 1);
        assert!(!cherry.arm_wrap);
        assert!(registry.items().is_empty());
    }

    #[test]
    fn test_consume_empty_cell_is_none() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut registry = ItemRegistry::new(Grid::new(24));
        let effect = registry.consume(
            IVec2::new(0, 0),
            &ctx(&tuning, Consumer::Snake, false),
            &HashSet::new(),
            &mut rng,
        );
        assert!(effect.is_none());
    }
}

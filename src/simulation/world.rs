//! The farm world: tick orchestration, occupancy grid and change diffing

use rand::Rng;
use tracing::{debug, info};

use crate::simulation::error::FarmError;
use crate::simulation::params::FarmParams;
use crate::simulation::predator::{DepletionHook, LogDepletion, Predator, TentacleReport, PREDATOR_GLYPH};
use crate::simulation::prey::{all_prey, find_prey, Prey, PreyCluster};
use crate::simulation::types::{Bounds, CellGlyph, GridPos, Occupant, PreyId};
use crate::tilemap::Tilemap;

/// One predator, its prey and the grid they are drawn on.
///
/// The occupancy grid is rebuilt from entity positions every tick. Combat
/// never reads it; it exists for diffing and display queries.
pub struct World {
    bounds: Bounds,
    predator: Predator,
    clusters: Vec<PreyCluster>,
    moves: u64,
    cells: Tilemap<Occupant>,
    last_cells: Tilemap<Occupant>,
    last_report: TentacleReport,
    depletion_hook: Box<dyn DepletionHook>,
}

impl World {
    /// Build a world with the predator at the grid center and every
    /// configured cluster spawned.
    ///
    /// The grid starts empty, so the first `update` reports every occupied cell.
    pub fn new<R: Rng>(params: &FarmParams, rng: &mut R) -> Result<Self, FarmError> {
        params.validate()?;
        let bounds = Bounds::new(params.width as i32, params.height as i32);

        let predator = Predator::new(&params.predator, bounds.center());
        let clusters: Vec<PreyCluster> = params
            .clusters
            .iter()
            .map(|c| PreyCluster::spawn(c, bounds, rng))
            .collect();

        info!(
            width = params.width,
            height = params.height,
            tentacles = params.predator.tentacles,
            reach = params.predator.reach,
            clusters = clusters.len(),
            prey = params.prey_count(),
            "created farm world"
        );

        Ok(World {
            bounds,
            predator,
            clusters,
            moves: 0,
            cells: Tilemap::new(params.width, params.height),
            last_cells: Tilemap::new(params.width, params.height),
            last_report: TentacleReport::default(),
            depletion_hook: Box::new(LogDepletion),
        })
    }

    /// Replace the hook called when held prey run out of health
    pub fn set_depletion_hook(&mut self, hook: Box<dyn DepletionHook>) {
        self.depletion_hook = hook;
    }

    /// Advance one tick and return the `(row, col)` cells whose occupant changed.
    pub fn update<R: Rng>(&mut self, rng: &mut R) -> Vec<(usize, usize)> {
        self.moves += 1;
        std::mem::swap(&mut self.cells, &mut self.last_cells);
        self.cells.clear();

        for cluster in &mut self.clusters {
            cluster.update(self.bounds, rng);
            for prey in cluster.members() {
                let (x, y) = cell_of(prey.pos);
                self.cells.set(x, y, Occupant::Prey(prey.id));
            }
        }
        let (x, y) = cell_of(self.predator.pos);
        self.cells.set(x, y, Occupant::Predator);

        self.last_report = self.predator.update(
            &mut self.clusters,
            self.bounds,
            self.moves,
            self.depletion_hook.as_mut(),
        );
        if self.last_report.released > 0 || self.last_report.grabbed > 0 {
            debug!(
                tick = self.moves,
                released = self.last_report.released,
                grabbed = self.last_report.grabbed,
                held = self.predator.held_count(),
                "tentacles changed"
            );
        }

        self.cells.changed_cells(&self.last_cells)
    }

    /// Move the octopus by a row/column delta right away, clamped to the grid.
    pub fn move_octopus(&mut self, drow: i32, dcol: i32) {
        self.predator.shift(drow, dcol, self.bounds);
    }

    /// Queue a row/column delta, applied when the next tick repositions the octopus.
    pub fn queue_move(&mut self, drow: i32, dcol: i32) {
        self.predator.queue_move(drow, dcol);
    }

    /// Current occupant of a cell. Cells outside the grid read as empty.
    pub fn at(&self, row: usize, col: usize) -> Occupant {
        self.cells.try_get(col, row).copied().unwrap_or_default()
    }

    /// Glyph for whatever occupies a cell, if anything
    pub fn render(&self, row: usize, col: usize) -> Option<CellGlyph<'_>> {
        match self.at(row, col) {
            Occupant::Empty => None,
            Occupant::Predator => Some(CellGlyph {
                symbol: PREDATOR_GLYPH,
                held: false,
            }),
            Occupant::Prey(id) => self.prey(id).map(|prey| CellGlyph {
                symbol: &prey.glyph,
                held: self.is_under_attack(id),
            }),
        }
    }

    /// True while any tentacle holds the prey
    pub fn is_under_attack(&self, id: PreyId) -> bool {
        self.predator.is_holding(id)
    }

    pub fn prey(&self, id: PreyId) -> Option<&Prey> {
        find_prey(&self.clusters, id)
    }

    /// Every prey, cluster by cluster
    pub fn all_prey(&self) -> impl Iterator<Item = &Prey> {
        all_prey(&self.clusters)
    }

    pub fn predator(&self) -> &Predator {
        &self.predator
    }

    pub(crate) fn predator_mut(&mut self) -> &mut Predator {
        &mut self.predator
    }

    pub fn clusters(&self) -> &[PreyCluster] {
        &self.clusters
    }

    /// Number of ticks run so far
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    /// Tentacle activity of the most recent tick
    pub fn last_report(&self) -> TentacleReport {
        self.last_report
    }

    /// The occupancy grid as of the last tick
    pub fn cells(&self) -> &Tilemap<Occupant> {
        &self.cells
    }
}

/// Grid cell of a clamped position
fn cell_of(pos: GridPos) -> (usize, usize) {
    (pos.x as usize, pos.y as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::{ClusterParams, PredatorParams};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn small_params(tentacles: usize, reach: u32, attack_power: i32, clusters: Vec<ClusterParams>) -> FarmParams {
        FarmParams {
            width: 20,
            height: 20,
            predator: PredatorParams {
                tentacles,
                reach,
                attack_power,
                speed: 5,
            },
            clusters,
        }
    }

    /// Ordinal of a prey within the world, stable across worlds built from the same params
    fn ordinal(world: &World, id: PreyId) -> usize {
        world.all_prey().position(|p| p.id == id).unwrap()
    }

    #[test]
    fn test_rejects_bad_construction() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut params = FarmParams::default();
        params.height = 0;
        assert!(World::new(&params, &mut rng).is_err());

        let params = small_params(0, 3, 1, vec![]);
        assert!(matches!(World::new(&params, &mut rng), Err(FarmError::NoTentacles)));
    }

    #[test]
    fn test_reference_world() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = World::new(&FarmParams::default(), &mut rng).unwrap();
        assert_eq!(world.predator().pos, GridPos::new(20, 20));
        assert_eq!(world.predator().tentacles().len(), 8);
        assert_eq!(world.clusters().len(), 3);
        assert_eq!(world.all_prey().count(), 20);
        assert_eq!(world.moves(), 0);
        assert_eq!(world.at(20, 20), Occupant::Empty);
    }

    #[test]
    fn test_first_update_reports_every_occupied_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut world = World::new(&FarmParams::default(), &mut rng).unwrap();
        let changed = world.update(&mut rng);

        let occupied: Vec<(usize, usize)> = world
            .cells()
            .iter()
            .filter(|(_, _, o)| !o.is_empty())
            .map(|(x, y, _)| (y, x))
            .collect();
        assert_eq!(changed, occupied);
        assert_eq!(world.at(20, 20), Occupant::Predator);
        assert_eq!(world.moves(), 1);
    }

    #[test]
    fn test_diff_matches_grid_changes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut world = World::new(&FarmParams::default(), &mut rng).unwrap();
        world.update(&mut rng);

        for _ in 0..50 {
            let before = world.cells().clone();
            let changed = world.update(&mut rng);

            let unique: HashSet<(usize, usize)> = changed.iter().copied().collect();
            assert_eq!(unique.len(), changed.len());
            for row in 0..world.height() {
                for col in 0..world.width() {
                    let differs = before.get(col, row) != &world.at(row, col);
                    assert_eq!(differs, unique.contains(&(row, col)), "cell ({row}, {col})");
                }
            }
            let mut sorted = changed.clone();
            sorted.sort();
            assert_eq!(sorted, changed);
        }
    }

    #[test]
    fn test_bounds_and_tentacle_invariants_over_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut world = World::new(&FarmParams::default(), &mut rng).unwrap();
        let bounds = world.bounds();

        for step in 0..500 {
            if step % 7 == 0 {
                world.move_octopus(rng.gen_range(-3..=3), rng.gen_range(-3..=3));
            }
            world.update(&mut rng);

            assert!(bounds.contains(world.predator().pos));
            assert!(world.all_prey().all(|p| bounds.contains(p.pos)));
            let held: Vec<PreyId> = world.predator().tentacles().iter().flatten().copied().collect();
            let unique: HashSet<PreyId> = held.iter().copied().collect();
            assert_eq!(world.predator().tentacles().len(), 8);
            assert_eq!(held.len(), unique.len());
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut world = World::new(&FarmParams::default(), &mut rng).unwrap();
            let mut diffs = Vec::new();
            let mut slots = Vec::new();
            for _ in 0..100 {
                diffs.push(world.update(&mut rng));
                let ordinals: Vec<Option<usize>> = world
                    .predator()
                    .tentacles()
                    .iter()
                    .map(|slot| slot.map(|id| ordinal(&world, id)))
                    .collect();
                slots.push(ordinals);
            }
            (diffs, slots)
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_single_tentacle_scenario() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = small_params(1, 3, 7, vec![ClusterParams::new("🐟", 11, 10, 0, 1, 10)]);
        let mut world = World::new(&params, &mut rng).unwrap();
        let id = world.all_prey().next().unwrap().id;

        let changed = world.update(&mut rng);
        let prey = world.prey(id).unwrap();
        let prey_cell = (prey.pos.y as usize, prey.pos.x as usize);

        assert_eq!(world.predator().tentacles(), &[Some(id)]);
        assert_eq!(prey.health, 93);
        assert!(changed.contains(&(10, 10)));
        if prey_cell != (10, 10) {
            assert!(changed.contains(&prey_cell));
            let glyph = world.render(prey_cell.0, prey_cell.1).unwrap();
            assert_eq!(glyph, CellGlyph { symbol: "🐟", held: true });
        }

        // The predator did not move, so its cell is unchanged next tick
        let changed = world.update(&mut rng);
        assert!(!changed.contains(&(10, 10)));
    }

    #[test]
    fn test_release_when_prey_leaves_reach() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let params = small_params(2, 2, 10, vec![ClusterParams::new("*", 10, 10, 0, 1, 1)]);
        let mut world = World::new(&params, &mut rng).unwrap();
        world.update(&mut rng);
        let id = world.all_prey().next().unwrap().id;
        assert!(world.is_under_attack(id));

        // Drag the octopus far away; the release happens on the next tick
        world.move_octopus(9, 9);
        world.update(&mut rng);

        let prey = world.prey(id).unwrap();
        assert!(!world.is_under_attack(id));
        assert_eq!(prey.health, prey.max_health);
        assert_eq!(world.last_report().released, 1);
    }

    #[test]
    fn test_move_octopus_is_immediate_and_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = World::new(&small_params(1, 1, 1, vec![]), &mut rng).unwrap();
        world.move_octopus(-3, 4);
        assert_eq!(world.predator().pos, GridPos::new(14, 7));
        world.move_octopus(100, -100);
        assert_eq!(world.predator().pos, GridPos::new(0, 19));

        let changed = world.update(&mut rng);
        assert_eq!(changed, vec![(19, 0)]);
        assert_eq!(world.render(19, 0).map(|g| g.symbol), Some(PREDATOR_GLYPH));
    }

    #[test]
    fn test_queued_move_waits_for_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = World::new(&small_params(1, 1, 1, vec![]), &mut rng).unwrap();
        world.update(&mut rng);
        world.queue_move(2, 0);
        assert_eq!(world.predator().pos, GridPos::new(10, 10));

        world.update(&mut rng);
        assert_eq!(world.predator().pos, GridPos::new(10, 12));
        // Grid still shows the pre-move cell until the following tick
        assert_eq!(world.at(10, 10), Occupant::Predator);
        world.update(&mut rng);
        assert_eq!(world.at(12, 10), Occupant::Predator);
        assert_eq!(world.at(10, 10), Occupant::Empty);
    }

    #[test]
    fn test_at_outside_grid_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut world = World::new(&small_params(1, 1, 1, vec![]), &mut rng).unwrap();
        world.update(&mut rng);
        assert_eq!(world.at(20, 0), Occupant::Empty);
        assert_eq!(world.at(0, 500), Occupant::Empty);
        assert!(world.render(99, 99).is_none());
    }

    struct Counter(Rc<RefCell<Vec<PreyId>>>);

    impl DepletionHook for Counter {
        fn prey_depleted(&mut self, prey: &Prey, _tick: u64) {
            self.0.borrow_mut().push(prey.id);
        }
    }

    #[test]
    fn test_depletion_hook_is_called() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut cluster = ClusterParams::new("*", 10, 11, 0, 1, 1);
        cluster.health = 5;
        let mut world = World::new(&small_params(1, 30, 3, vec![cluster]), &mut rng).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        world.set_depletion_hook(Box::new(Counter(Rc::clone(&seen))));

        for _ in 0..5 {
            world.update(&mut rng);
        }

        let prey = world.all_prey().next().unwrap();
        assert_eq!(prey.health, 5 - 3 * 5);
        assert_eq!(seen.borrow().as_slice(), &[prey.id]);
        // Depleted prey stay held and on the grid
        assert!(world.is_under_attack(prey.id));
        if prey.pos != world.predator().pos {
            assert_eq!(world.at(prey.pos.y as usize, prey.pos.x as usize), Occupant::Prey(prey.id));
        }
    }
}

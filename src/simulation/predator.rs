//! The octopus: tentacle allocation and combat
//!
//! Each tentacle slot is either empty or holds the id of one prey. Per tick
//! the predator applies any queued movement, lets go of prey that drifted out
//! of reach, greedily grabs the nearest free prey and then bites everything it
//! holds.

use tracing::debug;

use crate::simulation::params::PredatorParams;
use crate::simulation::prey::{all_prey, find_prey, find_prey_mut, Prey, PreyCluster};
use crate::simulation::types::{Bounds, GridPos, PreyId};

/// Glyph drawn for the predator
pub const PREDATOR_GLYPH: &str = "🐙";

/// Called when a held prey's health crosses from positive to zero or below.
///
/// Prey are never removed; this is where removal or scoring would plug in.
pub trait DepletionHook {
    fn prey_depleted(&mut self, prey: &Prey, tick: u64);
}

/// Default hook, records the event and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDepletion;

impl DepletionHook for LogDepletion {
    fn prey_depleted(&mut self, prey: &Prey, tick: u64) {
        debug!(tick, prey = prey.id.0, health = prey.health, "prey depleted");
    }
}

/// What happened to the tentacles during one update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TentacleReport {
    pub released: usize,
    pub grabbed: usize,
    pub attacked: usize,
}

/// The predator and its fixed set of tentacle slots.
#[derive(Clone, Debug)]
pub struct Predator {
    pub pos: GridPos,
    pub reach: u32,
    pub attack_power: i32,
    pub speed: u32,
    tentacles: Vec<Option<PreyId>>,
    /// Row/column delta applied at the start of the next update
    pending: (i32, i32),
}

impl Predator {
    pub fn new(params: &PredatorParams, pos: GridPos) -> Self {
        Predator {
            pos,
            reach: params.reach,
            attack_power: params.attack_power,
            speed: params.speed,
            tentacles: vec![None; params.tentacles],
            pending: (0, 0),
        }
    }

    /// Tentacle slots in slot order
    pub fn tentacles(&self) -> &[Option<PreyId>] {
        &self.tentacles
    }

    /// Number of slots currently holding prey
    pub fn held_count(&self) -> usize {
        self.tentacles.iter().filter(|t| t.is_some()).count()
    }

    /// True if any tentacle holds this prey
    pub fn is_holding(&self, id: PreyId) -> bool {
        self.tentacles.contains(&Some(id))
    }

    /// Inclusive reach check
    pub fn can_reach(&self, pos: GridPos) -> bool {
        let reach = self.reach as u64;
        self.pos.distance_sq(&pos) <= reach * reach
    }

    /// Shift position by a row/column delta right away
    pub fn shift(&mut self, drow: i32, dcol: i32, bounds: Bounds) {
        let target = self.pos.offset(drow, dcol);
        self.pos = bounds.clamp(target.x, target.y);
    }

    /// Accumulate a delta for the next update's reposition step
    pub fn queue_move(&mut self, drow: i32, dcol: i32) {
        self.pending.0 = self.pending.0.saturating_add(drow);
        self.pending.1 = self.pending.1.saturating_add(dcol);
    }

    pub fn pending_move(&self) -> (i32, i32) {
        self.pending
    }

    /// Run one tick of tentacle logic against the given clusters.
    pub fn update(
        &mut self,
        clusters: &mut [PreyCluster],
        bounds: Bounds,
        tick: u64,
        hook: &mut dyn DepletionHook,
    ) -> TentacleReport {
        let mut report = TentacleReport::default();

        // Reposition
        let (drow, dcol) = std::mem::take(&mut self.pending);
        if drow != 0 || dcol != 0 {
            self.shift(drow, dcol, bounds);
        }

        report.released = self.release_unreachable(clusters);
        report.grabbed = self.acquire(clusters);
        report.attacked = self.attack(clusters, tick, hook);
        report
    }

    /// Empty every slot whose prey is out of reach; released prey heal fully.
    fn release_unreachable(&mut self, clusters: &mut [PreyCluster]) -> usize {
        let mut released = 0;
        for index in 0..self.tentacles.len() {
            let Some(id) = self.tentacles[index] else {
                continue;
            };
            match find_prey_mut(clusters, id) {
                Some(prey) if self.can_reach(prey.pos) => {}
                Some(prey) => {
                    prey.health = prey.max_health;
                    self.tentacles[index] = None;
                    released += 1;
                }
                None => {
                    self.tentacles[index] = None;
                    released += 1;
                }
            }
        }
        released
    }

    /// Single greedy pass over reachable prey, nearest first.
    ///
    /// Equal distances are ordered by ascending prey id. Stops at the first
    /// unheld candidate that finds no free slot.
    fn acquire(&mut self, clusters: &[PreyCluster]) -> usize {
        let mut candidates: Vec<(u64, PreyId)> = all_prey(clusters)
            .filter(|p| self.can_reach(p.pos))
            .map(|p| (self.pos.distance_sq(&p.pos), p.id))
            .collect();
        candidates.sort_unstable();

        let mut grabbed = 0;
        for (_, id) in candidates {
            if self.is_holding(id) {
                continue;
            }
            match self.tentacles.iter_mut().find(|slot| slot.is_none()) {
                Some(slot) => {
                    *slot = Some(id);
                    grabbed += 1;
                }
                None => break,
            }
        }
        grabbed
    }

    /// Bite every held prey
    fn attack(&self, clusters: &mut [PreyCluster], tick: u64, hook: &mut dyn DepletionHook) -> usize {
        let mut attacked = 0;
        for id in self.tentacles.iter().flatten() {
            if let Some(prey) = find_prey_mut(clusters, *id) {
                let was_alive = !prey.is_depleted();
                prey.health = prey.health.saturating_sub(self.attack_power);
                attacked += 1;
                if was_alive && prey.is_depleted() {
                    hook.prey_depleted(prey, tick);
                }
            }
        }
        attacked
    }

    /// Prey currently held, in slot order
    pub fn held_prey<'a>(&'a self, clusters: &'a [PreyCluster]) -> impl Iterator<Item = &'a Prey> + 'a {
        self.tentacles
            .iter()
            .flatten()
            .filter_map(move |id| find_prey(clusters, *id))
    }
}

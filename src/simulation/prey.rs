//! Prey creatures and the clusters that own them

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::params::ClusterParams;
use crate::simulation::types::{Bounds, GridPos, PreyId};

static NEXT_PREY_ID: AtomicU32 = AtomicU32::new(0);

/// Hands out process-wide prey ids; never reuses one.
fn next_prey_id() -> PreyId {
    PreyId(NEXT_PREY_ID.fetch_add(1, Ordering::Relaxed))
}

/// A single grabbable creature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prey {
    pub id: PreyId,
    pub glyph: String,
    pub pos: GridPos,
    /// Nutritional worth. No rule reads it yet.
    pub value: u32,
    /// Current health. Not clamped at zero.
    pub health: i32,
    pub max_health: i32,
}

impl Prey {
    pub fn new(glyph: &str, pos: GridPos, value: u32, max_health: i32) -> Self {
        Prey {
            id: next_prey_id(),
            glyph: glyph.to_string(),
            pos,
            value,
            health: max_health,
            max_health,
        }
    }

    /// Move to a position, clamped into the grid
    pub fn move_to(&mut self, x: i32, y: i32, bounds: Bounds) {
        self.pos = bounds.clamp(x, y);
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0
    }
}

/// A fixed group of prey spawned around a center point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreyCluster {
    pub glyph: String,
    pub center: GridPos,
    pub radius: u32,
    pub value: u32,
    members: Vec<Prey>,
}

impl PreyCluster {
    /// Spawn a cluster, scattering members uniformly in the radius box.
    pub fn spawn<R: Rng>(params: &ClusterParams, bounds: Bounds, rng: &mut R) -> Self {
        let center = GridPos::new(params.center_x, params.center_y);
        let r = params.radius.min(i32::MAX as u32) as i32;

        let members = (0..params.count)
            .map(|_| {
                let x = center.x.saturating_add(rng.gen_range(-r..=r));
                let y = center.y.saturating_add(rng.gen_range(-r..=r));
                Prey::new(&params.glyph, bounds.clamp(x, y), params.value, params.health)
            })
            .collect();

        PreyCluster {
            glyph: params.glyph.clone(),
            center,
            radius: params.radius,
            value: params.value,
            members,
        }
    }

    /// Random walk: every member steps by -1, 0 or 1 on each axis.
    pub fn update<R: Rng>(&mut self, bounds: Bounds, rng: &mut R) {
        for prey in &mut self.members {
            let dx = rng.gen_range(-1..=1);
            let dy = rng.gen_range(-1..=1);
            prey.move_to(prey.pos.x + dx, prey.pos.y + dy, bounds);
        }
    }

    pub fn members(&self) -> &[Prey] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Prey] {
        &mut self.members
    }
}

/// Iterate every prey across a set of clusters
pub fn all_prey(clusters: &[PreyCluster]) -> impl Iterator<Item = &Prey> {
    clusters.iter().flat_map(|c| c.members.iter())
}

/// Find a prey by id across a set of clusters
pub fn find_prey(clusters: &[PreyCluster], id: PreyId) -> Option<&Prey> {
    all_prey(clusters).find(|p| p.id == id)
}

pub fn find_prey_mut(clusters: &mut [PreyCluster], id: PreyId) -> Option<&mut Prey> {
    clusters
        .iter_mut()
        .flat_map(|c| c.members.iter_mut())
        .find(|p| p.id == id)
}

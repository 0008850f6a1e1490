//! Configuration parameters for the farm simulation

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::error::FarmError;

/// Main configuration for a farm world.
///
/// `Default` is the reference layout: a 40x40 grid, an eight-armed octopus in
/// the middle and three schools of fish.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmParams {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    pub predator: PredatorParams,
    /// Prey clusters spawned at construction, in order
    pub clusters: Vec<ClusterParams>,
}

/// Predator configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorParams {
    /// Number of tentacle slots
    pub tentacles: usize,
    /// Maximum Euclidean distance at which prey can be grabbed and held
    pub reach: u32,
    /// Damage applied to every held prey per tick
    pub attack_power: i32,
    /// Maximum distance for a single validated protocol move
    pub speed: u32,
}

/// Prey cluster configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterParams {
    pub glyph: String,
    pub center_x: i32,
    pub center_y: i32,
    /// Half-width of the spawn box around the center
    pub radius: u32,
    /// Number of prey in the cluster
    pub count: usize,
    /// Nutritional value of each member
    pub value: u32,
    /// Starting and maximum health of each member
    #[serde(default = "default_prey_health")]
    pub health: i32,
}

fn default_prey_health() -> i32 {
    100
}

impl ClusterParams {
    pub fn new(glyph: &str, center_x: i32, center_y: i32, radius: u32, count: usize, value: u32) -> Self {
        ClusterParams {
            glyph: glyph.to_string(),
            center_x,
            center_y,
            radius,
            count,
            value,
            health: default_prey_health(),
        }
    }
}

impl Default for PredatorParams {
    fn default() -> Self {
        PredatorParams {
            tentacles: 8,
            reach: 12,
            attack_power: 1,
            speed: 5,
        }
    }
}

impl Default for FarmParams {
    fn default() -> Self {
        FarmParams {
            width: 40,
            height: 40,
            predator: PredatorParams::default(),
            clusters: vec![
                ClusterParams::new("🐟", 5, 5, 5, 5, 10),
                ClusterParams::new("🐠", 30, 15, 3, 5, 10),
                ClusterParams::new("🐡", 20, 30, 4, 10, 10),
            ],
        }
    }
}

impl FarmParams {
    /// Load parameters from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, FarmError> {
        let text = fs::read_to_string(path)?;
        let params: FarmParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject configurations that would produce a degenerate world.
    pub fn validate(&self) -> Result<(), FarmError> {
        if self.width == 0 || self.height == 0 {
            return Err(FarmError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(FarmError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.predator.tentacles == 0 {
            return Err(FarmError::NoTentacles);
        }
        if self.predator.attack_power < 0 {
            return Err(FarmError::NegativeAttack {
                attack_power: self.predator.attack_power,
            });
        }
        if let Some(bad) = self.clusters.iter().find(|c| c.health <= 0) {
            return Err(FarmError::InvalidHealth {
                glyph: bad.glyph.clone(),
                health: bad.health,
            });
        }
        Ok(())
    }

    /// Total number of prey the clusters will spawn
    pub fn prey_count(&self) -> usize {
        self.clusters.iter().map(|c| c.count).sum()
    }
}

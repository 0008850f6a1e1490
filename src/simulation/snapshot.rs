//! JSON wire types for hosting a farm behind a game service
//!
//! Field names and shapes follow the remote protocol (camelCase, prey ids as
//! strings, one entry per tentacle with `fishId: null` when empty). Only the
//! data types and their conversion from a `World` live here; there is no
//! transport.

use serde::{Deserialize, Serialize};

use crate::simulation::error::FarmError;
use crate::simulation::types::GridPos;
use crate::simulation::world::World;

/// Difficulty requested when creating a game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Test,
    #[default]
    Normal,
    Hard,
    Insane,
}

/// A request to create a new game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl NewGameRequest {
    pub fn from_json(text: &str) -> Result<Self, FarmError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn game_type(&self) -> GameType {
        self.game_type.unwrap_or_default()
    }
}

/// World state as sent to clients
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldData {
    pub width: usize,
    pub height: usize,
    pub moves: u64,
    /// Always zero, nothing scores yet
    pub score: u64,
    pub octopus: OctopusData,
    pub fish: Vec<FishData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OctopusData {
    pub x: i32,
    pub y: i32,
    pub speed: u32,
    pub reach: u32,
    pub attack: i32,
    pub tentacles: Vec<TentacleData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TentacleData {
    pub fish_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishData {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub value: u32,
    pub health: i32,
}

/// A proposed octopus position for the turn numbered `moves`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub moves: u64,
    pub octopus: OctopusPosition,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctopusPosition {
    pub x: i32,
    pub y: i32,
}

impl World {
    /// Export the current state in wire form
    pub fn snapshot(&self) -> WorldData {
        let predator = self.predator();
        WorldData {
            width: self.width(),
            height: self.height(),
            moves: self.moves(),
            score: 0,
            octopus: OctopusData {
                x: predator.pos.x,
                y: predator.pos.y,
                speed: predator.speed,
                reach: predator.reach,
                attack: predator.attack_power,
                tentacles: predator
                    .tentacles()
                    .iter()
                    .map(|slot| TentacleData {
                        fish_id: slot.map(|id| id.to_string()),
                    })
                    .collect(),
            },
            fish: self
                .all_prey()
                .map(|prey| FishData {
                    id: prey.id.to_string(),
                    x: prey.pos.x,
                    y: prey.pos.y,
                    value: prey.value,
                    health: prey.health,
                })
                .collect(),
        }
    }

    /// Apply a client move, placing the octopus at the proposed position.
    ///
    /// The move must be for the current turn and no farther than the
    /// octopus' speed. Targets off the grid are clamped.
    pub fn apply_move(&mut self, mv: &MoveData) -> Result<(), FarmError> {
        if mv.moves != self.moves() {
            return Err(FarmError::StaleMove {
                expected: self.moves(),
                got: mv.moves,
            });
        }

        let bounds = self.bounds();
        let predator = self.predator_mut();
        let target = GridPos::new(mv.octopus.x, mv.octopus.y);
        let distance = predator.pos.distance(&target);
        let speed = predator.speed as u64;
        if predator.pos.distance_sq(&target) > speed * speed {
            return Err(FarmError::MoveTooFar {
                distance,
                speed: predator.speed,
            });
        }

        predator.pos = bounds.clamp(target.x, target.y);
        Ok(())
    }
}

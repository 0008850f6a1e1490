//! Octopus farm simulation
//!
//! A predator with a fixed number of tentacles hunts wandering clusters of
//! prey on a bounded grid. The world advances one tick at a time and reports
//! which grid cells changed.
//!
//! # Module Structure
//!
//! - `types`: Ids, grid geometry and occupants
//! - `params`: World, predator and cluster configuration
//! - `prey`: Prey and their random-walking clusters
//! - `predator`: Tentacle allocation and combat
//! - `world`: Tick orchestration and change diffing
//! - `snapshot`: JSON wire types for fronting a world with a game service
//! - `error`: Construction and protocol errors
//!
//! # Usage
//!
//! ```ignore
//! use octofarm::simulation::{FarmParams, World};
//!
//! let mut world = World::new(&FarmParams::default(), &mut rng)?;
//! world.move_octopus(0, 1);
//! for (row, col) in world.update(&mut rng) {
//!     let glyph = world.render(row, col);
//! }
//! ```

pub mod types;
pub mod params;
pub mod prey;
pub mod predator;
pub mod world;
pub mod snapshot;
pub mod error;

pub use types::{Bounds, CellGlyph, GridPos, Occupant, PreyId};
pub use params::{ClusterParams, FarmParams, PredatorParams};
pub use prey::{Prey, PreyCluster};
pub use predator::{DepletionHook, LogDepletion, Predator, TentacleReport, PREDATOR_GLYPH};
pub use world::World;
pub use snapshot::{
    FishData, GameType, MoveData, NewGameRequest, OctopusData, OctopusPosition, TentacleData, WorldData,
};
pub use error::FarmError;

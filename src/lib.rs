//! Octopus farm simulation library
//!
//! Re-exports modules for use by the binary and tools.

pub mod explorer;
pub mod seeds;
pub mod simulation;
pub mod tilemap;

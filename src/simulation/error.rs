//! Errors surfaced by world construction, configuration and protocol moves

use thiserror::Error;

/// Errors raised by the farm simulation.
///
/// The tick, move and query paths never fail; these cover construction-time
/// misconfiguration, validated protocol moves and config loading.
#[derive(Debug, Error)]
pub enum FarmError {
    #[error("grid dimensions must be positive (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("grid of {width}x{height} does not fit signed 32-bit coordinates")]
    GridTooLarge { width: usize, height: usize },
    #[error("predator needs at least one tentacle")]
    NoTentacles,
    #[error("attack power must not be negative (got {attack_power})")]
    NegativeAttack { attack_power: i32 },
    #[error("cluster {glyph:?} must spawn prey with positive health (got {health})")]
    InvalidHealth { glyph: String, health: i32 },
    #[error("move targets turn {got} but the world is at turn {expected}")]
    StaleMove { expected: u64, got: u64 },
    #[error("cannot move {distance:.2} units, speed is {speed}")]
    MoveTooFar { distance: f64, speed: u32 },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

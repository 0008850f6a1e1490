//! Seed management for farm runs
//!
//! Spawning and movement draw from separate random streams, so a run with the
//! same master seed always starts from the same layout no matter how many
//! ticks are simulated or how the octopus is steered.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for each random stream of a farm run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarmSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Initial scatter of prey around their cluster centers
    pub spawn: u64,
    /// Per-tick prey random walk
    pub movement: u64,
}

impl FarmSeeds {
    /// Derive all sub-seeds deterministically from a master seed.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            spawn: derive_seed(master, "spawn"),
            movement: derive_seed(master, "movement"),
        }
    }

    pub fn spawn_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.spawn)
    }

    pub fn movement_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.movement)
    }
}

impl Default for FarmSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Derive a sub-seed from a master seed and a stream name.
///
/// FNV-1a over the little-endian master bytes followed by the stream name,
/// so a master seed maps to the same layout on every toolchain.
fn derive_seed(master: u64, stream: &str) -> u64 {
    master
        .to_le_bytes()
        .iter()
        .chain(stream.as_bytes())
        .fold(FNV_OFFSET, |hash, &byte| (hash ^ byte as u64).wrapping_mul(FNV_PRIME))
}

impl std::fmt::Display for FarmSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FarmSeeds {{ master: {}, spawn: {}, movement: {} }}",
            self.master, self.spawn, self.movement,
        )
    }
}

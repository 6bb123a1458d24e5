#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting tile spawn commands.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slide_game_core::{CellCoord, Command};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that picks a uniformly random empty cell after a changing slide.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits at most one spawn command based on the world's pending flag.
    ///
    /// Nothing is emitted when no spawn is pending or when the grid has no
    /// empty cell left. The selection draws directly from `empty_cells`, so it
    /// never retries and always terminates.
    pub fn handle(
        &mut self,
        spawn_pending: bool,
        empty_cells: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        if !spawn_pending {
            return;
        }

        if let Some(cell) = empty_cells.choose(&mut self.rng) {
            out.push(Command::SpawnTile { cell: *cell });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_full_grid() {
        let mut spawning = Spawning::new(Config::new(7));
        let mut commands = Vec::new();
        spawning.handle(true, &[], &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn ignores_unchanged_grid() {
        let mut spawning = Spawning::new(Config::new(7));
        let mut commands = Vec::new();
        spawning.handle(false, &[CellCoord::new(0, 0)], &mut commands);
        assert!(commands.is_empty());
    }
}

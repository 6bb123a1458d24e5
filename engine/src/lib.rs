#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid merge engine that drives the Slide Game world.
//!
//! [`Engine`] owns the authoritative [`World`] together with the spawning
//! system and exposes the synchronous call surface used by presentation
//! adapters. Every operation runs to completion before returning; callers are
//! expected to serialise their invocations.

use slide_game_core::{
    CellCoord, Command, DimensionError, Direction, Event, GridDimensions, GridSnapshot,
};
use slide_game_system_spawning::{self as spawning, Spawning};
use slide_game_world::{self as world, query, World};
use tracing::debug;

/// Configuration required to start a session.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    dimensions: GridDimensions,
    seed: u64,
}

impl Config {
    /// Creates a configuration for a grid of the provided dimensions.
    #[must_use]
    pub const fn new(dimensions: GridDimensions, seed: u64) -> Self {
        Self { dimensions, seed }
    }
}

/// Result of a single [`Engine::apply_move`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether any cell value differs from before the move.
    pub changed: bool,
    /// Values of the tiles produced by merges, in the order they happened.
    pub merged: Vec<u64>,
    /// Cell that received a fresh tile after the move, if any.
    pub spawned: Option<CellCoord>,
}

/// Single-session grid merge engine.
#[derive(Debug)]
pub struct Engine {
    world: World,
    spawning: Spawning,
}

impl Engine {
    /// Creates an engine and initialises its first grid.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut engine = Self {
            world: World::new(),
            spawning: Spawning::new(spawning::Config::new(config.seed)),
        };
        let _ = engine.initialize(config.dimensions);
        engine
    }

    /// Validates the raw dimensions and creates an engine.
    pub fn with_size(rows: u32, columns: u32, seed: u64) -> Result<Self, DimensionError> {
        let dimensions = GridDimensions::new(rows, columns)?;
        Ok(Self::new(Config::new(dimensions, seed)))
    }

    /// Replaces the grid with an empty one and spawns the first tile.
    pub fn initialize(&mut self, dimensions: GridDimensions) -> GridSnapshot {
        let _ = self.execute(Command::ConfigureGrid { dimensions });
        let spawned = self.maybe_spawn();
        debug!(%dimensions, ?spawned, "grid initialised");
        self.grid()
    }

    /// Starts a new session, possibly with different dimensions.
    pub fn reset(&mut self, dimensions: GridDimensions) -> GridSnapshot {
        debug!(%dimensions, "resetting session");
        self.initialize(dimensions)
    }

    /// Installs an explicit grid without spawning.
    pub fn load(&mut self, snapshot: GridSnapshot) {
        let _ = self.execute(Command::LoadGrid { snapshot });
    }

    /// Slides the grid toward `direction` and spawns a tile when it changed.
    ///
    /// Diagonal directions run both cardinal passes before the single spawn.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome {
            changed: false,
            merged: Vec::new(),
            spawned: None,
        };

        for event in self.execute(Command::Slide { direction }) {
            match event {
                Event::TilesMerged { value, .. } => outcome.merged.push(value),
                Event::Slid { changed, .. } => outcome.changed = changed,
                _ => {}
            }
        }

        outcome.spawned = self.maybe_spawn();
        outcome
    }

    /// Places a tile into a uniformly random empty cell if the last move changed the grid.
    ///
    /// Returns the cell that received the tile. A full grid is skipped silently.
    pub fn maybe_spawn(&mut self) -> Option<CellCoord> {
        let mut commands = Vec::new();
        self.spawning.handle(
            query::spawn_pending(&self.world),
            &query::empty_cells(&self.world),
            &mut commands,
        );

        let mut spawned = None;
        for command in commands {
            for event in self.execute(command) {
                if let Event::TileSpawned { cell } = event {
                    spawned = Some(cell);
                }
            }
        }
        spawned
    }

    /// Reports whether the grid is full and no neighbouring tiles match.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        query::is_terminal(&self.world)
    }

    /// Value stored at the provided position, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell_value(&self, row: u32, column: u32) -> Option<u64> {
        query::cell_value(&self.world, CellCoord::new(row, column))
    }

    /// Captures an owned copy of every cell value.
    #[must_use]
    pub fn grid(&self) -> GridSnapshot {
        query::grid_snapshot(&self.world)
    }

    /// Dimensions of the current grid.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        query::dimensions(&self.world)
    }

    /// Plain-text rendering of the grid, one row per line.
    #[must_use]
    pub fn dump(&self) -> String {
        self.grid().to_string()
    }

    /// Read-only access to the underlying world for bootstrap queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }
}

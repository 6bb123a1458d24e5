#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Slide Game.
//!
//! The world owns the tile grid and the spawn-pending flag. Every mutation is
//! expressed as a [`Command`] passed to [`apply`], which reports what happened
//! through [`Event`] values. Read access goes through the [`query`] module.

use slide_game_core::{
    Axis, CardinalDirection, CellCoord, Command, Event, GridDimensions, GridSnapshot, SpawnError,
    EMPTY, SPAWN_VALUE, WELCOME_BANNER,
};
use tracing::{debug, trace};

/// Represents the authoritative Slide Game world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: TileGrid,
    spawn_pending: bool,
}

impl World {
    /// Creates an empty world on the default board.
    ///
    /// No tile is present until the grid is configured and a spawn is applied.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: TileGrid::empty(GridDimensions::DEFAULT),
            spawn_pending: false,
        }
    }

    fn try_spawn(&mut self, cell: CellCoord) -> Result<(), SpawnError> {
        if !self.spawn_pending {
            return Err(SpawnError::NotPending);
        }

        let index = self
            .grid
            .dimensions
            .index(cell)
            .ok_or(SpawnError::OutOfBounds)?;
        let slot = self
            .grid
            .cells
            .get_mut(index)
            .ok_or(SpawnError::OutOfBounds)?;
        if *slot != EMPTY {
            return Err(SpawnError::Occupied);
        }

        *slot = SPAWN_VALUE;
        self.spawn_pending = false;
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { dimensions } => {
            world.grid = TileGrid::empty(dimensions);
            world.spawn_pending = true;
            debug!(%dimensions, "grid configured");
            out_events.push(Event::GridConfigured { dimensions });
        }
        Command::Slide { direction } => {
            let before = world.grid.cells.clone();
            let mut merge_count = 0_usize;

            for step in direction.steps() {
                let mut merged = Vec::new();
                world.grid.slide(*step, &mut merged);
                merge_count += merged.len();
                out_events.extend(merged.into_iter().map(|value| Event::TilesMerged {
                    direction: *step,
                    value,
                }));
            }

            let changed = world.grid.cells != before;
            world.spawn_pending = changed;
            debug!(?direction, changed, merge_count, "slide applied");
            trace!(board = %query::grid_snapshot(world), "grid after slide");
            out_events.push(Event::Slid { direction, changed });
        }
        Command::SpawnTile { cell } => match world.try_spawn(cell) {
            Ok(()) => {
                trace!(%cell, "tile spawned");
                out_events.push(Event::TileSpawned { cell });
            }
            Err(reason) => {
                debug!(%cell, ?reason, "spawn rejected");
                out_events.push(Event::SpawnRejected { cell, reason });
            }
        },
        Command::LoadGrid { snapshot } => {
            let dimensions = snapshot.dimensions();
            world.grid = TileGrid::from_snapshot(snapshot);
            world.spawn_pending = false;
            debug!(%dimensions, "grid loaded");
            out_events.push(Event::GridLoaded { dimensions });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use slide_game_core::{CardinalDirection, CellCoord, GridDimensions, GridSnapshot};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the current grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions
    }

    /// Value stored in the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell_value(world: &World, cell: CellCoord) -> Option<u64> {
        world.grid.value(cell)
    }

    /// Enumerates every empty cell in row-major order.
    #[must_use]
    pub fn empty_cells(world: &World) -> Vec<CellCoord> {
        world.grid.empty_cells()
    }

    /// Reports whether the most recent slide changed the grid and still awaits a spawn.
    #[must_use]
    pub fn spawn_pending(world: &World) -> bool {
        world.spawn_pending
    }

    /// Reports whether no further slide can change the grid.
    #[must_use]
    pub fn is_terminal(world: &World) -> bool {
        world.grid.is_terminal()
    }

    /// Reports whether sliding toward `direction` would leave the grid untouched.
    #[must_use]
    pub fn is_stable(world: &World, direction: CardinalDirection) -> bool {
        world.grid.is_stable(direction)
    }

    /// Captures an owned copy of every cell value.
    #[must_use]
    pub fn grid_snapshot(world: &World) -> GridSnapshot {
        world.grid.snapshot()
    }
}

#[derive(Clone, Debug)]
struct TileGrid {
    dimensions: GridDimensions,
    cells: Vec<u64>,
}

impl TileGrid {
    fn empty(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![EMPTY; dimensions.cell_count()],
        }
    }

    fn from_snapshot(snapshot: GridSnapshot) -> Self {
        Self {
            dimensions: snapshot.dimensions(),
            cells: snapshot.cells().to_vec(),
        }
    }

    fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::from_fn(self.dimensions, |cell| self.value(cell).unwrap_or(EMPTY))
    }

    fn value(&self, cell: CellCoord) -> Option<u64> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == EMPTY)
            .filter_map(|(index, _)| self.dimensions.cell_at(index))
            .collect()
    }

    fn line_count(&self, direction: CardinalDirection) -> usize {
        match direction.axis() {
            Axis::Rows => self.dimensions.rows() as usize,
            Axis::Columns => self.dimensions.columns() as usize,
        }
    }

    /// Cell indices of one line, ordered from the near edge to the far edge.
    fn line_indices(&self, direction: CardinalDirection, line: usize) -> Vec<usize> {
        let rows = self.dimensions.rows() as usize;
        let columns = self.dimensions.columns() as usize;
        let mut indices: Vec<usize> = match direction.axis() {
            Axis::Rows => (0..columns).map(|column| line * columns + column).collect(),
            Axis::Columns => (0..rows).map(|row| row * columns + line).collect(),
        };
        if direction.is_reversed() {
            indices.reverse();
        }
        indices
    }

    fn read_line(&self, indices: &[usize], line: &mut Vec<u64>) {
        line.clear();
        line.extend(indices.iter().map(|&index| self.cells[index]));
    }

    fn is_stable(&self, direction: CardinalDirection) -> bool {
        let mut line = Vec::new();
        (0..self.line_count(direction)).all(|index| {
            self.read_line(&self.line_indices(direction, index), &mut line);
            line_is_stable(&line)
        })
    }

    fn slide(&mut self, direction: CardinalDirection, merged: &mut Vec<u64>) {
        if self.is_stable(direction) {
            return;
        }

        let mut line = Vec::new();
        for index in 0..self.line_count(direction) {
            let indices = self.line_indices(direction, index);
            self.read_line(&indices, &mut line);
            settle_line(&mut line, merged);
            for (&cell, &value) in indices.iter().zip(line.iter()) {
                self.cells[cell] = value;
            }
        }
    }

    fn is_terminal(&self) -> bool {
        if self.cells.contains(&EMPTY) {
            return false;
        }

        let columns = self.dimensions.columns() as usize;
        let horizontal_pairs_differ = self
            .cells
            .chunks(columns)
            .all(|row| row.windows(2).all(|pair| pair[0] != pair[1]));
        let vertical_pairs_differ = self
            .cells
            .iter()
            .zip(self.cells.iter().skip(columns))
            .all(|(above, below)| above != below);
        horizontal_pairs_differ && vertical_pairs_differ
    }
}

/// A line is stable once no tile can move into an empty neighbour or merge with an equal one.
fn line_is_stable(line: &[u64]) -> bool {
    line.windows(2).all(|pair| {
        let (near, far) = (pair[0], pair[1]);
        far == EMPTY || (near != EMPTY && near != far)
    })
}

/// Repeats merge and compaction passes until the line is stable.
fn settle_line(line: &mut [u64], merged: &mut Vec<u64>) {
    while !line_is_stable(line) {
        merge_pass(line, merged);
        compact(line);
    }
}

/// Scans from the near edge, merging each equal adjacent pair once.
fn merge_pass(line: &mut [u64], merged: &mut Vec<u64>) {
    let mut index = 0;
    while index + 1 < line.len() {
        let value = line[index];
        if value != EMPTY && value == line[index + 1] {
            // staged grids can hold arbitrary values; the largest tile pins at u64::MAX
            line[index] = value.saturating_add(line[index + 1]);
            line[index + 1] = EMPTY;
            merged.push(line[index]);
            // the emptied far cell must not take part in another merge this pass
            index += 2;
        } else {
            index += 1;
        }
    }
}

/// Slides every tile toward the near edge, preserving order.
fn compact(line: &mut [u64]) {
    let mut next = 0;
    for index in 0..line.len() {
        let value = line[index];
        if value != EMPTY {
            line[index] = EMPTY;
            line[next] = value;
            next += 1;
        }
    }
}

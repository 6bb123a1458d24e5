#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Slide Game engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems query immutable views and respond exclusively with new
//! command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to SlideGame!";

/// Value of every freshly spawned tile.
pub const SPAWN_VALUE: u64 = 1;

/// Value stored in a cell that holds no tile.
pub const EMPTY: u64 = 0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with an empty grid of the provided dimensions.
    ConfigureGrid {
        /// Row and column counts of the new grid.
        dimensions: GridDimensions,
    },
    /// Slides and merges every tile toward the provided direction.
    Slide {
        /// Direction the tiles travel in.
        direction: Direction,
    },
    /// Requests that a fresh tile be placed into the provided cell.
    SpawnTile {
        /// Cell that should receive the tile.
        cell: CellCoord,
    },
    /// Installs an externally prepared grid, discarding the current one.
    LoadGrid {
        /// Cell values to install.
        snapshot: GridSnapshot,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that an empty grid with new dimensions was created.
    GridConfigured {
        /// Dimensions of the new grid.
        dimensions: GridDimensions,
    },
    /// Announces that an externally prepared grid replaced the current one.
    GridLoaded {
        /// Dimensions of the loaded grid.
        dimensions: GridDimensions,
    },
    /// Reports that two equal tiles combined during a slide.
    TilesMerged {
        /// Cardinal pass in which the merge happened.
        direction: CardinalDirection,
        /// Value of the tile produced by the merge.
        value: u64,
    },
    /// Confirms that a slide finished.
    Slid {
        /// Direction requested by the command.
        direction: Direction,
        /// Whether any cell value differs from before the slide.
        changed: bool,
    },
    /// Confirms that a fresh tile was placed.
    TileSpawned {
        /// Cell that received the tile.
        cell: CellCoord,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
}

/// The eight directions a player may slide the grid toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row zero.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
    /// [`Direction::Up`] followed by [`Direction::Left`].
    UpLeft,
    /// [`Direction::Up`] followed by [`Direction::Right`].
    UpRight,
    /// [`Direction::Down`] followed by [`Direction::Left`].
    DownLeft,
    /// [`Direction::Down`] followed by [`Direction::Right`].
    DownRight,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
    ];

    /// Cardinal passes that make up the direction, in execution order.
    ///
    /// Diagonal directions are two independent axis passes: the vertical pass
    /// runs to completion before the horizontal one starts, so diagonally
    /// adjacent tiles never merge directly.
    #[must_use]
    pub const fn steps(self) -> &'static [CardinalDirection] {
        match self {
            Self::Up => &[CardinalDirection::Up],
            Self::Down => &[CardinalDirection::Down],
            Self::Left => &[CardinalDirection::Left],
            Self::Right => &[CardinalDirection::Right],
            Self::UpLeft => &[CardinalDirection::Up, CardinalDirection::Left],
            Self::UpRight => &[CardinalDirection::Up, CardinalDirection::Right],
            Self::DownLeft => &[CardinalDirection::Down, CardinalDirection::Left],
            Self::DownRight => &[CardinalDirection::Down, CardinalDirection::Right],
        }
    }

    /// Reports whether the direction is composed of two cardinal passes.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.steps().len() > 1
    }
}

impl From<CardinalDirection> for Direction {
    fn from(direction: CardinalDirection) -> Self {
        match direction {
            CardinalDirection::Up => Self::Up,
            CardinalDirection::Down => Self::Down,
            CardinalDirection::Left => Self::Left,
            CardinalDirection::Right => Self::Right,
        }
    }
}

/// Primitive slide directions operating along a single axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    /// Tiles travel toward row zero, column by column.
    Up,
    /// Tiles travel toward the last row, column by column.
    Down,
    /// Tiles travel toward column zero, row by row.
    Left,
    /// Tiles travel toward the last column, row by row.
    Right,
}

impl CardinalDirection {
    /// Axis whose lines the direction compacts.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Rows,
            Self::Up | Self::Down => Axis::Columns,
        }
    }

    /// Whether the near edge sits at the high end of each line.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

/// Collection of lines a cardinal pass operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Every row is processed independently.
    Rows,
    /// Every column is processed independently.
    Columns,
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Validated row and column counts of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Smallest permitted number of rows or columns.
    pub const MIN_EXTENT: u32 = 2;
    /// Largest permitted number of rows or columns.
    pub const MAX_EXTENT: u32 = 100;
    /// Board used when no dimensions are configured.
    pub const DEFAULT: Self = Self {
        rows: 4,
        columns: 4,
    };

    /// Validates and creates a new set of grid dimensions.
    pub fn new(rows: u32, columns: u32) -> Result<Self, DimensionError> {
        let range = Self::MIN_EXTENT..=Self::MAX_EXTENT;
        if !range.contains(&rows) {
            return Err(DimensionError::Rows(rows));
        }
        if !range.contains(&columns) {
            return Err(DimensionError::Columns(columns));
        }
        Ok(Self { rows, columns })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Cell located at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = self.columns as usize;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(CellCoord::new(row, column))
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

#[derive(Deserialize)]
struct RawDimensions {
    rows: u32,
    columns: u32,
}

impl TryFrom<RawDimensions> for GridDimensions {
    type Error = DimensionError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.columns)
    }
}

/// Reasons grid dimensions may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// The row count lies outside the permitted range.
    #[error(
        "row count {0} is outside the supported range {min}..={max}",
        min = GridDimensions::MIN_EXTENT,
        max = GridDimensions::MAX_EXTENT
    )]
    Rows(u32),
    /// The column count lies outside the permitted range.
    #[error(
        "column count {0} is outside the supported range {min}..={max}",
        min = GridDimensions::MIN_EXTENT,
        max = GridDimensions::MAX_EXTENT
    )]
    Columns(u32),
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The most recent slide did not change the grid.
    NotPending,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds a tile.
    Occupied,
}

/// Owned copy of every cell value in a grid.
///
/// Rendering adapters read snapshots after each operation. The [`fmt::Display`]
/// implementation produces the plain-text dump: one line per row, cell values
/// separated by single spaces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct GridSnapshot {
    dimensions: GridDimensions,
    cells: Vec<u64>,
}

impl GridSnapshot {
    /// Captures a snapshot from row-major cell values.
    pub fn new(dimensions: GridDimensions, cells: Vec<u64>) -> Result<Self, SnapshotError> {
        if cells.len() != dimensions.cell_count() {
            return Err(SnapshotError::CellCount {
                expected: dimensions.cell_count(),
                actual: cells.len(),
            });
        }
        Ok(Self { dimensions, cells })
    }

    /// Captures a snapshot by evaluating `value` for every cell in row-major order.
    pub fn from_fn(dimensions: GridDimensions, mut value: impl FnMut(CellCoord) -> u64) -> Self {
        let mut cells = Vec::with_capacity(dimensions.cell_count());
        for row in 0..dimensions.rows() {
            for column in 0..dimensions.columns() {
                cells.push(value(CellCoord::new(row, column)));
            }
        }
        Self { dimensions, cells }
    }

    /// Builds a snapshot from a list of rows.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, SnapshotError> {
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let column_count = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != column_count)
        {
            return Err(SnapshotError::Ragged {
                row: index,
                expected: column_count,
                actual: row.len(),
            });
        }

        let column_count = u32::try_from(column_count).unwrap_or(u32::MAX);
        let dimensions = GridDimensions::new(row_count, column_count)?;
        let cells = rows.into_iter().flatten().collect();
        Self::new(dimensions, cells)
    }

    /// Dimensions of the captured grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Value stored in the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> Option<u64> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major view of every cell value.
    #[must_use]
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Iterator over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks(self.dimensions.columns() as usize)
    }

    /// Consumes the snapshot, yielding the rows as owned vectors.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<u64>> {
        self.rows().map(<[u64]>::to_vec).collect()
    }

    /// Number of cells that hold no tile.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|value| **value == EMPTY).count()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut values = row.iter();
            if let Some(first) = values.next() {
                write!(f, "{first}")?;
            }
            for value in values {
                write!(f, " {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    dimensions: GridDimensions,
    cells: Vec<u64>,
}

impl TryFrom<RawSnapshot> for GridSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.dimensions, raw.cells)
    }
}

/// Errors raised while assembling a [`GridSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The rows described a grid with unsupported dimensions.
    #[error(transparent)]
    Dimensions(#[from] DimensionError),
    /// A row contained a different number of cells than the first row.
    #[error("row {row} has {actual} cells but {expected} were expected")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Number of cells in the first row.
        expected: usize,
        /// Number of cells in the offending row.
        actual: usize,
    },
    /// The flat cell list does not match the dimensions.
    #[error("expected {expected} cells but received {actual}")]
    CellCount {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        CardinalDirection, CellCoord, DimensionError, Direction, GridDimensions, GridSnapshot,
        SnapshotError, SpawnError,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn dimensions_accept_inclusive_bounds() {
        assert!(GridDimensions::new(2, 2).is_ok());
        assert!(GridDimensions::new(100, 100).is_ok());
        assert!(GridDimensions::new(2, 100).is_ok());
    }

    #[test]
    fn dimensions_reject_out_of_range_values() {
        assert_eq!(GridDimensions::new(1, 4), Err(DimensionError::Rows(1)));
        assert_eq!(GridDimensions::new(0, 4), Err(DimensionError::Rows(0)));
        assert_eq!(GridDimensions::new(4, 101), Err(DimensionError::Columns(101)));
    }

    #[test]
    fn dimension_error_names_the_supported_range() {
        let message = DimensionError::Columns(101).to_string();
        assert_eq!(message, "column count 101 is outside the supported range 2..=100");
    }

    #[test]
    fn index_and_cell_at_agree() {
        let dimensions = GridDimensions::new(3, 5).expect("valid");
        let cell = CellCoord::new(2, 4);
        let index = dimensions.index(cell).expect("inside");
        assert_eq!(index, 14);
        assert_eq!(dimensions.cell_at(index), Some(cell));
        assert_eq!(dimensions.index(CellCoord::new(3, 0)), None);
        assert_eq!(dimensions.cell_at(15), None);
    }

    #[test]
    fn diagonal_directions_compose_vertical_then_horizontal() {
        assert_eq!(
            Direction::UpLeft.steps(),
            &[CardinalDirection::Up, CardinalDirection::Left]
        );
        assert_eq!(
            Direction::DownRight.steps(),
            &[CardinalDirection::Down, CardinalDirection::Right]
        );
        assert_eq!(Direction::Left.steps(), &[CardinalDirection::Left]);
        let diagonal = Direction::ALL
            .iter()
            .filter(|direction| direction.is_diagonal())
            .count();
        assert_eq!(diagonal, 4);
    }

    #[test]
    fn snapshot_display_prints_one_row_per_line() {
        let snapshot = GridSnapshot::from_rows(vec![vec![1, 0, 2], vec![0, 4, 0]]).expect("valid");
        assert_eq!(snapshot.to_string(), "1 0 2\n0 4 0\n");
    }

    #[test]
    fn snapshot_rejects_ragged_rows() {
        let error = GridSnapshot::from_rows(vec![vec![1, 0], vec![0]]).expect_err("ragged");
        assert_eq!(
            error,
            SnapshotError::Ragged {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn snapshot_rejects_degenerate_grids() {
        let error = GridSnapshot::from_rows(vec![vec![1, 0]]).expect_err("single row");
        assert_eq!(error, SnapshotError::Dimensions(DimensionError::Rows(1)));
        assert!(GridSnapshot::from_rows(Vec::new()).is_err());
    }

    #[test]
    fn snapshot_value_reads_row_major_cells() {
        let snapshot = GridSnapshot::from_rows(vec![vec![1, 2], vec![3, 4]]).expect("valid");
        assert_eq!(snapshot.value(CellCoord::new(1, 0)), Some(3));
        assert_eq!(snapshot.value(CellCoord::new(2, 0)), None);
        assert_eq!(snapshot.empty_count(), 0);
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let snapshot = GridSnapshot::from_rows(vec![vec![1, 0], vec![2, 8]]).expect("valid");
        assert_round_trip(&snapshot);
    }

    #[test]
    fn spawn_error_round_trips_through_bincode() {
        assert_round_trip(&SpawnError::Occupied);
    }

    #[test]
    fn deserializing_invalid_dimensions_fails() {
        let bytes = bincode::serialize(&(1_u32, 4_u32)).expect("serialize");
        let restored: Result<GridDimensions, _> = bincode::deserialize(&bytes);
        assert!(restored.is_err());
    }
}

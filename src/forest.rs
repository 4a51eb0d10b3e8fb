use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FireError, Result};
use crate::grid::{Grid, checked_xy};

/// State of a single forest cell. `Burned` is absorbing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Intact,
    Burning,
    Burned,
}

impl CellState {
    /// Display symbol used by the text renderer.
    pub fn symbol(self) -> char {
        match self {
            CellState::Intact => '.',
            CellState::Burning => 'F',
            CellState::Burned => 'c',
        }
    }
}

/// Ignition coordinate as read from configuration. Signed so that bad input
/// can be represented and rejected rather than wrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurningCell {
    pub row: i64,
    pub col: i64,
}

impl BurningCell {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        checked_xy(self.col, self.row, width, height).is_some()
    }
}

/// Per-state cell totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub intact: usize,
    pub burning: usize,
    pub burned: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.intact + self.burning + self.burned
    }
}

/// Largest accepted grid, counting a zero dimension as one so that a
/// 0 x huge grid cannot stand in for a huge row loop.
pub const MAX_CELLS: usize = 1 << 24;

/// Validate dimensions and convert them to `(height, width)`.
fn checked_dims(height: i64, width: i64) -> Option<(usize, usize)> {
    let h = usize::try_from(height).ok()?;
    let w = usize::try_from(width).ok()?;
    let span = h.max(1).checked_mul(w.max(1))?;
    (span <= MAX_CELLS).then_some((h, w))
}

/// The height x width cell matrix. Exclusively owned by whoever holds it;
/// a simulation step produces a new `Forest` instead of mutating this one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forest {
    cells: Grid<CellState>,
}

impl Forest {
    /// All cells start Intact, then every in-bounds ignition is set Burning.
    /// Out-of-bounds ignitions are skipped without writing anything.
    /// Negative dimensions and grids above `MAX_CELLS` are rejected.
    pub fn new(height: i64, width: i64, ignitions: &[BurningCell]) -> Result<Self> {
        let (h, w) =
            checked_dims(height, width).ok_or(FireError::InvalidDimensions { height, width })?;
        let mut forest = Self {
            cells: Grid::new(w, h),
        };
        for cell in ignitions {
            if !forest.set(cell.row, cell.col, CellState::Burning) {
                debug!(row = cell.row, col = cell.col, "ignition outside forest ignored");
            }
        }
        Ok(forest)
    }

    pub(crate) fn from_grid(cells: Grid<CellState>) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.cells.h
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.cells.w
    }

    /// Raw grid snapshot (x = column, y = row).
    pub fn cells(&self) -> &Grid<CellState> {
        &self.cells
    }

    pub fn get(&self, row: i64, col: i64) -> Option<CellState> {
        self.cells.try_get(col, row)
    }

    /// Write one cell. Returns false (and writes nothing) when out of bounds.
    pub fn set(&mut self, row: i64, col: i64, state: CellState) -> bool {
        match checked_xy(col, row, self.cells.w, self.cells.h) {
            Some((x, y)) => {
                self.cells.set(x, y, state);
                true
            }
            None => false,
        }
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for &cell in &self.cells.data {
            match cell {
                CellState::Intact => counts.intact += 1,
                CellState::Burning => counts.burning += 1,
                CellState::Burned => counts.burned += 1,
            }
        }
        counts
    }

    /// True when no cell is burning. Vacuously true for an empty forest.
    pub fn is_fire_out(&self) -> bool {
        !self.cells.data.contains(&CellState::Burning)
    }
}

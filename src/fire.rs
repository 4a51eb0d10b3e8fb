#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::forest::{CellState, Counts, Forest};
use crate::grid::{Grid, neighbors4};
use crate::rng::{Rng, hash2, unit_f32};

/// Uniform draws in [0, 1) for one step, addressed by cell.
///
/// Implementations must be pure per (row, col) within a step so that the
/// result does not depend on scan order.
pub trait RandomSource: Sync {
    fn sample(&self, row: usize, col: usize) -> f32;
}

/// Counter-based source: hashes the cell coordinate with a per-step seed.
#[derive(Clone, Copy, Debug)]
pub struct StepNoise {
    seed: u32,
}

impl StepNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl RandomSource for StepNoise {
    #[inline]
    fn sample(&self, row: usize, col: usize) -> f32 {
        unit_f32(hash2(col as u32, row as u32, self.seed))
    }
}

/// Clamp into [0, 1]. NaN becomes 0.
pub fn clamp_probability(p: f32) -> f32 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[inline]
fn next_state<R: RandomSource + ?Sized>(
    cells: &Grid<CellState>,
    x: usize,
    y: usize,
    p: f32,
    source: &R,
) -> CellState {
    match cells.get(x, y) {
        CellState::Burning | CellState::Burned => CellState::Burned,
        CellState::Intact => {
            let exposed = neighbors4(x, y, cells.w, cells.h)
                .any(|(nx, ny)| cells.get(nx, ny) == CellState::Burning);
            // Strict: draws are in [0, 1), so p = 0 never ignites and p = 1 always does.
            if exposed && source.sample(y, x) < p {
                CellState::Burning
            } else {
                CellState::Intact
            }
        }
    }
}

/// One synchronous automaton step. Reads only `forest` and writes a fresh
/// buffer, so every cell sees the same generation of its neighbors.
pub fn step<R: RandomSource + ?Sized>(forest: &Forest, p: f32, source: &R) -> Forest {
    let cells = forest.cells();
    let w = cells.w;
    let mut next = Grid::<CellState>::new(w, cells.h);

    let fill = |(y, row): (usize, &mut [CellState])| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = next_state(cells, x, y, p, source);
        }
    };

    #[cfg(feature = "parallel")]
    next.data.par_chunks_mut(w.max(1)).enumerate().for_each(fill);
    #[cfg(not(feature = "parallel"))]
    next.data.chunks_mut(w.max(1)).enumerate().for_each(fill);

    Forest::from_grid(next)
}

/// Owns the forest, the propagation probability and the run's RNG.
///
/// The RNG is seeded exactly once here; each step takes one value from it to
/// key that step's `StepNoise`.
#[derive(Clone, Debug)]
pub struct FireSimulator {
    forest: Forest,
    probability: f32,
    rng: Rng,
    steps: usize,
}

impl FireSimulator {
    pub fn new(forest: Forest, probability: f32, seed: u64) -> Self {
        let clamped = clamp_probability(probability);
        if clamped != probability {
            warn!(probability, clamped, "propagation probability outside [0, 1], clamped");
        }
        Self {
            forest,
            probability: clamped,
            rng: Rng::new(seed),
            steps: 0,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// Number of steps applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn counts(&self) -> Counts {
        self.forest.counts()
    }

    pub fn is_fire_out(&self) -> bool {
        self.forest.is_fire_out()
    }

    /// Apply one step and swap the new buffer in.
    pub fn advance(&mut self) {
        let noise = StepNoise::new(self.rng.next_u32());
        self.forest = step(&self.forest, self.probability, &noise);
        self.steps += 1;
        debug!(step = self.steps, "advanced");
    }

    /// Step until nothing burns. `observe` sees every burning state and then
    /// the final one. Returns the step at which the fire went out.
    pub fn run<F>(&mut self, mut observe: F) -> usize
    where
        F: FnMut(usize, &Forest),
    {
        while !self.forest.is_fire_out() {
            observe(self.steps, &self.forest);
            self.advance();
        }
        observe(self.steps, &self.forest);
        self.steps
    }
}

use serde::Serialize;

use crate::Setup;
use crate::forest::{Counts, Forest};

/// Render the forest as text: one line per row, one symbol per cell.
pub fn render(forest: &Forest) -> String {
    let cells = forest.cells();
    let mut out = String::with_capacity((cells.w + 1) * cells.h);
    for y in 0..cells.h {
        for x in 0..cells.w {
            out.push(cells.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

/// Share of burned cells among non-burning cells, in percent.
/// An empty forest reports 0%.
pub fn burned_percentage(counts: &Counts) -> f64 {
    let denom = counts.intact + counts.burned;
    if denom == 0 {
        return 0.0;
    }
    counts.burned as f64 * 100.0 / denom as f64
}

/// Live counts while the fire burns, the burned share once it is out.
pub fn status_line(counts: &Counts) -> String {
    if counts.burning != 0 {
        format!(
            "Intact: {:3}, Burning: {:3}, Burned: {:3}",
            counts.intact, counts.burning, counts.burned
        )
    } else {
        format!("{:3.2}% of the forest burned.", burned_percentage(counts))
    }
}

pub fn header(setup: &Setup) -> String {
    format!(
        "Height: {} Width: {}\n\
         Initially burning cells: {:2}\n\
         Propagation probability: {:3.2}%\n\
         Out-of-range cells: {:2}\n",
        setup.height,
        setup.width,
        setup.ignitions,
        setup.propagation_probability as f64 * 100.0,
        setup.out_of_range
    )
}

/// Serializable snapshot of one step.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub step: usize,
    pub counts: Counts,
    pub rows: Vec<String>,
}

impl Frame {
    pub fn capture(step: usize, forest: &Forest) -> Self {
        Self {
            step,
            counts: forest.counts(),
            rows: render(forest).lines().map(str::to_owned).collect(),
        }
    }
}

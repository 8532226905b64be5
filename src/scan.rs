use smallvec::SmallVec;

use crate::grid::{Cell, Grid};
use crate::MAX_RUN_LENGTH;

/// The vertical run crossing a query cell, as seen from that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerticalRun {
    /// Topmost row of the run.
    pub start_row: usize,

    /// Number of cells in the run.
    pub length: usize,

    /// Letters already filled anywhere in the run, top to bottom. Open cells contribute nothing.
    pub letters: SmallVec<[char; MAX_RUN_LENGTH]>,

    /// How many of `letters` sit above the query row.
    pub letters_above: usize,

    /// Number of run cells strictly below the query row.
    pub down_count: usize,
}

impl VerticalRun {
    /// Filled letters above the query row, which any word for this run has to start with.
    pub fn prefix(&self) -> &[char] {
        &self.letters[..self.letters_above]
    }
}

/// Count the open cells starting at `(row, col)` and running right, stopping at the first blocked
/// or filled cell or the edge of the grid.
pub fn horizontal_run_length(grid: &Grid, row: usize, col: usize) -> usize {
    if row >= grid.rows() {
        return 0;
    }

    (col..grid.cols()).take_while(|&c| grid.cell(row, c).is_open()).count()
}

/// Describe the vertical run through `(row, col)`: walk up to the top of the run, then down to
/// the bottom collecting letters.
pub fn vertical_run_info(grid: &Grid, row: usize, col: usize) -> VerticalRun {
    let mut start_row = row;
    while start_row > 0 && !grid.is_blocked(start_row - 1, col) {
        start_row -= 1;
    }

    let mut run = VerticalRun {
        start_row,
        length: 0,
        letters: SmallVec::new(),
        letters_above: 0,
        down_count: 0,
    };

    let mut current_row = start_row;
    while current_row < grid.rows() && !grid.is_blocked(current_row, col) {
        if let Cell::Filled(letter) = grid.cell(current_row, col) {
            run.letters.push(letter);
            if current_row < row {
                run.letters_above += 1;
            }
        }
        if current_row > row {
            run.down_count += 1;
        }
        run.length += 1;
        current_row += 1;
    }

    run
}

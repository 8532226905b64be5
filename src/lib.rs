//! Scan-and-repair crossword filling.
//!
//! A [`Grid`] of blocked and open cells is filled row by row from a length-indexed [`WordBank`].
//! Each horizontal run gets the first shuffled candidate whose letters still leave every crossing
//! vertical run with at least one viable word; when no candidate fits, the engine clears the
//! across entries crossing the run, returns them to the bank and rescans from the topmost row it
//! disturbed.

pub mod answers;
pub mod fill;
pub mod grid;
pub mod patterns;
pub mod scan;
pub mod validate;
pub mod word_bank;

pub use answers::{extract_answers, Answer, Direction, NumberedAnswers};
pub use fill::{
    find_fill, repair, ClearedRun, FillConfig, FillEngine, FillFailure, FillOutcome, FillState,
    FillStatus, FillSuccess, NoSolutionFound, Placement, RepairReport, Statistics,
};
pub use grid::{Cell, Grid, GridError, PlacementError};
pub use patterns::Pattern;
pub use scan::{horizontal_run_length, vertical_run_info, VerticalRun};
pub use validate::accepts;
pub use word_bank::{WordBank, WordEntry, WordListError};

/// The expected maximum length for a single run. Longer runs still work, they just spill the
/// per-run buffers onto the heap.
pub const MAX_RUN_LENGTH: usize = 21;

/// Score given to words handed back to the bank by a repair, replacing whatever they were loaded
/// with.
pub const RECYCLE_SCORE: i32 = 50;

/// Words must score strictly above this to be placed or to vouch for a crossing run.
pub const DEFAULT_SCORE_THRESHOLD: i32 = 25;

/// How many repairs a fill attempt may perform before giving up.
pub const DEFAULT_MAX_REPAIRS: usize = 10_000;

/// Zero-indexed (row, col) coordinates for a cell, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Minimum quality a word needs before the engine will consider it.
///
/// The comparison is strict: a word whose score equals the threshold is ineligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreThreshold(pub i32);

impl ScoreThreshold {
    pub fn admits(self, score: i32) -> bool {
        score > self.0
    }
}

impl Default for ScoreThreshold {
    fn default() -> Self {
        ScoreThreshold(DEFAULT_SCORE_THRESHOLD)
    }
}

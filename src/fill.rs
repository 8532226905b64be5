use bit_set::BitSet;
use instant::{Duration, Instant};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::grid::{Cell, Grid};
use crate::scan::{horizontal_run_length, vertical_run_info};
use crate::validate::accepts;
use crate::word_bank::{WordBank, WordEntry};
use crate::{ScoreThreshold, DEFAULT_MAX_REPAIRS, DEFAULT_SCORE_THRESHOLD, RECYCLE_SCORE};

/// Settings for a single fill attempt.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Words must score strictly above this to be placed or to vouch for a crossing.
    pub score_threshold: ScoreThreshold,

    /// Score given to words a repair hands back to the bank.
    pub recycle_score: i32,

    /// Give up after this many repairs. The repair step has no cycle detection, so without a limit
    /// an unlucky word bank can keep the engine busy forever.
    pub max_repairs: Option<usize>,

    /// Give up once this much time has passed since the engine was created.
    pub time_limit: Option<Duration>,
}

impl Default for FillConfig {
    fn default() -> Self {
        FillConfig {
            score_threshold: ScoreThreshold(DEFAULT_SCORE_THRESHOLD),
            recycle_score: RECYCLE_SCORE,
            max_repairs: Some(DEFAULT_MAX_REPAIRS),
            time_limit: None,
        }
    }
}

/// Why an attempt ended without filling the grid. None of these are bugs; the caller can retry
/// with another seed, a lower threshold or a different word bank.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NoSolutionFound {
    #[error("the scan finished with open cells left")]
    Exhausted,

    #[error("gave up after {0} repairs")]
    ExceededRepairLimit(usize),

    #[error("gave up after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    Filled,
    Failed(NoSolutionFound),
}

impl FillStatus {
    pub fn is_success(self) -> bool {
        self == FillStatus::Filled
    }
}

/// Where the engine is. `Scanning` looks for the next open run starting at the cursor,
/// `Repairing` undoes the across entries crossing a run that had no acceptable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Scanning { row: usize, col: usize },
    Repairing { row: usize, col: usize, length: usize },
    Done(FillStatus),
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub states: u64,
    pub placements: u64,
    pub repairs: u64,
    pub recycled_words: u64,
    pub duration: Duration,
}

/// An across entry the engine placed, and the bank entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub entry: WordEntry,
}

/// An across entry removed from the grid by a repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRun {
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// What a call to [`repair`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Every row in which a filled cell was found.
    pub touched_rows: BitSet,
    pub cleared: Vec<ClearedRun>,
}

impl RepairReport {
    /// The row scanning should restart from: the topmost row that was disturbed, if any.
    pub fn resume_row(&self) -> Option<usize> {
        self.touched_rows.iter().next()
    }
}

/// Undo the across entries crossing the run of `length` cells at `(row, col)`.
///
/// For each column of the run, walk from the bottom of its vertical run up to the first block,
/// clearing the horizontal run of every filled cell met on the way. Cleared words go back into
/// `bank` with `recycle_score`. This isn't chronological backtracking: it throws away every across
/// entry that could be constraining the run, however long ago it was placed.
pub fn repair(
    grid: &mut Grid,
    bank: &mut WordBank,
    row: usize,
    col: usize,
    length: usize,
    recycle_score: i32,
) -> RepairReport {
    let mut report = RepairReport::default();

    for run_col in col..col + length {
        let down_count = vertical_run_info(grid, row, run_col).down_count;

        for scan_row in (0..=row + down_count).rev() {
            match grid.cell(scan_row, run_col) {
                Cell::Blocked => break,
                Cell::Open => {}
                Cell::Filled(_) => {
                    report.touched_rows.insert(scan_row);

                    let start_col = grid.horizontal_run_start(scan_row, run_col);
                    let removed = grid.clear_horizontal_run(scan_row, run_col);
                    if !removed.is_empty() {
                        bank.reinsert(removed.chars().count(), &removed, recycle_score);
                        report.cleared.push(ClearedRun { row: scan_row, col: start_col, text: removed });
                    }
                }
            }
        }
    }

    report
}

/// A struct representing the results of a fill attempt, successful or not.
#[derive(Debug)]
pub struct FillOutcome {
    pub status: FillStatus,
    pub grid: Grid,
    pub bank: WordBank,
    pub placements: Vec<Placement>,
    pub statistics: Statistics,
}

#[derive(Debug)]
pub struct FillSuccess {
    pub grid: Grid,
    pub placements: Vec<Placement>,
    pub statistics: Statistics,
}

/// A failed attempt, along with the partially filled grid it left behind.
#[derive(Debug, Error)]
#[error("no fill found: {reason}")]
pub struct FillFailure {
    pub reason: NoSolutionFound,
    pub grid: Grid,
    pub statistics: Statistics,
}

impl FillOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_result(self) -> Result<FillSuccess, FillFailure> {
        match self.status {
            FillStatus::Filled => Ok(FillSuccess {
                grid: self.grid,
                placements: self.placements,
                statistics: self.statistics,
            }),
            FillStatus::Failed(reason) => Err(FillFailure {
                reason,
                grid: self.grid,
                statistics: self.statistics,
            }),
        }
    }
}

/// The fill state machine. It owns the grid, the word bank and the random source for the length
/// of one attempt.
pub struct FillEngine<R: Rng> {
    grid: Grid,
    bank: WordBank,
    config: FillConfig,
    rng: R,
    state: FillState,
    placements: Vec<Placement>,
    statistics: Statistics,
    start: Instant,
    deadline: Option<Instant>,
}

impl<R: Rng> FillEngine<R> {
    pub fn new(grid: Grid, bank: WordBank, config: FillConfig, rng: R) -> FillEngine<R> {
        let start = Instant::now();
        let deadline = config.time_limit.map(|limit| start + limit);

        FillEngine {
            grid,
            bank,
            config,
            rng,
            state: FillState::Scanning { row: 0, col: 0 },
            placements: vec![],
            statistics: Statistics::default(),
            start,
            deadline,
        }
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Perform one transition and return the new state. Once `Done`, stepping does nothing.
    pub fn step(&mut self) -> FillState {
        if let FillState::Done(_) = self.state {
            return self.state;
        }

        self.statistics.states += 1;

        self.state = match (self.state, self.deadline) {
            (_, Some(deadline)) if Instant::now() >= deadline => {
                let limit = self.config.time_limit.unwrap_or_default();
                FillState::Done(FillStatus::Failed(NoSolutionFound::Timeout(limit)))
            }
            (FillState::Scanning { row, col }, _) => self.scan(row, col),
            (FillState::Repairing { row, col, length }, _) => self.repair_run(row, col, length),
            (done @ FillState::Done(_), _) => done,
        };

        self.statistics.duration = self.start.elapsed();
        self.state
    }

    /// Step until done.
    pub fn run(mut self) -> FillOutcome {
        let status = loop {
            if let FillState::Done(status) = self.step() {
                break status;
            }
        };

        log::info!(
            "fill finished: {:?} after {} placements, {} repairs in {:?}",
            status,
            self.statistics.placements,
            self.statistics.repairs,
            self.statistics.duration,
        );

        FillOutcome {
            status,
            grid: self.grid,
            bank: self.bank,
            placements: self.placements,
            statistics: self.statistics,
        }
    }

    fn scan(&mut self, row: usize, col: usize) -> FillState {
        if row >= self.grid.rows() {
            return self.finish();
        }
        if col >= self.grid.cols() {
            return FillState::Scanning { row: row + 1, col: 0 };
        }

        let length = horizontal_run_length(&self.grid, row, col);
        if length == 0 {
            return FillState::Scanning { row, col: col + 1 };
        }

        let threshold = self.config.score_threshold;
        self.bank.candidates_of(length).shuffle(&mut self.rng);

        let chosen = self.bank.bucket(length).iter().position(|entry| {
            threshold.admits(entry.score) &&
                accepts(&self.grid, &entry.text, row, col, &self.bank, threshold)
        });

        match chosen {
            Some(idx) => {
                let entry = self.bank.take(length, idx);
                log::trace!("placed {} at ({}, {})", entry.text, row, col);

                self.grid.place(&entry.text, row, col);
                self.placements.push(Placement { row, col, entry });
                self.statistics.placements += 1;

                FillState::Scanning { row, col: col + length }
            }
            None => FillState::Repairing { row, col, length },
        }
    }

    fn repair_run(&mut self, row: usize, col: usize, length: usize) -> FillState {
        if let Some(max_repairs) = self.config.max_repairs {
            if self.statistics.repairs >= max_repairs as u64 {
                return FillState::Done(
                    FillStatus::Failed(NoSolutionFound::ExceededRepairLimit(max_repairs))
                );
            }
        }
        self.statistics.repairs += 1;

        let report = repair(
            &mut self.grid,
            &mut self.bank,
            row,
            col,
            length,
            self.config.recycle_score,
        );
        self.statistics.recycled_words += report.cleared.len() as u64;
        self.placements.retain(|placement| {
            !report.cleared.iter().any(|cleared| {
                cleared.row == placement.row && cleared.col == placement.col
            })
        });

        match report.resume_row() {
            Some(resume_row) => {
                log::debug!(
                    "no word fits {} cells at ({}, {}); cleared {:?}, resuming at row {}",
                    length,
                    row,
                    col,
                    report.cleared.iter().map(|cleared| cleared.text.as_str()).collect::<Vec<_>>(),
                    resume_row,
                );
                FillState::Scanning { row: resume_row, col: 0 }
            }

            // Nothing above the run to undo, so rescanning would fail the same way.
            None => {
                log::debug!("no word fits {} cells at ({}, {}) and nothing to undo", length, row, col);
                self.finish()
            }
        }
    }

    fn finish(&self) -> FillState {
        if self.grid.is_fully_filled() {
            FillState::Done(FillStatus::Filled)
        } else {
            FillState::Done(FillStatus::Failed(NoSolutionFound::Exhausted))
        }
    }
}

/// Fill `grid` from `bank`, shuffling candidates with a generator seeded from `seed`.
pub fn find_fill(
    grid: Grid,
    bank: WordBank,
    config: &FillConfig,
    seed: u64,
) -> Result<FillSuccess, FillFailure> {
    FillEngine::new(grid, bank, config.clone(), StdRng::seed_from_u64(seed))
        .run()
        .into_result()
}

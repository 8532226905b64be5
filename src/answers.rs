use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::grid::{Cell, Grid, OPEN};
use crate::GridCoord;

/// Direction that a run is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

/// A numbered entry, with zero-indexed start coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub number: usize,
    pub row: usize,
    pub col: usize,
    pub text: String,
}

/// The numbered across and down entries of a grid, each sorted by start position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumberedAnswers {
    pub across: Vec<Answer>,
    pub down: Vec<Answer>,
}

impl Display for NumberedAnswers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Across")?;
        for answer in &self.across {
            writeln!(f, "  {}. {}", answer.number, answer.text)?;
        }
        writeln!(f)?;
        writeln!(f, "Down")?;
        for answer in &self.down {
            writeln!(f, "  {}. {}", answer.number, answer.text)?;
        }
        Ok(())
    }
}

/// Collect every run longer than one cell in the given direction, as start coordinates plus
/// text. Open cells show up as `.`.
fn collect_runs(grid: &Grid, direction: Direction) -> Vec<(GridCoord, String)> {
    let (line_count, line_length) = match direction {
        Direction::Across => (grid.rows(), grid.cols()),
        Direction::Down => (grid.cols(), grid.rows()),
    };
    let coord = |line: usize, pos: usize| -> GridCoord {
        match direction {
            Direction::Across => (line, pos),
            Direction::Down => (pos, line),
        }
    };

    let mut runs = vec![];

    for line in 0..line_count {
        let mut pos = 0;
        while pos < line_length {
            let (row, col) = coord(line, pos);
            if grid.is_blocked(row, col) {
                pos += 1;
                continue;
            }

            let start = (row, col);
            let mut text = String::new();
            while pos < line_length {
                let (row, col) = coord(line, pos);
                match grid.cell(row, col) {
                    Cell::Blocked => break,
                    Cell::Open => text.push(OPEN),
                    Cell::Filled(letter) => text.push(letter),
                }
                pos += 1;
            }

            if text.chars().count() > 1 {
                runs.push((start, text));
            }
        }
    }

    runs.sort_by_key(|&(start, _)| start);
    runs
}

/// Number the grid's entries the usual way: every distinct start cell, in reading order, gets the
/// next number, and an across and a down entry starting in the same cell share it.
pub fn extract_answers(grid: &Grid) -> NumberedAnswers {
    let across = collect_runs(grid, Direction::Across);
    let down = collect_runs(grid, Direction::Down);

    let mut numbers: BTreeMap<GridCoord, usize> =
        across.iter().chain(&down).map(|&(start, _)| (start, 0)).collect();
    for (idx, number) in numbers.values_mut().enumerate() {
        *number = idx + 1;
    }

    let number_runs = |runs: Vec<(GridCoord, String)>| -> Vec<Answer> {
        runs.into_iter().map(|((row, col), text)| {
            Answer { number: numbers[&(row, col)], row, col, text }
        }).collect()
    };

    NumberedAnswers {
        across: number_runs(across),
        down: number_runs(down),
    }
}

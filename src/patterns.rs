//! Named black-square layouts. Each lists only one half of its blocks; [`Grid::new`] adds the
//! rotated counterparts.

use crate::grid::{Grid, GridError};
use crate::GridCoord;

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub name: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub blocked: &'static [GridCoord],
}

impl Pattern {
    pub fn build(&self) -> Result<Grid, GridError> {
        Grid::new(self.rows, self.cols, self.blocked)
    }
}

pub const PRESETS: &[Pattern] = &[
    Pattern {
        name: "classic",
        rows: 15,
        cols: 15,
        blocked: &[
            (0, 3), (1, 3), (2, 3),
            (0, 7),
            (0, 11), (1, 11), (2, 11),
            (3, 4), (3, 5), (3, 10), (3, 9),
            (4, 0), (4, 1), (4, 2),
            (4, 6), (4, 7), (4, 8),
            (4, 12), (4, 13), (4, 14),
            (6, 3), (7, 3), (8, 3),
            (5, 7), (6, 7), (7, 7), (8, 7), (9, 7),
        ],
    },
    Pattern {
        name: "monday",
        rows: 15,
        cols: 16,
        blocked: &[
            (0, 3), (0, 4),
            (1, 4), (2, 4),
            (3, 5),
            (0, 11), (1, 11),
            (3, 9), (3, 10),
            (4, 14), (4, 15),
            (5, 0), (5, 1), (5, 2),
            (5, 7), (5, 8),
            (5, 12),
            (6, 6), (6, 11),
        ],
    },
    Pattern {
        name: "wednesday",
        rows: 15,
        cols: 15,
        blocked: &[
            (0, 5), (0, 6), (0, 10),
            (1, 5), (1, 10),
            (2, 10),
            (3, 0), (3, 1), (3, 9),
            (4, 4),
            (5, 5), (5, 6), (5, 7), (5, 8), (5, 12), (5, 13), (5, 14),
            (6, 3), (6, 10),
        ],
    },
    Pattern { name: "mini", rows: 5, cols: 7, blocked: &[(0, 3)] },
    Pattern { name: "square4", rows: 4, cols: 4, blocked: &[] },
    Pattern { name: "square5", rows: 5, cols: 5, blocked: &[] },
];

/// Look up a preset by name.
pub fn find(name: &str) -> Option<&'static Pattern> {
    PRESETS.iter().find(|pattern| pattern.name == name)
}

use std::fmt::{Debug, Display, Formatter};

use thiserror::Error;

use crate::GridCoord;

/// Character used for blocked cells in templates and rendered output.
pub const BLOCK: char = '#';

/// Character used for open cells in templates and rendered output.
pub const OPEN: char = '.';

/// The state of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blocked,
    Open,
    Filled(char),
}

impl Cell {
    pub fn is_blocked(self) -> bool {
        self == Cell::Blocked
    }

    pub fn is_open(self) -> bool {
        self == Cell::Open
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Filled(letter) => Some(letter),
            _ => None,
        }
    }

    fn glyph(self) -> char {
        match self {
            Cell::Blocked => BLOCK,
            Cell::Open => OPEN,
            Cell::Filled(letter) => letter,
        }
    }
}

/// Errors building a grid from a pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("blocked cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },

    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    ZeroSized { rows: usize, cols: usize },

    #[error("template line {line}: {message}")]
    Template { line: usize, message: String },
}

/// Why a word can't be written at a given position. Placement is only ever requested by the fill
/// engine after scanning, so hitting one of these means the scan logic is broken.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("row {row} is outside a grid with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("{word:?} at column {col} overflows a row of {cols} cells")]
    Overflow { word: String, col: usize, cols: usize },

    #[error("cell ({row}, {col}) is blocked")]
    Blocked { row: usize, col: usize },

    #[error("cell ({row}, {col}) already holds {existing:?}, can't write {letter:?}")]
    Conflict { row: usize, col: usize, existing: char, letter: char },
}

/// A rectangular crossword grid. Dimensions are fixed at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("cells", &self.rows_as_strings())
            .finish()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rows_as_strings().join("\n"))
    }
}

impl Grid {
    /// Build an open grid with the given blocked cells plus their 180-degree rotations. Every
    /// coordinate is mirrored, so callers only need to supply one half of a symmetric pattern.
    pub fn new(rows: usize, cols: usize, blocked: &[GridCoord]) -> Result<Grid, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::ZeroSized { rows, cols });
        }

        let mut grid = Grid { rows, cols, cells: vec![Cell::Open; rows * cols] };

        for &(row, col) in blocked {
            if row >= rows || col >= cols {
                return Err(GridError::OutOfBounds { row, col, rows, cols });
            }

            let idx = grid.index(row, col);
            grid.cells[idx] = Cell::Blocked;
            let mirror_idx = grid.index(rows - 1 - row, cols - 1 - col);
            grid.cells[mirror_idx] = Cell::Blocked;
        }

        Ok(grid)
    }

    /// Build a grid from a string template, with `.` representing open cells and `#` representing
    /// blocks. The template is taken literally, without mirroring.
    pub fn from_template(template: &str) -> Result<Grid, GridError> {
        let mut cells: Vec<Cell> = vec![];
        let mut cols: Option<usize> = None;
        let mut rows = 0;

        for (line_idx, line) in template.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let row_cells = line.chars().map(|glyph| match glyph {
                BLOCK => Ok(Cell::Blocked),
                OPEN => Ok(Cell::Open),
                other => Err(GridError::Template {
                    line: line_idx + 1,
                    message: format!("unexpected character {other:?}"),
                }),
            }).collect::<Result<Vec<Cell>, GridError>>()?;

            match cols {
                Some(expected) if expected != row_cells.len() => {
                    return Err(GridError::Template {
                        line: line_idx + 1,
                        message: format!("expected {expected} cells, found {}", row_cells.len()),
                    });
                }
                Some(_) => {}
                None => cols = Some(row_cells.len()),
            }

            cells.extend(row_cells);
            rows += 1;
        }

        match cols {
            Some(cols) => Ok(Grid { rows, cols, cells }),
            None => Err(GridError::ZeroSized { rows: 0, cols: 0 }),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at the given position. Panics if the position is outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) is outside the grid");
        self.cells[self.index(row, col)]
    }

    pub fn is_blocked(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_blocked()
    }

    /// Check whether `word` can be written across starting at `(row, col)`: it must fit in the row
    /// and every target cell must be open or already hold the same letter.
    pub fn check_placement(&self, word: &str, row: usize, col: usize) -> Result<(), PlacementError> {
        if row >= self.rows {
            return Err(PlacementError::RowOutOfBounds { row, rows: self.rows });
        }
        if col + word.chars().count() > self.cols {
            return Err(PlacementError::Overflow { word: word.to_string(), col, cols: self.cols });
        }

        for (offset, letter) in word.chars().enumerate() {
            match self.cell(row, col + offset) {
                Cell::Open => {}
                Cell::Filled(existing) if existing == letter => {}
                Cell::Filled(existing) => {
                    return Err(PlacementError::Conflict { row, col: col + offset, existing, letter });
                }
                Cell::Blocked => return Err(PlacementError::Blocked { row, col: col + offset }),
            }
        }

        Ok(())
    }

    /// Write `word` across starting at `(row, col)`.
    ///
    /// Panics if the placement is invalid (see [`Grid::check_placement`]); carrying on would leave
    /// the grid silently corrupted.
    pub fn place(&mut self, word: &str, row: usize, col: usize) {
        if let Err(err) = self.check_placement(word, row, col) {
            panic!("invalid placement: {err}");
        }

        for (offset, letter) in word.chars().enumerate() {
            let idx = self.index(row, col + offset);
            self.cells[idx] = Cell::Filled(letter);
        }
    }

    /// Column where the horizontal run containing `(row, col)` begins.
    pub fn horizontal_run_start(&self, row: usize, col: usize) -> usize {
        let mut start_col = col;
        while start_col > 0 && !self.is_blocked(row, start_col - 1) {
            start_col -= 1;
        }
        start_col
    }

    /// Reset every filled cell in the horizontal run containing `(row, col)` to open, returning the
    /// removed letters from left to right. Returns an empty string for blocked cells and runs
    /// without letters.
    pub fn clear_horizontal_run(&mut self, row: usize, col: usize) -> String {
        if self.is_blocked(row, col) {
            return String::new();
        }

        let mut removed = String::new();
        let mut end_col = self.horizontal_run_start(row, col);
        while end_col < self.cols && !self.is_blocked(row, end_col) {
            let idx = self.index(row, end_col);
            if let Cell::Filled(letter) = self.cells[idx] {
                removed.push(letter);
                self.cells[idx] = Cell::Open;
            }
            end_col += 1;
        }

        removed
    }

    /// True when no cell is left open.
    pub fn is_fully_filled(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_open())
    }

    /// Do blocked cells have 180-degree rotational symmetry?
    pub fn is_symmetric(&self) -> bool {
        (0..self.rows).all(|row| {
            (0..self.cols).all(|col| {
                self.is_blocked(row, col) ==
                    self.is_blocked(self.rows - 1 - row, self.cols - 1 - col)
            })
        })
    }

    /// Render each row as a string, with `#` for blocks and `.` for open cells.
    pub fn rows_as_strings(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Cell, Grid, GridError, PlacementError};

    #[test]
    fn test_new_mirrors_blocked_cells() {
        let grid = Grid::new(5, 7, &[(0, 3), (1, 0), (2, 6)]).unwrap();

        assert!(grid.is_blocked(0, 3));
        assert!(grid.is_blocked(4, 3));
        assert!(grid.is_blocked(3, 6));
        assert!(grid.is_blocked(2, 0));
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_symmetry_holds_for_every_preset_shape() {
        let shapes: Vec<(usize, usize, Vec<(usize, usize)>)> = vec![
            (1, 1, vec![]),
            (4, 4, vec![(0, 0), (1, 2)]),
            (15, 16, vec![(0, 3), (5, 12), (6, 6), (7, 7)]),
            (3, 8, vec![(1, 1), (2, 7)]),
        ];

        for (rows, cols, blocked) in shapes {
            let grid = Grid::new(rows, cols, &blocked).unwrap();
            for row in 0..rows {
                for col in 0..cols {
                    assert_eq!(
                        grid.is_blocked(row, col),
                        grid.is_blocked(rows - 1 - row, cols - 1 - col),
                    );
                }
            }
        }
    }

    #[test]
    fn test_new_rejects_out_of_bounds_block() {
        assert_eq!(
            Grid::new(3, 3, &[(1, 3)]),
            Err(GridError::OutOfBounds { row: 1, col: 3, rows: 3, cols: 3 }),
        );
        assert_eq!(Grid::new(0, 3, &[]), Err(GridError::ZeroSized { rows: 0, cols: 3 }));
    }

    #[test]
    fn test_place_writes_letters_and_keeps_blocks() {
        let mut grid = Grid::new(3, 5, &[(0, 0)]).unwrap();
        grid.place("ODE", 1, 1);

        assert_eq!(grid.cell(1, 1), Cell::Filled('O'));
        assert_eq!(grid.cell(1, 2), Cell::Filled('D'));
        assert_eq!(grid.cell(1, 3), Cell::Filled('E'));
        assert_eq!(grid.cell(1, 0), Cell::Open);
        assert_eq!(grid.cell(1, 3).letter(), Some('E'));
        assert_eq!(grid.cell(1, 4).letter(), None);
        assert_eq!(grid.cell(0, 0).letter(), None);
        assert!(grid.is_blocked(0, 0));
        assert!(grid.is_blocked(2, 4));
    }

    #[test]
    fn test_place_over_matching_letters() {
        let mut grid = Grid::new(1, 4, &[]).unwrap();
        grid.place("AB", 0, 0);
        grid.place("ABCD", 0, 0);

        assert_eq!(grid.to_string(), "ABCD");
    }

    #[test]
    fn test_check_placement_reports_problems() {
        let mut grid = Grid::new(2, 4, &[(0, 3)]).unwrap();
        grid.place("CAT", 0, 0);

        assert_eq!(
            grid.check_placement("COT", 0, 0),
            Err(PlacementError::Conflict { row: 0, col: 1, existing: 'A', letter: 'O' }),
        );
        assert_eq!(
            grid.check_placement("CATS", 0, 0),
            Err(PlacementError::Blocked { row: 0, col: 3 }),
        );
        assert_eq!(
            grid.check_placement("ABCD", 0, 0),
            Err(PlacementError::Conflict { row: 0, col: 0, existing: 'C', letter: 'A' }),
        );
        assert_eq!(grid.check_placement("CAT", 0, 0), Ok(()));
        assert_eq!(
            grid.check_placement("ABC", 1, 2),
            Err(PlacementError::Overflow { word: "ABC".to_string(), col: 2, cols: 4 }),
        );
        assert_eq!(
            grid.check_placement("AB", 2, 0),
            Err(PlacementError::RowOutOfBounds { row: 2, rows: 2 }),
        );
    }

    #[test]
    #[should_panic(expected = "invalid placement")]
    fn test_place_panics_on_conflict() {
        let mut grid = Grid::new(1, 3, &[]).unwrap();
        grid.place("CAT", 0, 0);
        grid.place("DOG", 0, 0);
    }

    #[test]
    #[should_panic(expected = "invalid placement")]
    fn test_place_panics_on_overflow() {
        let mut grid = Grid::new(1, 3, &[]).unwrap();
        grid.place("CATS", 0, 0);
    }

    /// ..#..
    /// .....
    /// ..#..
    #[test]
    fn test_clear_horizontal_run_from_middle() {
        let mut grid = Grid::new(3, 5, &[(0, 2)]).unwrap();
        grid.place("AB", 0, 0);
        grid.place("CD", 0, 3);
        grid.place("EFGHI", 1, 0);

        assert_eq!(grid.clear_horizontal_run(1, 3), "EFGHI");
        assert_eq!(grid.clear_horizontal_run(0, 4), "CD");
        assert_eq!(grid.clear_horizontal_run(0, 4), "");
        assert_eq!(grid.clear_horizontal_run(0, 2), "");

        assert_eq!(grid.to_string(), "AB#..\n.....\n..#..");
    }

    #[test]
    fn test_is_fully_filled() {
        let mut grid = Grid::new(2, 2, &[(0, 0)]).unwrap();
        assert!(!grid.is_fully_filled());

        grid.place("A", 0, 1);
        grid.place("B", 1, 0);
        assert!(grid.is_fully_filled());

        let blocked_only = Grid::new(1, 1, &[(0, 0)]).unwrap();
        assert!(blocked_only.is_fully_filled());
    }

    #[test]
    fn test_from_template() {
        let grid = Grid::from_template(
            "
            #....
            .....
            ....#
            ",
        ).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert!(grid.is_blocked(0, 0));
        assert!(grid.is_blocked(2, 4));
        assert!(grid.is_symmetric());
        assert_eq!(grid.to_string(), "#....\n.....\n....#");
    }

    #[test]
    fn test_from_template_rejects_bad_input() {
        assert!(matches!(
            Grid::from_template("..\n.a"),
            Err(GridError::Template { line: 2, .. })
        ));
        assert!(matches!(
            Grid::from_template("...\n.."),
            Err(GridError::Template { line: 2, .. })
        ));
        assert!(matches!(Grid::from_template("  \n"), Err(GridError::ZeroSized { .. })));
    }

    #[test]
    fn test_asymmetric_template_is_detected() {
        let grid = Grid::from_template("#..\n...\n...").unwrap();
        assert!(!grid.is_symmetric());
    }
}

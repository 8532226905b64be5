use smallvec::SmallVec;

use crate::grid::Grid;
use crate::scan::vertical_run_info;
use crate::word_bank::WordBank;
use crate::{ScoreThreshold, MAX_RUN_LENGTH};

/// Would writing `word` across at `(row, col)` leave every vertical run it crosses with at least
/// one eligible word in `bank`?
///
/// For each letter, the probe is the crossing run's filled letters above `row` followed by that
/// letter, and some entry of the run's length scoring above `threshold` must start with it. The
/// first failing letter rejects the word.
///
/// Row 0 is accepted unconditionally. Nothing above it can constrain a crossing run yet, though a
/// run that can't take the letter at all still isn't caught there.
pub fn accepts(
    grid: &Grid,
    word: &str,
    row: usize,
    col: usize,
    bank: &WordBank,
    threshold: ScoreThreshold,
) -> bool {
    if row == 0 {
        return true;
    }

    word.chars().enumerate().all(|(offset, letter)| {
        let run = vertical_run_info(grid, row, col + offset);

        let mut probe: SmallVec<[char; MAX_RUN_LENGTH]> = SmallVec::from_slice(run.prefix());
        probe.push(letter);

        bank.bucket(run.length).iter().any(|entry| {
            threshold.admits(entry.score) && starts_with(&entry.text, &probe)
        })
    })
}

fn starts_with(text: &str, probe: &[char]) -> bool {
    let mut chars = text.chars();
    probe.iter().all(|&letter| chars.next() == Some(letter))
}

#[cfg(test)]
mod tests {
    use crate::grid::Grid;
    use crate::validate::accepts;
    use crate::word_bank::WordBank;
    use crate::ScoreThreshold;

    #[test]
    fn test_top_row_is_always_accepted() {
        let grid = Grid::new(4, 4, &[]).unwrap();
        let empty = WordBank::new();

        assert!(accepts(&grid, "ZZZZ", 0, 0, &empty, ScoreThreshold(1000)));
        assert!(accepts(&grid, "Q", 0, 3, &empty, ScoreThreshold(0)));
    }

    /// ACID
    /// ....
    /// ....
    /// ....
    #[test]
    fn test_checks_each_crossing_prefix() {
        let mut grid = Grid::new(4, 4, &[]).unwrap();
        grid.place("ACID", 0, 0);
        let bank = WordBank::from_entries([
            ("ARTS", 60), ("COAT", 60), ("IDLE", 60), ("DEEP", 60), ("RODE", 60),
        ]);

        assert!(accepts(&grid, "RODE", 1, 0, &bank, ScoreThreshold(35)));
        // `CX` isn't the start of any four-letter word.
        assert!(!accepts(&grid, "RXDE", 1, 0, &bank, ScoreThreshold(35)));
        assert!(!accepts(&grid, "ROSE", 1, 0, &bank, ScoreThreshold(35)));
    }

    #[test]
    fn test_low_scoring_words_dont_count() {
        let mut grid = Grid::new(2, 2, &[]).unwrap();
        grid.place("AB", 0, 0);
        let bank = WordBank::from_entries([("AC", 20), ("BD", 80)]);

        assert!(accepts(&grid, "CD", 1, 0, &bank, ScoreThreshold(10)));
        assert!(!accepts(&grid, "CD", 1, 0, &bank, ScoreThreshold(20)));
    }

    /// #..
    /// ...
    /// ..#
    #[test]
    fn test_run_starting_on_the_query_row() {
        let mut grid = Grid::new(3, 3, &[(0, 0)]).unwrap();
        grid.place("AT", 0, 1);
        let bank = WordBank::from_entries([("ON", 50), ("ARE", 50), ("TE", 50)]);

        // Column 0 starts at row 1, so only the candidate's own letter is probed there.
        assert!(accepts(&grid, "ORE", 1, 0, &bank, ScoreThreshold(35)));
        assert!(!accepts(&grid, "NRE", 1, 0, &bank, ScoreThreshold(35)));
    }

    #[test]
    fn test_crossing_without_bucket_rejects() {
        let mut grid = Grid::new(3, 2, &[]).unwrap();
        grid.place("AB", 0, 0);
        let bank = WordBank::from_entries([("CD", 90)]);

        assert!(!accepts(&grid, "CD", 1, 0, &bank, ScoreThreshold(0)));
    }
}

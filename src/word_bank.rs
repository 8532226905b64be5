use std::collections::HashSet;
use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A word that can be placed in the grid, along with its quality score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub score: i32,
}

impl WordEntry {
    pub fn new<S: Into<String>>(text: S, score: i32) -> WordEntry {
        WordEntry { text: text.into(), score }
    }

    /// Length in cells, which is the number of chars rather than bytes.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Problems reading a `word;score` word list.
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("line {line}: expected `word;score`, found {text:?}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: invalid score {text:?}")]
    Score {
        line: usize,
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("line {line}: score {score} is negative")]
    NegativeScore { line: usize, score: i32 },

    #[error("couldn't read word list {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Word entries indexed by length. Every entry in the bucket for length `n` has `n` chars.
///
/// Bucket order carries no meaning, and the fill engine shuffles buckets freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBank {
    buckets: Vec<Vec<WordEntry>>,
}

impl WordBank {
    pub fn new() -> WordBank {
        WordBank::default()
    }

    /// Build a bank from in-memory `(text, score)` pairs, keeping them as given.
    pub fn from_entries<I, S>(entries: I) -> WordBank
        where
            I: IntoIterator<Item=(S, i32)>,
            S: Into<String>,
    {
        let mut bank = WordBank::new();
        for (text, score) in entries {
            let entry = WordEntry::new(text, score);
            bank.candidates_of(entry.len()).push(entry);
        }
        bank
    }

    /// Parse a word list with one `word;score` record per line. Words are trimmed and upper-cased;
    /// blank lines are skipped and repeated words keep their first score.
    pub fn parse(contents: &str) -> Result<WordBank, WordListError> {
        let mut bank = WordBank::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (line_idx, raw_line) in contents.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let (word, score_str) = line.split_once(';').ok_or_else(|| {
                WordListError::Malformed { line: line_idx + 1, text: line.to_string() }
            })?;
            let word = word.trim().to_uppercase();
            if word.is_empty() {
                return Err(WordListError::Malformed { line: line_idx + 1, text: line.to_string() });
            }

            let score_str = score_str.trim();
            let score: i32 = score_str.parse().map_err(|source| WordListError::Score {
                line: line_idx + 1,
                text: score_str.to_string(),
                source,
            })?;
            if score < 0 {
                return Err(WordListError::NegativeScore { line: line_idx + 1, score });
            }

            if seen.insert(word.clone()) {
                let entry = WordEntry::new(word, score);
                bank.candidates_of(entry.len()).push(entry);
            }
        }

        Ok(bank)
    }

    /// Read and parse a `word;score` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<WordBank, WordListError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| WordListError::Io { path: path.to_path_buf(), source })?;

        let bank = WordBank::parse(&contents)?;
        log::debug!("loaded {} words from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// The mutable bucket for `length`, created empty if nothing of that length exists yet.
    /// Callers may reorder it.
    pub fn candidates_of(&mut self, length: usize) -> &mut Vec<WordEntry> {
        if self.buckets.len() <= length {
            self.buckets.resize_with(length + 1, Vec::new);
        }
        &mut self.buckets[length]
    }

    /// The entries of length `length`, or an empty slice.
    pub fn bucket(&self, length: usize) -> &[WordEntry] {
        self.buckets.get(length).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove one entry whose text equals `text`. Does nothing if there is none.
    pub fn remove(&mut self, length: usize, text: &str) -> Option<WordEntry> {
        let bucket = self.buckets.get_mut(length)?;
        let idx = bucket.iter().position(|entry| entry.text == text)?;
        Some(bucket.remove(idx))
    }

    /// Remove the entry at `idx` in the bucket for `length`. This is how the fill engine takes the
    /// exact candidate it chose, without matching on text.
    pub fn take(&mut self, length: usize, idx: usize) -> WordEntry {
        self.buckets[length].remove(idx)
    }

    /// Append a new entry. Used to hand words cleared by a repair back to the bank.
    pub fn reinsert(&mut self, length: usize, text: &str, score: i32) {
        debug_assert_eq!(text.chars().count(), length, "{text:?} doesn't have length {length}");
        self.candidates_of(length).push(WordEntry::new(text, score));
    }

    /// Total number of entries across all lengths.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many entries have the given text.
    pub fn count(&self, text: &str) -> usize {
        self.bucket(text.chars().count()).iter().filter(|entry| entry.text == text).count()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use crate::word_bank::{WordBank, WordEntry, WordListError};

    #[test]
    fn test_parse_indexes_by_length() {
        let bank = WordBank::parse(
            "
            acid;50
            rode;40

            at;30
            spreadthewordlist;60
            ",
        ).unwrap();

        assert_eq!(bank.len(), 4);
        assert_eq!(bank.bucket(4), &[WordEntry::new("ACID", 50), WordEntry::new("RODE", 40)]);
        assert_eq!(bank.bucket(2), &[WordEntry::new("AT", 30)]);
        assert_eq!(bank.bucket(17).len(), 1);
        assert!(bank.bucket(3).is_empty());
        assert!(bank.bucket(99).is_empty());
    }

    #[test]
    fn test_parse_keeps_first_of_repeated_words() {
        let bank = WordBank::parse("tale;50\nTALE;10\ntale ; 20").unwrap();

        assert_eq!(bank.bucket(4), &[WordEntry::new("TALE", 50)]);
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        assert!(matches!(
            WordBank::parse("acid;50\nrode"),
            Err(WordListError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            WordBank::parse("acid;50\n\nrode;high"),
            Err(WordListError::Score { line: 3, .. })
        ));
        assert!(matches!(
            WordBank::parse("acid;-5"),
            Err(WordListError::NegativeScore { line: 1, score: -5 })
        ));
        assert!(matches!(WordBank::parse(";5"), Err(WordListError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_remove_takes_exactly_one_entry() {
        let mut bank = WordBank::from_entries([("STEP", 60), ("STEP", 50), ("TALE", 60)]);

        assert_eq!(bank.remove(4, "STEP"), Some(WordEntry::new("STEP", 60)));
        assert_eq!(bank.count("STEP"), 1);
        assert_eq!(bank.remove(4, "DEEP"), None);
        assert_eq!(bank.remove(9, "DEEP"), None);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_take_and_reinsert() {
        let mut bank = WordBank::from_entries([("ARTS", 60), ("COAT", 70)]);

        let taken = bank.take(4, 1);
        assert_eq!(taken, WordEntry::new("COAT", 70));
        assert_eq!(taken.len(), 4);
        assert!(!taken.is_empty());
        assert!(WordEntry::new("", 0).is_empty());

        bank.reinsert(4, "COAT", 50);
        assert_eq!(bank.bucket(4), &[WordEntry::new("ARTS", 60), WordEntry::new("COAT", 50)]);
    }

    #[test]
    fn test_shuffling_a_bucket_keeps_its_entries() {
        let mut bank = WordBank::from_entries(
            ["ACID", "RODE", "TALE", "STEP", "ARTS", "COAT"].iter().map(|&word| (word, 100))
        );
        let mut before: Vec<String> = bank.bucket(4).iter().map(|e| e.text.clone()).collect();

        bank.candidates_of(4).shuffle(&mut StdRng::seed_from_u64(7));
        let mut after: Vec<String> = bank.bucket(4).iter().map(|e| e.text.clone()).collect();

        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(bank.candidates_of(12).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "idle;45").unwrap();
        writeln!(file, "deep;55").unwrap();

        let bank = WordBank::load(file.path()).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.count("DEEP"), 1);

        assert!(matches!(
            WordBank::load(file.path().with_extension("missing")),
            Err(WordListError::Io { .. })
        ));
    }
}

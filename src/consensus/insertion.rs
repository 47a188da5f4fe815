//! Local consensus for bases inserted after a reference position.

use super::alphabet::{ModeDescriptor, FILLER};
use super::allele::AlleleTable;
use super::caller::call_column;
use super::{ConsensusError, Result};

const MAX_LENGTH_DIGITS: usize = 3;

/// Thresholds applied to each offset of an insertion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionParams {
    pub min_coverage: usize,
    pub min_freq: f64,
    /// Offsets supported by fewer reads end the run.
    pub n_insert_threshold: usize,
}

/// An observation is an insertion token when it reads `<base>+<len><bases>`.
pub fn is_insertion(observation: &str) -> bool {
    let bytes = observation.as_bytes();
    bytes.len() > 2 && bytes[1] == b'+'
}

/// Returns the inserted bases of an insertion token, i.e. everything after
/// the 1-3 digit length prefix.
pub fn inserted_bases(observation: &str) -> Result<&[u8]> {
    if !is_insertion(observation) {
        return Err(ConsensusError::Format(format!(
            "not an insertion token: {}",
            observation
        )));
    }
    let tail = &observation.as_bytes()[2..];
    let digits = tail.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || digits > MAX_LENGTH_DIGITS {
        return Err(ConsensusError::Format(format!(
            "insertion token without a 1-{} digit length: {}",
            MAX_LENGTH_DIGITS, observation
        )));
    }
    Ok(&tail[digits..])
}

/// One row per read carrying an insertion, right-padded with `*` to the
/// longest insertion in the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertionMatrix {
    rows: Vec<Vec<u8>>,
    width: usize,
}

impl InsertionMatrix {
    /// Every insertion token adds one row, so a token seen on k reads adds k
    /// identical rows.
    pub fn build<S: AsRef<str>>(observations: &[S]) -> Result<Self> {
        let mut rows = Vec::new();
        let mut width = 0;
        for observation in observations {
            let observation = observation.as_ref();
            if !is_insertion(observation) {
                continue;
            }
            let row = inserted_bases(observation)?.to_ascii_uppercase();
            width = width.max(row.len());
            rows.push(row);
        }

        for row in rows.iter_mut() {
            row.resize(width, FILLER);
        }

        Ok(InsertionMatrix { rows, width })
    }

    /// Number of reads carrying an insertion.
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn column(&self, offset: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(move |row| row[offset])
    }

    /// Calls each offset left to right within the mode's alphabet. Offsets
    /// below `min_coverage` are lowercased; the run stops at the first offset
    /// below `n_insert_threshold` instead of emitting `n`.
    pub fn collapse(&self, mode: &ModeDescriptor, params: &InsertionParams) -> String {
        let mut inserted = String::new();
        for offset in 0..self.width {
            let table = AlleleTable::from_symbols(self.column(offset)).restrict(mode.alphabet);
            let coverage = table.coverage();
            if coverage < params.n_insert_threshold {
                break;
            }
            let symbol = call_column(&table, mode, params.min_freq);
            if coverage < params.min_coverage {
                inserted.push(symbol.to_ascii_lowercase() as char);
            } else {
                inserted.push(symbol as char);
            }
        }
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::alphabet::ConsensusMode;

    fn params(min_coverage: usize) -> InsertionParams {
        InsertionParams {
            min_coverage,
            min_freq: 0.05,
            n_insert_threshold: 2,
        }
    }

    #[test]
    fn detect_insertion_tokens() {
        assert!(is_insertion("A+2GT"));
        assert!(is_insertion("c+1a"));
        assert!(!is_insertion("A"));
        assert!(!is_insertion("A+"));
        assert!(!is_insertion("A-2NN"));
        assert!(!is_insertion("*"));
    }

    #[test]
    fn parse_inserted_bases() {
        assert_eq!(inserted_bases("A+2GT").unwrap(), b"GT");
        assert_eq!(inserted_bases("A+12ACGTACGTACGT").unwrap(), b"ACGTACGTACGT");
    }

    #[test]
    fn malformed_length_prefix_err() {
        assert!(matches!(inserted_bases("A+GT"), Err(ConsensusError::Format(_))));
        assert!(matches!(inserted_bases("A+1000G"), Err(ConsensusError::Format(_))));
        assert!(InsertionMatrix::build(&["A", "A+XY"]).is_err());
    }

    #[test]
    fn non_insertion_token_err() {
        assert!(matches!(inserted_bases("A"), Err(ConsensusError::Format(_))));
        assert!(matches!(inserted_bases(""), Err(ConsensusError::Format(_))));
        assert!(matches!(inserted_bases("A-2NN"), Err(ConsensusError::Format(_))));
    }

    #[test]
    fn matrix_is_padded_to_longest_insertion() {
        let matrix = InsertionMatrix::build(&["A+1C", "A", "a+3cgt", "A+1C"]).unwrap();
        assert_eq!(matrix.depth(), 3);
        assert_eq!(matrix.width(), 3);
        assert_eq!(matrix.column(0).collect::<Vec<_>>(), b"CCC".to_vec());
        assert_eq!(matrix.column(2).collect::<Vec<_>>(), b"*T*".to_vec());
    }

    #[test]
    fn matrix_without_insertions_is_empty() {
        let matrix = InsertionMatrix::build(&["A", "C", "*"]).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn collapse_majority_insertion() {
        let observations = vec!["A+2GT"; 6];
        let matrix = InsertionMatrix::build(&observations[..]).unwrap();
        let mode = ConsensusMode::MajorityNoDeletions.descriptor();
        assert_eq!(matrix.collapse(&mode, &params(5)), "GT");
        assert_eq!(matrix.collapse(&mode, &params(50)), "gt");
    }

    #[test]
    fn weak_insertion_tail_is_truncated() {
        let matrix = InsertionMatrix::build(&["A+1C", "A+2CG", "A+1C"]).unwrap();
        let mode = ConsensusMode::MajorityNoDeletions.descriptor();
        assert_eq!(matrix.collapse(&mode, &params(50)), "c");
    }

    #[test]
    fn single_read_insertion_is_dropped() {
        let matrix = InsertionMatrix::build(&["A+3CGT", "A", "A"]).unwrap();
        let mode = ConsensusMode::AmbiguousNoDeletions.descriptor();
        assert_eq!(matrix.collapse(&mode, &params(1)), "");
    }

    #[test]
    fn filler_counts_in_deletion_modes() {
        let matrix = InsertionMatrix::build(&["A+1C", "A+2CG", "A+1C"]).unwrap();
        let mode = ConsensusMode::MajorityWithDeletions.descriptor();
        // Second offset holds two fillers and one G: the filler wins outright
        assert_eq!(matrix.collapse(&mode, &params(1)), "C*");
    }
}

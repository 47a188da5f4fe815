use super::{ConsensusError, Result};

/// Read support per symbol, in order of first appearance.
///
/// Iteration order is the order in which symbols were first seen; callers
/// break ties on counts by taking the first symbol in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlleleTable {
    entries: Vec<(u8, usize)>,
}

impl AlleleTable {
    /// Collapses observations to their uppercased first character. Insertion
    /// and deletion tokens contribute only that leading character.
    pub fn collapse<S: AsRef<str>>(observations: &[S]) -> Result<Self> {
        let mut table = AlleleTable::default();
        for observation in observations {
            let symbol = observation.as_ref().as_bytes().first().ok_or_else(|| {
                ConsensusError::Format("empty observation in pileup column".to_string())
            })?;
            table.add(symbol.to_ascii_uppercase(), 1);
        }
        Ok(table)
    }

    pub fn from_symbols<I: IntoIterator<Item = u8>>(symbols: I) -> Self {
        let mut table = AlleleTable::default();
        for symbol in symbols {
            table.add(symbol, 1);
        }
        table
    }

    pub fn add(&mut self, symbol: u8, count: usize) {
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, c)) => *c += count,
            None => self.entries.push((symbol, count)),
        }
    }

    /// Keeps only symbols of `alphabet`, preserving order.
    pub fn restrict(&self, alphabet: &[u8]) -> AlleleTable {
        AlleleTable {
            entries: self
                .entries
                .iter()
                .filter(|(symbol, _)| alphabet.contains(symbol))
                .copied()
                .collect(),
        }
    }

    pub fn count(&self, symbol: u8) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| *s == symbol)
            .map_or(0, |(_, c)| *c)
    }

    pub fn coverage(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_counts_first_characters() {
        let observations = ["A", "a", "C", "A+2GG", "*", "c-1N"];
        let table = AlleleTable::collapse(&observations).unwrap();
        assert_eq!(table.count(b'A'), 3);
        assert_eq!(table.count(b'C'), 2);
        assert_eq!(table.count(b'*'), 1);
        assert_eq!(table.coverage(), observations.len());
    }

    #[test]
    fn collapse_keeps_first_seen_order() {
        let table = AlleleTable::collapse(&["G", "T", "g", "A"]).unwrap();
        let symbols: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"GTA".to_vec());
    }

    #[test]
    fn collapse_empty_observation_err() {
        assert!(matches!(
            AlleleTable::collapse(&["A", ""]),
            Err(ConsensusError::Format(_))
        ));
    }

    #[test]
    fn restrict_recomputes_coverage() {
        let table = AlleleTable::collapse(&["A", "N", "*", "A", "C"]).unwrap();
        let restricted = table.restrict(b"ATGC");
        assert_eq!(restricted.coverage(), 3);
        assert_eq!(restricted.count(b'N'), 0);
        assert_eq!(table.coverage(), 5);
    }
}

//! Per-column symbol selection: plain majority vote or IUPAC ambiguity codes.
//!
//! Ties on counts always resolve to the first symbol in the table's iteration
//! order, which is the order in which symbols first appeared in the column.

use super::alphabet::{ModeDescriptor, AMBIGUOUS, DELETION, UNKNOWN};
use super::allele::AlleleTable;

/// Minimum read support for a symbol to be considered at all.
const MIN_SUPPORT: f64 = 2.0;
/// Minimum read support for a clear majority call.
const MIN_MAJORITY_SUPPORT: f64 = 5.0;
const MAJORITY_FRACTION: f64 = 0.75;
const AMBIGUOUS_FRACTION: f64 = 0.25;
/// Members of an ambiguity code need at least this many reads each.
const MIN_AMBIGUOUS_MEMBER_COUNT: usize = 5;

// Indexed by a bitmask over A=1, C=2, G=4, T=8
const IUPAC_CODES: [u8; 16] = [
    UNKNOWN, UNKNOWN, UNKNOWN, b'M', //  -, A, C, AC
    UNKNOWN, b'R', b'S', b'V', //        G, AG, CG, ACG
    UNKNOWN, b'W', b'Y', b'H', //        T, AT, CT, ACT
    b'K', b'D', b'B', AMBIGUOUS, //      GT, AGT, CGT, ACGT
];

fn base_bit(symbol: u8) -> Option<usize> {
    match symbol {
        b'A' => Some(1),
        b'C' => Some(2),
        b'G' => Some(4),
        b'T' => Some(8),
        _ => None,
    }
}

/// IUPAC code for an exact set of bases, `n` if the set has no code.
pub fn iupac_code(symbols: &[u8]) -> u8 {
    let mut mask = 0;
    for &symbol in symbols {
        match base_bit(symbol) {
            Some(bit) => mask |= bit,
            None => return UNKNOWN,
        }
    }
    IUPAC_CODES[mask]
}

fn first_max<I: Iterator<Item = (u8, usize)>>(entries: I) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;
    for (symbol, count) in entries {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((symbol, count));
        }
    }
    best.map(|(symbol, _)| symbol)
}

/// The symbol with the strictly highest count, first one on ties; `n` for an empty table.
pub fn call_majority(table: &AlleleTable) -> u8 {
    first_max(table.iter()).unwrap_or(UNKNOWN)
}

pub fn call_ambiguous(table: &AlleleTable, min_freq: f64) -> u8 {
    call_ambiguous_with(table, min_freq, None)
}

/// Ambiguity-code call. A `suppressed` symbol keeps its count for the
/// candidate and ambiguity sets but can never be returned as the majority.
fn call_ambiguous_with(table: &AlleleTable, min_freq: f64, suppressed: Option<u8>) -> u8 {
    let coverage = table.coverage() as f64;
    let min_count = MIN_SUPPORT.max(min_freq * coverage);

    let candidates: Vec<(u8, usize)> = table
        .iter()
        .filter(|&(_, count)| count as f64 >= min_count)
        .collect();
    if candidates.is_empty() {
        return UNKNOWN;
    }

    let majority_threshold = MIN_MAJORITY_SUPPORT.max(MAJORITY_FRACTION * coverage);
    let majority = candidates.iter().copied().filter(|&(symbol, count)| {
        count as f64 >= majority_threshold && Some(symbol) != suppressed
    });
    if let Some(symbol) = first_max(majority) {
        return symbol;
    }

    let ambiguous_threshold = AMBIGUOUS_FRACTION * coverage;
    let ambiguous_set: Vec<(u8, usize)> = candidates
        .into_iter()
        .filter(|&(_, count)| count as f64 >= ambiguous_threshold)
        .collect();

    if ambiguous_set
        .iter()
        .any(|&(_, count)| count < MIN_AMBIGUOUS_MEMBER_COUNT)
    {
        return AMBIGUOUS;
    }
    if ambiguous_set.iter().any(|&(symbol, _)| symbol == DELETION) {
        return AMBIGUOUS;
    }
    if ambiguous_set.len() == 1 {
        return AMBIGUOUS;
    }

    let symbols: Vec<u8> = ambiguous_set.iter().map(|&(symbol, _)| symbol).collect();
    iupac_code(&symbols)
}

/// Calls one column that has already been restricted to the mode's alphabet.
///
/// In deletion-aware modes a deletion wins outright when it outnumbers all
/// other symbols combined; otherwise it is kept out of the majority vote.
pub fn call_column(table: &AlleleTable, mode: &ModeDescriptor, min_freq: f64) -> u8 {
    if table.is_empty() {
        return UNKNOWN;
    }
    if !mode.deletions {
        return if mode.ambiguous {
            call_ambiguous(table, min_freq)
        } else {
            call_majority(table)
        };
    }

    let deletions = table.count(DELETION);
    if deletions > table.coverage() - deletions {
        return DELETION;
    }
    if mode.ambiguous {
        call_ambiguous_with(table, min_freq, Some(DELETION))
    } else {
        first_max(table.iter().filter(|&(symbol, _)| symbol != DELETION)).unwrap_or(UNKNOWN)
    }
}

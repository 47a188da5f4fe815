//! Symbol alphabets and the four consensus modes built on them.

pub const DELETION: u8 = b'*';
/// Pads short rows of an insertion matrix.
pub const FILLER: u8 = b'*';
/// Insufficient support or no coverage.
pub const UNKNOWN: u8 = b'n';
/// Supported but ambiguous across all bases.
pub const AMBIGUOUS: u8 = b'N';

pub const BASES: &[u8] = b"ATGC";
pub const BASES_WITH_DELETION: &[u8] = b"ATGC*";
pub const IUPAC: &[u8] = b"ATGCRYSWKMBDHVNn";
pub const IUPAC_WITH_DELETION: &[u8] = b"ATGCRYSWKMBDHVNn*";

/// How a single consensus mode filters and calls a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub alphabet: &'static [u8],
    pub deletions: bool,
    pub ambiguous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsensusMode {
    MajorityNoDeletions,
    MajorityWithDeletions,
    AmbiguousNoDeletions,
    AmbiguousWithDeletions,
}

impl ConsensusMode {
    /// All modes, in output order.
    pub const ALL: [ConsensusMode; 4] = [
        ConsensusMode::MajorityNoDeletions,
        ConsensusMode::MajorityWithDeletions,
        ConsensusMode::AmbiguousNoDeletions,
        ConsensusMode::AmbiguousWithDeletions,
    ];

    pub const fn descriptor(self) -> ModeDescriptor {
        match self {
            ConsensusMode::MajorityNoDeletions => ModeDescriptor {
                alphabet: BASES,
                deletions: false,
                ambiguous: false,
            },
            ConsensusMode::MajorityWithDeletions => ModeDescriptor {
                alphabet: BASES_WITH_DELETION,
                deletions: true,
                ambiguous: false,
            },
            ConsensusMode::AmbiguousNoDeletions => ModeDescriptor {
                alphabet: IUPAC,
                deletions: false,
                ambiguous: true,
            },
            ConsensusMode::AmbiguousWithDeletions => ModeDescriptor {
                alphabet: IUPAC_WITH_DELETION,
                deletions: true,
                ambiguous: true,
            },
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConsensusMode::MajorityNoDeletions => "majority consensus without deletions",
            ConsensusMode::MajorityWithDeletions => "majority consensus with deletions",
            ConsensusMode::AmbiguousNoDeletions => "ambiguity-coded consensus without deletions",
            ConsensusMode::AmbiguousWithDeletions => "ambiguity-coded consensus with deletions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iupac_alphabet_has_sixteen_symbols() {
        assert_eq!(IUPAC.len(), 16);
        assert!(IUPAC.contains(&UNKNOWN));
        assert!(IUPAC.contains(&AMBIGUOUS));
    }

    #[test]
    fn only_deletion_modes_allow_deletions() {
        for mode in ConsensusMode::ALL {
            let descriptor = mode.descriptor();
            assert_eq!(descriptor.deletions, descriptor.alphabet.contains(&DELETION));
        }
    }
}

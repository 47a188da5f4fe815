mod bam;

pub use bam::{BamPileup, PileupParams};

/// Observations of all reads overlapping one reference position.
///
/// Each observation is a single read's token: a base (lowercase on the
/// reverse strand), `*` for a deletion, `<base>+<len><bases>` for a base
/// followed by an insertion, or `<base>-<len><N...>` for a base followed by a
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PileupColumn {
    /// 0-based reference position.
    pub position: u32,
    pub observations: Vec<String>,
}

use super::alphabet::UNKNOWN;
use super::reference::ReferenceSource;
use super::Result;

/// Coverage-dependent post-processing of called symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoveragePolicy {
    /// Calls below this coverage are lowercased.
    pub min_coverage: usize,
    /// When set, calls below this coverage become `n`, even with a reference.
    pub n_threshold: Option<usize>,
    /// Reference bases filled in at zero coverage keep their case instead of
    /// being lowercased.
    pub keep_reference_case: bool,
}

impl CoveragePolicy {
    /// `coverage` is the support left after alphabet filtering, `depth` the
    /// number of reads observed at the position before it. Only positions
    /// without any read fall back to the reference.
    pub fn finalize(
        &self,
        called: &str,
        coverage: usize,
        depth: usize,
        contig: &str,
        position: u32,
        reference: Option<&dyn ReferenceSource>,
    ) -> Result<String> {
        let mut symbols = if coverage < self.min_coverage {
            called.to_ascii_lowercase()
        } else {
            called.to_string()
        };

        match self.n_threshold {
            None if depth == 0 => {
                symbols = match reference {
                    Some(reference) => {
                        let base = reference.fetch(contig, position, position + 1)?;
                        if self.keep_reference_case {
                            base
                        } else {
                            base.to_ascii_lowercase()
                        }
                    }
                    None => (UNKNOWN as char).to_string(),
                };
            }
            Some(n_threshold) if coverage < n_threshold => {
                symbols = (UNKNOWN as char).to_string();
            }
            _ => {}
        }

        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::reference::InMemoryReference;
    use crate::consensus::ConsensusError;

    fn policy(n_threshold: Option<usize>) -> CoveragePolicy {
        CoveragePolicy {
            min_coverage: 50,
            n_threshold,
            keep_reference_case: false,
        }
    }

    #[test]
    fn low_coverage_is_lowercased() {
        let policy = policy(None);
        assert_eq!(policy.finalize("A", 49, 49, "chr1", 0, None), Ok("a".to_string()));
        assert_eq!(policy.finalize("A", 50, 50, "chr1", 0, None), Ok("A".to_string()));
        assert_eq!(policy.finalize("N", 10, 10, "chr1", 0, None), Ok("n".to_string()));
    }

    #[test]
    fn zero_coverage_without_reference_is_n() {
        assert_eq!(policy(None).finalize("n", 0, 0, "chr1", 0, None), Ok("n".to_string()));
    }

    #[test]
    fn zero_coverage_uses_reference_base() {
        let reference = InMemoryReference::new("chr1", "ACGT");
        let called = policy(None).finalize("n", 0, 0, "chr1", 2, Some(&reference));
        assert_eq!(called, Ok("g".to_string()));

        let keep_case = CoveragePolicy {
            keep_reference_case: true,
            ..policy(None)
        };
        let called = keep_case.finalize("n", 0, 0, "chr1", 2, Some(&reference));
        assert_eq!(called, Ok("G".to_string()));
    }

    #[test]
    fn filtered_position_ignores_reference() {
        let reference = InMemoryReference::new("chr1", "ACGT");
        let called = policy(None).finalize("n", 0, 60, "chr1", 2, Some(&reference));
        assert_eq!(called, Ok("n".to_string()));
    }

    #[test]
    fn n_threshold_overrides_reference() {
        let reference = InMemoryReference::new("chr1", "ACGT");
        let policy = policy(Some(3));
        assert_eq!(
            policy.finalize("A", 2, 2, "chr1", 0, Some(&reference)),
            Ok("n".to_string())
        );
        assert_eq!(
            policy.finalize("n", 0, 0, "chr1", 0, Some(&reference)),
            Ok("n".to_string())
        );
        assert_eq!(policy.finalize("A", 3, 3, "chr1", 0, None), Ok("a".to_string()));
    }

    #[test]
    fn reference_on_other_contig_is_fatal() {
        let reference = InMemoryReference::new("chr2", "ACGT");
        assert!(matches!(
            policy(None).finalize("n", 0, 0, "chr1", 0, Some(&reference)),
            Err(ConsensusError::Validation(_))
        ));
    }
}

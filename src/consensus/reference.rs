use super::{ConsensusError, Result};

/// Random access to the reference sequence of a single contig.
pub trait ReferenceSource {
    /// The contig this source resolves.
    fn contig(&self) -> &str;

    /// Returns the bases of `contig` over the 0-based, half-open interval `start..end`.
    fn fetch(&self, contig: &str, start: u32, end: u32) -> Result<String>;
}

pub(crate) fn check_contig(source: &dyn ReferenceSource, contig: &str) -> Result<()> {
    if source.contig() != contig {
        return Err(ConsensusError::Validation(format!(
            "Reference contig '{}' does not match region contig '{}'",
            source.contig(),
            contig
        )));
    }
    Ok(())
}

/// In-memory reference for exercising the column pipeline without a FASTA.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct InMemoryReference {
    contig: String,
    sequence: String,
}

#[cfg(test)]
impl InMemoryReference {
    pub(crate) fn new(contig: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            sequence: sequence.into(),
        }
    }
}

#[cfg(test)]
impl ReferenceSource for InMemoryReference {
    fn contig(&self) -> &str {
        &self.contig
    }

    fn fetch(&self, contig: &str, start: u32, end: u32) -> Result<String> {
        check_contig(self, contig)?;
        self.sequence
            .get(start as usize..end as usize)
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ConsensusError::Reference(format!(
                    "Interval {}:{}-{} is outside the reference (length {})",
                    contig,
                    start,
                    end,
                    self.sequence.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_interval() {
        let reference = InMemoryReference::new("chr1", "ACGTACGT");
        assert_eq!(reference.fetch("chr1", 2, 5), Ok("GTA".to_string()));
    }

    #[test]
    fn fetch_other_contig_is_validation_error() {
        let reference = InMemoryReference::new("chr1", "ACGT");
        assert!(matches!(
            reference.fetch("chr2", 0, 1),
            Err(ConsensusError::Validation(_))
        ));
    }

    #[test]
    fn fetch_past_end_err() {
        let reference = InMemoryReference::new("chr1", "ACGT");
        assert!(matches!(
            reference.fetch("chr1", 3, 5),
            Err(ConsensusError::Reference(_))
        ));
    }
}

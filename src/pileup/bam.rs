use super::PileupColumn;
use crate::consensus::{ConsensusError, Result};
use crate::utils::GenomicRegion;
use rust_htslib::bam::{
    self,
    pileup::{Alignment, Indel, Pileups},
    Read,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PileupParams {
    /// Bases below this quality are left out of the column.
    pub min_base_qual: u8,
    pub max_depth: u32,
}

impl Default for PileupParams {
    fn default() -> Self {
        PileupParams {
            min_base_qual: 15,
            max_depth: 8000,
        }
    }
}

/// Streams the pileup columns of one region of an indexed BAM, in increasing
/// position order. Columns outside the region, and columns left without any
/// observation after filtering, are dropped.
pub struct BamPileup<'a> {
    pileups: Pileups<'a, bam::IndexedReader>,
    tid: u32,
    start: u32,
    end: u32,
    min_base_qual: u8,
    done: bool,
}

impl<'a> BamPileup<'a> {
    pub fn new(
        reader: &'a mut bam::IndexedReader,
        region: &GenomicRegion,
        params: &PileupParams,
    ) -> Result<Self> {
        let tid = reader
            .header()
            .tid(region.contig.as_bytes())
            .ok_or_else(|| {
                ConsensusError::Validation(format!(
                    "BAM header does not contain contig '{}'",
                    region.contig
                ))
            })?;
        reader
            .fetch((tid, region.start, region.end))
            .map_err(|e| ConsensusError::Pileup(format!("Failed to fetch {}: {}", region, e)))?;

        let mut pileups = reader.pileup();
        pileups.set_max_depth(params.max_depth);

        Ok(BamPileup {
            pileups,
            tid,
            start: region.start,
            end: region.end,
            min_base_qual: params.min_base_qual,
            done: false,
        })
    }
}

impl Iterator for BamPileup<'_> {
    type Item = Result<PileupColumn>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for pileup in self.pileups.by_ref() {
            let pileup = match pileup {
                Ok(pileup) => pileup,
                Err(e) => {
                    self.done = true;
                    return Some(Err(ConsensusError::Pileup(e.to_string())));
                }
            };
            if pileup.tid() != self.tid || pileup.pos() < self.start {
                continue;
            }
            if pileup.pos() >= self.end {
                break;
            }

            let observations: Vec<String> = pileup
                .alignments()
                .filter_map(|alignment| observation(&alignment, self.min_base_qual))
                .collect();
            if observations.is_empty() {
                continue;
            }
            return Some(Ok(PileupColumn {
                position: pileup.pos(),
                observations,
            }));
        }
        self.done = true;
        None
    }
}

fn is_filtered(record: &bam::Record) -> bool {
    record.is_unmapped()
        || record.is_secondary()
        || record.is_quality_check_failed()
        || record.is_duplicate()
}

/// Encodes one read's contribution to a column, `None` when it contributes nothing.
fn observation(alignment: &Alignment, min_base_qual: u8) -> Option<String> {
    let record = alignment.record();
    if is_filtered(&record) || alignment.is_refskip() {
        return None;
    }
    if alignment.is_del() {
        return Some("*".to_string());
    }

    let qpos = alignment.qpos()?;
    if record.qual()[qpos] < min_base_qual {
        return None;
    }

    let is_reverse = record.is_reverse();
    let stranded = |base: u8| {
        if is_reverse {
            base.to_ascii_lowercase() as char
        } else {
            base.to_ascii_uppercase() as char
        }
    };

    let seq = record.seq();
    let mut token = String::new();
    token.push(stranded(seq[qpos]));
    match alignment.indel() {
        Indel::Ins(len) => {
            token.push('+');
            token.push_str(&len.to_string());
            let end = (qpos + 1 + len as usize).min(seq.len());
            token.extend((qpos + 1..end).map(|i| stranded(seq[i])));
        }
        Indel::Del(len) => {
            token.push('-');
            token.push_str(&len.to_string());
            token.extend(std::iter::repeat(stranded(b'N')).take(len as usize));
        }
        Indel::None => {}
    }
    Some(token)
}

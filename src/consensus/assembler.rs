//! Folds a stream of pileup columns into the four consensus sequences.
//!
//! The assembler is created for one region (`new`), consumes columns in
//! strictly increasing position order (`push_column`), and is consumed by
//! `finish`, which pads both ends and emits one record per mode.

use super::alphabet::{ConsensusMode, ModeDescriptor, UNKNOWN};
use super::allele::AlleleTable;
use super::caller::call_column;
use super::coverage::CoveragePolicy;
use super::insertion::{InsertionMatrix, InsertionParams};
use super::reference::{check_contig, ReferenceSource};
use super::{ConsensusError, Result};
use crate::pileup::PileupColumn;
use crate::utils::GenomicRegion;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusParams {
    pub min_coverage: usize,
    pub min_freq: f64,
    pub n_threshold: Option<usize>,
    pub n_insert_threshold: usize,
    pub keep_reference_case: bool,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams {
            min_coverage: 50,
            min_freq: 0.05,
            n_threshold: None,
            n_insert_threshold: 2,
            keep_reference_case: false,
        }
    }
}

/// A finished consensus sequence for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRecord {
    pub mode: ConsensusMode,
    pub sample: String,
    pub description: String,
    pub sequence: String,
}

/// Read-only state shared by the four mode pipelines.
struct ColumnCaller<'r> {
    contig: String,
    policy: CoveragePolicy,
    insertion: InsertionParams,
    reference: Option<&'r dyn ReferenceSource>,
}

impl ColumnCaller<'_> {
    fn call(
        &self,
        mode: &ModeDescriptor,
        table: &AlleleTable,
        insertions: &InsertionMatrix,
        position: u32,
    ) -> Result<String> {
        let restricted = table.restrict(mode.alphabet);
        let coverage = restricted.coverage();
        let called = call_column(&restricted, mode, self.insertion.min_freq) as char;
        let mut symbols = self.policy.finalize(
            called.encode_utf8(&mut [0; 4]),
            coverage,
            table.coverage(),
            &self.contig,
            position,
            self.reference,
        )?;

        // Only insertions carried by most of the column are assembled
        if !insertions.is_empty() && 2 * insertions.depth() > coverage {
            symbols.push_str(&insertions.collapse(mode, &self.insertion));
        }
        Ok(symbols)
    }
}

pub struct ConsensusAssembler<'r> {
    region: GenomicRegion,
    caller: ColumnCaller<'r>,
    sequences: [String; 4],
    first_position: Option<u32>,
    last_position: Option<u32>,
    pileup_columns: usize,
    gap_positions: usize,
}

impl<'r> ConsensusAssembler<'r> {
    pub fn new(
        region: GenomicRegion,
        params: &ConsensusParams,
        reference: Option<&'r dyn ReferenceSource>,
    ) -> Result<Self> {
        if let Some(reference) = reference {
            check_contig(reference, &region.contig)?;
        }

        let capacity = region.len() as usize;
        let caller = ColumnCaller {
            contig: region.contig.clone(),
            policy: CoveragePolicy {
                min_coverage: params.min_coverage,
                n_threshold: params.n_threshold,
                keep_reference_case: params.keep_reference_case,
            },
            insertion: InsertionParams {
                min_coverage: params.min_coverage,
                min_freq: params.min_freq,
                n_insert_threshold: params.n_insert_threshold,
            },
            reference,
        };

        Ok(ConsensusAssembler {
            region,
            caller,
            sequences: std::array::from_fn(|_| String::with_capacity(capacity)),
            first_position: None,
            last_position: None,
            pileup_columns: 0,
            gap_positions: 0,
        })
    }

    /// Adds the next column. Positions skipped since the previous column are
    /// called as columns without coverage.
    pub fn push_column(&mut self, column: &PileupColumn) -> Result<()> {
        let position = column.position;
        if !self.region.contains(position) {
            return Err(ConsensusError::Validation(format!(
                "Pileup position {} is outside region {}",
                position, self.region
            )));
        }

        if let Some(last) = self.last_position {
            if position <= last {
                return Err(ConsensusError::Pileup(format!(
                    "Pileup positions must increase: {} follows {}",
                    position, last
                )));
            }
            if position > last + 1 {
                log::trace!(
                    "No pileup over {}:{}-{}",
                    self.region.contig,
                    last + 1,
                    position
                );
            }
            for gap in last + 1..position {
                self.process(gap, &[] as &[String])?;
                self.gap_positions += 1;
            }
        }

        self.process(position, column.observations.as_slice())?;
        self.first_position.get_or_insert(position);
        self.last_position = Some(position);
        self.pileup_columns += 1;
        Ok(())
    }

    fn process<S: AsRef<str>>(&mut self, position: u32, observations: &[S]) -> Result<()> {
        let table = AlleleTable::collapse(observations)?;
        let insertions = InsertionMatrix::build(observations)?;
        for (mode, sequence) in ConsensusMode::ALL.iter().zip(self.sequences.iter_mut()) {
            let symbols = self
                .caller
                .call(&mode.descriptor(), &table, &insertions, position)?;
            sequence.push_str(&symbols);
        }
        Ok(())
    }

    /// Pads the region ends not reached by the pileup with `n` and emits one
    /// record per mode, in `ConsensusMode::ALL` order.
    pub fn finish(self, sample: &str) -> Vec<ConsensusRecord> {
        let (leading, trailing) = match (self.first_position, self.last_position) {
            (Some(first), Some(last)) => (first - self.region.start, self.region.end - last - 1),
            _ => (self.region.len(), 0),
        };
        log::info!(
            "Processed {} pileup columns over {}",
            self.pileup_columns,
            self.region
        );
        log::debug!(
            "Region {}: {} leading, {} trailing and {} interior positions without pileup",
            self.region,
            leading,
            trailing,
            self.gap_positions
        );

        let leading = (UNKNOWN as char).to_string().repeat(leading as usize);
        let trailing = (UNKNOWN as char).to_string().repeat(trailing as usize);
        let region = self.region;

        ConsensusMode::ALL
            .into_iter()
            .zip(self.sequences)
            .map(|(mode, called)| {
                let mut sequence =
                    String::with_capacity(leading.len() + called.len() + trailing.len());
                sequence.push_str(&leading);
                sequence.push_str(&called);
                sequence.push_str(&trailing);
                ConsensusRecord {
                    mode,
                    sample: sample.to_string(),
                    description: format!("{} {}", mode.description(), region),
                    sequence,
                }
            })
            .collect()
    }
}

/// Runs a whole region through a fresh assembler. Any error aborts the build.
pub fn assemble<I>(
    region: GenomicRegion,
    params: &ConsensusParams,
    reference: Option<&dyn ReferenceSource>,
    columns: I,
    sample: &str,
) -> Result<Vec<ConsensusRecord>>
where
    I: IntoIterator<Item = Result<PileupColumn>>,
{
    let mut assembler = ConsensusAssembler::new(region, params, reference)?;
    for column in columns {
        assembler.push_column(&column?)?;
    }
    Ok(assembler.finish(sample))
}

use super::Result;
use crate::consensus::{check_contig, ConsensusError, ReferenceSource};
use rust_htslib::faidx;
use std::path::Path;

pub fn open_genome_reader(path: &Path) -> Result<faidx::Reader> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| format!("Reference path has no extension: {}", path.display()))?;
    let fai_path = path.with_extension(extension.to_owned() + ".fai");
    if !fai_path.exists() {
        return Err(format!(
            "Reference index file not found: {}. Create it using 'samtools faidx {}'",
            fai_path.display(),
            path.display()
        ));
    }
    faidx::Reader::from_path(path).map_err(|e| e.to_string())
}

/// Indexed FASTA bound to a single contig.
pub struct FastaReference {
    reader: faidx::Reader,
    contig: String,
}

impl FastaReference {
    /// Binds to `contig`, which must be one of the FASTA's sequences.
    pub fn from_path(path: &Path, contig: &str) -> Result<Self> {
        let reader = open_genome_reader(path)?;
        let names = (0..reader.n_seqs() as i32)
            .map(|i| reader.seq_name(i).map_err(|e| e.to_string()))
            .collect::<Result<Vec<String>>>()?;

        if !names.iter().any(|name| name == contig) {
            return Err(format!(
                "Reference {} does not contain contig '{}'",
                path.display(),
                contig
            ));
        }

        Ok(FastaReference {
            reader,
            contig: contig.to_string(),
        })
    }
}

impl ReferenceSource for FastaReference {
    fn contig(&self) -> &str {
        &self.contig
    }

    fn fetch(&self, contig: &str, start: u32, end: u32) -> crate::consensus::Result<String> {
        check_contig(self, contig)?;
        if start >= end {
            return Ok(String::new());
        }
        // faidx intervals are inclusive
        self.reader
            .fetch_seq_string(contig, start as usize, end as usize - 1)
            .map_err(|e| {
                ConsensusError::Reference(format!(
                    "Error fetching sequence for region {}:{}-{}: {}",
                    contig, start, end, e
                ))
            })
    }
}

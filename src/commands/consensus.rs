use crate::cli::ConsensusArgs;
use crate::consensus::{assemble, ConsensusParams, ReferenceSource};
use crate::pileup::{BamPileup, PileupParams};
use crate::utils::{get_bam_header, get_sample_name, resolve_region, FastaReference, Result};
use crate::writers::FastaWriter;
use itertools::Itertools;
use rust_htslib::bam;

pub fn run(args: ConsensusArgs) -> Result<()> {
    let bam_header = get_bam_header(&args.reads_path)?;
    let region = resolve_region(args.region.as_deref(), &bam_header)?;

    let sample_name = match args.sample_name {
        Some(name) => name,
        None => get_sample_name(&args.reads_path, &bam_header)?,
    };

    let params = ConsensusParams {
        min_coverage: args.min_coverage,
        min_freq: args.min_freq,
        n_threshold: args.n_threshold,
        n_insert_threshold: args.n_insert_threshold,
        keep_reference_case: args.keep_reference_case,
    };
    let pileup_params = PileupParams {
        min_base_qual: args.min_base_qual,
        max_depth: args.max_depth,
    };

    log::info!("Sample: {}, region: {}", sample_name, region);
    log::debug!("Consensus parameters: {:?}", params);
    log::debug!("Pileup parameters: {:?}", pileup_params);

    let reference = match &args.genome_path {
        Some(path) => Some(FastaReference::from_path(path, &region.contig)?),
        None => None,
    };

    let mut reader = bam::IndexedReader::from_path(&args.reads_path)
        .map_err(|e| format!("Failed to create bam reader: {}", e))?;
    let columns = BamPileup::new(&mut reader, &region, &pileup_params).map_err(|e| e.to_string())?;

    let records = assemble(
        region,
        &params,
        reference.as_ref().map(|r| r as &dyn ReferenceSource),
        columns,
        &sample_name,
    )
    .map_err(|e| e.to_string())?;

    let mut writer = FastaWriter::new(&args.output_path, args.line_width)?;
    log::debug!(
        "Consensus lengths: {}",
        records
            .iter()
            .map(|r| format!("{:?}={}", r.mode, r.sequence.len()))
            .join(", ")
    );
    for record in &records {
        writer.write(record)?;
    }
    writer.finish()?;
    log::info!("Wrote {} records to {}", records.len(), args.output_path);

    Ok(())
}

use crate::utils::{GenomicRegion, Result};
use rust_htslib::bam::{self, Read};
use std::{collections::HashSet, path::Path};

pub fn get_bam_header(bam_path: &Path) -> Result<bam::HeaderView> {
    let bam = bam::IndexedReader::from_path(bam_path)
        .map_err(|e| format!("Failed to create bam reader: {}", e))?;
    if bam.header().target_count() == 0 {
        return Err("Input BAM is not mapped: no @SQ lines in header".into());
    }
    Ok(bam.header().clone())
}

pub fn get_sample_name(reads_path: &Path, bam_header: &bam::HeaderView) -> Result<String> {
    let header_hashmap = bam::Header::from_template(bam_header).to_hashmap();
    let mut sample_names = HashSet::new();

    if let Some(rg_fields) = header_hashmap.get("RG") {
        for rg_field in rg_fields {
            if let Some(sample_name) = rg_field.get("SM") {
                sample_names.insert(sample_name.to_owned());
            }
        }
    }

    match sample_names.len() {
        1 => {
            if let Some(sample) = sample_names.into_iter().next() {
                return Ok(sample);
            }
        }
        0 => log::warn!("No sample names found"),
        _ => log::warn!("Multiple sample names found"),
    };

    let sample = reads_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or("Invalid reads file name")?
        .to_string();

    Ok(sample)
}

fn contig_length(bam_header: &bam::HeaderView, contig: &str) -> Result<u32> {
    let tid = bam_header
        .tid(contig.as_bytes())
        .ok_or_else(|| format!("BAM header does not contain contig '{}'", contig))?;
    let len = bam_header
        .target_len(tid)
        .ok_or_else(|| format!("BAM header has no length for contig '{}'", contig))?;
    u32::try_from(len).map_err(|_| format!("Length of contig '{}' exceeds u32", contig))
}

/// Resolves the region to call from an optional `contig` or `contig:start-end`
/// encoding, defaulting to the whole of the first contig in the header.
pub fn resolve_region(encoding: Option<&str>, bam_header: &bam::HeaderView) -> Result<GenomicRegion> {
    let region = match encoding {
        None => {
            let names = bam_header.target_names();
            let first = names.first().ok_or("BAM header does not list any contigs")?;
            let contig = std::str::from_utf8(first).map_err(|e| e.to_string())?;
            GenomicRegion::new(contig, 0, contig_length(bam_header, contig)?)?
        }
        Some(contig) if bam_header.tid(contig.as_bytes()).is_some() => {
            GenomicRegion::new(contig, 0, contig_length(bam_header, contig)?)?
        }
        Some(encoding) => GenomicRegion::from_string(encoding)?,
    };

    let contig_len = contig_length(bam_header, &region.contig)?;
    if region.end > contig_len {
        return Err(format!(
            "Region {} exceeds contig '{}' bounds (0..{})",
            region, region.contig, contig_len
        ));
    }
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> bam::HeaderView {
        bam::HeaderView::from_bytes(
            b"@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chrA\tLN:1000\n@SQ\tSN:chrB\tLN:500\n@RG\tID:rg1\tSM:sample1\n",
        )
    }

    #[test]
    fn region_defaults_to_first_contig() {
        let region = resolve_region(None, &header()).unwrap();
        assert_eq!(region, GenomicRegion::new("chrA", 0, 1000).unwrap());
    }

    #[test]
    fn region_contig_only_spans_contig() {
        let region = resolve_region(Some("chrB"), &header()).unwrap();
        assert_eq!(region, GenomicRegion::new("chrB", 0, 500).unwrap());
    }

    #[test]
    fn region_with_interval() {
        let region = resolve_region(Some("chrB:10-20"), &header()).unwrap();
        assert_eq!(region, GenomicRegion::new("chrB", 10, 20).unwrap());
    }

    #[test]
    fn region_out_of_bounds_err() {
        assert!(resolve_region(Some("chrB:10-501"), &header()).is_err());
        assert!(resolve_region(Some("chrC:10-20"), &header()).is_err());
    }

    #[test]
    fn sample_name_from_read_group() {
        let name = get_sample_name(Path::new("/data/reads.bam"), &header()).unwrap();
        assert_eq!(name, "sample1");
    }

    #[test]
    fn sample_name_falls_back_to_file_stem() {
        let view = bam::HeaderView::from_bytes(b"@SQ\tSN:chrA\tLN:1000\n");
        let name = get_sample_name(Path::new("/data/reads.bam"), &view).unwrap();
        assert_eq!(name, "reads");
    }
}

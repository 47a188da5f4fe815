mod bam_utils;
mod readers;
mod region;

pub use bam_utils::{get_bam_header, get_sample_name, resolve_region};
pub use readers::{open_genome_reader, FastaReference};
pub use region::GenomicRegion;

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}

mod fasta;

pub use fasta::FastaWriter;

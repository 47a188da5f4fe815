//! Defines the `FastaWriter` struct for writing consensus records as FASTA.
//!
use crate::consensus::ConsensusRecord;
use crate::utils::Result;
use flate2::{write::GzEncoder, Compression};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

enum Sink {
    Plain(BufWriter<Box<dyn Write>>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Sink::Plain(writer) => writer,
            Sink::Gzip(encoder) => encoder,
        }
    }
}

/// Structure for writing consensus records to a FASTA file or stdout.
pub struct FastaWriter {
    /// Output sink, gzip-compressed when the output path ends in `.gz`.
    sink: Sink,
    /// Number of sequence characters per line.
    line_width: usize,
}

impl FastaWriter {
    /// Constructs a new `FastaWriter` instance.
    ///
    /// # Arguments
    /// * `output_path` - Path of the output FASTA file, `-` for stdout.
    /// * `line_width` - Number of sequence characters per line.
    ///
    /// # Returns
    /// Returns a `Result` with either a new `FastaWriter` instance or an error message.
    pub fn new(output_path: &str, line_width: usize) -> Result<FastaWriter> {
        if output_path == "-" {
            return Ok(Self::from_writer(Box::new(io::stdout().lock()), line_width));
        }
        let file = File::create(output_path)
            .map_err(|e| format!("Invalid FASTA output path {}: {}", output_path, e))?;
        if is_gzipped(output_path) {
            Ok(FastaWriter {
                sink: Sink::Gzip(GzEncoder::new(BufWriter::new(file), Compression::default())),
                line_width: line_width.max(1),
            })
        } else {
            Ok(Self::from_writer(Box::new(file), line_width))
        }
    }

    /// Wraps an arbitrary uncompressed sink.
    pub fn from_writer(sink: Box<dyn Write>, line_width: usize) -> FastaWriter {
        FastaWriter {
            sink: Sink::Plain(BufWriter::new(sink)),
            line_width: line_width.max(1),
        }
    }

    /// Writes one record: a `>sample description` line followed by the
    /// sequence wrapped at the configured line width.
    ///
    /// # Arguments
    /// * `record` - Consensus record to write.
    pub fn write(&mut self, record: &ConsensusRecord) -> Result<()> {
        self.write_record(record)
            .map_err(|e| format!("Failed to write FASTA record {}: {}", record.sample, e))
    }

    fn write_record(&mut self, record: &ConsensusRecord) -> io::Result<()> {
        let line_width = self.line_width;
        let writer = self.sink.writer();
        writeln!(writer, ">{} {}", record.sample, record.description)?;
        for line in record.sequence.as_bytes().chunks(line_width) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Completes the output, writing the gzip trailer when compressing.
    /// Errors surface here rather than being lost when the writer is dropped.
    pub fn finish(self) -> Result<()> {
        let finished = match self.sink {
            Sink::Plain(mut writer) => writer.flush(),
            Sink::Gzip(encoder) => encoder.finish().and_then(|mut file| file.flush()),
        };
        finished.map_err(|e| format!("Failed to finish FASTA output: {}", e))
    }
}

fn is_gzipped(path: &str) -> bool {
    let path = path.to_lowercase();
    path.ends_with(".gz") || path.ends_with(".gzip")
}

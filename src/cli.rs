use crate::utils::Result;
use chrono::Datelike;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="pilecon",
          version=&**FULL_VERSION,
          about="Pileup consensus caller for aligned sequencing reads",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) 2023-{}
This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(global = true)]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Call majority and ambiguity-coded consensus sequences from a BAM pileup")]
    Consensus(ConsensusArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("consensus")))]
#[command(arg_required_else_help(true))]
pub struct ConsensusArgs {
    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "bam")]
    #[clap(help = "Indexed BAM file with aligned reads")]
    #[clap(value_name = "BAM")]
    #[arg(value_parser = check_file_exists)]
    pub reads_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output FASTA path ('-' for stdout, '.gz' suffix for gzip)")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_output_path)]
    pub output_path: String,

    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(help = "Indexed reference FASTA used to fill positions without coverage")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub genome_path: Option<PathBuf>,

    #[clap(long = "region")]
    #[clap(value_name = "REGION")]
    #[clap(help = "Region as contig or contig:start-end (0-based, half-open) [default: first contig]")]
    pub region: Option<String>,

    #[clap(long = "sample-name")]
    #[clap(value_name = "SAMPLE_NAME")]
    #[clap(help = "Sample name [default: read group SM tag or BAM file stem]")]
    #[arg(value_parser = check_sample_name_nonempty)]
    pub sample_name: Option<String>,

    #[clap(help_heading("Calling"))]
    #[clap(short = 'c')]
    #[clap(long = "min-coverage")]
    #[clap(value_name = "COVERAGE")]
    #[clap(help = "Coverage below which called bases are reported in lowercase")]
    #[clap(default_value = "50")]
    pub min_coverage: usize,

    #[clap(help_heading("Calling"))]
    #[clap(short = 'q')]
    #[clap(long = "min-base-qual")]
    #[clap(value_name = "QUAL")]
    #[clap(help = "Minimum base quality for a base to enter the pileup")]
    #[clap(default_value = "15")]
    pub min_base_qual: u8,

    #[clap(help_heading("Calling"))]
    #[clap(short = 'f')]
    #[clap(long = "min-freq")]
    #[clap(value_name = "FREQ")]
    #[clap(help = "Minimum relative frequency for a base to enter an ambiguity code")]
    #[clap(default_value = "0.05")]
    #[arg(value_parser = ensure_unit_float)]
    pub min_freq: f64,

    #[clap(help_heading("Calling"))]
    #[clap(short = 'n')]
    #[clap(long = "n-threshold")]
    #[clap(value_name = "COVERAGE")]
    #[clap(help = "Coverage below which 'n' is reported regardless of the reference")]
    pub n_threshold: Option<usize>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "n-insert-threshold")]
    #[clap(value_name = "COVERAGE")]
    #[clap(help = "Coverage below which an insertion run is truncated")]
    #[clap(default_value = "2")]
    pub n_insert_threshold: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "keep-reference-case")]
    #[clap(help = "Keep the reference case for bases filled from the genome (lowercase otherwise)")]
    pub keep_reference_case: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-depth")]
    #[clap(value_name = "MAX_DEPTH")]
    #[clap(help = "Maximum pileup depth per position")]
    #[clap(default_value = "8000")]
    pub max_depth: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "line-width")]
    #[clap(value_name = "WIDTH")]
    #[clap(help = "Sequence line width of the FASTA output")]
    #[clap(default_value = "60")]
    #[arg(value_parser = line_width_in_range)]
    pub line_width: usize,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_output_path(s: &str) -> Result<String> {
    if s == "-" {
        return Ok(s.to_string());
    }
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_sample_name_nonempty(s: &str) -> Result<String> {
    if s.trim().is_empty() {
        Err("Sample name cannot be an empty string".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn line_width_in_range(s: &str) -> Result<usize> {
    let width: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid line width", s))?;
    if width >= 1 {
        Ok(width)
    } else {
        Err("Line width must be at least 1".into())
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_float_bounds() {
        assert_eq!(ensure_unit_float("0.05"), Ok(0.05));
        assert_eq!(ensure_unit_float("1"), Ok(1.0));
        assert!(ensure_unit_float("1.5").is_err());
        assert!(ensure_unit_float("abc").is_err());
    }

    #[test]
    fn line_width_must_be_positive() {
        assert_eq!(line_width_in_range("60"), Ok(60));
        assert_eq!(
            line_width_in_range("0"),
            Err("Line width must be at least 1".to_string())
        );
    }

    #[test]
    fn stdout_output_is_accepted() {
        assert_eq!(check_output_path("-"), Ok("-".to_string()));
        assert!(check_output_path("/no/such/dir/out.fa").is_err());
    }

    #[test]
    fn parse_consensus_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let bam = tmp.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["pilecon", "consensus", "-b", bam, "-o", "-"]).unwrap();
        let Command::Consensus(args) = cli.command;
        assert_eq!(args.min_coverage, 50);
        assert_eq!(args.min_base_qual, 15);
        assert_eq!(args.min_freq, 0.05);
        assert_eq!(args.n_threshold, None);
        assert_eq!(args.n_insert_threshold, 2);
        assert_eq!(args.line_width, 60);
        assert!(args.region.is_none());
        assert!(!args.keep_reference_case);
    }
}

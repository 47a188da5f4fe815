use crate::utils::Result;
use std::fmt;

/// A 0-based, half-open interval on a single contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    /// Parses `contig:start-end`. The contig itself may contain ':'.
    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let (contig, interval) = encoding.rsplit_once(':').ok_or_else(error_msg)?;
        let (start, end) = interval.split_once('-').ok_or_else(error_msg)?;

        if contig.is_empty() {
            return Err(error_msg());
        }

        let start: u32 = start.parse().map_err(|_| error_msg())?;
        let end: u32 = end.parse().map_err(|_| error_msg())?;

        Self::new(contig, start, end)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, position: u32) -> bool {
        position >= self.start && position < self.end
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::GenomicRegion;
    #[test]
    fn init_region_from_valid_string_ok() {
        let region = GenomicRegion::from_string("chr1:100-200").unwrap();
        assert_eq!(region.contig, "chr1");
        assert_eq!(region.start, 100);
        assert_eq!(region.end, 200);
        assert_eq!(region.len(), 100);
    }

    #[test]
    fn init_region_with_colon_in_contig_ok() {
        let region = GenomicRegion::from_string("HLA-A*01:01:01:01:0-10").unwrap();
        assert_eq!(region.contig, "HLA-A*01:01:01:01");
        assert_eq!(region.end, 10);
    }

    #[test]
    fn init_region_from_invalid_start_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1:a-200"),
            Err("Invalid region encoding: chr1:a-200".to_string())
        );
    }

    #[test]
    fn init_region_missing_interval_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1"),
            Err("Invalid region encoding: chr1".to_string())
        );
    }

    #[test]
    fn init_region_from_invalid_interval_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1:200-100"),
            Err("Invalid region: start 200 >= end 100".to_string())
        );
    }

    #[test]
    fn region_is_half_open() {
        let region = GenomicRegion::new("chr1", 10, 20).unwrap();
        assert!(region.contains(10));
        assert!(region.contains(19));
        assert!(!region.contains(20));
        assert_eq!(region.to_string(), "chr1:10-20");
    }
}

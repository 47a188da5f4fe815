//! Column-by-column consensus calling from pileup observations.
//!
//! Each pileup column is collapsed to an [`AlleleTable`], restricted to the
//! alphabet of each [`ConsensusMode`], called by majority vote or IUPAC
//! ambiguity code, optionally extended by an insertion run, and finally
//! adjusted for coverage by the [`CoveragePolicy`].

pub mod alphabet;
mod allele;
mod assembler;
pub mod caller;
mod coverage;
mod error;
pub mod insertion;
mod reference;

pub use alphabet::{ConsensusMode, ModeDescriptor};
pub use allele::AlleleTable;
pub use assembler::{assemble, ConsensusAssembler, ConsensusParams, ConsensusRecord};
pub use coverage::CoveragePolicy;
pub use error::{ConsensusError, Result};
pub use insertion::{InsertionMatrix, InsertionParams};
pub(crate) use reference::check_contig;
pub use reference::ReferenceSource;

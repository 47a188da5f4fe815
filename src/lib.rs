pub mod cli;
pub mod commands;
pub mod consensus;
pub mod pileup;
pub mod utils;
pub mod writers;

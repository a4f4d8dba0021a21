//! Subcommand implementations.

pub mod completion;
pub mod ext;
pub mod unzip;
pub mod zip;

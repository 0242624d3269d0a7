//! Version module: Scan run metadata
//!
//! Identifies a single scan and the repository state it was taken from.

mod scan_run;

pub use scan_run::ScanRun;

#[cfg(test)]
mod tests;

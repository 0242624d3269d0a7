//! repotree-cli library
//!
//! Exposes the command implementations and logging setup used by the
//! `repotree` binary so they can be tested directly.

pub mod commands;
pub mod logging;

pub use commands::types::{FlattenArg, FormatArg, ScanArgs};

//! CLI commands

pub mod parsers;
pub mod scan;
pub mod types;

#[cfg(test)]
mod tests;

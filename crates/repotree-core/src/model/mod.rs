//! Model module: Structural node tree and per-file results
//!
//! Defines the in-memory tree produced by the parsers and the
//! success-or-failure record the pipeline emits for every file.

mod node;
mod result;

pub use node::{Comment, Dependency, DependencyKind, NodeKind, StructuralNode, Walk};
pub use result::{CollectionResult, FileError, FileInfo, PipelineResult};

#[cfg(test)]
mod tests;

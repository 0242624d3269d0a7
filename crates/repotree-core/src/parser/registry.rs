//! Extension-to-parser registry

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{JavaScriptParser, MarkdownParser, Parser, PythonParser};
use crate::scanner::Language;

/// Maps lowercase file extensions to parser instances
///
/// Built once at startup and shared read-only across workers.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in parser
    #[must_use]
    pub fn with_defaults() -> Self {
        let builtins: [Arc<dyn Parser>; 3] = [
            Arc::new(PythonParser::new()),
            Arc::new(MarkdownParser::new()),
            Arc::new(JavaScriptParser::new()),
        ];

        let mut registry = Self::new();
        for parser in builtins {
            for ext in parser.language().extensions() {
                registry.register(*ext, Arc::clone(&parser));
            }
        }
        registry
    }

    /// Register a parser for an extension, returning the one it replaces
    pub fn register(
        &mut self,
        extension: impl AsRef<str>,
        parser: Arc<dyn Parser>,
    ) -> Option<Arc<dyn Parser>> {
        self.parsers.insert(normalize(extension.as_ref()), parser)
    }

    /// Look up the parser for an extension (case-insensitive, dot optional)
    #[must_use]
    pub fn get(&self, extension: &str) -> Option<&Arc<dyn Parser>> {
        self.parsers.get(&normalize(extension))
    }

    /// Look up the parser for a file path
    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<&Arc<dyn Parser>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get(ext))
    }

    /// Registered extensions, sorted
    #[must_use]
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// `(extension, language)` pairs, sorted by extension
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, Language)> {
        self.extensions()
            .into_iter()
            .filter_map(|ext| self.parsers.get(ext).map(|p| (ext, p.language())))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

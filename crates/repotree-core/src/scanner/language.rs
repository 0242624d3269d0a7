//! Language detection utilities

use std::path::Path;

/// Languages with a built-in parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Markdown,
    JavaScript,
}

impl Language {
    /// Every supported language
    pub const ALL: [Self; 3] = [Self::Python, Self::Markdown, Self::JavaScript];

    /// Detect language from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Self::Python),
            "md" | "markdown" => Some(Self::Markdown),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Detect language from file path
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Look up a language by its tag or one of its extensions
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == name)
            .or_else(|| Self::from_extension(&name))
    }

    /// Tag written into every node this language's parser produces
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Markdown => "markdown",
            Self::JavaScript => "javascript",
        }
    }

    /// Get the file extensions for this language
    #[must_use]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py"],
            Self::Markdown => &["md", "markdown"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

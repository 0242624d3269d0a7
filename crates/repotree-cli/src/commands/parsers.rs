//! Parsers command: List the registered parsers

use repotree_core::ParserRegistry;

/// Lines printed by `repotree parsers`, one `extension<TAB>language` each
#[must_use]
pub fn listing(registry: &ParserRegistry) -> Vec<String> {
    registry
        .entries()
        .into_iter()
        .map(|(extension, language)| format!("{extension}\t{language}"))
        .collect()
}

/// Run the parsers command
pub fn run() {
    for line in listing(&ParserRegistry::with_defaults()) {
        println!("{line}");
    }
}

//! Name-to-parser-set resolution.

use crate::parser::{ParserBox, ParserFactory, WarningParser};
use std::collections::HashMap;

/// An explicit mapping from parser group names to parser factories.
///
/// The table is populated once at startup and treated as read-only afterward;
/// new parsers are added by appending to it, not by runtime discovery.
/// Registering under an already-present key is additive, so one display
/// group (e.g. "Java Compiler") may answer with several parser variants.
#[derive(Default)]
pub struct ParserRegistry {
    factories: HashMap<String, Vec<ParserFactory>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser factory under the given group name.
    ///
    /// Registration order determines the order in which parsers sharing a
    /// group are resolved, and that order is stable across resolutions.
    pub fn register<F, P>(&mut self, group: impl Into<String>, factory: F)
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: WarningParser + 'static,
    {
        self.factories
            .entry(group.into())
            .or_default()
            .push(Box::new(move || -> ParserBox { Box::new(factory()) }));
    }

    /// Resolves a group name to freshly constructed parser instances.
    ///
    /// An unknown group name yields an empty vector, not an error, so callers
    /// can report "zero parsers matched" as a log line rather than a hard
    /// failure.
    #[must_use]
    pub fn resolve(&self, group: &str) -> Vec<ParserBox> {
        self.factories
            .get(group)
            .map(|factories| factories.iter().map(|factory| factory()).collect())
            .unwrap_or_default()
    }

    /// Returns the registered group names, sorted for stable display.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use std::collections::HashSet;
    use std::io::BufRead;

    struct NamedParser(&'static str);

    impl WarningParser for NamedParser {
        fn id(&self) -> &'static str {
            self.0
        }

        fn group(&self) -> &'static str {
            "Test Group"
        }

        fn parse(
            &self,
            _input: &mut dyn BufRead,
            _module_name: &str,
        ) -> std::io::Result<HashSet<Annotation>> {
            Ok(HashSet::new())
        }
    }

    #[test]
    fn unknown_group_resolves_to_empty_set() {
        let registry = ParserRegistry::new();
        assert!(registry.resolve("No Such Group").is_empty());
    }

    #[test]
    fn registration_is_additive_and_ordered() {
        let mut registry = ParserRegistry::new();
        registry.register("Test Group", || NamedParser("first"));
        registry.register("Test Group", || NamedParser("second"));

        let parsers = registry.resolve("Test Group");
        assert_eq!(parsers.len(), 2);
        assert_eq!(parsers[0].id(), "first");
        assert_eq!(parsers[1].id(), "second");

        // Stable across resolutions.
        let again = registry.resolve("Test Group");
        assert_eq!(again[0].id(), "first");
        assert_eq!(again[1].id(), "second");
    }

    #[test]
    fn groups_are_sorted() {
        let mut registry = ParserRegistry::new();
        registry.register("Zeta", || NamedParser("z"));
        registry.register("Alpha", || NamedParser("a"));
        assert_eq!(registry.groups(), vec!["Alpha", "Zeta"]);
    }
}

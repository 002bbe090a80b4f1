//! Symbol registry mapping placeholder names to renderer variants

use std::collections::HashMap;

use log::debug;

use crate::config::SiteConfig;

use super::variants::Callout;

/// Components the theme provides out of the box
const BASE_COMPONENTS: &[(&str, Callout)] = &[("Admonition", Callout::Admonition)];

/// Components the site adds on top of the theme's
const SITE_COMPONENTS: &[(&str, Callout)] = &[
    ("SolutionAvailable", Callout::SolutionAvailable),
    ("SolutionNotYetAvailable", Callout::SolutionPending),
    ("WriteupAvailable", Callout::WriteupAvailable),
    ("WriteupNotYetAvailable", Callout::WriteupPending),
    // Names used by earlier writeups
    ("CalloutSolution", Callout::SolutionAvailable),
    ("CalloutSolutionNotYetAvailable", Callout::SolutionPending),
    ("CalloutWriteup", Callout::WriteupAvailable),
    ("CalloutWriteupNotYetAvailable", Callout::WriteupPending),
];

/// Registry of placeholder names.
///
/// Built once, then shared read-only by every render. Registering a name that
/// already exists replaces the previous entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalloutRegistry {
    entries: HashMap<String, Callout>,
}

impl CalloutRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The theme's default mapping
    pub fn base() -> Self {
        Self::new().overlay(BASE_COMPONENTS.iter().copied())
    }

    /// The theme's mapping with the site's components layered on top
    pub fn site() -> Self {
        Self::base().overlay(SITE_COMPONENTS.iter().copied())
    }

    /// The site mapping with the `[components]` table of a config applied last
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::site().overlay(
            config
                .components
                .iter()
                .map(|(name, callout)| (name.as_str(), *callout)),
        )
    }

    /// Add or replace an entry, returning the replaced variant
    pub fn register(&mut self, name: impl Into<String>, callout: Callout) -> Option<Callout> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), callout);
        if let Some(previous) = previous {
            if previous != callout {
                debug!("component {} overridden: {} -> {}", name, previous, callout);
            }
        }
        previous
    }

    /// Apply `entries` in order on top of this registry
    pub fn overlay<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Callout)>,
        S: Into<String>,
    {
        for (name, callout) in entries {
            self.register(name, callout);
        }
        self
    }

    /// Look up a name. Absence is not an error here; the caller decides.
    pub fn resolve(&self, name: &str) -> Option<Callout> {
        self.entries.get(name).copied()
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by name
    pub fn entries(&self) -> Vec<(&str, Callout)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(name, callout)| (name.as_str(), *callout))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }
}

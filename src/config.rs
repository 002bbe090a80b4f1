//! Site configuration
//!
//! The site shell hands the callouts two things: the URL templates for
//! per-day links and an optional table of extra component names. Both come
//! from a TOML file; anything left out falls back to the defaults below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::callout::{Callout, UnresolvedPolicy};

/// Slot replaced by the day number in link templates
pub const DAY_SLOT: &str = "{day}";

/// Default puzzle description link
pub const DEFAULT_PUZZLE_URL: &str = "https://adventofcode.com/2022/day/{day}";

/// Default solution source link
pub const DEFAULT_SOLUTION_URL: &str =
    "https://github.com/kbalston/advent-of-code-2022/tree/main/day{day}";

/// Errors that can occur when loading or parsing a site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Link template `{name}` has no {{day}} slot: {template}")]
    MissingDaySlot { name: &'static str, template: String },
}

/// URL templates for the two external links a callout can carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplates {
    pub puzzle: String,
    pub solution: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_PUZZLE_URL, DEFAULT_SOLUTION_URL)
    }
}

impl LinkTemplates {
    pub fn new(puzzle: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            puzzle: puzzle.into(),
            solution: solution.into(),
        }
    }

    /// Link to the puzzle description for `day`
    pub fn puzzle_url(&self, day: u8) -> String {
        self.puzzle.replace(DAY_SLOT, &day.to_string())
    }

    /// Link to the solution source for `day`
    pub fn solution_url(&self, day: u8) -> String {
        self.solution.replace(DAY_SLOT, &day.to_string())
    }

    /// Check that both templates contain the day slot
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, template) in [("puzzle", &self.puzzle), ("solution", &self.solution)] {
            if !template.contains(DAY_SLOT) {
                return Err(ConfigError::MissingDaySlot {
                    name,
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Configuration for one site build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    /// Optional site title
    pub title: Option<String>,
    /// Link templates for the solution callouts
    pub links: LinkTemplates,
    /// Extra or overriding component names: tag name -> renderer variant
    pub components: BTreeMap<String, Callout>,
    /// What to do with unknown component tags
    pub on_unresolved: UnresolvedPolicy,
}

/// TOML structure for deserializing site configurations
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    site: Option<TomlSite>,
    links: Option<TomlLinks>,
    #[serde(default)]
    components: BTreeMap<String, Callout>,
    render: Option<TomlRender>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSite {
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLinks {
    puzzle: Option<String>,
    solution: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRender {
    on_unresolved: Option<UnresolvedPolicy>,
}

impl SiteConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let links = parsed.links.map_or_else(LinkTemplates::default, |l| {
            LinkTemplates::new(
                l.puzzle.unwrap_or_else(|| DEFAULT_PUZZLE_URL.to_string()),
                l.solution.unwrap_or_else(|| DEFAULT_SOLUTION_URL.to_string()),
            )
        });
        links.validate()?;

        Ok(SiteConfig {
            title: parsed.site.and_then(|s| s.title),
            links,
            components: parsed.components,
            on_unresolved: parsed
                .render
                .and_then(|r| r.on_unresolved)
                .unwrap_or_default(),
        })
    }
}

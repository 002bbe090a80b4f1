//! Advent Callouts - component placeholders for puzzle writeup sites
//!
//! Writeups are Markdown documents with embedded, self-closing component tags.
//! This library finds those tags, resolves each name through a
//! [`CalloutRegistry`] and splices in the rendered HTML fragment.
//!
//! # Example
//!
//! ```rust
//! use advent_callouts::render;
//!
//! let html = render(r#"<SolutionAvailable day="3" />"#).unwrap();
//! assert!(html.contains("https://adventofcode.com/2022/day/3"));
//! ```

pub mod callout;
pub mod config;
pub mod error;
pub mod parser;

pub use callout::{
    resolve_document, Attributes, Callout, CalloutError, CalloutRegistry, Fragment,
    ResolutionContext, ResolveError, UnresolvedPolicy, FIRST_DAY, LAST_DAY,
};
pub use config::{ConfigError, LinkTemplates, SiteConfig};
pub use error::ParseError;
pub use parser::{parse, Document};

use log::debug;
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", join_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error during placeholder resolution
    #[error("resolution errors: {}", join_errors(.0))]
    Resolve(Vec<ResolveError>),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

impl From<Vec<ResolveError>> for RenderError {
    fn from(errors: Vec<ResolveError>) -> Self {
        RenderError::Resolve(errors)
    }
}

impl RenderError {
    /// Number of individual problems reported
    pub fn len(&self) -> usize {
        match self {
            RenderError::Parse(errors) => errors.len(),
            RenderError::Resolve(errors) => errors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Format every error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RenderError::Resolve(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn join_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Site title, shown above the component listing
    pub title: Option<String>,
    /// Placeholder name table
    pub registry: CalloutRegistry,
    /// Link templates for solution callouts
    pub links: LinkTemplates,
    /// What to do with unknown component tags
    pub on_unresolved: UnresolvedPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: None,
            registry: CalloutRegistry::site(),
            links: LinkTemplates::default(),
            on_unresolved: UnresolvedPolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry and settings described by a site configuration
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            title: site.title.clone(),
            registry: CalloutRegistry::from_config(site),
            links: site.links.clone(),
            on_unresolved: site.on_unresolved,
        }
    }

    /// Set the component registry
    pub fn with_registry(mut self, registry: CalloutRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the link templates
    pub fn with_links(mut self, links: LinkTemplates) -> Self {
        self.links = links;
        self
    }

    /// Set the policy for unknown component tags
    pub fn with_on_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.on_unresolved = policy;
        self
    }

    /// Registered components as `name kind` lines sorted by name, under the
    /// site title when one is set
    pub fn listing(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("{}\n\n", title));
        }
        for (name, callout) in self.registry.entries() {
            out.push_str(&format!("{:<32} {}\n", name, callout));
        }
        out
    }

    /// Resolution context borrowing this configuration
    pub fn context(&self) -> ResolutionContext<'_> {
        ResolutionContext::new(&self.registry, &self.links).with_policy(self.on_unresolved)
    }
}

/// Render a document with the default site configuration
///
/// # Example
///
/// ```rust
/// use advent_callouts::render;
///
/// let html = render("# Day 9\n\n<SolutionNotYetAvailable day=\"9\" />\n").unwrap();
/// assert!(html.starts_with("# Day 9"));
/// assert!(html.contains("not yet available"));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a document with a custom configuration
///
/// The configuration is only read, so one instance can serve many documents
/// rendered in parallel.
///
/// # Example
///
/// ```rust
/// use advent_callouts::{render_with_config, Callout, CalloutRegistry, RenderConfig};
///
/// let registry = CalloutRegistry::site().overlay([("Pending", Callout::SolutionPending)]);
/// let config = RenderConfig::new().with_registry(registry);
///
/// let html = render_with_config(r#"<Pending day="4" />"#, &config).unwrap();
/// assert!(html.contains("https://adventofcode.com/2022/day/4"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let doc = parse(source)?;
    debug!(
        "parsed {} segments, {} placeholders",
        doc.segments.len(),
        doc.placeholders().count()
    );

    let output = resolve_document(&doc, &config.context())?;
    Ok(output)
}

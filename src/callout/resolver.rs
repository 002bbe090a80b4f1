//! Placeholder resolution - replaces component tags with rendered fragments

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::config::LinkTemplates;
use crate::error::{report, Span};
use crate::parser::ast::{Document, Placeholder, Segment};

use super::registry::CalloutRegistry;
use super::variants::{Attributes, CalloutError};

/// What to do with a placeholder whose name is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Fail the render
    #[default]
    Error,
    /// Drop the tag from the output
    Omit,
    /// Keep the tag text as written
    Verbatim,
}

impl UnresolvedPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            UnresolvedPolicy::Error => "error",
            UnresolvedPolicy::Omit => "omit",
            UnresolvedPolicy::Verbatim => "verbatim",
        }
    }
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(UnresolvedPolicy::Error),
            "omit" => Ok(UnresolvedPolicy::Omit),
            "verbatim" => Ok(UnresolvedPolicy::Verbatim),
            other => Err(format!(
                "unknown policy '{}', expected error, omit or verbatim",
                other
            )),
        }
    }
}

/// Errors that can occur while resolving placeholders
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// No component is registered under this name
    #[error("unknown component <{name}>")]
    Unresolved { name: String, span: Span },

    /// The component exists but could not render
    #[error("<{name}>: {source}")]
    Callout {
        name: String,
        #[source]
        source: CalloutError,
        span: Span,
    },
}

impl ResolveError {
    /// Source span the error points at
    pub fn span(&self) -> &Span {
        match self {
            ResolveError::Unresolved { span, .. } | ResolveError::Callout { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let label = match self {
            ResolveError::Unresolved { .. } => "not registered".to_string(),
            ResolveError::Callout { source, .. } => source.to_string(),
        };
        report(self.span(), &self.to_string(), &label, source, filename)
    }
}

/// Everything a resolution pass reads. Borrowed, so one registry can serve
/// any number of concurrent passes.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub registry: &'a CalloutRegistry,
    pub links: &'a LinkTemplates,
    pub policy: UnresolvedPolicy,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(registry: &'a CalloutRegistry, links: &'a LinkTemplates) -> Self {
        Self {
            registry,
            links,
            policy: UnresolvedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Resolve every placeholder in a document and return the output text.
///
/// Prose is copied unchanged. All failures are collected so that a document
/// reports every broken placeholder at once.
pub fn resolve_document(
    doc: &Document,
    ctx: &ResolutionContext<'_>,
) -> Result<String, Vec<ResolveError>> {
    let mut output = String::new();
    let mut errors = Vec::new();

    for segment in &doc.segments {
        match &segment.node {
            Segment::Prose(text) => output.push_str(text),
            Segment::Placeholder(placeholder) => {
                match resolve_placeholder(placeholder, &segment.span, ctx) {
                    Ok(Some(html)) => output.push_str(&html),
                    Ok(None) => {}
                    Err(err) => errors.push(err),
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(output)
    } else {
        Err(errors)
    }
}

/// Resolve one placeholder. `Ok(None)` means the tag is dropped.
fn resolve_placeholder(
    placeholder: &Placeholder,
    span: &Span,
    ctx: &ResolutionContext<'_>,
) -> Result<Option<String>, ResolveError> {
    let name = placeholder.name.node.as_str();

    let Some(callout) = ctx.registry.resolve(name) else {
        return match ctx.policy {
            UnresolvedPolicy::Error => Err(ResolveError::Unresolved {
                name: name.to_string(),
                span: placeholder.name.span.clone(),
            }),
            UnresolvedPolicy::Omit => {
                warn!("dropping unknown component <{}> at {:?}", name, span);
                Ok(None)
            }
            UnresolvedPolicy::Verbatim => {
                warn!("keeping unknown component <{}> at {:?}", name, span);
                Ok(Some(placeholder.source.clone()))
            }
        };
    };

    let attrs: Attributes = placeholder
        .attributes
        .iter()
        .map(|attr| (attr.node.name.node.as_str(), attr.node.value.node.as_str()))
        .collect();

    debug!("resolving <{}> as {}", name, callout);
    callout
        .render(&attrs, ctx.links)
        .map(|fragment| Some(fragment.into_string()))
        .map_err(|source| {
            // Point at the offending attribute when there is one
            let span = placeholder
                .find(source.attribute())
                .map(|attr| attr.span.clone())
                .unwrap_or_else(|| span.clone());
            ResolveError::Callout {
                name: name.to_string(),
                source,
                span,
            }
        })
}

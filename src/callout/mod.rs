//! Callout components for puzzle writeups
//!
//! Content documents embed self-closing component tags that are replaced at
//! render time by small admonition boxes:
//!
//! ```text
//! <SolutionAvailable day="3" />
//! <SolutionNotYetAvailable day="9" />
//! <WriteupAvailable />
//! <WriteupNotYetAvailable />
//! ```
//!
//! A [`CalloutRegistry`] maps each tag name to a [`Callout`] variant. The
//! registry starts from the theme's defaults, then the site's own components
//! and any configured overrides are layered on top; later entries win.

mod registry;
mod resolver;
mod variants;

pub use registry::CalloutRegistry;
pub use resolver::{resolve_document, ResolutionContext, ResolveError, UnresolvedPolicy};
pub use variants::{
    escape_html, AdmonitionType, Attributes, Callout, CalloutError, Fragment, FIRST_DAY, LAST_DAY,
};

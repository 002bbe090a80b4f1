//! Renderer variants: the components a placeholder can resolve to
//!
//! Every variant renders an admonition box, the same layout the site theme
//! uses for its built-in `Admonition` component.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config::LinkTemplates;

/// First and last puzzle day of an event
pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 25;

/// Errors raised when a placeholder's attributes cannot produce a fragment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalloutError {
    /// A required attribute was not given
    #[error("missing required attribute `{attribute}` for {component}")]
    MissingAttribute {
        component: &'static str,
        attribute: &'static str,
    },

    /// An attribute was given but its value is unusable
    #[error("invalid value {value:?} for attribute `{attribute}` of {component}: {reason}")]
    InvalidAttribute {
        component: &'static str,
        attribute: &'static str,
        value: String,
        reason: String,
    },
}

impl CalloutError {
    /// Name of the attribute the error is about
    pub fn attribute(&self) -> &'static str {
        match self {
            CalloutError::MissingAttribute { attribute, .. }
            | CalloutError::InvalidAttribute { attribute, .. } => attribute,
        }
    }
}

/// A rendered HTML fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attribute values handed to a renderer.
///
/// A repeated name resolves to its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Admonition flavours supported by the site theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmonitionType {
    Note,
    Tip,
    #[default]
    Info,
    Caution,
    Danger,
}

impl AdmonitionType {
    pub const ALL: [AdmonitionType; 5] = [
        AdmonitionType::Note,
        AdmonitionType::Tip,
        AdmonitionType::Info,
        AdmonitionType::Caution,
        AdmonitionType::Danger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdmonitionType::Note => "note",
            AdmonitionType::Tip => "tip",
            AdmonitionType::Info => "info",
            AdmonitionType::Caution => "caution",
            AdmonitionType::Danger => "danger",
        }
    }

    /// Icon shown when the placeholder does not set one
    pub fn default_icon(self) -> &'static str {
        match self {
            AdmonitionType::Note | AdmonitionType::Info => "ℹ️",
            AdmonitionType::Tip => "💡",
            AdmonitionType::Caution => "⚠️",
            AdmonitionType::Danger => "🔥",
        }
    }

    /// Title shown when the placeholder does not set one
    pub fn default_title(self) -> &'static str {
        match self {
            AdmonitionType::Note => "Note",
            AdmonitionType::Tip => "Tip",
            AdmonitionType::Info => "Info",
            AdmonitionType::Caution => "Caution",
            AdmonitionType::Danger => "Danger",
        }
    }
}

impl FromStr for AdmonitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdmonitionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = AdmonitionType::ALL.iter().map(|t| t.as_str()).collect();
                format!("expected one of {}", names.join(", "))
            })
    }
}

/// A renderer variant. Placeholder names map to these through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Callout {
    /// Links to the puzzle and to the published solution
    SolutionAvailable,
    /// Links to the puzzle; the solution is not published yet
    SolutionPending,
    /// Points the reader to the writeup further down the page
    WriteupAvailable,
    /// States that the writeup does not exist yet
    WriteupPending,
    /// The theme's generic admonition box
    Admonition,
}

impl Callout {
    pub const ALL: [Callout; 5] = [
        Callout::SolutionAvailable,
        Callout::SolutionPending,
        Callout::WriteupAvailable,
        Callout::WriteupPending,
        Callout::Admonition,
    ];

    /// Kind name used in configuration files
    pub fn kind_name(self) -> &'static str {
        match self {
            Callout::SolutionAvailable => "solution-available",
            Callout::SolutionPending => "solution-pending",
            Callout::WriteupAvailable => "writeup-available",
            Callout::WriteupPending => "writeup-pending",
            Callout::Admonition => "admonition",
        }
    }

    /// Attributes that must be present for `render` to succeed
    pub fn required_attributes(self) -> &'static [&'static str] {
        match self {
            Callout::SolutionAvailable | Callout::SolutionPending => &["day"],
            Callout::WriteupAvailable | Callout::WriteupPending | Callout::Admonition => &[],
        }
    }

    /// Render this variant. Attributes the variant does not use are ignored.
    pub fn render(self, attrs: &Attributes, links: &LinkTemplates) -> Result<Fragment, CalloutError> {
        match self {
            Callout::SolutionAvailable => {
                let day = required_day(self, attrs)?;
                let body = format!(
                    "The full solution for <a href=\"{}\">day {}'s puzzle</a> can be found on <a href=\"{}\">GitHub</a>.",
                    escape_html(&links.puzzle_url(day)),
                    day,
                    escape_html(&links.solution_url(day)),
                );
                Ok(admonition(AdmonitionType::Info, "✅", "Full solution", &body))
            }
            Callout::SolutionPending => {
                let day = required_day(self, attrs)?;
                let body = format!(
                    "Unfortunately, my solution for <a href=\"{}\">day {}'s puzzle</a> is not yet available.",
                    escape_html(&links.puzzle_url(day)),
                    day,
                );
                Ok(admonition(
                    AdmonitionType::Info,
                    "🚧",
                    "Full solution not yet available",
                    &body,
                ))
            }
            Callout::WriteupAvailable => Ok(admonition(
                AdmonitionType::Info,
                "📘",
                "Writeup Available",
                "The writeup for this day's solution is available below 👇.",
            )),
            Callout::WriteupPending => Ok(admonition(
                AdmonitionType::Info,
                "📘",
                "Writeup Not Yet Available",
                "Unfortunately, my writeup for this day's solution is not yet available.",
            )),
            Callout::Admonition => {
                let kind = match attrs.get("type") {
                    Some(value) => value.parse::<AdmonitionType>().map_err(|reason| {
                        CalloutError::InvalidAttribute {
                            component: self.kind_name(),
                            attribute: "type",
                            value: value.to_string(),
                            reason,
                        }
                    })?,
                    None => AdmonitionType::default(),
                };
                let icon = attrs.get("icon").unwrap_or(kind.default_icon());
                let title = attrs.get("title").unwrap_or(kind.default_title());
                let text = attrs.get("text").unwrap_or_default();
                Ok(admonition(
                    kind,
                    &escape_html(icon),
                    &escape_html(title),
                    &escape_html(text),
                ))
            }
        }
    }
}

impl fmt::Display for Callout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

impl FromStr for Callout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Callout::ALL
            .into_iter()
            .find(|c| c.kind_name() == s)
            .ok_or_else(|| format!("unknown component kind '{}'", s))
    }
}

/// Read and validate the `day` attribute
fn required_day(callout: Callout, attrs: &Attributes) -> Result<u8, CalloutError> {
    let value = attrs.get("day").ok_or(CalloutError::MissingAttribute {
        component: callout.kind_name(),
        attribute: "day",
    })?;
    let invalid = |reason: String| CalloutError::InvalidAttribute {
        component: callout.kind_name(),
        attribute: "day",
        value: value.to_string(),
        reason,
    };
    // Plain digits only: `+3` and `03` would link to a day the author never wrote
    let digits = value.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected a day number".to_string()));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(invalid("day must not have leading zeros".to_string()));
    }
    let day: u8 = digits
        .parse()
        .map_err(|_| invalid("expected a day number".to_string()))?;
    if !(FIRST_DAY..=LAST_DAY).contains(&day) {
        return Err(invalid(format!(
            "day must be between {} and {}",
            FIRST_DAY, LAST_DAY
        )));
    }
    Ok(day)
}

/// Arguments are inserted as-is; callers escape untrusted text.
fn admonition(kind: AdmonitionType, icon: &str, title: &str, body: &str) -> Fragment {
    Fragment(format!(
        "<div class=\"admonition admonition-{}\">\n\
         <div class=\"admonition-heading\"><span class=\"admonition-icon\">{}</span> {}</div>\n\
         <div class=\"admonition-content\"><p>{}</p></div>\n\
         </div>",
        kind.as_str(),
        icon,
        title,
        body
    ))
}

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

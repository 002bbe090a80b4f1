//! Syntax tree for MDX-style content documents

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Root AST node - a content document split into prose and placeholders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub segments: Vec<Spanned<Segment>>,
}

impl Document {
    /// Iterate over the placeholder references in document order
    pub fn placeholders(&self) -> impl Iterator<Item = Spanned<&Placeholder>> + '_ {
        self.segments.iter().filter_map(|seg| match &seg.node {
            Segment::Placeholder(p) => Some(Spanned::new(p, seg.span.clone())),
            Segment::Prose(_) => None,
        })
    }
}

/// A run of the document
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text that passes through untouched (Markdown, HTML, code)
    Prose(String),
    /// A component tag to be replaced by a rendered fragment
    Placeholder(Placeholder),
}

/// A self-closing component tag such as `<SolutionAvailable day="3" />`
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: Spanned<String>,
    pub attributes: Vec<Spanned<Attribute>>,
    /// The tag exactly as written
    pub source: String,
}

impl Placeholder {
    /// Look up an attribute value. A repeated attribute resolves to its last occurrence.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|attr| attr.node.value.node.as_str())
    }

    /// The attribute node for `name`, last occurrence wins
    pub fn find(&self, name: &str) -> Option<&Spanned<Attribute>> {
        self.attributes
            .iter()
            .rev()
            .find(|attr| attr.node.name.node == name)
    }
}

/// `name="value"`, `name={value}` or a bare `name` (value `"true"`)
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<String>,
    pub value: Spanned<String>,
}

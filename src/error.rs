//! Error types for parsing and diagnostics

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Build a syntax error with no expectation list
    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// Source span the error points at
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                report(
                    span,
                    message,
                    &format!("{}{}", message, expected_str),
                    source,
                    filename,
                )
            }
        }
    }
}

/// Render a single-label ariadne report into a string
pub(crate) fn report(
    span: &Span,
    message: &str,
    label: &str,
    source: &str,
    filename: &str,
) -> String {
    let mut buf = Vec::new();
    // Spans are byte offsets into the document
    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);

    if written.is_err() {
        return format!("{}: {}", filename, message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::TagToken>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::TagToken>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of tag".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of tag".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a tag token for human-readable error messages
fn format_token(tok: &crate::parser::lexer::TagToken) -> String {
    use crate::parser::lexer::TagToken;
    match tok {
        TagToken::Ident(s) => format!("name '{}'", s),
        TagToken::String(s) => format!("string \"{}\"", s),
        TagToken::Expr(s) => format!("expression {{{}}}", s),
        TagToken::Open => "'<'".to_string(),
        TagToken::SelfClose => "'/>'".to_string(),
        TagToken::Close => "'>'".to_string(),
        TagToken::Slash => "'/'".to_string(),
        TagToken::Equals => "'='".to_string(),
    }
}

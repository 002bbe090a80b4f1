//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::lexer::{chunks, lex_tag, Chunk, Markup, TagToken};

/// Parse a content document into prose and placeholder segments.
///
/// Prose is kept byte for byte. Every malformed tag in the document is
/// reported, not just the first one.
pub fn parse(input: &str) -> Result<Document, Vec<ParseError>> {
    let mut segments = Vec::new();
    let mut errors = Vec::new();
    let mut prose: Option<Span> = None;

    for item in chunks(input) {
        let (chunk, span) = match item {
            Ok(chunk) => chunk,
            Err(span) => {
                flush_prose(input, &mut prose, &mut segments);
                errors.push(ParseError::syntax(
                    span.clone(),
                    format!("Unexpected input `{}`", &input[span]),
                ));
                continue;
            }
        };
        match chunk {
            Chunk::Code(_) | Chunk::Text | Chunk::Markup(Markup::Other) => {
                prose = Some(match prose {
                    Some(open) => open.start..span.end,
                    None => span,
                });
            }
            Chunk::Markup(Markup::Component) => {
                flush_prose(input, &mut prose, &mut segments);
                match parse_tag(&input[span.clone()], span.start) {
                    Ok(placeholder) => {
                        segments.push(Spanned::new(Segment::Placeholder(placeholder), span))
                    }
                    Err(errs) => errors.extend(errs),
                }
            }
            Chunk::Markup(Markup::Closing) => {
                flush_prose(input, &mut prose, &mut segments);
                errors.push(ParseError::syntax(
                    span.clone(),
                    format!(
                        "Unexpected closing tag `{}`; component tags must be self-closing",
                        &input[span]
                    ),
                ));
            }
            Chunk::Markup(Markup::Unclosed) => {
                // Lexing resumes right after the tag name, so later tags
                // are still found and checked
                flush_prose(input, &mut prose, &mut segments);
                errors.push(ParseError::syntax(
                    span.clone(),
                    format!("Unclosed tag `{}`", &input[span]),
                ));
            }
        }
    }
    flush_prose(input, &mut prose, &mut segments);

    if errors.is_empty() {
        Ok(Document { segments })
    } else {
        Err(errors)
    }
}

fn flush_prose(input: &str, prose: &mut Option<Span>, segments: &mut Vec<Spanned<Segment>>) {
    if let Some(span) = prose.take() {
        segments.push(Spanned::new(
            Segment::Prose(input[span.clone()].to_string()),
            span,
        ));
    }
}

/// Parse the text of a single tag found at `offset` in the document
fn parse_tag(tag: &str, offset: usize) -> Result<Placeholder, Vec<ParseError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for item in lex_tag(tag, offset) {
        match item {
            Ok(token) => tokens.push(token),
            Err(span) => {
                let text = &tag[span.start - offset..span.end - offset];
                errors.push(ParseError::syntax(
                    span,
                    format!("Unexpected character '{}'", text),
                ));
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let end = offset + tag.len();
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));
    let token_stream =
        Stream::from_iter(token_iter).map((end..end).into(), |(t, s): (_, _)| (t, s));

    let ((name, attributes), (self_closing, close_span)) = tag_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>())?;

    if !self_closing {
        return Err(vec![ParseError::syntax(
            close_span,
            "Component tags must be self-closing (`/>`)",
        )]);
    }

    Ok(Placeholder {
        name,
        attributes,
        source: tag.to_string(),
    })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Tag grammar: `<Name attr="v" ... />`. The second output reports whether
/// the tag was self-closing, with the span of its closing token.
fn tag_parser<'a, I>() -> impl Parser<
    'a,
    I,
    ((Spanned<String>, Vec<Spanned<Attribute>>), (bool, Span)),
    extra::Err<Rich<'a, TagToken>>,
> + Clone
where
    I: ValueInput<'a, Token = TagToken, Span = SimpleSpan>,
{
    let name = select! {
        TagToken::Ident(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let value = select! {
        TagToken::String(s) => s,
        TagToken::Expr(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    // A bare attribute (`<Admonition open />`) means `open="true"`
    let attribute = name
        .clone()
        .then(just(TagToken::Equals).ignore_then(value).or_not())
        .map_with(|(name, value), e| {
            let value =
                value.unwrap_or_else(|| Spanned::new("true".to_string(), name.span.clone()));
            Spanned::new(Attribute { name, value }, span_range(&e.span()))
        });

    let close = choice((
        just(TagToken::SelfClose).to(true),
        just(TagToken::Close).to(false),
    ))
    .map_with(|self_closing, e| (self_closing, span_range(&e.span())));

    just(TagToken::Open)
        .ignore_then(name)
        .then(attribute.repeated().collect::<Vec<_>>())
        .then(close)
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_placeholder(doc: &Document) -> &Placeholder {
        let placeholders: Vec<_> = doc.placeholders().collect();
        assert_eq!(placeholders.len(), 1, "expected one placeholder");
        placeholders[0].node
    }

    #[test]
    fn test_parse_prose_only() {
        let doc = parse("# Day 1\n\nSome *markdown*.\n").expect("Should parse");
        assert_eq!(doc.segments.len(), 1);
        assert_eq!(
            doc.segments[0].node,
            Segment::Prose("# Day 1\n\nSome *markdown*.\n".to_string())
        );
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("").expect("Should parse");
        assert!(doc.segments.is_empty());
    }

    #[test]
    fn test_parse_placeholder_with_attribute() {
        let doc = parse("Intro\n\n<SolutionAvailable day=\"3\" />\n").expect("Should parse");
        assert_eq!(doc.segments.len(), 3);
        let p = only_placeholder(&doc);
        assert_eq!(p.name.node, "SolutionAvailable");
        assert_eq!(p.get("day"), Some("3"));
        assert_eq!(p.source, "<SolutionAvailable day=\"3\" />");
    }

    #[test]
    fn test_placeholder_spans_are_absolute() {
        let input = "Intro <WriteupAvailable />";
        let doc = parse(input).expect("Should parse");
        let placeholder = doc.placeholders().next().expect("placeholder");
        assert_eq!(&input[placeholder.span.clone()], "<WriteupAvailable />");
        assert_eq!(&input[placeholder.node.name.span.clone()], "WriteupAvailable");
    }

    #[test]
    fn test_parse_expression_and_bare_attributes() {
        let doc = parse("<Admonition day={9} open />").expect("Should parse");
        let p = only_placeholder(&doc);
        assert_eq!(p.get("day"), Some("9"));
        assert_eq!(p.get("open"), Some("true"));
    }

    #[test]
    fn test_repeated_attribute_last_wins() {
        let doc = parse("<SolutionAvailable day=\"1\" day=\"2\" />").expect("Should parse");
        assert_eq!(only_placeholder(&doc).get("day"), Some("2"));
    }

    #[test]
    fn test_multiline_tag() {
        let doc = parse("<Admonition\n  type=\"tip\"\n  title=\"Hint\"\n/>").expect("Should parse");
        let p = only_placeholder(&doc);
        assert_eq!(p.get("type"), Some("tip"));
        assert_eq!(p.get("title"), Some("Hint"));
    }

    #[test]
    fn test_code_is_prose() {
        let doc = parse("```mdx\n<SolutionAvailable day=\"3\" />\n```\n").expect("Should parse");
        assert_eq!(doc.placeholders().count(), 0);
    }

    #[test]
    fn test_open_tag_error() {
        let errors = parse("<SolutionAvailable day=\"3\">").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(26..27));
        match &errors[0] {
            ParseError::Syntax { message, .. } => {
                assert!(message.contains("self-closing"), "got {}", message)
            }
        }
    }

    #[test]
    fn test_closing_tag_error() {
        let errors = parse("text </Solution> more").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(5..16));
    }

    #[test]
    fn test_missing_value_error() {
        let errors = parse("<SolutionAvailable day= />").unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ParseError::Syntax { message, .. } => {
                assert!(message.starts_with("Unexpected"), "got {}", message)
            }
        }
    }

    #[test]
    fn test_unquoted_value_error() {
        let errors = parse("<SolutionAvailable day=3 />").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(23..24));
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let input = "# Day 3\n\n<SolutionAvailable day=\"3 />\n\n<WriteupAvailable />\n";
        let errors = parse(input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(9..27));
        match &errors[0] {
            ParseError::Syntax { message, .. } => {
                assert_eq!(message, "Unclosed tag `<SolutionAvailable`")
            }
        }
    }

    #[test]
    fn test_unterminated_expression_is_error() {
        let errors = parse("<SolutionAvailable day={3 />").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(0..18));
    }

    #[test]
    fn test_nested_expression_attribute() {
        let doc = parse("<Admonition text={a{b}} />").expect("Should parse");
        assert_eq!(only_placeholder(&doc).get("text"), Some("a{b}"));
    }

    #[test]
    fn test_single_quoted_value_with_gt() {
        let doc = parse("<Admonition title='a > b' />").expect("Should parse");
        assert_eq!(only_placeholder(&doc).get("title"), Some("a > b"));
    }

    #[test]
    fn test_fenced_code_is_prose() {
        let tilde = "~~~\n<SolutionAvailable day=\"3\" />\n~~~\n";
        assert_eq!(parse(tilde).expect("Should parse").placeholders().count(), 0);

        let long = "````\n```\n<SolutionAvailable day=\"3\" />\n```\n````\n";
        assert_eq!(parse(long).expect("Should parse").placeholders().count(), 0);
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = parse("<A x=1 />\n\n<B>\n\n<C").unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}

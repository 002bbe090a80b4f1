//! Lexers for MDX-style documents using logos
//!
//! Lexing happens in two stages. [`Chunk`] splits a whole document into prose,
//! code and component tags; [`TagToken`] then tokenizes the interior of a
//! single tag for the grammar.
//!
//! Every document-level pattern starts on a distinct character, and the
//! callbacks scan tag bodies and code by hand, so no pattern ever depends on
//! a shorter fallback match.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// What a run of backticks or tildes turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Fenced code block, up to and including its closing fence
    Fence,
    /// Inline code span
    Span,
    /// Delimiters that open nothing
    Run,
}

/// What a `<` turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Component tag, `<` through the closing `>`
    Component,
    /// Component tag that never reaches its `>`; covers only `<Name`
    Unclosed,
    /// Closing component tag like `</Solution>`
    Closing,
    /// Anything else: lowercase HTML, a comparison, a lone `<`
    Other,
}

/// Coarse document-level tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    /// Code; its content is never scanned for tags
    #[regex(r"`+", backtick_code)]
    #[regex(r"~+", tilde_code)]
    Code(Code),

    #[token("<", markup)]
    Markup(Markup),

    /// Plain prose
    #[regex(r"[^<`~]+")]
    Text,
}

/// Tokens inside a single component tag
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\n\r]+")]
pub enum TagToken {
    #[token("<")]
    Open,
    #[token("/>")]
    SelfClose,
    #[token(">")]
    Close,
    #[token("/")]
    Slash,
    #[token("=")]
    Equals,

    /// Component or attribute name
    #[regex(r"[A-Za-z_][A-Za-z0-9_\-.:]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Quoted attribute value, double or single quotes
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()))]
    String(String),

    /// JSX expression value like `{3}` or `{"3"}`; braces may nest
    #[token("{", expression)]
    Expr(String),
}

fn unquote(s: &str) -> String {
    s[1..s.len() - 1].to_string()
}

/// Literal value of a `{...}` expression; string literals lose their quotes
fn expression_value(s: &str) -> String {
    let inner = s[1..s.len() - 1].trim();
    let quoted = inner.len() >= 2
        && ((inner.starts_with('"') && inner.ends_with('"'))
            || (inner.starts_with('\'') && inner.ends_with('\''))
            || (inner.starts_with('`') && inner.ends_with('`')));
    if quoted {
        unquote(inner)
    } else {
        inner.to_string()
    }
}

fn expression(lex: &mut Lexer<'_, TagToken>) -> Option<String> {
    let start = lex.span().start;
    let end = skip_expression(lex.source()[start..].as_bytes(), 0)?;
    lex.bump(end - 1);
    Some(expression_value(&lex.source()[start..start + end]))
}

fn markup(lex: &mut Lexer<'_, Chunk>) -> Markup {
    let rest = lex.remainder().as_bytes();
    match rest.first() {
        Some(b) if b.is_ascii_uppercase() => {
            let name = name_len(rest);
            match tag_body_len(&rest[name..]) {
                Some(body) => {
                    lex.bump(name + body);
                    Markup::Component
                }
                None => {
                    lex.bump(name);
                    Markup::Unclosed
                }
            }
        }
        Some(b'/') if rest.get(1).is_some_and(u8::is_ascii_uppercase) => {
            let name = 1 + name_len(&rest[1..]);
            lex.bump(name + tag_body_len(&rest[name..]).unwrap_or(0));
            Markup::Closing
        }
        _ => Markup::Other,
    }
}

fn name_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.'))
        .count()
}

/// Length of a tag body through its `>`. Quoted values and `{...}`
/// expressions may hold `<` and `>`. A bare `<` or a blank line ends the
/// search.
fn tag_body_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            b'<' => return None,
            b'"' | b'\'' => i = skip_quoted(bytes, i)?,
            b'{' => i = skip_expression(bytes, i)?,
            b'\n' if blank_line_at(bytes, i) => return None,
            _ => i += 1,
        }
    }
    None
}

/// Index just past the quote matching the one at `start`
fn skip_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b if b == quote => return Some(i + 1),
            b'\n' if blank_line_at(bytes, i) => return None,
            _ => i += 1,
        }
    }
    None
}

/// Index just past the `}` balancing the `{` at `start`
fn skip_expression(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'"' | b'\'' | b'`' => {
                i = skip_quoted(bytes, i)?;
                continue;
            }
            b'\n' if blank_line_at(bytes, i) => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// True if the line after the newline at `i` holds only whitespace
fn blank_line_at(bytes: &[u8], i: usize) -> bool {
    bytes[i + 1..]
        .iter()
        .find(|b| !matches!(b, b' ' | b'\t' | b'\r'))
        .is_some_and(|b| *b == b'\n')
}

fn backtick_code(lex: &mut Lexer<'_, Chunk>) -> Code {
    let run = lex.slice().len();
    let rest = lex.remainder();
    // A backtick fence's info string cannot contain backticks
    let info = rest.split('\n').next().unwrap_or_default();
    if run >= 3 && at_line_start(lex) && !info.contains('`') {
        lex.bump(fence_len(rest, '`', run));
        return Code::Fence;
    }
    match inline_span_len(rest.as_bytes(), run) {
        Some(len) => {
            lex.bump(len);
            Code::Span
        }
        None => Code::Run,
    }
}

fn tilde_code(lex: &mut Lexer<'_, Chunk>) -> Code {
    let run = lex.slice().len();
    if run >= 3 && at_line_start(lex) {
        lex.bump(fence_len(lex.remainder(), '~', run));
        Code::Fence
    } else {
        Code::Run
    }
}

/// Fences may be indented by up to three spaces
fn at_line_start(lex: &Lexer<'_, Chunk>) -> bool {
    let before = &lex.source()[..lex.span().start];
    let line = before.rsplit('\n').next().unwrap_or_default();
    line.len() <= 3 && line.bytes().all(|b| b == b' ')
}

/// Length of a fence body through its closing fence: a line of at least
/// `run` `delim` characters. An unclosed fence runs to the end of the input.
fn fence_len(rest: &str, delim: char, run: usize) -> usize {
    let Some(first) = rest.find('\n') else {
        return rest.len();
    };
    let mut offset = first + 1;
    while offset < rest.len() {
        let line_end = rest[offset..].find('\n').map_or(rest.len(), |i| offset + i);
        if closes_fence(&rest[offset..line_end], delim, run) {
            return line_end;
        }
        offset = line_end + 1;
    }
    rest.len()
}

fn closes_fence(line: &str, delim: char, run: usize) -> bool {
    let body = line.trim_start_matches(' ');
    if line.len() - body.len() > 3 {
        return false;
    }
    let after = body.trim_start_matches(delim);
    body.len() - after.len() >= run && after.trim().is_empty()
}

/// Length through a backtick run of exactly `run`, stopping at a blank line
fn inline_span_len(bytes: &[u8], run: usize) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                let len = bytes[i..].iter().take_while(|b| **b == b'`').count();
                if len == run {
                    return Some(i + len);
                }
                i += len;
            }
            b'\n' if blank_line_at(bytes, i) => return None,
            _ => i += 1,
        }
    }
    None
}

/// Split a document into chunks with spans.
///
/// The chunks cover the input without gaps. Input logos cannot classify comes
/// back as `Err(span)`.
pub fn chunks(input: &str) -> impl Iterator<Item = Result<(Chunk, Span), Span>> + '_ {
    Chunk::lexer(input)
        .spanned()
        .map(|(chunk, span)| chunk.map(|c| (c, span.clone())).map_err(|_| span))
}

/// Lex the text of one tag. `offset` is the tag's position in the document so
/// that spans stay absolute. Unlexable characters come back as `Err(span)`.
pub fn lex_tag(tag: &str, offset: usize) -> impl Iterator<Item = Result<(TagToken, Span), Span>> + '_ {
    TagToken::lexer(tag).spanned().map(move |(tok, span)| {
        let span = span.start + offset..span.end + offset;
        tok.map(|t| (t, span.clone())).map_err(|_| span)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_list(input: &str) -> Vec<(Chunk, Span)> {
        chunks(input).map(|c| c.expect("Should lex")).collect()
    }

    fn chunk_kinds(input: &str) -> Vec<Chunk> {
        chunk_list(input).into_iter().map(|(c, _)| c).collect()
    }

    fn tag_tokens(input: &str) -> Vec<TagToken> {
        lex_tag(input, 0).filter_map(Result::ok).map(|(t, _)| t).collect()
    }

    const COMPONENT: Chunk = Chunk::Markup(Markup::Component);
    const UNCLOSED: Chunk = Chunk::Markup(Markup::Unclosed);

    #[test]
    fn test_prose_and_tag() {
        assert_eq!(
            chunk_kinds("Intro\n<SolutionAvailable day=\"3\" />\nOutro"),
            vec![Chunk::Text, COMPONENT, Chunk::Text]
        );
    }

    #[test]
    fn test_lowercase_html_is_prose() {
        let kinds = chunk_kinds("a <b>bold</b> word, 1 < 2");
        assert!(
            kinds
                .iter()
                .all(|c| matches!(c, Chunk::Text | Chunk::Markup(Markup::Other))),
            "got {:?}",
            kinds
        );
    }

    #[test]
    fn test_code_fence_hides_tags() {
        let input = "```jsx\n<SolutionAvailable day=\"3\" />\n```";
        assert_eq!(chunk_kinds(input), vec![Chunk::Code(Code::Fence)]);
    }

    #[test]
    fn test_tilde_fence_hides_tags() {
        let input = "~~~\n<SolutionAvailable day=\"3\" />\n~~~\nafter";
        assert_eq!(
            chunk_list(input),
            vec![
                (Chunk::Code(Code::Fence), 0..37),
                (Chunk::Text, 37..43),
            ]
        );
    }

    #[test]
    fn test_long_fence_closes_on_long_run() {
        let input = "````md\n```\n<SolutionAvailable day=\"3\" />\n```\n````\n";
        assert_eq!(
            chunk_kinds(input),
            vec![Chunk::Code(Code::Fence), Chunk::Text]
        );
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        assert_eq!(
            chunk_kinds("text\n```\n<WriteupAvailable />\n"),
            vec![Chunk::Text, Chunk::Code(Code::Fence)]
        );
    }

    #[test]
    fn test_inline_code_hides_tags() {
        assert_eq!(
            chunk_kinds("use `<WriteupAvailable />` here"),
            vec![Chunk::Text, Chunk::Code(Code::Span), Chunk::Text]
        );
        assert_eq!(
            chunk_kinds("mid-line ``<A />`` too"),
            vec![Chunk::Text, Chunk::Code(Code::Span), Chunk::Text]
        );
    }

    #[test]
    fn test_stray_delimiters_are_runs() {
        assert_eq!(
            chunk_kinds("~~strike~~ and a ` tick"),
            vec![
                Chunk::Code(Code::Run),
                Chunk::Text,
                Chunk::Code(Code::Run),
                Chunk::Text,
                Chunk::Code(Code::Run),
                Chunk::Text,
            ]
        );
    }

    #[test]
    fn test_quoted_gt_stays_inside_tag() {
        assert_eq!(chunk_kinds(r#"<Admonition title="a > b" />"#), vec![COMPONENT]);
    }

    #[test]
    fn test_single_quoted_gt_stays_inside_tag() {
        assert_eq!(chunk_kinds("<Admonition title='a > b' />"), vec![COMPONENT]);
    }

    #[test]
    fn test_nested_expression_stays_inside_tag() {
        assert_eq!(chunk_kinds("<Admonition text={a{b}} />"), vec![COMPONENT]);
    }

    #[test]
    fn test_closing_and_unclosed_tags() {
        assert_eq!(
            chunk_list("</Solution>"),
            vec![(Chunk::Markup(Markup::Closing), 0..11)]
        );
        assert_eq!(
            chunk_list("<SolutionAvailable day=\"3\" extra"),
            vec![(UNCLOSED, 0..18), (Chunk::Text, 18..32)]
        );
    }

    #[test]
    fn test_unterminated_quote_stops_at_blank_line() {
        let input = "<SolutionAvailable day=\"3 />\n\n<WriteupAvailable />\n";
        assert_eq!(
            chunk_list(input),
            vec![
                (UNCLOSED, 0..18),
                (Chunk::Text, 18..30),
                (COMPONENT, 30..50),
                (Chunk::Text, 50..51),
            ]
        );
    }

    #[test]
    fn test_unterminated_expression_is_unclosed() {
        assert_eq!(
            chunk_kinds("<SolutionAvailable day={3 />"),
            vec![UNCLOSED, Chunk::Text]
        );
    }

    #[test]
    fn test_chunks_cover_input() {
        let input = "x `y` <A b=\"c\" /> ```\nz\n``` <lower> ` <B x={ />\n~~~\n<C/>";
        let mut end = 0;
        for (_, span) in chunk_list(input) {
            assert_eq!(span.start, end);
            end = span.end;
        }
        assert_eq!(end, input.len());
    }

    #[test]
    fn test_tag_tokens() {
        assert_eq!(
            tag_tokens(r#"<SolutionAvailable day="3" />"#),
            vec![
                TagToken::Open,
                TagToken::Ident("SolutionAvailable".to_string()),
                TagToken::Ident("day".to_string()),
                TagToken::Equals,
                TagToken::String("3".to_string()),
                TagToken::SelfClose,
            ]
        );
    }

    #[test]
    fn test_expression_values() {
        assert_eq!(
            tag_tokens("day={ 9 } title={\"x\"} note='y' text={a{b}}"),
            vec![
                TagToken::Ident("day".to_string()),
                TagToken::Equals,
                TagToken::Expr("9".to_string()),
                TagToken::Ident("title".to_string()),
                TagToken::Equals,
                TagToken::Expr("x".to_string()),
                TagToken::Ident("note".to_string()),
                TagToken::Equals,
                TagToken::String("y".to_string()),
                TagToken::Ident("text".to_string()),
                TagToken::Equals,
                TagToken::Expr("a{b}".to_string()),
            ]
        );
    }

    #[test]
    fn test_tag_spans_are_offset() {
        let spans: Vec<_> = lex_tag("<A />", 10)
            .filter_map(Result::ok)
            .map(|(_, s)| s)
            .collect();
        assert_eq!(spans, vec![10..11, 11..12, 13..15]);
    }

    #[test]
    fn test_unlexable_character_is_error() {
        let errors: Vec<_> = lex_tag("<A day=3 />", 0).filter_map(Result::err).collect();
        assert_eq!(errors, vec![7..8]);
    }

    #[test]
    fn test_unbalanced_expression_is_error() {
        assert!(lex_tag("<A day={3 />", 0).any(|t| t.is_err()));
    }
}

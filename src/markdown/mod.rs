//! Markdown -> formatted-text adapter.
//!
//! Parses the inline subset of Markdown (emphasis, strong, code spans,
//! links) into [`FormattedText<Markup>`] values: delimiter characters are
//! removed from the text and replaced by tagged ranges over the characters
//! that survive. Documents are blank-line-separated paragraphs plus ATX
//! headings.
//!
//! The adapter is forgiving about inline syntax — an unclosed `**` is just
//! text — but block structure it does not understand (fenced code, tables,
//! quotes, lists, ...) is reported as a typed [`MarkdownError`] rather than
//! silently mangled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markup::{FormattedText, Range};

/// Inline markup kinds produced by this adapter. The range tag type for the
/// whole Markdown/HTML pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Markup {
    Strong,
    Emphasis,
    Code,
    /// Link target URL, kept verbatim.
    Link(String),
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        /// Heading level (1..=6).
        level: u8,
        content: FormattedText<Markup>,
    },
    Paragraph {
        content: FormattedText<Markup>,
    },
}

/// Parse failure: the document uses block structure this adapter does not
/// support. Inline syntax never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkdownError {
    #[error("unsupported {construct} at line {line}")]
    UnsupportedBlock {
        construct: &'static str,
        line: usize,
    },
}

/// Parse a Markdown document into blocks.
///
/// Lines accumulate into a paragraph until a blank line or a heading;
/// paragraph lines join with a single space (soft breaks render as spaces).
pub fn parse(src: &str) -> Result<Vec<Block>, MarkdownError> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut para: Vec<&str> = Vec::new();

    let flush = |para: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if !para.is_empty() {
            let joined = para.join(" ");
            blocks.push(Block::Paragraph {
                content: parse_inline(&joined),
            });
            para.clear();
        }
    };

    for (idx, line) in src.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush(&mut para, &mut blocks);
            continue;
        }

        if let Some(construct) = unsupported_construct(line, trimmed, para.is_empty()) {
            return Err(MarkdownError::UnsupportedBlock {
                construct,
                line: line_no,
            });
        }

        if let Some((level, rest)) = parse_atx_heading(trimmed) {
            flush(&mut para, &mut blocks);
            blocks.push(Block::Heading {
                level,
                content: parse_inline(rest),
            });
            continue;
        }

        para.push(trimmed);
    }
    flush(&mut para, &mut blocks);
    Ok(blocks)
}

/// Block syntax we recognize but do not handle.
fn unsupported_construct(
    raw: &str,
    trimmed: &str,
    starts_block: bool,
) -> Option<&'static str> {
    if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
        return Some("fenced code block");
    }
    if trimmed.starts_with('>') {
        return Some("block quote");
    }
    if trimmed.starts_with('|') {
        return Some("table");
    }
    if trimmed.starts_with("- ") || trimmed.starts_with("+ ") || trimmed.starts_with("* ") {
        return Some("list item");
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0
        && (trimmed[digits..].starts_with(". ") || trimmed[digits..].starts_with(") "))
    {
        return Some("list item");
    }
    if trimmed.len() >= 3 {
        if trimmed.chars().all(|c| c == '=') {
            return Some("setext heading");
        }
        if trimmed.chars().all(|c| c == '-')
            || trimmed.chars().all(|c| c == '*')
            || trimmed.chars().all(|c| c == '_')
        {
            return Some("thematic break");
        }
    }
    if trimmed.starts_with('<')
        && trimmed[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
    {
        return Some("html block");
    }
    // indented code only opens a block; inside a paragraph it is lazy
    // continuation text.
    if starts_block && (raw.starts_with("    ") || raw.starts_with('\t')) {
        return Some("indented code block");
    }
    None
}

/// `#{1,6} Title`, with an optional closing hash run.
fn parse_atx_heading(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let rest = rest.trim_start().trim_end_matches('#').trim_end();
    Some((hashes as u8, rest))
}

/// Parse inline Markdown into a formatted text. Total: malformed syntax is
/// literal text.
pub fn parse_inline(src: &str) -> FormattedText<Markup> {
    let mut em = Emitter::default();
    scan(src, &mut em);
    FormattedText::from_parts(em.text, em.ranges)
}

#[derive(Default)]
struct Emitter {
    text: String,
    /// Position in characters, tracked alongside the byte-indexed text.
    pos: usize,
    ranges: Vec<Range<Markup>>,
}

impl Emitter {
    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.pos += 1;
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.pos += s.chars().count();
    }
}

fn scan(src: &str, em: &mut Emitter) {
    let mut i = 0usize;
    while i < src.len() {
        let rem = &src[i..];
        let c = rem.chars().next().unwrap_or_default();

        // backslash escape for ASCII punctuation.
        if c == '\\' {
            if let Some(next) = rem[1..].chars().next()
                && next.is_ascii_punctuation()
            {
                em.push_char(next);
                i += 1 + next.len_utf8();
                continue;
            }
            em.push_char('\\');
            i += 1;
            continue;
        }

        // `code` — contents are literal, never re-scanned. An empty span
        // (``) stays literal backticks.
        if c == '`' {
            if let Some(close) = rem[1..].find('`')
                && close > 0
            {
                let start = em.pos;
                em.push_str(&rem[1..1 + close]);
                em.ranges.push(Range::new(Markup::Code, start, em.pos));
                i += close + 2;
                continue;
            }
            em.push_char('`');
            i += 1;
            continue;
        }

        // **strong** before *emphasis*: the longer delimiter wins.
        if rem.starts_with("**") {
            if let Some(close) = find_span(&rem[2..], "**") {
                let start = em.pos;
                scan(&rem[2..2 + close], em);
                em.ranges.push(Range::new(Markup::Strong, start, em.pos));
                i += close + 4;
                continue;
            }
            em.push_str("**");
            i += 2;
            continue;
        }

        if c == '*' || c == '_' {
            let delim = if c == '*' { "*" } else { "_" };
            if let Some(close) = find_span(&rem[1..], delim) {
                let start = em.pos;
                scan(&rem[1..1 + close], em);
                em.ranges.push(Range::new(Markup::Emphasis, start, em.pos));
                i += close + 2;
                continue;
            }
            em.push_char(c);
            i += 1;
            continue;
        }

        // [label](url)
        if c == '[' {
            if let Some(label_end) = rem.find("](")
                && let Some(url_len) = rem[label_end + 2..].find(')')
            {
                let label = &rem[1..label_end];
                let url = &rem[label_end + 2..label_end + 2 + url_len];
                let start = em.pos;
                scan(label, em);
                em.ranges
                    .push(Range::new(Markup::Link(url.to_string()), start, em.pos));
                i += label_end + 2 + url_len + 1;
                continue;
            }
            em.push_char('[');
            i += 1;
            continue;
        }

        em.push_char(c);
        i += c.len_utf8();
    }
}

/// Find the byte offset of the closing delimiter for an emphasis span.
///
/// The span must be non-empty and must not start or end with whitespace, so
/// `2 * 3 * 4` stays arithmetic instead of becoming emphasized.
fn find_span(rest: &str, delim: &str) -> Option<usize> {
    let close = rest.find(delim)?;
    let inner = &rest[..close];
    if inner.is_empty() {
        return None;
    }
    let flanked = !inner.starts_with(|c: char| c.is_whitespace())
        && !inner.ends_with(|c: char| c.is_whitespace());
    flanked.then_some(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_has_no_ranges() {
        let ft = parse_inline("just words");
        assert_eq!(ft.text(), "just words");
        assert!(ft.ranges().is_empty());
    }

    #[test]
    fn strong_and_emphasis_strip_delimiters() {
        let ft = parse_inline("a **bold** and *soft* word");
        assert_eq!(ft.text(), "a bold and soft word");
        assert_eq!(
            ft.ranges(),
            &[
                Range::new(Markup::Strong, 2, 6),
                Range::new(Markup::Emphasis, 11, 15),
            ]
        );
    }

    #[test]
    fn underscore_emphasis() {
        let ft = parse_inline("an _aside_ here");
        assert_eq!(ft.text(), "an aside here");
        assert_eq!(ft.ranges(), &[Range::new(Markup::Emphasis, 3, 8)]);
    }

    #[test]
    fn emphasis_nests_inside_strong() {
        let ft = parse_inline("**bold *both* bold**");
        assert_eq!(ft.text(), "bold both bold");
        assert_eq!(
            ft.ranges(),
            &[
                Range::new(Markup::Emphasis, 5, 9),
                Range::new(Markup::Strong, 0, 14),
            ]
        );
    }

    #[test]
    fn code_contents_are_literal() {
        let ft = parse_inline("run `cargo *test*` now");
        assert_eq!(ft.text(), "run cargo *test* now");
        assert_eq!(ft.ranges(), &[Range::new(Markup::Code, 4, 16)]);
    }

    #[test]
    fn links_capture_the_url() {
        let ft = parse_inline("see [the docs](https://example.com) for more");
        assert_eq!(ft.text(), "see the docs for more");
        assert_eq!(
            ft.ranges(),
            &[Range::new(
                Markup::Link("https://example.com".to_string()),
                4,
                12
            )]
        );
    }

    #[test]
    fn link_labels_parse_inline_markup() {
        let ft = parse_inline("[**bold** link](x)");
        assert_eq!(ft.text(), "bold link");
        assert_eq!(
            ft.ranges(),
            &[
                Range::new(Markup::Strong, 0, 4),
                Range::new(Markup::Link("x".to_string()), 0, 9),
            ]
        );
    }

    #[test]
    fn unclosed_delimiters_are_literal() {
        assert_eq!(parse_inline("a ** b").text(), "a ** b");
        assert_eq!(parse_inline("a `tick").text(), "a `tick");
        assert_eq!(parse_inline("[label](oops").text(), "[label](oops");
        assert!(parse_inline("a ** b").ranges().is_empty());
    }

    #[test]
    fn surrounding_whitespace_blocks_emphasis() {
        let ft = parse_inline("2 * 3 * 4");
        assert_eq!(ft.text(), "2 * 3 * 4");
        assert!(ft.ranges().is_empty());
    }

    #[test]
    fn escapes_suppress_markup() {
        let ft = parse_inline(r"\*not em\*");
        assert_eq!(ft.text(), "*not em*");
        assert!(ft.ranges().is_empty());
    }

    #[test]
    fn positions_count_chars_not_bytes() {
        let ft = parse_inline("héé **öü** x");
        assert_eq!(ft.text(), "héé öü x");
        assert_eq!(ft.ranges(), &[Range::new(Markup::Strong, 4, 6)]);
    }

    #[test]
    fn headings_and_paragraphs() {
        let blocks = parse("# Title\n\nFirst para\nstill first\n\nSecond **para**\n").unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                content: parse_inline("Title"),
            }
        );
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                content: parse_inline("First para still first"),
            }
        );
        assert_eq!(
            blocks[2],
            Block::Paragraph {
                content: parse_inline("Second **para**"),
            }
        );
    }

    #[test]
    fn heading_levels_and_closing_hashes() {
        let blocks = parse("### Deep ###\n").unwrap();
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 3,
                content: parse_inline("Deep"),
            }]
        );
        // seven hashes is not a heading.
        let blocks = parse("####### nope\n").unwrap();
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn unsupported_structure_is_a_typed_error() {
        let cases = [
            ("```rust\nfn x() {}\n```\n", "fenced code block", 1),
            ("ok\n\n> quoted\n", "block quote", 3),
            ("| a | b |\n", "table", 1),
            ("- item\n", "list item", 1),
            ("1. item\n", "list item", 1),
            ("para\n\n---\n", "thematic break", 3),
            ("Title\n===\n", "setext heading", 2),
            ("<div>\n", "html block", 1),
            ("    indented\n", "indented code block", 1),
        ];
        for (src, construct, line) in cases {
            assert_eq!(
                parse(src),
                Err(MarkdownError::UnsupportedBlock { construct, line }),
                "src={src:?}"
            );
        }
    }

    #[test]
    fn error_message_names_construct_and_line() {
        let err = parse("x\n\n| t |\n").unwrap_err();
        assert_eq!(err.to_string(), "unsupported table at line 3");
    }
}

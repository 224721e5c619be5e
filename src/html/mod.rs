//! Formatted text -> HTML renderer.
//!
//! Inline content goes through the nesting forest: overlapping ranges come
//! out as properly nested (possibly split) elements, so `<strong>` and
//! `<em>` always close in the right order no matter how the ranges crossed.

use deunicode::deunicode;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::frontmatter::DocMeta;
use crate::markdown::{Block, Markup};
use crate::markup::FormattedText;

/// Rendering options that control the shape of the output document.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Wrap the rendered blocks in a full `<!DOCTYPE html>` document with a
    /// `<head>` built from the frontmatter metadata.
    pub document_shell: bool,

    /// Emit `id` attributes on headings for stable fragment links.
    pub heading_ids: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            document_shell: true,
            heading_ids: true,
        }
    }
}

/// Render parsed blocks, optionally wrapped in a document shell.
pub fn render_blocks(blocks: &[Block], meta: &DocMeta, opts: &HtmlOptions) -> String {
    let mut body = String::new();
    for block in blocks {
        body.push_str(&render_block(block, opts));
        body.push('\n');
    }

    if !opts.document_shell {
        return body;
    }

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let title = meta.title.as_deref().unwrap_or("Untitled");
    out.push_str(&format!(
        "<title>{}</title>\n",
        html_escape::encode_text(title)
    ));
    if !meta.tags.is_empty() {
        out.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            html_escape::encode_double_quoted_attribute(&meta.tags.join(", "))
        ));
    }
    if let Some(summary) = meta.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            html_escape::encode_double_quoted_attribute(summary)
        ));
    }
    out.push_str(&format!("<!-- generated by rangemark on {} -->\n", today()));
    out.push_str("</head>\n<body>\n");
    out.push_str(&body);
    out.push_str("</body>\n</html>\n");
    out
}

fn render_block(block: &Block, opts: &HtmlOptions) -> String {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            let inner = render_inline(content);
            if opts.heading_ids {
                let slug = heading_slug(content.text());
                format!("<h{level} id=\"{slug}\">{inner}</h{level}>")
            } else {
                format!("<h{level}>{inner}</h{level}>")
            }
        }
        Block::Paragraph { content } => format!("<p>{}</p>", render_inline(content)),
    }
}

/// Render one formatted text as inline HTML.
pub fn render_inline(content: &FormattedText<Markup>) -> String {
    content
        .trees(
            |text| html_escape::encode_text(text).into_owned(),
            |tag, children| {
                let inner = children.concat();
                match tag {
                    Markup::Strong => format!("<strong>{inner}</strong>"),
                    Markup::Emphasis => format!("<em>{inner}</em>"),
                    Markup::Code => format!("<code>{inner}</code>"),
                    Markup::Link(url) => format!(
                        "<a href=\"{}\">{inner}</a>",
                        html_escape::encode_double_quoted_attribute(url)
                    ),
                }
            },
        )
        .concat()
}

/// Fragment identifier for a heading: transliterated into the 26-letter
/// English alphabet, lowercased, with everything else collapsed to hyphens.
fn heading_slug(text: &str) -> String {
    let mut slug = String::new();
    for c in deunicode(text).to_ascii_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn today() -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .format(&fmt)
        .unwrap_or_else(|_| "unknown".to_string())
}

//! YAML frontmatter handling for Markdown input.
//!
//! Goals:
//! - Split a leading frontmatter block off verbatim before the Markdown
//!   grammar ever sees it (range positions are measured over the body only).
//! - Extract the metadata the HTML shell cares about, best-effort: a bad or
//!   alien YAML document never fails the conversion, it just yields empty
//!   metadata.

use serde_yaml::Value;

/// Metadata extracted from frontmatter for the HTML document shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMeta {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
}

/// If `text` starts with YAML frontmatter (`---` ... `---`), return the
/// frontmatter block verbatim (both `---` lines and their original newlines
/// included) and the remainder of the document.
pub fn split_yaml_frontmatter(text: &str) -> Option<(String, &str)> {
    // "---" must be exactly the first line; accept both \n and \r\n.
    if !(text.starts_with("---\n") || text.starts_with("---\r\n")) {
        return None;
    }

    let mut lines = text.split_inclusive('\n');
    let mut pos = lines.next()?.len();
    for line in lines {
        pos += line.len();
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some((text[..pos].to_string(), &text[pos..]));
        }
    }
    None
}

/// Extract known metadata keys from a frontmatter block.
///
/// `title` and `summary` accept any scalar; `tags` accepts a sequence of
/// scalars or a single scalar. Unknown keys are ignored.
pub fn parse_meta(frontmatter: &str) -> DocMeta {
    let yaml = frontmatter
        .trim()
        .trim_start_matches("---")
        .trim_end_matches("---");

    let Ok(value) = serde_yaml::from_str::<Value>(yaml) else {
        return DocMeta::default();
    };
    let Some(map) = value.as_mapping() else {
        return DocMeta::default();
    };

    let scalar = |key: &str| -> Option<String> { map.get(Value::from(key)).and_then(scalar_string) };

    let tags = match map.get(Value::from("tags")) {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
        None => Vec::new(),
    };

    DocMeta {
        title: scalar("title"),
        tags,
        summary: scalar("summary"),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

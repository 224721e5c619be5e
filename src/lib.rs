pub mod envelope;
pub mod frontmatter;
pub mod html;
pub mod markdown;
pub mod markup;

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

use crate::markdown::MarkdownError;

/// A fully parsed input document: frontmatter metadata plus Markdown blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDoc {
    pub meta: frontmatter::DocMeta,
    pub blocks: Vec<markdown::Block>,

    /// Character length of the Markdown body (frontmatter excluded).
    pub body_char_len: usize,
}

/// Split frontmatter off `src` and parse the Markdown body.
pub fn parse_document(src: &str) -> Result<ParsedDoc, MarkdownError> {
    let (meta, body) = match frontmatter::split_yaml_frontmatter(src) {
        Some((fm, rest)) => (frontmatter::parse_meta(&fm), rest),
        None => (frontmatter::DocMeta::default(), src),
    };
    let blocks = markdown::parse(body)?;
    Ok(ParsedDoc {
        meta,
        blocks,
        body_char_len: body.chars().count(),
    })
}

/// Convert a Markdown string to HTML.
pub fn convert_str(src: &str, opts: &html::HtmlOptions) -> Result<String, MarkdownError> {
    let doc = parse_document(src)?;
    Ok(html::render_blocks(&doc.blocks, &doc.meta, opts))
}

/// Single file mode: read, convert, and return the HTML.
pub fn convert_file(path: &Path, opts: &html::HtmlOptions) -> Result<String, Box<dyn Error>> {
    let doc = parse_file(path)?;
    Ok(html::render_blocks(&doc.blocks, &doc.meta, opts))
}

/// Read and parse one Markdown file. Invalid UTF-8 falls back to lossy
/// conversion rather than failing the run.
pub fn parse_file(path: &Path) -> Result<ParsedDoc, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let src = String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).to_string());

    parse_document(&src).map_err(|e| format!("{}: {e}", path.display()).into())
}

/// Write the JSON envelope for a parsed document.
///
/// Prettified so it's easy to inspect / diff.
pub fn write_json_envelope(
    doc: &ParsedDoc,
    src_path: Option<&Path>,
    json_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let file = envelope::DocFile {
        schema_version: envelope::SCHEMA_VERSION,
        generator: envelope::GeneratorInfo::default(),
        position_encoding: envelope::PositionEncoding::default(),
        source: envelope::SourceInfo {
            path: src_path.map(|p| p.to_string_lossy().to_string()),
            char_len: doc.body_char_len as u64,
        },
        blocks: doc.blocks.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(json_path, json)?;
    Ok(())
}

/// Bulk mode: walk `src_root` and convert every `.md` file into a matching
/// `.html` file under `out_root`, preserving the directory structure.
/// Returns the number of files converted.
pub fn convert_dir(
    src_root: &Path,
    out_root: &Path,
    opts: &html::HtmlOptions,
) -> Result<usize, Box<dyn Error>> {
    let start_time = Instant::now();

    if !src_root.exists() {
        return Err(format!("Markdown source directory not found: {}", src_root.display()).into());
    }

    let mut entries: Vec<_> = WalkDir::new(src_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "md"))
        .collect();

    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let total = entries.len();
    let mut count = 0;

    for entry in entries {
        let path = entry.path();
        // mirror the source layout under the output root.
        let relative = path.strip_prefix(src_root)?;
        let mut out_path = out_root.join(relative);
        out_path.set_extension("html");

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let html = convert_file(path, opts)?;
        fs::write(&out_path, html)?;

        count += 1;

        let elapsed = start_time.elapsed();
        let total_ms = elapsed.as_millis();
        let secs = total_ms / 1_000;
        let ms = total_ms % 1_000;
        eprintln!(
            "[{:>4}/{:>4}] [{:02}.{:03}s] Converted: {:?}",
            count, total, secs, ms, out_path
        );
    }

    eprintln!(
        "Done. Converted {} files in {:.3}s.",
        count,
        start_time.elapsed().as_secs_f64()
    );
    Ok(count)
}

//! AFL++ fuzz target for `rangemark`.
//!
//! This binary is intentionally stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin rangemark_afl_parse
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/rangemark_afl_parse
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use rangemark::envelope::{DocFile, GeneratorInfo, PositionEncoding, SourceInfo, SCHEMA_VERSION};
use rangemark::html::{render_blocks, HtmlOptions};
use rangemark::markdown::{Block, Markup};
use rangemark::markup::{build_forest, segment, FormattedText, Forest, Range};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

fn check_ranges(ft: &FormattedText<Markup>) {
    let len = ft.char_len();
    for r in ft.ranges() {
        assert!(r.start < r.end, "empty or inverted range retained: {r:?}");
        assert!(r.end <= len, "range out of bounds (len={len}): {r:?}");
    }
    // same-tag ranges must be disjoint and non-touching.
    for (i, a) in ft.ranges().iter().enumerate() {
        for b in &ft.ranges()[i + 1..] {
            if a.tag == b.tag {
                assert!(
                    a.end < b.start || b.end < a.start,
                    "same-tag ranges overlap or touch: {a:?} {b:?}"
                );
            }
        }
    }
}

fn check_forest(forest: &Forest<Markup>, parent: Option<&Range<Markup>>) {
    let mut prev_end = 0;
    for tree in forest {
        assert!(
            tree.range.start >= prev_end,
            "siblings overlap or are unsorted: {:?}",
            tree.range
        );
        prev_end = tree.range.end;
        if let Some(p) = parent {
            assert!(
                p.start <= tree.range.start && tree.range.end <= p.end,
                "child escapes parent: {:?} in {p:?}",
                tree.range
            );
        }
        check_forest(&tree.children, Some(&tree.range));
    }
}

fn check_block(block: &Block) {
    let content = match block {
        Block::Heading { content, .. } | Block::Paragraph { content } => content,
    };
    check_ranges(content);
    check_forest(&build_forest(content.ranges()), None);

    // flat segmentation must cover the text exactly.
    let chunks = segment(content.ranges(), content.text());
    let rebuilt: String = chunks.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(rebuilt, content.text(), "chunks do not cover the text");
}

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        // guardrail: avoid pathological OOM / quadratic behavior on enormous inputs.
        return;
    }

    // AFL++ will happily hand us arbitrary bytes. lossy conversion keeps the
    // harness total (no early returns that reduce coverage).
    let src = String::from_utf8_lossy(data).to_string();

    // parsing is total: a typed error or a block list, never a panic.
    let Ok(doc) = rangemark::parse_document(&src) else {
        return;
    };

    // invariants that must hold for any input:
    // - range bounds stay inside each block's text
    // - same-tag ranges never overlap or touch
    // - the nesting forest is ordered, disjoint, and properly contained
    for block in &doc.blocks {
        check_block(block);
    }

    // JSON round-trip must never panic.
    let file = DocFile {
        schema_version: SCHEMA_VERSION,
        generator: GeneratorInfo::default(),
        position_encoding: PositionEncoding::default(),
        source: SourceInfo {
            path: None,
            char_len: doc.body_char_len as u64,
        },
        blocks: doc.blocks.clone(),
    };
    let json = serde_json::to_vec(&file).unwrap();
    let back: DocFile = serde_json::from_slice(&json).unwrap();

    // rendering should never panic.
    let _html = render_blocks(&back.blocks, &doc.meta, &HtmlOptions::default());
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}

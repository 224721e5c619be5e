//! Lightweight fuzz-style tests; no external fuzz harness required.

use rangemark::markdown::{parse, Block, Markup};
use rangemark::markup::{build_forest, segment, FormattedText, Forest, Range};

fn check_ranges(ft: &FormattedText<Markup>) {
    let len = ft.char_len();
    for r in ft.ranges() {
        assert!(r.start < r.end, "empty or inverted range retained: {r:?}");
        assert!(r.end <= len, "range out of bounds (len={len}): {r:?}");
    }
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
            "siblings overlap or unsorted: {:?}",
            tree.range
        );
        prev_end = tree.range.end;
        if let Some(p) = parent {
            assert!(p.start <= tree.range.start && tree.range.end <= p.end);
        }
        check_forest(&tree.children, Some(&tree.range));
    }
}

/// Parse must be total and every parsed block must satisfy the formatted-text
/// invariants, build a well-formed forest, and segment into full coverage.
fn check_one_input(src: &str) {
    let Ok(blocks) = parse(src) else {
        return;
    };
    for block in &blocks {
        let content = match block {
            Block::Heading { content, .. } | Block::Paragraph { content } => content,
        };
        check_ranges(content);
        check_forest(&build_forest(content.ranges()), None);

        let chunks = segment(content.ranges(), content.text());
        let rebuilt: String = chunks.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(rebuilt, content.text(), "chunks must cover: {src:?}");
    }
}

#[test]
fn adversarial_inline_inputs_hold_invariants() {
    let cases = [
        "",
        "plain",
        "**",
        "****",
        "*****bold*****",
        "**a*b**c*",
        "*_`[",
        "`` ` ``",
        "**unclosed and *nested",
        "[label](url) [](empty) [x]()",
        "[a](b) ** [c](d",
        "a _b *c_ d* e",
        "\\*\\*\\`\\[\\]",
        "``code`` and `code`",
        "**bo*ld** it*",
        "héé **öü** 日本語 `中`",
        "x\r\ny **crlf**\r\n",
    ];
    for src in cases {
        check_one_input(src);
    }
}

#[test]
fn pathological_delimiter_runs_are_treated_as_text() {
    // huge runs of opening delimiters must neither panic nor produce markup.
    // the leading letter keeps an all-punctuation line from reading as a
    // thematic break.
    for delim in ["*", "_", "`", "["] {
        let src = format!("x{}", delim.repeat(2_000));
        check_one_input(&src);
        let blocks = parse(&src).expect("a delimiter run is ordinary text");
        assert_eq!(blocks.len(), 1);
        let Block::Paragraph { content } = &blocks[0] else {
            panic!("expected a paragraph for {delim:?} run");
        };
        assert!(
            content.ranges().is_empty(),
            "delimiter run produced markup for {delim:?}"
        );
        assert_eq!(content.text(), src);
    }
}

#[test]
fn many_ranges_survive_json_round_trip() {
    // ranges are stored flat, so even a markup-dense document must round-trip
    // through pretty JSON without hitting recursion limits.
    let src = "**a** *b* `c` [d](e) ".repeat(200);
    let blocks = parse(&src).expect("parse");
    let total_ranges: usize = blocks
        .iter()
        .map(|b| match b {
            Block::Heading { content, .. } | Block::Paragraph { content } => content.ranges().len(),
        })
        .sum();
    assert_eq!(total_ranges, 800);

    let json = serde_json::to_string_pretty(&blocks).expect("serialize");
    let back: Vec<Block> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(blocks, back);
}

#[test]
fn random_byte_soup_never_panics() {
    // a tiny deterministic generator keeps this reproducible without an
    // external fuzzing dependency.
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..200 {
        let mut src = String::new();
        for _ in 0..64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let c = match state % 16 {
                0 => '*',
                1 => '_',
                2 => '`',
                3 => '[',
                4 => ']',
                5 => '(',
                6 => ')',
                7 => '#',
                8 => '\\',
                9 => '\n',
                10 => ' ',
                11 => 'é',
                _ => 'a',
            };
            src.push(c);
        }
        check_one_input(&src);
    }
}

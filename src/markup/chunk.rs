//! Flat chunk segmentation.
//!
//! The non-nesting sibling of the forest builder: [`segment`] decomposes text
//! into runs with a constant active-tag set, for callers that render flat
//! styled spans instead of a hierarchy. A chunk boundary appears at **every**
//! range edge, even when the active set happens not to change across it —
//! client code relies on seeing a cut at each edge, so adjacent chunks with
//! identical tag sets are not merged.

use crate::markup::slice::{char_len, char_slice};
use crate::markup::{FormattedText, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

/// Cut `text` into `(segment, active tags)` chunks covering it with no gaps.
///
/// Boundary events are processed right to left, repeatedly cutting the
/// rightmost fragment: an `End` event opens its tag for the fragment being
/// cut, a `Start` event closes it again. Zero-length fragments (from
/// coincident boundaries) are discarded. Tag order within a chunk is
/// discovery order.
pub fn segment<T: Clone + PartialEq>(ranges: &[Range<T>], text: &str) -> Vec<(String, Vec<T>)> {
    let len = char_len(text);

    let mut events: Vec<(usize, Boundary, &T)> = Vec::with_capacity(ranges.len() * 2);
    for r in ranges {
        events.push((r.start.min(len), Boundary::Start, &r.tag));
        events.push((r.end.min(len), Boundary::End, &r.tag));
    }
    events.sort_by_key(|(pos, _, _)| *pos);

    let mut chunks: Vec<(String, Vec<T>)> = Vec::new();
    let mut open: Vec<T> = Vec::new();
    let mut cursor = len;
    for (pos, boundary, tag) in events.iter().rev() {
        if *pos < cursor {
            chunks.push((char_slice(text, *pos, cursor).to_string(), open.clone()));
            cursor = *pos;
        }
        match boundary {
            Boundary::End => open.insert(0, (*tag).clone()),
            Boundary::Start => {
                if let Some(i) = open.iter().position(|t| t == *tag) {
                    open.remove(i);
                }
            }
        }
    }
    if cursor > 0 {
        chunks.push((char_slice(text, 0, cursor).to_string(), open));
    }
    chunks.reverse();
    chunks
}

/// Inverse of [`segment`]: concatenate the chunks, applying each tag over the
/// whole fragment it came with. Folds right to left; every application goes
/// through invariant-preserving insertion, so same-tag runs that were cut
/// apart merge back together.
pub fn desegment<T: Clone + PartialEq>(chunks: &[(String, Vec<T>)]) -> FormattedText<T> {
    chunks
        .iter()
        .rev()
        .fold(FormattedText::new(""), |acc, (text, tags)| {
            let mut piece = FormattedText::new(text.clone());
            let len = piece.char_len();
            for tag in tags {
                piece = piece.add_range(Range::new(tag.clone(), 0, len));
            }
            piece.append(acc)
        })
}

impl<T: Clone + PartialEq> FormattedText<T> {
    /// [`segment`] applied to this value's text and ranges.
    pub fn chunks(&self) -> Vec<(String, Vec<T>)> {
        segment(self.ranges(), self.text())
    }
}

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::Serialize;

use crate::markup::slice::char_len;
use crate::markup::Range;

/// Plain text plus an invariant-preserving set of tagged ranges.
///
/// Invariants, re-established atomically on every insertion:
/// - For any tag, ranges carrying it are pairwise disjoint and non-touching
///   (touching ranges merge into one).
/// - No zero-length range is retained.
/// - All bounds lie within `[0, char_len(text)]`.
///
/// Ranges with *different* tags may overlap arbitrarily; resolving that into
/// a nesting order is [`build_forest`](crate::markup::build_forest)'s job.
///
/// The text itself never mutates. Operations that change it (`append`,
/// `slice`, `reverse`, ...) build a brand-new value with recomputed ranges.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedText<T> {
    text: String,
    ranges: Vec<Range<T>>,
}

impl<T> FormattedText<T> {
    /// A formatted text with no ranges.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ranges: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The ranges, in first-seen-distinct-tag discovery order: a merge keeps
    /// the position of the first range it absorbed.
    pub fn ranges(&self) -> &[Range<T>] {
        &self.ranges
    }

    /// Length in characters; all range bounds live in `[0, char_len()]`.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Decompose into the owned text and range list.
    pub fn into_parts(self) -> (String, Vec<Range<T>>) {
        (self.text, self.ranges)
    }
}

impl<T: Clone + PartialEq> FormattedText<T> {
    /// Insert a range, re-establishing every invariant.
    ///
    /// The new range is clamped into bounds, then merged with every existing
    /// same-tag range it overlaps or touches (merged bounds = min start, max
    /// end across all of them). Zero-length results are discarded. Insertion
    /// never fails: out-of-bounds input is clamped, not rejected.
    pub fn add_range(mut self, range: Range<T>) -> Self {
        let range = range.clamp(self.char_len());

        let mut merged = range;
        let mut slot: Option<usize> = None;
        let mut kept: Vec<Range<T>> = Vec::with_capacity(self.ranges.len() + 1);
        for existing in self.ranges.drain(..) {
            if existing.tag == merged.tag && existing.overlaps_or_touches(&merged) {
                merged = merged.cover(&existing);
                slot.get_or_insert(kept.len());
            } else {
                kept.push(existing);
            }
        }

        if !merged.is_empty() {
            kept.insert(slot.unwrap_or(kept.len()), merged);
        }
        self.ranges = kept;
        self
    }

    /// Build from raw parts by repeated insertion, so arbitrary (overlapping,
    /// out-of-bounds, zero-length) input comes out invariant-clean.
    pub fn from_parts(text: impl Into<String>, ranges: impl IntoIterator<Item = Range<T>>) -> Self {
        ranges
            .into_iter()
            .fold(Self::new(text), |ft, r| ft.add_range(r))
    }
}

impl<T> From<&str> for FormattedText<T> {
    fn from(s: &str) -> Self {
        FormattedText::new(s)
    }
}

impl<T> From<String> for FormattedText<T> {
    fn from(s: String) -> Self {
        FormattedText::new(s)
    }
}

impl<T> fmt::Display for FormattedText<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Equal text and equal range *sets*. Range order is a discovery-order
/// convention, not part of the value, so the comparison is unordered.
impl<T: PartialEq> PartialEq for FormattedText<T> {
    fn eq(&self, other: &Self) -> bool {
        // per-tag disjointness makes each side duplicate-free, so equal
        // lengths plus one-way containment is set equality.
        self.text == other.text
            && self.ranges.len() == other.ranges.len()
            && self.ranges.iter().all(|r| other.ranges.contains(r))
    }
}

impl<T: Eq> Eq for FormattedText<T> {}

/// Deserialization funnels through [`FormattedText::from_parts`] so that a
/// hand-edited or out-of-date JSON document cannot smuggle in ranges that
/// violate the invariants.
impl<'de, T> Deserialize<'de> for FormattedText<T>
where
    T: Clone + PartialEq + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw<T> {
            text: String,
            #[serde(default = "Vec::new")]
            ranges: Vec<Range<T>>,
        }
        let raw = Raw::<T>::deserialize(deserializer)?;
        Ok(FormattedText::from_parts(raw.text, raw.ranges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ft(text: &str) -> FormattedText<&'static str> {
        FormattedText::new(text)
    }

    #[test]
    fn disjoint_ranges_do_not_merge() {
        let t = ft("abcdefghij")
            .add_range(Range::new("A", 0, 4))
            .add_range(Range::new("A", 6, 8));
        assert_eq!(t.ranges(), &[Range::new("A", 0, 4), Range::new("A", 6, 8)]);
    }

    #[test]
    fn touching_same_tag_ranges_merge() {
        let t = ft("abcdefghij")
            .add_range(Range::new("A", 0, 4))
            .add_range(Range::new("A", 4, 8));
        assert_eq!(t.ranges(), &[Range::new("A", 0, 8)]);
    }

    #[test]
    fn merge_spans_multiple_existing_ranges() {
        let t = ft("abcdefghij")
            .add_range(Range::new("A", 0, 2))
            .add_range(Range::new("A", 8, 10))
            .add_range(Range::new("B", 3, 5))
            .add_range(Range::new("A", 2, 8));
        assert_eq!(t.ranges(), &[Range::new("A", 0, 10), Range::new("B", 3, 5)]);
    }

    #[test]
    fn different_tags_overlap_freely() {
        let t = ft("abcdefghij")
            .add_range(Range::new("A", 0, 6))
            .add_range(Range::new("B", 3, 9));
        assert_eq!(t.ranges().len(), 2);
    }

    #[test]
    fn insertion_is_idempotent() {
        let once = ft("hello world").add_range(Range::new("A", 2, 7));
        let twice = once.clone().add_range(Range::new("A", 2, 7));
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_length_ranges_are_dropped() {
        let t = ft("hello").add_range(Range::new("A", 3, 3));
        assert!(t.ranges().is_empty());
    }

    #[test]
    fn out_of_bounds_input_is_clamped() {
        let t = ft("hello").add_range(Range::new("A", 2, 99));
        assert_eq!(t.ranges(), &[Range::new("A", 2, 5)]);

        let t = ft("hello").add_range(Range::new("A", 77, 99));
        assert!(t.ranges().is_empty());
    }

    #[test]
    fn bounds_count_chars_not_bytes() {
        // 6 chars, 12 bytes.
        let t = ft("日本語日本語").add_range(Range::new("A", 4, 99));
        assert_eq!(t.ranges(), &[Range::new("A", 4, 6)]);
    }

    #[test]
    fn equality_ignores_range_order() {
        let a = ft("abcdef")
            .add_range(Range::new("A", 0, 2))
            .add_range(Range::new("B", 3, 5));
        let b = ft("abcdef")
            .add_range(Range::new("B", 3, 5))
            .add_range(Range::new("A", 0, 2));
        assert_eq!(a, b);

        let c = ft("abcdef").add_range(Range::new("A", 0, 2));
        assert_ne!(a, c);
    }

    #[test]
    fn json_round_trip_preserves_value() {
        let t = ft("abcdefghij")
            .add_range(Range::new("A", 0, 4))
            .add_range(Range::new("B", 2, 9));
        let json = serde_json::to_string(&t).expect("serialize");
        let back: FormattedText<&str> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(t, back);
    }

    #[test]
    fn deserialize_restores_invariants() {
        let json = r#"{"text":"abcdef","ranges":[
            {"tag":"A","start":0,"end":3},
            {"tag":"A","start":3,"end":5},
            {"tag":"B","start":4,"end":4},
            {"tag":"C","start":2,"end":99}
        ]}"#;
        let t: FormattedText<String> = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            t.ranges(),
            &[
                Range::new("A".to_string(), 0, 5),
                Range::new("C".to_string(), 2, 6),
            ]
        );
    }
}

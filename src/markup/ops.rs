//! String-equivalent operations on [`FormattedText`].
//!
//! Thin projections onto the plain text with range-shifting bookkeeping:
//! every operation returns a new value whose ranges were shifted, clamped, or
//! dropped to match the new text. Re-establishing the invariants always goes
//! through [`FormattedText::add_range`], never around it.

use crate::markup::slice::{char_len, char_slice};
use crate::markup::{FormattedText, Range};

impl<T: Clone + PartialEq> FormattedText<T> {
    /// Concatenate, shifting `other`'s ranges past this text. Same-tag ranges
    /// that touch across the seam merge.
    pub fn append(self, other: FormattedText<T>) -> Self {
        let offset = self.char_len();
        let (left_text, left_ranges) = self.into_parts();
        let (right_text, right_ranges) = other.into_parts();

        let mut text = left_text;
        text.push_str(&right_text);

        let mut out = FormattedText::new(text);
        for r in left_ranges {
            out = out.add_range(r);
        }
        for r in right_ranges {
            out = out.add_range(r.shifted_right(offset));
        }
        out
    }

    /// Fold a sequence of formatted texts into one.
    pub fn concat(pieces: impl IntoIterator<Item = FormattedText<T>>) -> Self {
        pieces
            .into_iter()
            .fold(FormattedText::new(""), |acc, p| acc.append(p))
    }

    /// The sub-text covering character positions `[start, end)`, with ranges
    /// shifted down and clipped to the window. Out-of-bounds positions clamp.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.min(len).max(start);

        let text = char_slice(self.text(), start, end).to_string();
        let ranges = self.ranges().iter().map(|r| {
            r.respan(
                r.start.max(start).saturating_sub(start),
                r.end.min(end).saturating_sub(start),
            )
        });
        FormattedText::from_parts(text, ranges)
    }

    /// The leftmost `n` characters.
    pub fn left(&self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// The rightmost `n` characters.
    pub fn right(&self, n: usize) -> Self {
        let len = self.char_len();
        self.slice(len.saturating_sub(n), len)
    }

    pub fn drop_left(&self, n: usize) -> Self {
        self.slice(n, self.char_len())
    }

    pub fn drop_right(&self, n: usize) -> Self {
        self.slice(0, self.char_len().saturating_sub(n))
    }

    pub fn trim_start(&self) -> Self {
        let skip = self
            .text()
            .chars()
            .take_while(|c| c.is_whitespace())
            .count();
        self.drop_left(skip)
    }

    pub fn trim_end(&self) -> Self {
        let skip = self
            .text()
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count();
        self.drop_right(skip)
    }

    pub fn trim(&self) -> Self {
        self.trim_start().trim_end()
    }

    /// Uppercase the text, carrying ranges over numerically. Case mapping can
    /// change the character length (ß becomes SS); ranges are re-clamped to
    /// the new bounds rather than remapped per character.
    pub fn to_uppercase(&self) -> Self {
        FormattedText::from_parts(self.text().to_uppercase(), self.ranges().iter().cloned())
    }

    /// Lowercase counterpart of [`FormattedText::to_uppercase`].
    pub fn to_lowercase(&self) -> Self {
        FormattedText::from_parts(self.text().to_lowercase(), self.ranges().iter().cloned())
    }

    /// Left-pad with `ch` to `width` characters, shifting every range past
    /// the padding. No-op when already wide enough.
    pub fn pad_start(&self, width: usize, ch: char) -> Self {
        let len = self.char_len();
        if len >= width {
            return self.clone();
        }
        let added = width - len;
        let mut text = String::with_capacity(self.text().len() + added);
        text.extend(std::iter::repeat_n(ch, added));
        text.push_str(self.text());
        FormattedText::from_parts(
            text,
            self.ranges().iter().map(|r| r.clone().shifted_right(added)),
        )
    }

    /// Right-pad with `ch` to `width` characters; ranges are unaffected.
    pub fn pad_end(&self, width: usize, ch: char) -> Self {
        let len = self.char_len();
        if len >= width {
            return self.clone();
        }
        let mut text = self.text().to_string();
        text.extend(std::iter::repeat_n(ch, width - len));
        FormattedText::from_parts(text, self.ranges().iter().cloned())
    }

    /// Split on a separator, slicing ranges down into each piece. An empty
    /// separator returns the whole value as a single piece.
    pub fn split(&self, sep: &str) -> Vec<Self> {
        if sep.is_empty() {
            return vec![self.clone()];
        }
        let sep_chars = char_len(sep);
        let mut out = Vec::new();
        let mut byte_pos = 0usize;
        let mut char_pos = 0usize;
        for (idx, m) in self.text().match_indices(sep) {
            let piece_chars = char_len(&self.text()[byte_pos..idx]);
            out.push(self.slice(char_pos, char_pos + piece_chars));
            char_pos += piece_chars + sep_chars;
            byte_pos = idx + m.len();
        }
        let tail_chars = char_len(&self.text()[byte_pos..]);
        out.push(self.slice(char_pos, char_pos + tail_chars));
        out
    }

    /// The whitespace-separated words, each with its ranges sliced down.
    /// All-whitespace input yields no words.
    pub fn words(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut start: Option<usize> = None;
        let mut pos = 0usize;
        for c in self.text().chars() {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    out.push(self.slice(s, pos));
                }
            } else if start.is_none() {
                start = Some(pos);
            }
            pos += 1;
        }
        if let Some(s) = start {
            out.push(self.slice(s, pos));
        }
        out
    }

    /// Split on `'\n'`.
    pub fn lines(&self) -> Vec<Self> {
        self.split("\n")
    }

    /// This text repeated `n` times, ranges included.
    pub fn repeat(&self, n: usize) -> Self {
        FormattedText::concat(std::iter::repeat_n(self.clone(), n))
    }

    /// Reverse the characters, mirroring every range around the text.
    pub fn reverse(&self) -> Self {
        let len = self.char_len();
        let text: String = self.text().chars().rev().collect();
        FormattedText::from_parts(
            text,
            self.ranges().iter().map(|r| r.respan(len - r.end, len - r.start)),
        )
    }

    /// Character positions of every non-overlapping occurrence of `needle`.
    pub fn indexes(&self, needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut byte_pos = 0usize;
        let mut char_pos = 0usize;
        for (idx, m) in self.text().match_indices(needle) {
            char_pos += char_len(&self.text()[byte_pos..idx]);
            out.push(char_pos);
            char_pos += char_len(m);
            byte_pos = idx + m.len();
        }
        out
    }

    /// First occurrence of `needle`, as a character position.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.indexes(needle).into_iter().next()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.text().ends_with(suffix)
    }

    /// Parse the trimmed plain text as an integer.
    pub fn parse_int(&self) -> Option<i64> {
        self.text().trim().parse().ok()
    }

    /// Parse the trimmed plain text as a float.
    pub fn parse_float(&self) -> Option<f64> {
        self.text().trim().parse().ok()
    }
}

//! Interval relation classification.
//!
//! [`Relation`] is the full set of 13 mutually exclusive Allen relations
//! between two half-open intervals. The tree builder does not need that much
//! detail, so [`Relation::nesting`] collapses them to the 7-way
//! [`NestRelation`]; the collapse table decides how overlapping ranges are
//! split, so it must not be changed casually.

use std::cmp::Ordering;

use crate::markup::Range;

/// One of the 13 Allen relations between interval `a` and interval `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a` ends before `b` starts.
    Before,
    /// `a` ends exactly where `b` starts.
    Meets,
    /// `a` starts first and ends inside `b`.
    Overlaps,
    /// `a` starts first and they end together.
    FinishedBy,
    /// `a` strictly contains `b`.
    Contains,
    /// They start together and `a` ends first.
    Starts,
    Equal,
    /// They start together and `b` ends first.
    StartedBy,
    /// `a` lies strictly inside `b`.
    During,
    /// `b` starts first and they end together.
    Finishes,
    /// `b` starts first and ends inside `a`.
    OverlappedBy,
    /// `b` ends exactly where `a` starts.
    MetBy,
    /// `b` ends before `a` starts.
    After,
}

/// The collapsed relation the forest builder dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestRelation {
    Before,
    After,
    Equal,
    /// `a` nests inside `b` (shared endpoints included).
    During,
    /// `b` nests inside `a` (shared endpoints included).
    Contains,
    /// `a` hangs out of `b` on the left.
    OverlapsLeft,
    /// `a` hangs out of `b` on the right.
    OverlapsRight,
}

impl Relation {
    /// Classify `(a_start, a_end)` against `(b_start, b_end)`.
    ///
    /// Total over all integer pairs: exactly one relation comes back, decided
    /// by the pairwise orderings of the four bounds. Point intervals
    /// (`start == end`) reduce to ordinary `<`, `=`, `>` on the point values.
    pub fn classify(a: (usize, usize), b: (usize, usize)) -> Relation {
        let (a_start, a_end) = a;
        let (b_start, b_end) = b;
        match (a_start.cmp(&b_start), a_end.cmp(&b_end)) {
            (Ordering::Equal, Ordering::Equal) => Relation::Equal,
            (Ordering::Equal, Ordering::Less) => Relation::Starts,
            (Ordering::Equal, Ordering::Greater) => Relation::StartedBy,
            (Ordering::Less, Ordering::Equal) => Relation::FinishedBy,
            (Ordering::Greater, Ordering::Equal) => Relation::Finishes,
            (Ordering::Less, Ordering::Greater) => Relation::Contains,
            (Ordering::Greater, Ordering::Less) => Relation::During,
            (Ordering::Less, Ordering::Less) => match a_end.cmp(&b_start) {
                Ordering::Less => Relation::Before,
                Ordering::Equal => Relation::Meets,
                Ordering::Greater => Relation::Overlaps,
            },
            (Ordering::Greater, Ordering::Greater) => match a_start.cmp(&b_end) {
                Ordering::Greater => Relation::After,
                Ordering::Equal => Relation::MetBy,
                Ordering::Less => Relation::OverlappedBy,
            },
        }
    }

    /// Classify two ranges. Tags are ignored.
    pub fn between<T, U>(a: &Range<T>, b: &Range<U>) -> Relation {
        Relation::classify((a.start, a.end), (b.start, b.end))
    }

    /// The relation of `b` to `a`, given the relation of `a` to `b`.
    pub fn converse(self) -> Relation {
        match self {
            Relation::Before => Relation::After,
            Relation::After => Relation::Before,
            Relation::Meets => Relation::MetBy,
            Relation::MetBy => Relation::Meets,
            Relation::Overlaps => Relation::OverlappedBy,
            Relation::OverlappedBy => Relation::Overlaps,
            Relation::Starts => Relation::StartedBy,
            Relation::StartedBy => Relation::Starts,
            Relation::Finishes => Relation::FinishedBy,
            Relation::FinishedBy => Relation::Finishes,
            Relation::During => Relation::Contains,
            Relation::Contains => Relation::During,
            Relation::Equal => Relation::Equal,
        }
    }

    /// Collapse to the 7 relations the forest builder distinguishes.
    ///
    /// Tie-breaks: meeting counts as before/after (a touching range is a
    /// sibling, not an overlap), while sharing a start or an end counts as
    /// nesting. `Overlaps` splits left, `OverlappedBy` splits right.
    pub fn nesting(self) -> NestRelation {
        match self {
            Relation::Before | Relation::Meets => NestRelation::Before,
            Relation::After | Relation::MetBy => NestRelation::After,
            Relation::Equal => NestRelation::Equal,
            Relation::During | Relation::Starts | Relation::Finishes => NestRelation::During,
            Relation::Contains | Relation::StartedBy | Relation::FinishedBy => {
                NestRelation::Contains
            }
            Relation::Overlaps => NestRelation::OverlapsLeft,
            Relation::OverlappedBy => NestRelation::OverlapsRight,
        }
    }
}

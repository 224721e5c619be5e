//! Nested-markup tree construction.
//!
//! An arbitrary collection of tagged ranges makes no nesting promises: ranges
//! with different tags may cross each other freely. Rendering hierarchies
//! (HTML, rich-text views) need proper nesting, so [`build_forest`] converts
//! a flat range list into an ordered forest of trees, splitting a range into
//! two sibling fragments whenever it partially crosses another range's
//! boundary.
//!
//! Insertion order shapes the exact tree when several tags mutually overlap,
//! but never the recovered coverage: flattening the forest and re-inserting
//! every fragment reproduces the original formatted text.

use crate::markup::{FormattedText, NestRelation, Range, Relation};

/// A range plus the trees nested inside it. Children are properly contained
/// within the parent's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<T> {
    pub range: Range<T>,
    pub children: Forest<T>,
}

/// Left-to-right ordered, pairwise non-overlapping sibling trees.
pub type Forest<T> = Vec<Tree<T>>;

impl<T> Tree<T> {
    pub fn leaf(range: Range<T>) -> Self {
        Self {
            range,
            children: Vec::new(),
        }
    }
}

/// Build a forest from an unordered range list by repeated [`insert`].
pub fn build_forest<T: Clone + PartialEq>(ranges: &[Range<T>]) -> Forest<T> {
    ranges
        .iter()
        .fold(Vec::new(), |forest, r| insert(Tree::leaf(r.clone()), forest))
}

/// Insert one tree into a forest, preserving sibling order and disjointness.
///
/// Recursive scan against the first tree (`head`): equal/containing trees
/// adopt the head, nested trees descend into it, earlier trees become a new
/// first sibling, later trees recurse into the remaining siblings. A partial
/// overlap splits the incoming range at the head's boundary; the fragment
/// inside descends, the fragment outside re-enters insertion (it may reach
/// into further siblings and split again), and the incoming tree's original
/// children are re-inserted into the *whole* forest from scratch (a child may
/// itself cross the split boundary, so patching it back locally would be
/// wrong).
///
/// Depth is bounded by the number of inserted ranges; pathological inputs
/// with very large range counts are limited by stack size.
pub fn insert<T: Clone + PartialEq>(tree: Tree<T>, mut forest: Forest<T>) -> Forest<T> {
    if forest.is_empty() {
        return vec![tree];
    }
    let head = forest.remove(0);
    let rest = forest;

    match Relation::between(&tree.range, &head.range).nesting() {
        NestRelation::Equal | NestRelation::Contains => {
            // the adopting tree may reach past `head` into later siblings, so
            // it goes back through insertion instead of splicing in place.
            let Tree { range, children } = tree;
            let combined = Tree {
                range,
                children: insert(head, children),
            };
            insert(combined, rest)
        }
        NestRelation::During => {
            let mut out = vec![Tree {
                range: head.range,
                children: insert(tree, head.children),
            }];
            out.extend(rest);
            out
        }
        NestRelation::Before => {
            let mut out = vec![tree, head];
            out.extend(rest);
            out
        }
        NestRelation::After => {
            let mut out = vec![head];
            out.extend(insert(tree, rest));
            out
        }
        NestRelation::OverlapsLeft => {
            let Tree { range, children } = tree;
            let outside = Tree::leaf(range.respan(range.start, head.range.start));
            let inside = Tree::leaf(range.respan(head.range.start, range.end));
            let mut out = vec![
                outside,
                Tree {
                    range: head.range,
                    children: insert(inside, head.children),
                },
            ];
            out.extend(rest);
            reinsert_all(children, out)
        }
        NestRelation::OverlapsRight => {
            let Tree { range, children } = tree;
            let inside = Tree::leaf(range.respan(range.start, head.range.end));
            // the outside fragment can still overlap later siblings, so it is
            // inserted rather than appended.
            let outside = Tree::leaf(range.respan(head.range.end, range.end));
            let mut out = vec![Tree {
                range: head.range,
                children: insert(inside, head.children),
            }];
            out.extend(insert(outside, rest));
            reinsert_all(children, out)
        }
    }
}

fn reinsert_all<T: Clone + PartialEq>(children: Forest<T>, forest: Forest<T>) -> Forest<T> {
    children.into_iter().fold(forest, |f, child| insert(child, f))
}

/// Flatten a forest back into a range list, pre-order.
///
/// A range that was split during insertion comes back as two touching
/// same-tag fragments; re-inserting them into a [`FormattedText`] merges them
/// again, which is what makes the round trip exact.
pub fn flatten<T: Clone>(forest: &Forest<T>) -> Vec<Range<T>> {
    let mut out = Vec::new();
    collect(forest, &mut out);
    out
}

fn collect<T: Clone>(forest: &Forest<T>, out: &mut Vec<Range<T>>) {
    for tree in forest {
        out.push(tree.range.clone());
        collect(&tree.children, out);
    }
}

/// Rebuild the formatted text a forest was derived from.
pub fn unbuild_forest<T: Clone + PartialEq>(forest: &Forest<T>, text: &str) -> FormattedText<T> {
    FormattedText::from_parts(text, flatten(forest))
}

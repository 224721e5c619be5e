//! Forest materialization.
//!
//! [`materialize`] walks a forest and the text it was built over, producing a
//! caller-defined output tree: `leaf` turns untagged text runs into output
//! nodes, `node` wraps a tag and its already-materialized children. The walk
//! is expressed as a bite list per nesting level — for each child tree, an
//! optional gap bite for the text before it, then one bite spanning the
//! child, with the remainder transform catching trailing untagged text.

use crate::markup::slice::{parse_bites, Bite};
use crate::markup::Forest;

/// Materialize `forest` over `text` into a list of output values, one per
/// top-level gap or tree. Known as `trees` at the library boundary; see
/// [`crate::markup::FormattedText::trees`].
pub fn materialize<T, U, L, N>(forest: &Forest<T>, text: &str, leaf: &L, node: &N) -> Vec<U>
where
    L: Fn(&str) -> U,
    N: Fn(&T, Vec<U>) -> U,
{
    materialize_level(forest, text, 0, leaf, node)
}

/// One nesting level. `text` covers `[offset, offset + char_len(text))` of
/// the original input; range bounds are absolute, so each child's slice is
/// located by subtracting `offset`.
fn materialize_level<'a, T, U, L, N>(
    forest: &'a Forest<T>,
    text: &str,
    offset: usize,
    leaf: &'a L,
    node: &'a N,
) -> Vec<U>
where
    L: Fn(&str) -> U,
    N: Fn(&T, Vec<U>) -> U,
{
    let mut bites: Vec<Bite<'_, U>> = Vec::with_capacity(forest.len() * 2);
    let mut pos = offset;
    for tree in forest {
        let gap = tree.range.start.saturating_sub(pos);
        if gap > 0 {
            bites.push(Bite::new(gap, move |s: &str| leaf(s)));
        }
        bites.push(Bite::new(tree.range.len(), move |s: &str| {
            let children = materialize_level(&tree.children, s, tree.range.start, leaf, node);
            node(&tree.range.tag, children)
        }));
        pos = tree.range.end;
    }
    parse_bites(text, bites, |s| leaf(s))
}

impl<T: Clone + PartialEq> crate::markup::FormattedText<T> {
    /// Build the nesting forest for this value and materialize it in one go.
    ///
    /// `leaf` produces output for untagged text runs, `node` for a tag and
    /// its materialized contents. The boundary name for hierarchical
    /// rendering: `ft.trees(text_node, element_node)`.
    pub fn trees<U, L, N>(&self, leaf: L, node: N) -> Vec<U>
    where
        L: Fn(&str) -> U,
        N: Fn(&T, Vec<U>) -> U,
    {
        let forest = crate::markup::build_forest(self.ranges());
        materialize(&forest, self.text(), &leaf, &node)
    }
}

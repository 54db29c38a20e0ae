//! Bottom-up range expansion.
//!
//! Deepest annotations are visited first and raise every ancestor's end to
//! cover their own. Because a node's end is final before the node itself is
//! visited, one pass reaches the fixed point.

use std::cmp::Reverse;

use crate::outline::model::Annotation;

/// Visiting order: descending depth, then tree-index string ascending.
pub fn expansion_order(annotations: &[Annotation]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..annotations.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&annotations[a].meta, &annotations[b].meta);
        (Reverse(a.level), a.part_tree_index.as_str())
            .cmp(&(Reverse(b.level), b.part_tree_index.as_str()))
    });
    order
}

/// Widen ancestors so each contains all of its descendants.
///
/// Only resolved links (`meta.parent_id`) are followed; an annotation whose
/// parent is missing is a root here. O(n · depth).
pub fn expand(annotations: &mut [Annotation]) {
    for idx in expansion_order(annotations) {
        let end = annotations[idx].end_position;
        let mut current = annotations[idx].meta.parent_id;
        let mut hops = 0;
        while let Some(p) = current {
            let ancestor = &mut annotations[p];
            ancestor.end_position = ancestor.end_position.max(end);
            current = ancestor.meta.parent_id;

            // A cycle cannot come out of the tree builder, but parent_id is public.
            hops += 1;
            if hops > annotations.len() {
                tracing::warn!(annotation = idx, "parent chain does not terminate, stopping");
                break;
            }
        }
    }
}

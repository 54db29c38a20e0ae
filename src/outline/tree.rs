//! Parent/child/descendant relationships derived from tree-index strings.
//!
//! Nothing here looks at RDF: the hierarchy is read purely off the dotted
//! indices of an already sorted record set.

use std::collections::HashMap;

use crate::outline::model::{Annotation, Relationship};
use crate::outline::record::PartRecord;
use crate::outline::tree_index::{TreeIndex, is_descendant_of, parent_of};

/// Relationships for one record set, addressed by position in that set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTree {
    /// For each tree index, positions of every direct and indirect descendant.
    pub descendants: HashMap<String, Vec<usize>>,
    /// For each position, the position of the resolved parent (`None` for roots).
    pub parents: Vec<Option<usize>>,
}

impl AnnotationTree {
    /// Build relationships by pairwise comparison, O(n²) in record count.
    pub fn build(records: &[PartRecord]) -> Self {
        let mut descendants: HashMap<String, Vec<usize>> = HashMap::with_capacity(records.len());
        for record in records {
            let idx = record.part_tree_index.as_str();
            let found = records
                .iter()
                .enumerate()
                .filter(|(_, other)| is_descendant_of(&other.part_tree_index, idx))
                .map(|(j, _)| j);
            descendants.entry(idx.to_string()).or_default().extend(found);
        }
        // Duplicate indices were extended twice above.
        for list in descendants.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        let mut by_index: HashMap<&str, Vec<usize>> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            by_index
                .entry(record.part_tree_index.as_str())
                .or_default()
                .push(i);
        }

        let parents = records
            .iter()
            .map(|record| {
                let parent = parent_of(&record.part_tree_index)?;
                let Some(candidates) = by_index.get(parent) else {
                    note_respelled_parent(records, record, parent);
                    return None;
                };
                if candidates.len() > 1 {
                    let ids: Vec<&str> = candidates.iter().map(|&c| records[c].id.as_str()).collect();
                    tracing::warn!(
                        record = %record.id,
                        parent = parent,
                        candidates = ?ids,
                        "ambiguous parent, using the first candidate in tree order"
                    );
                }
                candidates.first().copied()
            })
            .collect();

        Self {
            descendants,
            parents,
        }
    }

    /// Resolved parent position of the record at `i`.
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parents.get(i).copied().flatten()
    }

    /// Descendant positions of the given tree index (empty if none).
    pub fn descendants_of(&self, tree_index: &str) -> &[usize] {
        self.descendants
            .get(tree_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any record resolved `i` as its parent.
    pub fn has_children(&self, i: usize) -> bool {
        self.parents.iter().any(|p| *p == Some(i))
    }

    /// Write resolved parents into annotation meta.
    ///
    /// `annotations` must be positioned like the records the tree was built
    /// from. Children are marked `child`; roots with children `parent`.
    /// Unresolved parents leave `parent` and `parent_id` unset.
    pub fn link(&self, annotations: &mut [Annotation]) {
        for i in 0..annotations.len() {
            let Some(p) = self.parent(i) else {
                continue;
            };
            let parent_index = annotations[p].meta.part_tree_index.clone();
            let meta = &mut annotations[i].meta;
            meta.parent = Some(parent_index);
            meta.parent_id = Some(p);
            meta.relationship = Some(Relationship::Child);
        }
        for i in 0..annotations.len() {
            if annotations[i].meta.relationship.is_none() && self.has_children(i) {
                annotations[i].meta.relationship = Some(Relationship::Parent);
            }
        }
    }
}

/// Parents link by exact index string. Flag a parent that exists only under
/// another spelling of the same numbers (`"01"` for `"1"`).
fn note_respelled_parent(records: &[PartRecord], record: &PartRecord, parent: &str) {
    let Ok(key) = TreeIndex::parse(parent) else {
        return;
    };
    if let Some(other) = records
        .iter()
        .find(|r| TreeIndex::parse(&r.part_tree_index).is_ok_and(|k| k == key))
    {
        tracing::debug!(
            record = %record.id,
            parent = parent,
            found = %other.part_tree_index,
            "parent index present under a different spelling, not linking"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::record::RawPart;

    fn records(indices: &[&str]) -> Vec<PartRecord> {
        indices
            .iter()
            .enumerate()
            .map(|(i, idx)| {
                PartRecord::from_raw(RawPart {
                    id: format!("P{i}"),
                    part_tree_index: Some((*idx).into()),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn parents_and_descendants() {
        let recs = records(&["1", "1.1", "1.1.1", "1.2", "2"]);
        let tree = AnnotationTree::build(&recs);

        assert_eq!(tree.parents, vec![None, Some(0), Some(1), Some(0), None]);
        assert_eq!(tree.descendants_of("1"), &[1, 2, 3]);
        assert_eq!(tree.descendants_of("1.1"), &[2]);
        assert!(tree.descendants_of("2").is_empty());
        assert!(tree.has_children(0));
        assert!(!tree.has_children(4));
    }

    #[test]
    fn lexical_prefix_is_not_ancestry() {
        let recs = records(&["1", "1.1", "1.10", "10"]);
        let tree = AnnotationTree::build(&recs);
        assert_eq!(tree.descendants_of("1"), &[1, 2]);
        assert!(tree.descendants_of("1.1").is_empty());
        assert_eq!(tree.parent(3), None);
    }

    #[test]
    fn orphan_is_root() {
        let recs = records(&["1", "2.1"]);
        let tree = AnnotationTree::build(&recs);
        assert_eq!(tree.parent(1), None);
    }

    #[test]
    fn link_sets_parent_meta() {
        let recs = records(&["1", "1.1", "1.1.1", "3.1"]);
        let tree = AnnotationTree::build(&recs);
        let mut annotations = crate::outline::position::assign_positions(&recs, None);
        tree.link(&mut annotations);

        assert_eq!(annotations[0].meta.parent, None);
        assert_eq!(annotations[0].meta.relationship, Some(Relationship::Parent));
        assert_eq!(annotations[1].meta.parent.as_deref(), Some("1"));
        assert_eq!(annotations[1].meta.parent_id, Some(0));
        assert_eq!(annotations[1].meta.relationship, Some(Relationship::Child));
        assert_eq!(annotations[2].meta.parent_id, Some(1));
        assert_eq!(annotations[3].meta.parent, None);
        assert_eq!(annotations[3].meta.parent_id, None);
        assert_eq!(annotations[3].meta.relationship, None);
    }

    #[test]
    fn duplicate_parent_resolves_to_first() {
        let recs = records(&["1", "1", "1.1"]);
        let tree = AnnotationTree::build(&recs);
        assert_eq!(tree.parent(2), Some(0));
        assert_eq!(tree.descendants_of("1"), &[2]);
    }

    #[test]
    fn respelled_parent_is_not_linked() {
        // "01" sorts like "1" but parents match by exact string.
        let recs = records(&["01", "1.1"]);
        let tree = AnnotationTree::build(&recs);
        assert_eq!(tree.parent(1), None);
        assert!(!tree.has_children(0));
        assert!(tree.descendants_of("01").is_empty());
    }
}

//! Dotted hierarchical indices ("1.2.3").
//!
//! A tree index encodes a part's path from the hierarchy root. Ordering is
//! numeric per segment, so "1.10" sorts after "1.9".

use std::fmt;

use crate::outline::error::TreeIndexError;

/// A parsed tree index: one integer per dot-separated segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeIndex(Vec<u64>);

impl TreeIndex {
    /// Parse a dotted index. Fails on an empty string or any non-numeric segment.
    pub fn parse(s: &str) -> Result<Self, TreeIndexError> {
        if s.is_empty() {
            return Err(TreeIndexError::Empty);
        }
        s.split('.')
            .map(|segment| {
                let non_numeric = || TreeIndexError::NonNumeric {
                    segment: segment.to_string(),
                };
                // `u64::from_str` alone would accept a leading `+`.
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(non_numeric());
                }
                segment.parse::<u64>().map_err(|_| non_numeric())
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn segments(&self) -> &[u64] {
        &self.0
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for TreeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// True iff `child` lies strictly below `ancestor` (string prefix plus a dot).
pub fn is_descendant_of(child: &str, ancestor: &str) -> bool {
    child
        .strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Number of dot-separated segments in a raw index string.
pub fn depth(tree_index: &str) -> usize {
    tree_index.split('.').count()
}

/// The raw index with its trailing segment removed, or `None` for a root.
pub fn parent_of(tree_index: &str) -> Option<&str> {
    tree_index.rsplit_once('.').map(|(parent, _)| parent)
}

/// Sort raw index strings by their parsed numeric key.
pub fn sort_numeric(indices: &mut [String]) -> Result<(), TreeIndexError> {
    let mut keyed = indices
        .iter()
        .map(|s| TreeIndex::parse(s).map(|key| (key, s.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    for (slot, (_, s)) in indices.iter_mut().zip(keyed) {
        *slot = s;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dotted() {
        let idx = TreeIndex::parse("1.2.3").unwrap();
        assert_eq!(idx.segments(), &[1, 2, 3]);
        assert_eq!(idx.depth(), 3);
        assert_eq!(idx.to_string(), "1.2.3");
    }

    #[test]
    fn parse_rejects_empty_and_garbage() {
        assert_eq!(TreeIndex::parse(""), Err(TreeIndexError::Empty));
        assert_eq!(
            TreeIndex::parse("1.a"),
            Err(TreeIndexError::NonNumeric {
                segment: "a".into()
            })
        );
        assert!(TreeIndex::parse("1..2").is_err());
        assert!(TreeIndex::parse("1.").is_err());
        assert!(TreeIndex::parse("-1").is_err());
        assert_eq!(
            TreeIndex::parse("+1.2"),
            Err(TreeIndexError::NonNumeric {
                segment: "+1".into()
            })
        );
        assert!(TreeIndex::parse("1. 2").is_err());
    }

    #[test]
    fn descendant_is_strict_prefix_with_dot() {
        assert!(is_descendant_of("1.1", "1"));
        assert!(is_descendant_of("1.2.3", "1"));
        assert!(is_descendant_of("1.2.3", "1.2"));
        assert!(!is_descendant_of("1", "1"));
        assert!(!is_descendant_of("10", "1"));
        assert!(!is_descendant_of("1.10", "1.1"));
        assert!(!is_descendant_of("1", "1.1"));
    }

    #[test]
    fn numeric_not_lexical_order() {
        let mut indices = vec!["1.2".to_string(), "1.10".into(), "1.9".into()];
        sort_numeric(&mut indices).unwrap();
        assert_eq!(indices, vec!["1.2", "1.9", "1.10"]);
    }

    #[test]
    fn parent_and_depth() {
        assert_eq!(parent_of("1.2.3"), Some("1.2"));
        assert_eq!(parent_of("1"), None);
        assert_eq!(depth("1.2.3"), 3);
        assert_eq!(depth("4"), 1);
    }

    #[test]
    fn parents_sort_before_children() {
        let a = TreeIndex::parse("1").unwrap();
        let b = TreeIndex::parse("1.1").unwrap();
        let c = TreeIndex::parse("2").unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}

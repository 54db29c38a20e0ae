//! Initial flat positions, proportional to the target content length.

use crate::outline::model::Annotation;
use crate::outline::record::PartRecord;

/// Width of each record's slot when no real content is supplied.
pub const SYNTHETIC_SPACING: usize = 10;

/// Target content length in characters: the real content if non-empty,
/// otherwise a synthetic ten characters per record.
pub fn content_length(record_count: usize, content: Option<&str>) -> usize {
    match content {
        Some(text) if !text.is_empty() => text.chars().count(),
        _ => record_count.max(1) * SYNTHETIC_SPACING,
    }
}

/// Spacing between consecutive starts. Never zero, so every slot is non-degenerate.
pub fn base_spacing(record_count: usize, content: Option<&str>) -> usize {
    if record_count == 0 {
        return 0;
    }
    (content_length(record_count, content) / record_count).max(1)
}

/// Give every record one header annotation in document order.
///
/// `records` must already be sorted by tree index. Starts run from 1 in
/// steps of the base spacing; each end is start plus spacing until the
/// range expander widens parents.
pub fn assign_positions(records: &[PartRecord], content: Option<&str>) -> Vec<Annotation> {
    let spacing = base_spacing(records.len(), content);
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let start = 1 + i * spacing;
            Annotation::header(record, start, start + spacing)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::record::RawPart;

    fn records(indices: &[&str]) -> Vec<PartRecord> {
        indices
            .iter()
            .map(|idx| {
                PartRecord::from_raw(RawPart {
                    id: format!("P{idx}"),
                    part_tree_index: Some((*idx).into()),
                    ..Default::default()
                })
            })
            .collect()
    }

    fn bounds(annotations: &[Annotation]) -> Vec<(usize, usize)> {
        annotations
            .iter()
            .map(|a| (a.start_position, a.end_position))
            .collect()
    }

    #[test]
    fn spacing_follows_real_content() {
        let content = "x".repeat(100);
        let recs = records(&["1", "2", "3", "4"]);
        assert_eq!(base_spacing(recs.len(), Some(&content)), 25);
        let annotations = assign_positions(&recs, Some(&content));
        assert_eq!(
            bounds(&annotations),
            vec![(1, 26), (26, 51), (51, 76), (76, 101)]
        );
    }

    #[test]
    fn synthetic_spacing_without_content() {
        let recs = records(&["1", "1.1", "1.2"]);
        let annotations = assign_positions(&recs, None);
        assert_eq!(bounds(&annotations), vec![(1, 11), (11, 21), (21, 31)]);
    }

    #[test]
    fn empty_content_counts_as_absent() {
        assert_eq!(content_length(3, Some("")), 30);
    }

    #[test]
    fn content_length_counts_characters() {
        assert_eq!(content_length(1, Some("བོད་")), 4);
    }

    #[test]
    fn short_content_still_yields_nonempty_slots() {
        let recs = records(&["1", "2", "3"]);
        let annotations = assign_positions(&recs, Some("ab"));
        assert_eq!(bounds(&annotations), vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn no_records_no_annotations() {
        assert!(assign_positions(&[], None).is_empty());
        assert_eq!(base_spacing(0, None), 0);
    }

    #[test]
    fn meta_carries_level() {
        let recs = records(&["1", "1.2.3"]);
        let annotations = assign_positions(&recs, None);
        assert_eq!(annotations[0].meta.level, 1);
        assert_eq!(annotations[1].meta.level, 3);
        assert_eq!(annotations[1].meta.parent, None);
    }
}

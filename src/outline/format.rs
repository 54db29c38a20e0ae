//! Document assembly and the public view.

use crate::outline::error::{OutlineError, OutlineResult};
use crate::outline::expand::expand;
use crate::outline::model::{Annotation, Document, TextInfo};
use crate::outline::position::assign_positions;
use crate::outline::record::PartRecord;
use crate::outline::tree::AnnotationTree;
use crate::outline::tree_index::TreeIndex;

/// Filler character for synthetic content.
pub const FILLER: char = '_';

/// Key of the full-view descendant list.
pub const DESCENDANTS_KEY: &str = "descendants";

/// Text-level settings for one document.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub title: Option<String>,
    pub language: String,
    pub source: String,
    /// Real content, if any. Without it the content is filler.
    pub content: Option<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: None,
            language: crate::config::DEFAULT_LANGUAGE.into(),
            source: crate::config::DEFAULT_SOURCE.into(),
            content: None,
        }
    }
}

/// Sort records by parsed tree index, stably.
///
/// A malformed index aborts with the offending record's id.
pub fn sort_records(records: Vec<PartRecord>) -> OutlineResult<Vec<PartRecord>> {
    let mut keyed = records
        .into_iter()
        .map(|record| match TreeIndex::parse(&record.part_tree_index) {
            Ok(key) => Ok((key, record)),
            Err(reason) => Err(OutlineError::MalformedTreeIndex {
                record_id: record.id.clone(),
                tree_index: record.part_tree_index.clone(),
                reason,
            }),
        })
        .collect::<OutlineResult<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// Run the whole conversion: sort, position, link, expand, format.
pub fn build_document(
    records: Vec<PartRecord>,
    options: DocumentOptions,
) -> OutlineResult<Document> {
    let records = sort_records(records)?;
    let mut annotations = assign_positions(&records, options.content.as_deref());

    let tree = AnnotationTree::build(&records);
    tree.link(&mut annotations);
    expand(&mut annotations);

    for annotation in &mut annotations {
        let descendants = tree.descendants_of(annotation.tree_index());
        annotation
            .extra
            .insert(DESCENDANTS_KEY.into(), serde_json::json!(descendants));
    }

    tracing::debug!(annotations = annotations.len(), "annotations positioned");
    Ok(to_document(annotations, options))
}

/// Wrap annotations in a document.
///
/// Content is padded with filler up to the furthest end position so every
/// range stays in bounds; without content it is pure filler.
pub fn to_document(annotations: Vec<Annotation>, options: DocumentOptions) -> Document {
    let max_end = annotations
        .iter()
        .map(|a| a.end_position)
        .max()
        .unwrap_or(0);

    let mut content = options.content.unwrap_or_default();
    let len = content.chars().count();
    if len < max_end {
        content.extend(std::iter::repeat_n(FILLER, max_end - len));
    }

    Document {
        text: TextInfo {
            title: options.title,
            content,
            language: options.language,
            source: options.source,
        },
        annotations,
    }
}

/// Keep only the public annotation fields; the text block passes through.
pub fn filter_public_view(document: &Document) -> Document {
    Document {
        text: document.text.clone(),
        annotations: document
            .annotations
            .iter()
            .map(|a| Annotation {
                extra: Default::default(),
                ..a.clone()
            })
            .collect(),
    }
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
                    label: Some(format!("part {idx}")),
                    part_tree_index: Some((*idx).into()),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn sorts_numerically_before_positioning() {
        let doc = build_document(records(&["1.10", "1", "1.9", "1.2"]), Default::default()).unwrap();
        let order: Vec<&str> = doc.annotations.iter().map(|a| a.tree_index()).collect();
        assert_eq!(order, vec!["1", "1.2", "1.9", "1.10"]);
        assert_eq!(doc.annotations[0].start_position, 1);
        assert_eq!(doc.annotations[0].end_position, 41);
    }

    #[test]
    fn filler_content_matches_furthest_end() {
        let doc = build_document(records(&["1", "1.1", "1.2"]), Default::default()).unwrap();
        assert_eq!(doc.text.content, "_".repeat(31));
        assert_eq!(doc.text.language, "bo");
        assert_eq!(doc.text.source, "Buddhist Digital Resource Center");
    }

    #[test]
    fn real_content_is_padded_not_truncated() {
        let options = DocumentOptions {
            content: Some("abcdefgh".into()),
            ..Default::default()
        };
        let doc = build_document(records(&["1", "2", "3"]), options).unwrap();
        // spacing 8 / 3 = 2, last end is 7
        assert_eq!(doc.text.content, "abcdefgh");

        let options = DocumentOptions {
            content: Some("abcd".into()),
            ..Default::default()
        };
        let doc = build_document(records(&["1", "2", "3"]), options).unwrap();
        assert_eq!(doc.annotations[2].end_position, 4);
        assert_eq!(doc.text.content, "abcd");

        let options = DocumentOptions {
            content: Some("ab".into()),
            ..Default::default()
        };
        let doc = build_document(records(&["1", "2", "3"]), options).unwrap();
        assert_eq!(doc.text.content, "ab__");
    }

    #[test]
    fn empty_record_set_gives_empty_document() {
        let doc = build_document(Vec::new(), Default::default()).unwrap();
        assert!(doc.annotations.is_empty());
        assert_eq!(doc.text.content, "");
    }

    #[test]
    fn malformed_index_names_the_record() {
        let err = build_document(records(&["1", "1.x"]), Default::default()).unwrap_err();
        match err {
            OutlineError::MalformedTreeIndex {
                record_id,
                tree_index,
                ..
            } => {
                assert_eq!(record_id, "P1.x");
                assert_eq!(tree_index, "1.x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn signed_segment_is_malformed() {
        let err = build_document(records(&["1", "+1.1", "1.1"]), Default::default()).unwrap_err();
        assert!(matches!(
            err,
            OutlineError::MalformedTreeIndex { ref record_id, .. } if record_id == "P+1.1"
        ));
    }

    #[test]
    fn full_view_lists_descendants() {
        let doc = build_document(records(&["1", "1.1", "1.1.1"]), Default::default()).unwrap();
        assert_eq!(doc.annotations[0].extra[DESCENDANTS_KEY], serde_json::json!([1, 2]));
        assert_eq!(doc.annotations[2].extra[DESCENDANTS_KEY], serde_json::json!([]));
    }

    #[test]
    fn public_view_drops_extra_keys_and_is_idempotent() {
        let doc = build_document(records(&["1", "1.1", "2"]), Default::default()).unwrap();
        let public = filter_public_view(&doc);
        assert!(public.annotations.iter().all(|a| a.extra.is_empty()));
        assert_eq!(public.text, doc.text);
        assert_eq!(filter_public_view(&public), public);

        let json = serde_json::to_value(&public).unwrap();
        let mut keys: Vec<&str> = json["annotations"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["annotation_type", "end_position", "label", "meta", "name", "start_position"]
        );

        // Key order is the struct field order in the serialized text.
        let text = serde_json::to_string(&public.annotations[0]).unwrap();
        let offsets: Vec<usize> = [
            "\"annotation_type\"",
            "\"start_position\"",
            "\"end_position\"",
            "\"label\"",
            "\"name\"",
            "\"meta\"",
        ]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn meta_serializes_parent_fields_only_when_resolved() {
        let doc = build_document(records(&["1", "1.1", "2.1"]), Default::default()).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        let root = &json["annotations"][0]["meta"];
        assert!(root["parent"].is_null());
        assert!(root.get("parent_id").is_none());
        assert_eq!(root["relationship"], "parent");

        let child = &json["annotations"][1]["meta"];
        assert_eq!(child["parent"], "1");
        assert_eq!(child["parent_id"], 0);
        assert_eq!(child["relationship"], "child");
        assert_eq!(child["level"], 2);

        let orphan = &json["annotations"][2]["meta"];
        assert!(orphan["parent"].is_null());
        assert!(orphan.get("parent_id").is_none());
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = build_document(records(&["1", "1.1"]), Default::default()).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}

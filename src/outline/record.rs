//! Part records: the normalized input of the annotation core.
//!
//! A [`RawPart`] is one flattened metadata record as the graph layer (or a
//! JSON dump) hands it over, with every value still a string. Extraction maps
//! it to a typed [`PartRecord`]; field-level failures recover to `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A title attached to a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub label: Option<String>,
}

/// A location attribute value: numeric where the source is numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationValue {
    Int(i64),
    Text(String),
}

impl LocationValue {
    /// Integers stay integers, everything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

/// One flattened metadata record, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPart {
    pub id: String,
    pub part_type: Option<String>,
    pub label: Option<String>,
    pub titles: Vec<Title>,
    pub colophon: Option<String>,
    pub location: BTreeMap<String, String>,
    pub part_index: Option<String>,
    pub part_tree_index: Option<String>,
    pub instance_of: Option<String>,
    pub part_of: Option<String>,
    pub root_instance: Option<String>,
}

/// One text/section/volume/chapter part of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: String,
    pub label: Option<String>,
    pub titles: Vec<Title>,
    pub colophon: Option<String>,
    pub location: Option<BTreeMap<String, LocationValue>>,
    pub part_index: Option<i64>,
    pub part_tree_index: String,
    pub instance_of: Option<String>,
    pub part_of: Option<String>,
    pub root_instance: Option<String>,
    #[serde(skip)]
    pub part_type: Option<String>,
}

impl PartRecord {
    /// Map a raw record. Never fails; bad optional fields become `None`.
    ///
    /// A missing tree index maps to the empty string, which the tree-index
    /// parser rejects later with the record id attached.
    pub fn from_raw(raw: RawPart) -> Self {
        let part_index = raw.part_index.as_deref().and_then(|s| {
            let parsed = s.trim().parse::<i64>().ok();
            if parsed.is_none() {
                tracing::debug!(id = %raw.id, value = s, "ignoring unparseable part index");
            }
            parsed
        });

        let location = if raw.location.is_empty() {
            None
        } else {
            Some(
                raw.location
                    .iter()
                    .map(|(k, v)| (k.clone(), LocationValue::parse(v)))
                    .collect(),
            )
        };

        Self {
            label: non_blank(raw.label),
            titles: raw.titles,
            colophon: non_blank(raw.colophon),
            location,
            part_index,
            part_tree_index: raw.part_tree_index.unwrap_or_default().trim().to_string(),
            instance_of: non_blank(raw.instance_of),
            part_of: non_blank(raw.part_of),
            root_instance: non_blank(raw.root_instance),
            part_type: raw.part_type,
            id: raw.id,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Normalize raw records, flagging duplicate tree indices.
///
/// Duplicates are kept: the caller's sort is stable, but which one becomes a
/// parent is ambiguous.
pub fn extract_parts(raw: Vec<RawPart>) -> Vec<PartRecord> {
    let records: Vec<PartRecord> = raw.into_iter().map(PartRecord::from_raw).collect();
    for (tree_index, ids) in duplicate_tree_indices(&records) {
        tracing::warn!(
            tree_index = %tree_index,
            ids = ?ids,
            "duplicate part tree index, keeping all records"
        );
    }
    records
}

/// Tree indices carried by more than one record, with the ids that carry them.
pub fn duplicate_tree_indices(records: &[PartRecord]) -> BTreeMap<String, Vec<String>> {
    let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        seen.entry(record.part_tree_index.as_str())
            .or_default()
            .push(record.id.as_str());
    }
    seen.into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(idx, ids)| {
            (
                idx.to_string(),
                ids.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, tree_index: &str) -> RawPart {
        RawPart {
            id: id.into(),
            part_tree_index: Some(tree_index.into()),
            ..Default::default()
        }
    }

    #[test]
    fn maps_all_fields() {
        let mut location = BTreeMap::new();
        location.insert("volume".to_string(), "1".to_string());
        location.insert("page".to_string(), " 23 ".to_string());
        location.insert("instance".to_string(), "W22084".to_string());

        let record = PartRecord::from_raw(RawPart {
            id: "MW1_0001".into(),
            part_type: Some("PartTypeText".into()),
            label: Some("ཤེས་རབ་སྙིང་པོ།".into()),
            titles: vec![Title {
                id: "TT1".into(),
                kind: Some("TitlePageTitle".into()),
                label: Some("sher snying".into()),
            }],
            colophon: Some("colophon text".into()),
            location,
            part_index: Some("3".into()),
            part_tree_index: Some("1.3".into()),
            instance_of: Some("WA1".into()),
            part_of: Some("MW1".into()),
            root_instance: Some("MW1".into()),
        });

        assert_eq!(record.id, "MW1_0001");
        assert_eq!(record.label.as_deref(), Some("ཤེས་རབ་སྙིང་པོ།"));
        assert_eq!(record.part_index, Some(3));
        assert_eq!(record.part_tree_index, "1.3");
        let location = record.location.unwrap();
        assert_eq!(location["volume"], LocationValue::Int(1));
        assert_eq!(location["page"], LocationValue::Int(23));
        assert_eq!(location["instance"], LocationValue::Text("W22084".into()));
        assert_eq!(record.titles.len(), 1);
        assert_eq!(record.part_type.as_deref(), Some("PartTypeText"));
    }

    #[test]
    fn missing_and_bad_fields_become_none() {
        let record = PartRecord::from_raw(RawPart {
            id: "X".into(),
            label: Some("   ".into()),
            part_index: Some("first".into()),
            ..Default::default()
        });
        assert_eq!(record.label, None);
        assert_eq!(record.part_index, None);
        assert_eq!(record.location, None);
        assert!(record.titles.is_empty());
        assert_eq!(record.part_tree_index, "");
    }

    #[test]
    fn duplicates_are_flagged_and_kept() {
        let records = extract_parts(vec![raw("a", "1"), raw("b", "1.1"), raw("c", "1.1")]);
        assert_eq!(records.len(), 3);
        let dups = duplicate_tree_indices(&records);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups["1.1"], vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn raw_part_from_sparse_json() {
        let parsed: RawPart =
            serde_json::from_str(r#"{"id": "P1", "part_tree_index": "2"}"#).unwrap();
        assert_eq!(parsed.id, "P1");
        assert_eq!(parsed.part_tree_index.as_deref(), Some("2"));
        assert!(parsed.location.is_empty());
    }

    #[test]
    fn location_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            LocationValue::Int(5),
            LocationValue::Text("a".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[5,"a"]"#);
    }
}

//! Output document types.
//!
//! Field order here is the key order of the serialized JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::outline::record::{LocationValue, PartRecord, Title};
use crate::outline::tree_index;

pub const ANNOTATION_TYPE_HEADER: &str = "header";
pub const LABEL_SECTION_HEADER: &str = "section_header";

/// Role of an annotation within the resolved hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Parent,
    Child,
}

/// Everything known about the part behind an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMeta {
    pub id: String,
    pub location: Option<BTreeMap<String, LocationValue>>,
    #[serde(default)]
    pub titles: Vec<Title>,
    pub colophon: Option<String>,
    pub part_index: Option<i64>,
    pub part_tree_index: String,
    pub instance_of: Option<String>,
    pub part_of: Option<String>,
    pub root_instance: Option<String>,
    pub level: usize,
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
}

impl AnnotationMeta {
    /// Meta for a record with no resolved parent yet.
    pub fn from_record(record: &PartRecord) -> Self {
        Self {
            id: record.id.clone(),
            location: record.location.clone(),
            titles: record.titles.clone(),
            colophon: record.colophon.clone(),
            part_index: record.part_index,
            part_tree_index: record.part_tree_index.clone(),
            instance_of: record.instance_of.clone(),
            part_of: record.part_of.clone(),
            root_instance: record.root_instance.clone(),
            level: tree_index::depth(&record.part_tree_index),
            parent: None,
            parent_id: None,
            relationship: None,
        }
    }
}

/// One header annotation over the content string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotation_type: String,
    pub start_position: usize,
    pub end_position: usize,
    pub label: String,
    pub name: Option<String>,
    pub meta: AnnotationMeta,
    /// Keys outside the public schema (e.g. `descendants` in the full view).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Annotation {
    pub fn header(record: &PartRecord, start_position: usize, end_position: usize) -> Self {
        Self {
            annotation_type: ANNOTATION_TYPE_HEADER.into(),
            start_position,
            end_position,
            label: LABEL_SECTION_HEADER.into(),
            name: record.label.clone(),
            meta: AnnotationMeta::from_record(record),
            extra: BTreeMap::new(),
        }
    }

    pub fn tree_index(&self) -> &str {
        &self.meta.part_tree_index
    }
}

/// The text block of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInfo {
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub source: String,
}

/// A text plus its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: TextInfo,
    pub annotations: Vec<Annotation>,
}

//! Outline-to-annotation conversion.
//!
//! An outline is a set of text parts, each tagged with a dotted tree index.
//! This module flattens it into header annotations over a (usually
//! synthetic) content string, with parent ranges widened bottom-up so every
//! ancestor covers its descendants.
//!
//! Pipeline: [`record`] → [`position`] → [`tree`] → [`expand`] → [`format`].
//! [`processor`] wires it to a graph source and a document cache.

pub mod error;
pub mod expand;
pub mod format;
pub mod model;
pub mod position;
pub mod processor;
pub mod record;
pub mod tree;
pub mod tree_index;

pub use error::{OutlineError, OutlineResult};
pub use format::{DocumentOptions, build_document, filter_public_view, to_document};
pub use model::{Annotation, AnnotationMeta, Document, Relationship, TextInfo};
pub use processor::{OutlineProcessor, ProcessedOutline, export_public};
pub use record::{PartRecord, RawPart, extract_parts};
pub use tree::AnnotationTree;
pub use tree_index::{TreeIndex, is_descendant_of};

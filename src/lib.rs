// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # bdrc-outline
//!
//! Flattens BDRC outline metadata into position-annotated documents.
//!
//! An outline is a tree of text parts keyed by dotted tree indices
//! (`"1"`, `"1.2"`, `"1.2.3"`). This crate fetches an outline's RDF graph,
//! extracts its parts, places every part on a character axis and widens
//! each parent to cover its descendants, then emits a document with
//! `start_position`/`end_position` annotations.
//!
//! ## Architecture
//!
//! - **Outline core** (`outline`): tree indices, records, tree building,
//!   position assignment, range expansion, formatting and the public view
//! - **RDF** (`rdf`): Turtle graphs via oxigraph, part extraction, HTTP source
//! - **Search** (`search`): parallel scraping of search results for instance ids
//! - **Cache** (`cache`): named JSON documents on disk or in memory
//!
//! ## Library usage
//!
//! ```no_run
//! use bdrc_outline::outline::{DocumentOptions, build_document, RawPart, extract_parts};
//!
//! let raw: Vec<RawPart> = serde_json::from_str(r#"[
//!     {"id": "P1", "part_tree_index": "1"},
//!     {"id": "P2", "part_tree_index": "1.1"}
//! ]"#).unwrap();
//! let doc = build_document(extract_parts(raw), DocumentOptions::default()).unwrap();
//! assert_eq!(doc.annotations.len(), 2);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod outline;
pub mod paths;
pub mod rdf;
pub mod search;

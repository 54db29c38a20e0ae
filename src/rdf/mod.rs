//! RDF collaborator: fetching and reading BDRC linked-data graphs.
//!
//! Graphs are parsed with oxigraph and exposed read-only through
//! [`MetadataGraph`]. The annotation core never sees RDF; [`extract`] turns
//! a graph into plain part records first.

pub mod error;
pub mod extract;
pub mod graph;
pub mod source;
pub mod vocab;

pub use error::{GraphError, GraphResult};
pub use graph::{MetadataGraph, Node};
pub use source::{
    GraphSource, HttpGraphSource, StaticGraphSource, instances_of_work, outlines_of_instance,
    works_of_instance,
};

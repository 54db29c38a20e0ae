//! Diagnostic error types for outline-to-annotation conversion.

use miette::Diagnostic;
use thiserror::Error;

/// Why a dotted tree index could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeIndexError {
    #[error("tree index is empty")]
    Empty,

    #[error("segment \"{segment}\" is not a non-negative integer")]
    NonNumeric { segment: String },
}

/// Errors from the annotation core.
#[derive(Debug, Error, Diagnostic)]
pub enum OutlineError {
    #[error("malformed tree index \"{tree_index}\" on record \"{record_id}\": {reason}")]
    #[diagnostic(
        code(bdrc::outline::malformed_tree_index),
        help(
            "Every part must carry a dotted numeric tree index such as \"1.2.3\". \
             Check the bdo:partTreeIndex value of the named part in the outline graph."
        )
    )]
    MalformedTreeIndex {
        record_id: String,
        tree_index: String,
        #[source]
        reason: TreeIndexError,
    },

    #[error("no graph data for \"{id}\"")]
    #[diagnostic(
        code(bdrc::outline::no_graph_data),
        help(
            "The endpoint returned nothing for this id. Verify the id exists \
             in the library and that it is an outline (O...) or instance (MW...) id."
        )
    )]
    NoGraphData { id: String },

    #[error("instance \"{instance_id}\" has no outline")]
    #[diagnostic(
        code(bdrc::outline::no_outline),
        help("Not every instance is outlined. Try another instance of the same work.")
    )]
    NoOutline { instance_id: String },
}

/// Convenience alias for annotation-core results.
pub type OutlineResult<T> = std::result::Result<T, OutlineError>;

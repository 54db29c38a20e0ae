//! Rich diagnostic error types for bdrc-outline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives; `BdrcError` wraps them so the CLI can render any of them with
//! codes and help text intact.

use miette::Diagnostic;
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::outline::error::OutlineError;
use crate::paths::PathError;
use crate::rdf::error::GraphError;
use crate::search::SearchError;

/// Top-level error type.
#[derive(Debug, Error, Diagnostic)]
pub enum BdrcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Outline(#[from] OutlineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Paths(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Search(#[from] SearchError),

    /// Any failure while processing one outline, with the outline id attached.
    #[error("could not process outline {outline_id}: {source}")]
    #[diagnostic(code(bdrc::process_outline))]
    ProcessOutline {
        outline_id: String,
        #[source]
        source: Box<BdrcError>,
    },
}

impl BdrcError {
    /// Attach the outline id to an error raised while processing it.
    pub fn for_outline(outline_id: &str, source: impl Into<BdrcError>) -> Self {
        Self::ProcessOutline {
            outline_id: outline_id.to_string(),
            source: Box::new(source.into()),
        }
    }
}

/// Convenience alias.
pub type BdrcResult<T> = std::result::Result<T, BdrcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_failure_names_the_outline() {
        let err = BdrcError::for_outline(
            "O2DB80610",
            OutlineError::NoGraphData {
                id: "O2DB80610".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "could not process outline O2DB80610: no graph data for \"O2DB80610\""
        );
    }

    #[test]
    fn subsystem_errors_convert() {
        let err: BdrcError = GraphError::Store {
            message: "boom".into(),
        }
        .into();
        assert!(matches!(err, BdrcError::Graph(_)));
    }
}

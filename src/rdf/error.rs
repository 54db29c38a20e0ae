//! Diagnostic error types for the RDF collaborator.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(bdrc::rdf::fetch),
        help(
            "Failed to download the resource. Check that the endpoint is reachable \
             and the base URLs in the config file are correct."
        )
    )]
    Fetch { url: String, message: String },

    #[error("could not parse Turtle for \"{id}\": {message}")]
    #[diagnostic(
        code(bdrc::rdf::parse),
        help("The endpoint returned something that is not valid Turtle.")
    )]
    Parse { id: String, message: String },

    #[error("graph store error: {message}")]
    #[diagnostic(
        code(bdrc::rdf::store),
        help("The in-memory oxigraph store failed. This is a bug; please report it.")
    )]
    Store { message: String },
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

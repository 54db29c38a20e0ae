//! Where graphs come from: the `GraphSource` seam and its HTTP implementation.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::rdf::error::{GraphError, GraphResult};
use crate::rdf::extract::linked_ids;
use crate::rdf::graph::MetadataGraph;
use crate::rdf::vocab;

/// Provider of resource and outline graphs.
///
/// `Ok(None)` means the endpoint has no data for the id; it is not an error.
pub trait GraphSource {
    /// Triples describing a single resource (instance, work, ...).
    fn resource_graph(&self, id: &str) -> GraphResult<Option<MetadataGraph>>;

    /// The full named graph of an outline.
    fn outline_graph(&self, outline_id: &str) -> GraphResult<Option<MetadataGraph>>;
}

/// Fetches Turtle from the library's linked-data endpoints via `ureq`.
pub struct HttpGraphSource {
    agent: ureq::Agent,
    resource_base: String,
    graph_base: String,
}

impl HttpGraphSource {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            resource_base: config.resource_base.clone(),
            graph_base: config.graph_base.clone(),
        }
    }

    fn fetch_turtle(&self, id: &str, url: &str) -> GraphResult<Option<MetadataGraph>> {
        tracing::debug!(url, "fetching turtle");
        let response = match self.agent.get(url).set("Accept", "text/turtle").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                tracing::warn!(id, url, "no data at endpoint");
                return Ok(None);
            }
            Err(e) => {
                return Err(GraphError::Fetch {
                    url: url.into(),
                    message: e.to_string(),
                });
            }
        };
        let body = response.into_string().map_err(|e| GraphError::Fetch {
            url: url.into(),
            message: format!("read body: {e}"),
        })?;
        let graph = MetadataGraph::from_turtle(id, &body)?;
        tracing::debug!(id, triples = graph.len(), "parsed graph");
        Ok(Some(graph))
    }
}

impl GraphSource for HttpGraphSource {
    fn resource_graph(&self, id: &str) -> GraphResult<Option<MetadataGraph>> {
        let url = format!("{}{id}.ttl", self.resource_base);
        self.fetch_turtle(id, &url)
    }

    fn outline_graph(&self, outline_id: &str) -> GraphResult<Option<MetadataGraph>> {
        let url = format!("{}{outline_id}.ttl", self.graph_base);
        self.fetch_turtle(outline_id, &url)
    }
}

/// Serves Turtle documents held in memory, keyed by id.
///
/// Used for offline runs and tests; unknown ids have no data.
#[derive(Debug, Clone, Default)]
pub struct StaticGraphSource {
    resources: HashMap<String, String>,
    outlines: HashMap<String, String>,
}

impl StaticGraphSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, id: &str, turtle: &str) -> Self {
        self.resources.insert(id.into(), turtle.into());
        self
    }

    pub fn with_outline(mut self, id: &str, turtle: &str) -> Self {
        self.outlines.insert(id.into(), turtle.into());
        self
    }
}

impl GraphSource for StaticGraphSource {
    fn resource_graph(&self, id: &str) -> GraphResult<Option<MetadataGraph>> {
        self.resources
            .get(id)
            .map(|ttl| MetadataGraph::from_turtle(id, ttl))
            .transpose()
    }

    fn outline_graph(&self, outline_id: &str) -> GraphResult<Option<MetadataGraph>> {
        self.outlines
            .get(outline_id)
            .map(|ttl| MetadataGraph::from_turtle(outline_id, ttl))
            .transpose()
    }
}

fn linked_from_resource<S: GraphSource + ?Sized>(
    source: &S,
    id: &str,
    predicate: &str,
) -> GraphResult<Vec<String>> {
    match source.resource_graph(id)? {
        Some(graph) => Ok(linked_ids(&graph, predicate)),
        None => Ok(Vec::new()),
    }
}

/// Outline ids of an instance (`bdo:hasOutline`). Empty when there is no data.
pub fn outlines_of_instance<S: GraphSource + ?Sized>(
    source: &S,
    instance_id: &str,
) -> GraphResult<Vec<String>> {
    linked_from_resource(source, instance_id, vocab::HAS_OUTLINE)
}

/// Work ids an instance realizes (`bdo:instanceOf`).
pub fn works_of_instance<S: GraphSource + ?Sized>(
    source: &S,
    instance_id: &str,
) -> GraphResult<Vec<String>> {
    linked_from_resource(source, instance_id, vocab::INSTANCE_OF)
}

/// Instance ids of a work (`bdo:workHasInstance`).
pub fn instances_of_work<S: GraphSource + ?Sized>(
    source: &S,
    work_id: &str,
) -> GraphResult<Vec<String>> {
    linked_from_resource(source, work_id, vocab::WORK_HAS_INSTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE: &str = r#"
        @prefix bdo: <http://purl.bdrc.io/ontology/core/> .
        @prefix bdr: <http://purl.bdrc.io/resource/> .
        bdr:MW21752 bdo:hasOutline bdr:O1234 ;
            bdo:instanceOf bdr:WA0RK0529 .
    "#;

    const WORK: &str = r#"
        @prefix bdo: <http://purl.bdrc.io/ontology/core/> .
        @prefix bdr: <http://purl.bdrc.io/resource/> .
        bdr:WA0RK0529 bdo:workHasInstance bdr:MW21752, bdr:W22084, bdr:MW21752 .
    "#;

    fn source() -> StaticGraphSource {
        StaticGraphSource::new()
            .with_resource("MW21752", INSTANCE)
            .with_resource("WA0RK0529", WORK)
            .with_resource("MW0", "")
    }

    #[test]
    fn outline_of_instance() {
        assert_eq!(outlines_of_instance(&source(), "MW21752").unwrap(), vec!["O1234"]);
    }

    #[test]
    fn missing_metadata_is_empty() {
        assert!(outlines_of_instance(&source(), "MW404").unwrap().is_empty());
        assert!(works_of_instance(&source(), "MW404").unwrap().is_empty());
    }

    #[test]
    fn graph_without_outline_is_empty() {
        assert!(outlines_of_instance(&source(), "MW0").unwrap().is_empty());
    }

    #[test]
    fn work_links_both_ways() {
        assert_eq!(works_of_instance(&source(), "MW21752").unwrap(), vec!["WA0RK0529"]);
        assert_eq!(
            instances_of_work(&source(), "WA0RK0529").unwrap(),
            vec!["MW21752", "W22084"]
        );
    }

    #[test]
    fn http_source_builds_urls_from_config() {
        let config = Config::default();
        let source = HttpGraphSource::new(&config);
        assert_eq!(source.resource_base, "https://purl.bdrc.io/resource/");
        assert_eq!(source.graph_base, "https://purl.bdrc.io/graph/");
    }
}

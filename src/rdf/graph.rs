//! Read-only metadata graph backed by oxigraph.
//!
//! Turtle is parsed through an in-memory oxigraph store, then every triple is
//! indexed by subject so lookups are plain map reads. Subjects are keyed by
//! IRI, or by `_:label` for blank nodes.

use std::collections::BTreeMap;

use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use oxigraph::store::Store;

use crate::rdf::error::{GraphError, GraphResult};
use crate::rdf::vocab;

/// An RDF term as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Node {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        language: Option<String>,
    },
}

impl Node {
    fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::NamedNode(n) => Some(Self::Iri(n.as_str().to_string())),
            Term::BlankNode(b) => Some(Self::Blank(format!("_:{}", b.as_str()))),
            Term::Literal(l) => Some(Self::Literal {
                value: l.value().to_string(),
                language: l.language().map(str::to_string),
            }),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// The subject key this node refers to, if it can be a subject.
    pub fn as_subject(&self) -> Option<&str> {
        match self {
            Self::Iri(s) | Self::Blank(s) => Some(s),
            Self::Literal { .. } => None,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Literal value, or the local name of an IRI.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Iri(s) => Some(vocab::local_name(s)),
            Self::Literal { value, .. } => Some(value),
            Self::Blank(_) => None,
        }
    }
}

/// Triples of one fetched resource or named graph.
#[derive(Debug, Clone, Default)]
pub struct MetadataGraph {
    id: String,
    by_subject: BTreeMap<String, Vec<(String, Node)>>,
    len: usize,
}

impl MetadataGraph {
    /// Parse a Turtle document fetched for `id`.
    pub fn from_turtle(id: &str, turtle: &str) -> GraphResult<Self> {
        let store = Store::new().map_err(|e| GraphError::Store {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| GraphError::Parse {
                id: id.to_string(),
                message: e.to_string(),
            })?;

        let mut by_subject: BTreeMap<String, Vec<(String, Node)>> = BTreeMap::new();
        let mut len = 0;
        for quad in store.iter() {
            let quad = quad.map_err(|e| GraphError::Store {
                message: format!("quad iteration failed: {e}"),
            })?;
            let Some(object) = Node::from_term(&quad.object) else {
                continue;
            };
            let subject = subject_key(&quad.subject.to_string());
            by_subject
                .entry(subject)
                .or_default()
                .push((quad.predicate.as_str().to_string(), object));
            len += 1;
        }
        for entries in by_subject.values_mut() {
            entries.sort();
        }

        Ok(Self {
            id: id.to_string(),
            by_subject,
            len,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All subjects, in key order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.by_subject.keys().map(String::as_str)
    }

    /// All (predicate, object) pairs of a subject.
    pub fn predicate_objects(&self, subject: &str) -> &[(String, Node)] {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Objects of `subject` under `predicate`.
    pub fn objects<'a, 'p>(
        &'a self,
        subject: &str,
        predicate: &'p str,
    ) -> impl Iterator<Item = &'a Node> + use<'a, 'p> {
        self.predicate_objects(subject)
            .iter()
            .filter(move |(p, _)| p == predicate)
            .map(|(_, o)| o)
    }

    /// First literal of `subject` under `predicate`, in sorted order.
    pub fn first_literal(&self, subject: &str, predicate: &str) -> Option<&str> {
        self.objects(subject, predicate).find_map(Node::as_literal)
    }

    /// First IRI object of `subject` under `predicate`, in sorted order.
    pub fn first_iri(&self, subject: &str, predicate: &str) -> Option<&str> {
        self.objects(subject, predicate).find_map(Node::as_iri)
    }

    /// Subjects declared `rdf:type` of the given class.
    pub fn subjects_of_type<'a, 'c>(
        &'a self,
        class: &'c str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'c> {
        self.by_subject.iter().filter_map(move |(s, pos)| {
            pos.iter()
                .any(|(p, o)| p == vocab::RDF_TYPE && o.as_iri() == Some(class))
                .then_some(s.as_str())
        })
    }

    /// Every object of `predicate`, across all subjects.
    pub fn objects_of_predicate<'a, 'p>(
        &'a self,
        predicate: &'p str,
    ) -> impl Iterator<Item = &'a Node> + use<'a, 'p> {
        self.by_subject
            .values()
            .flatten()
            .filter(move |(p, _)| p == predicate)
            .map(|(_, o)| o)
    }
}

/// `<iri>` → `iri`; blank nodes keep their `_:` form.
fn subject_key(rendered: &str) -> String {
    rendered
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(rendered)
        .to_string()
}

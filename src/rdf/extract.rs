//! Pull part records and titles out of an outline graph.

use std::collections::BTreeMap;

use crate::outline::record::{RawPart, Title};
use crate::rdf::graph::{MetadataGraph, Node};
use crate::rdf::vocab;

/// Every subject with a recognized `bdo:partType`, as raw part records.
///
/// Subjects are visited in IRI order; the annotation core re-sorts by tree
/// index anyway.
pub fn text_parts(graph: &MetadataGraph) -> Vec<RawPart> {
    graph
        .subjects()
        .filter_map(|subject| {
            let part_type = graph
                .objects(subject, vocab::PART_TYPE)
                .filter_map(Node::as_iri)
                .find(|t| vocab::RECOGNIZED_PART_TYPES.contains(t))?;
            Some(raw_part(graph, subject, part_type))
        })
        .collect()
}

fn raw_part(graph: &MetadataGraph, subject: &str, part_type: &str) -> RawPart {
    RawPart {
        id: vocab::local_name(subject).to_string(),
        part_type: Some(vocab::local_name(part_type).to_string()),
        label: preferred_label(graph, subject, vocab::SKOS_PREF_LABEL),
        titles: titles(graph, subject),
        colophon: graph
            .first_literal(subject, vocab::COLOPHON)
            .map(str::to_string),
        location: location(graph, subject),
        part_index: graph
            .first_literal(subject, vocab::PART_INDEX)
            .map(str::to_string),
        part_tree_index: graph
            .first_literal(subject, vocab::PART_TREE_INDEX)
            .map(str::to_string),
        instance_of: reference(graph, subject, vocab::INSTANCE_OF),
        part_of: reference(graph, subject, vocab::PART_OF),
        root_instance: reference(graph, subject, vocab::IN_ROOT_INSTANCE),
    }
}

/// First literal ordered by (language, value), so the choice is stable.
fn preferred_label(graph: &MetadataGraph, subject: &str, predicate: &str) -> Option<String> {
    graph
        .objects(subject, predicate)
        .filter_map(|node| match node {
            Node::Literal { value, language } => Some((language.as_deref().unwrap_or(""), value)),
            _ => None,
        })
        .min()
        .map(|(_, value)| value.clone())
}

fn titles(graph: &MetadataGraph, subject: &str) -> Vec<Title> {
    graph
        .objects(subject, vocab::HAS_TITLE)
        .filter_map(Node::as_subject)
        .map(|title| Title {
            id: vocab::local_name(title).to_string(),
            kind: graph
                .first_iri(title, vocab::RDF_TYPE)
                .map(|t| vocab::local_name(t).to_string()),
            label: preferred_label(graph, title, vocab::RDFS_LABEL),
        })
        .collect()
}

fn location(graph: &MetadataGraph, subject: &str) -> BTreeMap<String, String> {
    let Some(node) = graph
        .objects(subject, vocab::CONTENT_LOCATION)
        .find_map(Node::as_subject)
    else {
        return BTreeMap::new();
    };
    graph
        .predicate_objects(node)
        .iter()
        .filter_map(|(p, o)| Some((vocab::location_key(p)?, o.as_value()?.to_string())))
        .collect()
}

fn reference(graph: &MetadataGraph, subject: &str, predicate: &str) -> Option<String> {
    graph
        .first_iri(subject, predicate)
        .map(|iri| vocab::local_name(iri).to_string())
}

/// Label of the title-page title, if the graph has one.
///
/// With several title-page titles the lowest subject key wins.
pub fn page_title(graph: &MetadataGraph) -> Option<String> {
    graph
        .subjects_of_type(vocab::TITLE_PAGE_TITLE)
        .find_map(|node| preferred_label(graph, node, vocab::RDFS_LABEL))
}

/// Local names of every object of `predicate`, deduplicated and sorted.
pub fn linked_ids(graph: &MetadataGraph, predicate: &str) -> Vec<String> {
    let mut ids: Vec<String> = graph
        .objects_of_predicate(predicate)
        .filter_map(Node::as_iri)
        .map(|iri| vocab::local_name(iri).to_string())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

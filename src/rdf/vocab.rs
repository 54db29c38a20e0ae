//! Well-known IRIs consumed from the BDRC ontology.
//!
//! Only the predicates and classes the extractor reads are listed here.

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

// Part structure
pub const PART_TYPE: &str = "http://purl.bdrc.io/ontology/core/partType";
pub const PART_INDEX: &str = "http://purl.bdrc.io/ontology/core/partIndex";
pub const PART_TREE_INDEX: &str = "http://purl.bdrc.io/ontology/core/partTreeIndex";
pub const PART_OF: &str = "http://purl.bdrc.io/ontology/core/partOf";
pub const IN_ROOT_INSTANCE: &str = "http://purl.bdrc.io/ontology/core/inRootInstance";
pub const INSTANCE_OF: &str = "http://purl.bdrc.io/ontology/core/instanceOf";
pub const HAS_TITLE: &str = "http://purl.bdrc.io/ontology/core/hasTitle";
pub const COLOPHON: &str = "http://purl.bdrc.io/ontology/core/colophon";
pub const CONTENT_LOCATION: &str = "http://purl.bdrc.io/ontology/core/contentLocation";

// Instance / work / outline links
pub const HAS_OUTLINE: &str = "http://purl.bdrc.io/ontology/core/hasOutline";
pub const WORK_HAS_INSTANCE: &str = "http://purl.bdrc.io/ontology/core/workHasInstance";

// Classes
pub const TITLE_PAGE_TITLE: &str = "http://purl.bdrc.io/ontology/core/TitlePageTitle";

/// Part types whose subjects become part records.
pub const RECOGNIZED_PART_TYPES: [&str; 5] = [
    "http://purl.bdrc.io/resource/PartTypeText",
    "http://purl.bdrc.io/resource/PartTypeTableOfContent",
    "http://purl.bdrc.io/resource/PartTypeVolume",
    "http://purl.bdrc.io/resource/PartTypeSection",
    "http://purl.bdrc.io/resource/PartTypeChapter",
];

/// The last path or fragment segment of an IRI (`bdr:MW22084` → `MW22084`).
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

/// `bdo:contentLocationEndPage` → `end_page`; `None` for other predicates.
pub fn location_key(predicate: &str) -> Option<String> {
    let suffix = predicate.strip_prefix(CONTENT_LOCATION)?;
    if suffix.is_empty() {
        return None;
    }
    let mut key = String::with_capacity(suffix.len() + 4);
    for (i, ch) in suffix.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                key.push('_');
            }
            key.push(ch.to_ascii_lowercase());
        } else {
            key.push(ch);
        }
    }
    Some(key)
}

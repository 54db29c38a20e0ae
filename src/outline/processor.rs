//! End-to-end processing of one outline.
//!
//! Orchestrates: fetch graph → extract parts → build document → public view
//! → cache.

use std::path::{Path, PathBuf};

use crate::cache::{self, DocumentCache};
use crate::error::{BdrcError, BdrcResult};
use crate::outline::error::OutlineError;
use crate::outline::format::{DocumentOptions, build_document, filter_public_view};
use crate::outline::model::Document;
use crate::outline::record::extract_parts;
use crate::rdf::extract::{page_title, text_parts};
use crate::rdf::source::{GraphSource, outlines_of_instance};

/// Both views of a processed outline.
#[derive(Debug, Clone)]
pub struct ProcessedOutline {
    pub outline_id: String,
    /// All derived fields.
    pub full: Document,
    /// Public fields only.
    pub public: Document,
}

/// Turns outline ids into cached documents.
pub struct OutlineProcessor<'a, S: ?Sized, C: ?Sized> {
    source: &'a S,
    cache: &'a C,
    options: DocumentOptions,
}

impl<'a, S, C> OutlineProcessor<'a, S, C>
where
    S: GraphSource + ?Sized,
    C: DocumentCache + ?Sized,
{
    /// `options` supplies language, source and optional real content; the
    /// title comes from each outline graph.
    pub fn new(source: &'a S, cache: &'a C, options: DocumentOptions) -> Self {
        Self {
            source,
            cache,
            options,
        }
    }

    /// Fetch, convert and cache one outline.
    ///
    /// Every failure is reported as "could not process outline <id>: ...".
    pub fn process_outline(&self, outline_id: &str) -> BdrcResult<ProcessedOutline> {
        self.try_process(outline_id).map_err(|e| {
            tracing::error!(outline_id, error = %e, "outline processing failed");
            BdrcError::for_outline(outline_id, e)
        })
    }

    fn try_process(&self, outline_id: &str) -> BdrcResult<ProcessedOutline> {
        tracing::info!(outline_id, "fetching outline graph");
        let graph = self
            .source
            .outline_graph(outline_id)?
            .filter(|g| !g.is_empty())
            .ok_or_else(|| OutlineError::NoGraphData {
                id: outline_id.to_string(),
            })?;
        tracing::info!(outline_id, triples = graph.len(), "got outline graph");

        let records = extract_parts(text_parts(&graph));
        tracing::info!(outline_id, parts = records.len(), "extracted text parts");

        let options = DocumentOptions {
            title: page_title(&graph).or_else(|| self.options.title.clone()),
            ..self.options.clone()
        };
        let full = build_document(records, options)?;
        let public = filter_public_view(&full);

        self.cache.put(&cache::full_key(outline_id), &full)?;
        self.cache.put(&cache::public_key(outline_id), &public)?;

        Ok(ProcessedOutline {
            outline_id: outline_id.to_string(),
            full,
            public,
        })
    }

    /// Process the first outline of an instance.
    pub fn process_instance(&self, instance_id: &str) -> BdrcResult<ProcessedOutline> {
        let outlines = outlines_of_instance(self.source, instance_id)?;
        let Some(outline_id) = outlines.first() else {
            return Err(OutlineError::NoOutline {
                instance_id: instance_id.to_string(),
            }
            .into());
        };
        if outlines.len() > 1 {
            tracing::info!(instance_id, outlines = ?outlines, "instance has several outlines, using the first");
        }
        tracing::info!(instance_id, outline_id = %outline_id, "resolved outline");
        self.process_outline(outline_id)
    }

    /// A previously cached document, public or full.
    pub fn cached(&self, outline_id: &str, public: bool) -> BdrcResult<Option<Document>> {
        let key = if public {
            cache::public_key(outline_id)
        } else {
            cache::full_key(outline_id)
        };
        Ok(self.cache.get(&key)?)
    }
}

/// Write the public document to `{dir}/{outline_id}.json`.
pub fn export_public(outline: &ProcessedOutline, dir: &Path) -> BdrcResult<PathBuf> {
    let path = dir.join(format!("{}.json", outline.outline_id));
    tracing::info!(path = %path.display(), "saving public document");
    cache::write_document(&path, &outline.public)?;
    Ok(path)
}

//! The user-facing transform: a specification, a root path, namespaces and a document.

use crate::document::{DocumentSource, XmlDocument};
use crate::engine;
use crate::error::TransformError;
use crate::filter::prune_records;
use crate::spec::Specification;
use log::debug;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use xmlmap_xpath1::Namespaces;

/// A configured mapping that can be run against successive documents.
///
/// Binding a document replaces the previous one. A transformer is not meant to be shared
/// between threads that bind different documents.
#[derive(Debug, Clone)]
pub struct Transformer<'d> {
    spec: Specification,
    root_path: String,
    namespaces: Namespaces,
    source: Option<DocumentSource<'d>>,
    filter_empty: bool,
}

impl<'d> Transformer<'d> {
    pub fn new(spec: Specification, root_path: impl Into<String>, namespaces: Namespaces) -> Self {
        Self {
            spec,
            root_path: root_path.into(),
            namespaces,
            source: None,
            filter_empty: false,
        }
    }

    /// Registers one more namespace prefix.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.bind(prefix, uri);
        self
    }

    pub fn bind(&mut self, source: DocumentSource<'d>) -> &mut Self {
        debug!("Bound document source {:?}", source);
        self.source = Some(source);
        self
    }

    pub fn bind_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.bind(DocumentSource::File(path.into()))
    }

    pub fn bind_str(&mut self, xml: impl Into<Cow<'d, str>>) -> &mut Self {
        self.bind(DocumentSource::Text(xml.into()))
    }

    pub fn bind_document(&mut self, document: &'d XmlDocument<'d>) -> &mut Self {
        self.bind(DocumentSource::Document(document))
    }

    pub fn set_filter_empty(&mut self, enabled: bool) -> &mut Self {
        debug!("Empty value filter {}", if enabled { "enabled" } else { "disabled" });
        self.filter_empty = enabled;
        self
    }

    pub fn is_filter_empty(&self) -> bool {
        self.filter_empty
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// One record per node the root path selects. With the filter on, records are pruned
    /// and the ones left empty are dropped.
    pub fn transform_all(&self) -> Result<Vec<Value>, TransformError> {
        let records = self.with_document(|document| {
            engine::transform_all(&self.spec, &self.root_path, &self.namespaces, document)
        })?;
        debug!("Produced {} record(s)", records.len());
        Ok(if self.filter_empty {
            prune_records(records)
        } else {
            records
        })
    }

    /// The first record, or an empty object if there is none.
    pub fn transform_first(&self) -> Result<Value, TransformError> {
        Ok(self
            .transform_all()?
            .into_iter()
            .next()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Runs `f` on the bound document, reading and parsing it first if needed.
    fn with_document<T>(
        &self,
        f: impl FnOnce(&XmlDocument<'_>) -> Result<T, TransformError>,
    ) -> Result<T, TransformError> {
        match self.source.as_ref().ok_or(TransformError::MissingDocument)? {
            DocumentSource::File(path) => {
                let text = fs::read_to_string(path)?;
                f(&XmlDocument::parse(&text)?)
            }
            DocumentSource::Text(text) => f(&XmlDocument::parse(text)?),
            DocumentSource::Document(document) => f(document),
        }
    }
}

// src/error.rs
use thiserror::Error;
use xmlmap_xpath1::XPathError;

/// A malformed mapping specification. `at` is the dotted key path of the offending node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("Specification must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("At '{at}': '{present}' requires '{missing}'")]
    MissingKey {
        at: String,
        present: &'static str,
        missing: &'static str,
    },

    #[error("At '{at}': '{key}' cannot be combined with 'context'/'values'")]
    ConflictingKeys { at: String, key: &'static str },

    #[error("At '{at}': unexpected key '{key}' in a {directive} directive")]
    UnexpectedKey {
        at: String,
        key: String,
        directive: &'static str,
    },

    #[error("At '{at}': '{key}' must be {expected}")]
    InvalidType {
        at: String,
        key: String,
        expected: &'static str,
    },
}

/// Everything that can abort a transform.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("No document bound; bind a file, string or parsed document first")]
    MissingDocument,

    #[error("No context found with: {0}")]
    ContextNotFound(String),

    #[error("Query '{path}' failed: {source}")]
    Query {
        path: String,
        #[source]
        source: XPathError,
    },

    #[error("XML parsing failed: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid mapping specification: {0}")]
    Spec(#[from] SpecError),

    #[error("Invalid mapping configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl TransformError {
    pub(crate) fn query(path: &str, source: XPathError) -> Self {
        TransformError::Query {
            path: path.to_string(),
            source,
        }
    }
}

//! # xmlmap
//!
//! Declarative conversion of XML documents into JSON records.
//!
//! A mapping specification describes where each output field lives in the document
//! as XPath expressions; the engine evaluates it once per record node:
//! - **spec**: parsing and validation of the specification tree
//! - **query**: path evaluation against a parsed document and a namespace table
//! - **engine**: the recursive mapping of a specification onto context nodes
//! - **filter**: removal of null and empty values from produced records
//! - **transformer**: the entry point binding a document source to a specification
//! - **config**: JSON configuration files for the command-line tool
//!
//! ```no_run
//! use serde_json::json;
//! use xmlmap::{Namespaces, Specification, Transformer};
//!
//! let spec = Specification::from_value(&json!({
//!     "id": { "path": ".//oai:identifier/text()", "repeatable": true }
//! }))?;
//! let namespaces = Namespaces::new().with("oai", "http://www.openarchives.org/OAI/2.0/");
//! let mut transformer = Transformer::new(spec, "//oai:record", namespaces);
//! let records = transformer.bind_file("records.xml").transform_all()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export algorithm crates
pub use xmlmap_xpath1 as xpath;

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod query;
pub mod spec;
pub mod transformer;

pub use config::MappingConfig;
pub use document::{DocumentSource, XmlDocument, XmlNode};
pub use engine::{transform_all, transform_first};
pub use error::{SpecError, TransformError};
pub use filter::{prune, prune_records};
pub use query::QueryContext;
pub use spec::{SpecNode, Specification};
pub use transformer::Transformer;
pub use xpath::Namespaces;

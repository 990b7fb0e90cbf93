//! JSON mapping configuration files.

use crate::error::TransformError;
use crate::spec::Specification;
use crate::transformer::Transformer;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use xmlmap_xpath1::Namespaces;

/// Everything needed to build a [`Transformer`], as stored on disk:
///
/// ```json
/// {
///   "context": "//oai:record",
///   "namespaces": { "oai": "http://www.openarchives.org/OAI/2.0/" },
///   "filter": true,
///   "mapping": { "id": { "path": ".//oai:identifier/text()" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    /// Root path selecting one context node per record.
    pub context: String,
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default)]
    pub filter: bool,
    pub mapping: Value,
}

impl MappingConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        let path = path.as_ref();
        debug!("Loading mapping configuration from {}", path.display());
        fs::read_to_string(path)?.parse()
    }

    /// Validates the mapping and builds a transformer with no document bound.
    pub fn into_transformer(self) -> Result<Transformer<'static>, TransformError> {
        let spec = Specification::from_value(&self.mapping)?;
        let namespaces: Namespaces = self.namespaces.into_iter().collect();
        let mut transformer = Transformer::new(spec, self.context, namespaces);
        transformer.set_filter_empty(self.filter);
        Ok(transformer)
    }
}

impl FromStr for MappingConfig {
    type Err = TransformError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecError;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "context": "//oai:record",
        "namespaces": { "oai": "http://www.openarchives.org/OAI/2.0/" },
        "filter": true,
        "mapping": { "id": { "path": ".//oai:identifier/text()" } }
    }"#;

    #[test]
    fn test_parse_full_config() {
        let config: MappingConfig = CONFIG.parse().unwrap();
        assert_eq!(config.context, "//oai:record");
        assert_eq!(
            config.namespaces.get("oai").map(String::as_str),
            Some("http://www.openarchives.org/OAI/2.0/")
        );
        assert!(config.filter);

        let transformer = config.into_transformer().unwrap();
        assert!(transformer.is_filter_empty());
        assert_eq!(transformer.root_path(), "//oai:record");
        assert_eq!(transformer.specification().fields().len(), 1);
    }

    #[test]
    fn test_defaults() {
        let config: MappingConfig = r#"{ "context": "//record", "mapping": {} }"#.parse().unwrap();
        assert!(config.namespaces.is_empty());
        assert!(!config.filter);
    }

    #[test]
    fn test_invalid_configs() {
        let missing_mapping = r#"{ "context": "//record" }"#.parse::<MappingConfig>();
        assert!(matches!(missing_mapping, Err(TransformError::Config(_))));

        let unknown_field = r#"{ "context": "//r", "mapping": {}, "filtre": true }"#
            .parse::<MappingConfig>();
        assert!(matches!(unknown_field, Err(TransformError::Config(_))));

        let config: MappingConfig = r#"{ "context": "//r", "mapping": [] }"#.parse().unwrap();
        assert!(matches!(
            config.into_transformer(),
            Err(TransformError::Spec(SpecError::NotAnObject(_)))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = MappingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.context, "//oai:record");

        let missing = MappingConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(TransformError::Io(_))));
    }
}

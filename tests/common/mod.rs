pub mod fixtures;

use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;
use xmlmap::{Namespaces, Specification, Transformer};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Namespace table with the `oai` prefix bound.
pub fn oai_namespaces() -> Namespaces {
    Namespaces::new().with("oai", fixtures::OAI_NS)
}

/// Builds a transformer over records selected by `root_path`.
pub fn transformer(mapping: Value, root_path: &str, namespaces: Namespaces) -> Transformer<'static> {
    let spec = Specification::from_value(&mapping).expect("test mapping should be valid");
    Transformer::new(spec, root_path, namespaces)
}

/// Writes `contents` to a temporary file that lives as long as the returned handle.
pub fn temp_file(contents: &str, suffix: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

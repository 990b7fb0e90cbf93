//! The recursive mapping engine: one output record per root context node.

use crate::document::{XmlDocument, XmlNode};
use crate::error::TransformError;
use crate::query::QueryContext;
use crate::spec::{SpecNode, Specification};
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};
use xmlmap_xpath1::Namespaces;

/// Maps `spec` once per node selected by `root_path`, in document order.
///
/// Fails with `ContextNotFound` when `root_path` selects nothing. Absent fields inside
/// a record are never an error.
pub fn transform_all(
    spec: &Specification,
    root_path: &str,
    namespaces: &Namespaces,
    document: &XmlDocument<'_>,
) -> Result<Vec<Value>, TransformError> {
    let query = QueryContext::new(document, namespaces);
    map_records(spec, root_path, &query)
}

/// The first record of [`transform_all`], or an empty object when there is none.
pub fn transform_first(
    spec: &Specification,
    root_path: &str,
    namespaces: &Namespaces,
    document: &XmlDocument<'_>,
) -> Result<Value, TransformError> {
    let records = transform_all(spec, root_path, namespaces, document)?;
    Ok(records
        .into_iter()
        .next()
        .unwrap_or_else(|| Value::Object(Map::new())))
}

fn map_records<'a>(
    spec: &Specification,
    root_path: &str,
    query: &QueryContext<'a>,
) -> Result<Vec<Value>, TransformError> {
    let contexts = query.context_nodes(root_path, None)?;
    debug!("Root path '{}' selected {} context node(s)", root_path, contexts.len());
    contexts
        .into_iter()
        .map(|context| map_fields(spec.fields(), query, context).map(Value::Object))
        .collect()
}

fn map_fields<'a>(
    fields: &IndexMap<String, SpecNode>,
    query: &QueryContext<'a>,
    context: XmlNode<'a, 'a>,
) -> Result<Map<String, Value>, TransformError> {
    fields
        .iter()
        .map(|(key, node)| Ok((key.clone(), map_node(node, query, context)?)))
        .collect()
}

/// Resolves a single specification node against `context`.
pub fn map_node<'a>(
    node: &SpecNode,
    query: &QueryContext<'a>,
    context: XmlNode<'a, 'a>,
) -> Result<Value, TransformError> {
    match node {
        SpecNode::Leaf { path, repeatable } => {
            let values = query.text_values(path, context)?;
            Ok(if *repeatable {
                Value::Array(values.into_iter().map(Value::String).collect())
            } else {
                values.into_iter().next().map_or(Value::Null, Value::String)
            })
        }
        SpecNode::Rescope {
            context: path,
            values,
            repeatable,
        } => {
            // Unlike the root path, a nested context with no match is not an error.
            let records = query
                .match_nodes(path, Some(context))?
                .into_iter()
                .map(|nested| map_fields(values, query, nested).map(Value::Object))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(if *repeatable {
                Value::Array(records)
            } else {
                records
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| Value::Object(Map::new()))
            })
        }
        SpecNode::Group(fields) => map_fields(fields, query, context).map(Value::Object),
        SpecNode::List(items) => items
            .iter()
            .map(|item| map_node(item, query, context))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        SpecNode::Literal(value) => Ok(value.clone()),
    }
}

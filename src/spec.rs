//! The mapping specification, parsed once from JSON into an explicit tree.
//!
//! Shapes are recognised by their keys:
//!
//! - `{"path": "...", "repeatable": bool}` is a [`SpecNode::Leaf`] (`xpath` is accepted
//!   as an alias of `path`).
//! - `{"context": "...", "values": {...}, "repeatable": bool}` is a [`SpecNode::Rescope`].
//! - Any other object is a [`SpecNode::Group`], arrays are [`SpecNode::List`]s and
//!   scalars are passed through as [`SpecNode::Literal`]s.

use crate::error::SpecError;
use indexmap::IndexMap;
use serde_json::{Map, Value};

const PATH: &str = "path";
const PATH_ALIAS: &str = "xpath";
const CONTEXT: &str = "context";
const VALUES: &str = "values";
const REPEATABLE: &str = "repeatable";

#[derive(Debug, Clone, PartialEq)]
pub enum SpecNode {
    /// String values of the nodes `path` selects from the current context.
    Leaf { path: String, repeatable: bool },
    /// Maps `values` once per node `context` selects from the current context.
    Rescope {
        context: String,
        values: IndexMap<String, SpecNode>,
        repeatable: bool,
    },
    Group(IndexMap<String, SpecNode>),
    List(Vec<SpecNode>),
    Literal(Value),
}

/// A validated mapping specification. Field order is the output key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    fields: IndexMap<String, SpecNode>,
}

impl Specification {
    pub fn new(fields: IndexMap<String, SpecNode>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: parse_fields(map, "")?,
            }),
            other => Err(SpecError::NotAnObject(json_type(other))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, crate::error::TransformError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value)?)
    }

    pub fn fields(&self) -> &IndexMap<String, SpecNode> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn join(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", at, key)
    }
}

fn parse_fields(map: &Map<String, Value>, at: &str) -> Result<IndexMap<String, SpecNode>, SpecError> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), parse_node(value, &join(at, key))?)))
        .collect()
}

fn parse_node(value: &Value, at: &str) -> Result<SpecNode, SpecError> {
    match value {
        Value::Object(map) => {
            let path_key = [PATH, PATH_ALIAS].into_iter().find(|k| map.contains_key(*k));
            let has_context = map.contains_key(CONTEXT);
            let has_values = map.contains_key(VALUES);

            if let Some(path_key) = path_key {
                if has_context || has_values {
                    return Err(SpecError::ConflictingKeys {
                        at: at.to_string(),
                        key: path_key,
                    });
                }
                parse_leaf(map, path_key, at)
            } else if has_context || has_values {
                parse_rescope(map, at)
            } else {
                Ok(SpecNode::Group(parse_fields(map, at)?))
            }
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_node(item, &format!("{}[{}]", at, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(SpecNode::List),
        scalar => Ok(SpecNode::Literal(scalar.clone())),
    }
}

fn parse_leaf(map: &Map<String, Value>, path_key: &'static str, at: &str) -> Result<SpecNode, SpecError> {
    reject_unexpected_keys(map, &[path_key, REPEATABLE], "path", at)?;
    Ok(SpecNode::Leaf {
        path: string_member(map, path_key, at)?,
        repeatable: repeatable(map, at)?,
    })
}

fn parse_rescope(map: &Map<String, Value>, at: &str) -> Result<SpecNode, SpecError> {
    let missing_key = |present, missing| SpecError::MissingKey {
        at: at.to_string(),
        present,
        missing,
    };
    if !map.contains_key(VALUES) {
        return Err(missing_key(CONTEXT, VALUES));
    }
    if !map.contains_key(CONTEXT) {
        return Err(missing_key(VALUES, CONTEXT));
    }
    reject_unexpected_keys(map, &[CONTEXT, VALUES, REPEATABLE], "context", at)?;

    let values = match &map[VALUES] {
        Value::Object(values) => parse_fields(values, at)?,
        _ => {
            return Err(SpecError::InvalidType {
                at: at.to_string(),
                key: VALUES.to_string(),
                expected: "an object",
            });
        }
    };
    Ok(SpecNode::Rescope {
        context: string_member(map, CONTEXT, at)?,
        values,
        repeatable: repeatable(map, at)?,
    })
}

fn reject_unexpected_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    directive: &'static str,
    at: &str,
) -> Result<(), SpecError> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(SpecError::UnexpectedKey {
            at: at.to_string(),
            key: key.clone(),
            directive,
        }),
        None => Ok(()),
    }
}

fn string_member(map: &Map<String, Value>, key: &str, at: &str) -> Result<String, SpecError> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(SpecError::InvalidType {
            at: at.to_string(),
            key: key.to_string(),
            expected: "a string",
        }),
    }
}

fn repeatable(map: &Map<String, Value>, at: &str) -> Result<bool, SpecError> {
    match map.get(REPEATABLE) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SpecError::InvalidType {
            at: at.to_string(),
            key: REPEATABLE.to_string(),
            expected: "a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(path: &str, repeatable: bool) -> SpecNode {
        SpecNode::Leaf {
            path: path.to_string(),
            repeatable,
        }
    }

    #[test]
    fn test_parses_every_shape() {
        let spec = Specification::from_value(&json!({
            "id": { "path": ".//identifier", "repeatable": true },
            "title": { "xpath": ".//title" },
            "location": { "city": { "path": "@city" }, "source": "feed" },
            "constituent": {
                "context": ".//constituent",
                "values": { "name": { "path": "text()" } }
            },
            "tags": ["a", { "path": "@tag" }],
            "version": 2
        }))
        .unwrap();

        let fields = spec.fields();
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["id", "title", "location", "constituent", "tags", "version"]
        );
        assert_eq!(fields["id"], leaf(".//identifier", true));
        assert_eq!(fields["title"], leaf(".//title", false));
        match &fields["location"] {
            SpecNode::Group(group) => {
                assert_eq!(group["city"], leaf("@city", false));
                assert_eq!(group["source"], SpecNode::Literal(json!("feed")));
            }
            other => panic!("Expected a group, got {:?}", other),
        }
        match &fields["constituent"] {
            SpecNode::Rescope {
                context,
                values,
                repeatable,
            } => {
                assert_eq!(context, ".//constituent");
                assert_eq!(values["name"], leaf("text()", false));
                assert!(!repeatable);
            }
            other => panic!("Expected a rescope, got {:?}", other),
        }
        assert_eq!(
            fields["tags"],
            SpecNode::List(vec![SpecNode::Literal(json!("a")), leaf("@tag", false)])
        );
        assert_eq!(fields["version"], SpecNode::Literal(json!(2)));
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        assert_eq!(
            Specification::from_value(&json!([1, 2])).unwrap_err(),
            SpecError::NotAnObject("an array")
        );
    }

    #[test]
    fn test_context_and_values_come_together() {
        let err = Specification::from_value(&json!({
            "a": { "b": { "context": ".//x" } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SpecError::MissingKey {
                at: "a.b".to_string(),
                present: "context",
                missing: "values"
            }
        );

        let err = Specification::from_value(&json!({ "a": { "values": {} } })).unwrap_err();
        assert!(matches!(err, SpecError::MissingKey { missing: "context", .. }));
    }

    #[test]
    fn test_path_conflicts_with_rescope_keys() {
        let err = Specification::from_value(&json!({
            "a": { "path": "x", "context": "y", "values": {} }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SpecError::ConflictingKeys {
                at: "a".to_string(),
                key: "path"
            }
        );
    }

    #[test]
    fn test_unexpected_keys_in_directives() {
        let err = Specification::from_value(&json!({
            "a": { "path": "x", "default": "n/a" }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            SpecError::UnexpectedKey {
                at: "a".to_string(),
                key: "default".to_string(),
                directive: "path"
            }
        );

        // Both spellings at once is ambiguous.
        let err = Specification::from_value(&json!({ "a": { "path": "x", "xpath": "y" } }))
            .unwrap_err();
        assert!(matches!(err, SpecError::UnexpectedKey { ref key, .. } if key == "xpath"));
    }

    #[test]
    fn test_member_types_are_checked() {
        let cases = [
            (json!({ "a": { "path": 3 } }), "path", "a string"),
            (json!({ "a": { "path": "x", "repeatable": "yes" } }), "repeatable", "a boolean"),
            (json!({ "a": { "context": "x", "values": [] } }), "values", "an object"),
            (json!({ "a": { "context": null, "values": {} } }), "context", "a string"),
        ];
        for (value, bad_key, bad_expected) in cases {
            match Specification::from_value(&value).unwrap_err() {
                SpecError::InvalidType { at, key, expected } => {
                    assert_eq!(at, "a");
                    assert_eq!(key, bad_key);
                    assert_eq!(expected, bad_expected);
                }
                other => panic!("Expected an invalid type error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_errors_inside_rescope_values_report_their_location() {
        let err = Specification::from_value(&json!({
            "constituent": {
                "context": ".//c",
                "values": { "dates": [{ "path": 1 }] }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::InvalidType { ref at, .. } if at == "constituent.dates[0]"));
    }

    #[test]
    fn test_from_json_reports_syntax_errors() {
        assert!(matches!(
            Specification::from_json("{ not json"),
            Err(crate::error::TransformError::Config(_))
        ));
        assert!(Specification::from_json("{}").unwrap().is_empty());
    }
}

//! Prefix-to-URI bindings and the pass that resolves the prefixes of a parsed expression.

use crate::ast::{Expression, LocationPath, NodeTest, Step};
use crate::error::XPathError;
use std::collections::BTreeMap;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// An immutable-by-convention table of namespace prefixes available to expressions.
///
/// The `xml` prefix is always bound and cannot be rebound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    bindings: BTreeMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table with `prefix` bound to `uri`, replacing any earlier binding.
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bind(prefix, uri);
        self
    }

    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    /// Fills in the namespace URI of every prefixed name test in `expr`.
    pub fn resolve_expression(&self, expr: &mut Expression) -> Result<(), XPathError> {
        match expr {
            Expression::Literal(_) | Expression::Number(_) | Expression::Variable(_) => Ok(()),
            Expression::LocationPath(path) => self.resolve_path(path),
            Expression::Filter { expr, predicates } => {
                self.resolve_expression(expr)?;
                predicates
                    .iter_mut()
                    .try_for_each(|p| self.resolve_expression(p))
            }
            Expression::FunctionCall { args, .. } => {
                args.iter_mut().try_for_each(|a| self.resolve_expression(a))
            }
            Expression::BinaryOp { left, right, .. } => {
                self.resolve_expression(left)?;
                self.resolve_expression(right)
            }
            Expression::UnaryOp { expr, .. } => self.resolve_expression(expr),
        }
    }

    fn resolve_path(&self, path: &mut LocationPath) -> Result<(), XPathError> {
        if let Some(start) = path.start_point.as_deref_mut() {
            self.resolve_expression(start)?;
        }
        path.steps.iter_mut().try_for_each(|s| self.resolve_step(s))
    }

    fn resolve_step(&self, step: &mut Step) -> Result<(), XPathError> {
        match &mut step.node_test {
            NodeTest::Name(test) => {
                if let Some(prefix) = &test.prefix {
                    test.namespace = Some(self.require(prefix)?.to_string());
                }
            }
            NodeTest::NamespaceWildcard { prefix, namespace } => {
                *namespace = Some(self.require(prefix)?.to_string());
            }
            NodeTest::Wildcard | NodeTest::NodeType(_) => {}
        }
        step.predicates
            .iter_mut()
            .try_for_each(|p| self.resolve_expression(p))
    }

    fn require(&self, prefix: &str) -> Result<&str, XPathError> {
        self.resolve(prefix)
            .ok_or_else(|| XPathError::UnboundPrefix(prefix.to_string()))
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for Namespaces {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        let mut namespaces = Namespaces::new();
        for (prefix, uri) in iter {
            namespaces.bind(prefix, uri);
        }
        namespaces
    }
}

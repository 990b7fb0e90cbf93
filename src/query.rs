//! Path queries against one bound document.

use crate::document::{XmlDocument, XmlNode};
use crate::error::TransformError;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use xmlmap_xpath1::{
    DataSourceNode, EvaluationContext, Expression, Namespaces, XPathError, XPathValue,
};

/// A parsed document plus the namespace table every path is compiled against.
///
/// Compiled expressions are cached by their source text, so a specification evaluated
/// once per record only parses each path once.
pub struct QueryContext<'a> {
    root: XmlNode<'a, 'a>,
    namespaces: &'a Namespaces,
    compiled: RefCell<HashMap<String, Rc<Expression>>>,
}

impl<'a> QueryContext<'a> {
    pub fn new(document: &'a XmlDocument<'a>, namespaces: &'a Namespaces) -> Self {
        Self {
            root: document.root_node(),
            namespaces,
            compiled: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> XmlNode<'a, 'a> {
        self.root
    }

    fn compile(&self, path: &str) -> Result<Rc<Expression>, TransformError> {
        if let Some(expr) = self.compiled.borrow().get(path) {
            return Ok(Rc::clone(expr));
        }
        let expr = Rc::new(
            xmlmap_xpath1::compile(path, self.namespaces)
                .map_err(|e| TransformError::query(path, e))?,
        );
        self.compiled
            .borrow_mut()
            .insert(path.to_string(), Rc::clone(&expr));
        Ok(expr)
    }

    fn evaluate(
        &self,
        path: &str,
        context: Option<XmlNode<'a, 'a>>,
    ) -> Result<XPathValue<XmlNode<'a, 'a>>, TransformError> {
        let expr = self.compile(path)?;
        let e_ctx = EvaluationContext::new(context.unwrap_or(self.root), self.root);
        let value =
            xmlmap_xpath1::evaluate(&expr, &e_ctx).map_err(|e| TransformError::query(path, e))?;
        trace!("Evaluated '{}' -> {:?}", path, ValueSummary(&value));
        Ok(value)
    }

    /// Nodes selected by `path` from `context` (the document root when `None`), in
    /// document order. No match is an empty sequence.
    pub fn match_nodes(
        &self,
        path: &str,
        context: Option<XmlNode<'a, 'a>>,
    ) -> Result<Vec<XmlNode<'a, 'a>>, TransformError> {
        match self.evaluate(path, context)? {
            XPathValue::NodeSet(nodes) => Ok(nodes),
            _ => Err(TransformError::query(
                path,
                XPathError::TypeError("expression does not select nodes".to_string()),
            )),
        }
    }

    /// The string value of each selected node. A scalar expression such as
    /// `count(item)` yields its single string value.
    pub fn text_values(
        &self,
        path: &str,
        context: XmlNode<'a, 'a>,
    ) -> Result<Vec<String>, TransformError> {
        Ok(match self.evaluate(path, Some(context))? {
            XPathValue::NodeSet(nodes) => nodes.iter().map(|n| n.string_value()).collect(),
            scalar => vec![scalar.to_string()],
        })
    }

    /// Like [`match_nodes`](Self::match_nodes), but an empty result is `ContextNotFound`.
    pub fn context_nodes(
        &self,
        path: &str,
        context: Option<XmlNode<'a, 'a>>,
    ) -> Result<Vec<XmlNode<'a, 'a>>, TransformError> {
        let nodes = self.match_nodes(path, context)?;
        if nodes.is_empty() {
            return Err(TransformError::ContextNotFound(path.to_string()));
        }
        Ok(nodes)
    }
}

struct ValueSummary<'v, N>(&'v XPathValue<N>);

impl<N> std::fmt::Debug for ValueSummary<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            XPathValue::NodeSet(nodes) => write!(f, "{} node(s)", nodes.len()),
            XPathValue::String(s) => write!(f, "string {:?}", s),
            XPathValue::Number(n) => write!(f, "number {}", n),
            XPathValue::Boolean(b) => write!(f, "boolean {}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OAI_NS: &str = "http://www.openarchives.org/OAI/2.0/";

    const XML: &str = r#"<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <record><identifier>2</identifier><title> Spaced   out </title></record>
  <record><identifier>1109</identifier><identifier>1110</identifier></record>
</OAI-PMH>"#;

    fn with_context<R>(f: impl FnOnce(&QueryContext<'_>) -> R) -> R {
        let doc = XmlDocument::parse(XML).unwrap();
        let namespaces = Namespaces::new().with("oai", OAI_NS);
        let query = QueryContext::new(&doc, &namespaces);
        f(&query)
    }

    #[test]
    fn test_match_nodes_in_document_order() {
        with_context(|query| {
            let records = query.match_nodes("//oai:record", None).unwrap();
            assert_eq!(records.len(), 2);
            let ids = query
                .text_values(".//oai:identifier", records[1])
                .unwrap();
            assert_eq!(ids, vec!["1109", "1110"]);
        });
    }

    #[test]
    fn test_default_namespace_requires_prefix() {
        with_context(|query| {
            assert!(query.match_nodes("//record", None).unwrap().is_empty());
            let err = query.context_nodes("//record", None).unwrap_err();
            assert!(matches!(err, TransformError::ContextNotFound(ref p) if p == "//record"));
        });
    }

    #[test]
    fn test_scalar_expressions_yield_one_value() {
        with_context(|query| {
            let record = query.context_nodes("//oai:record", None).unwrap()[0];
            assert_eq!(
                query
                    .text_values("normalize-space(oai:title)", record)
                    .unwrap(),
                vec!["Spaced out"]
            );
            assert_eq!(
                query.text_values("count(oai:identifier)", record).unwrap(),
                vec!["1"]
            );
        });
    }

    #[test]
    fn test_query_errors_carry_the_path() {
        with_context(|query| {
            let err = query.match_nodes("//dc:title", None).unwrap_err();
            match err {
                TransformError::Query { path, source } => {
                    assert_eq!(path, "//dc:title");
                    assert_eq!(source, XPathError::UnboundPrefix("dc".to_string()));
                }
                other => panic!("Expected a query error, got {:?}", other),
            }

            let err = query.match_nodes("count(//oai:record)", None).unwrap_err();
            assert!(matches!(err, TransformError::Query { .. }));

            let err = query.match_nodes("//oai:record[", None).unwrap_err();
            assert!(matches!(
                err,
                TransformError::Query {
                    source: XPathError::XPathParse(..),
                    ..
                }
            ));
        });
    }
}

//! A namespace-aware XPath 1.0 engine.
//!
//! Expressions are parsed with [`parse_expression`], bound to a namespace table with
//! [`compile`], and evaluated with [`evaluate`] against any tree implementing
//! [`DataSourceNode`].

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod functions;
pub mod namespaces;
pub mod operators;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NameTest, NodeTest, Step};
pub use datasource::{DataSourceNode, NodeType, QName};
pub use engine::{EvaluationContext, XPathValue, evaluate};
pub use error::XPathError;
pub use namespaces::{Namespaces, XML_NAMESPACE};
pub use parser::{compile, parse_expression};

// Mock tree for engine tests, also usable from downstream crates
pub use datasource::mock;

//! Binary operators: comparisons, arithmetic and node-set union.
//!
//! `and`/`or` are handled by the engine because they short-circuit.

use super::ast::BinaryOperator;
use super::engine::{XPathValue, parse_number};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => {
            Ok(XPathValue::Boolean(compare(op, &left, &right)))
        }
        BinaryOperator::Plus => arithmetic(left, right, |l, r| l + r),
        BinaryOperator::Minus => arithmetic(left, right, |l, r| l - r),
        BinaryOperator::Multiply => arithmetic(left, right, |l, r| l * r),
        BinaryOperator::Divide => arithmetic(left, right, |l, r| l / r),
        // `%` on f64 truncates like XPath `mod`.
        BinaryOperator::Modulo => arithmetic(left, right, |l, r| l % r),
        BinaryOperator::Union => union(left, right),
    }
}

fn arithmetic<'a, N: DataSourceNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
    f: fn(f64, f64) -> f64,
) -> Result<XPathValue<N>, XPathError> {
    Ok(XPathValue::Number(f(left.to_number(), right.to_number())))
}

fn union<'a, N: DataSourceNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match (left, right) {
        (XPathValue::NodeSet(mut l), XPathValue::NodeSet(r)) => {
            l.extend(r);
            l.sort();
            l.dedup();
            Ok(XPathValue::NodeSet(l))
        }
        _ => Err(XPathError::TypeError(
            "Operands of '|' must be node-sets".to_string(),
        )),
    }
}

/// A scalar view of one side of a comparison.
enum Operand {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Operand {
    fn from_value<'a, N: DataSourceNode<'a>>(value: &XPathValue<N>) -> Self {
        match value {
            XPathValue::String(s) => Operand::Str(s.clone()),
            XPathValue::Number(n) => Operand::Num(*n),
            XPathValue::Boolean(b) => Operand::Bool(*b),
            XPathValue::NodeSet(_) => Operand::Bool(value.to_bool()),
        }
    }

    fn number(&self) -> f64 {
        match self {
            Operand::Str(s) => parse_number(s),
            Operand::Num(n) => *n,
            Operand::Bool(b) => f64::from(u8::from(*b)),
        }
    }

    fn boolean(&self) -> bool {
        match self {
            Operand::Str(s) => !s.is_empty(),
            Operand::Num(n) => *n != 0.0 && !n.is_nan(),
            Operand::Bool(b) => *b,
        }
    }
}

/// Compares two scalars. Equality prefers boolean, then number, then string; ordering
/// always compares numbers.
fn compare_scalars(op: BinaryOperator, l: &Operand, r: &Operand) -> bool {
    match op {
        BinaryOperator::Equals | BinaryOperator::NotEquals => {
            let equal = match (l, r) {
                (Operand::Bool(_), _) | (_, Operand::Bool(_)) => l.boolean() == r.boolean(),
                (Operand::Num(_), _) | (_, Operand::Num(_)) => l.number() == r.number(),
                (Operand::Str(a), Operand::Str(b)) => a == b,
            };
            if op == BinaryOperator::Equals {
                equal
            } else {
                !equal
            }
        }
        BinaryOperator::LessThan => l.number() < r.number(),
        BinaryOperator::LessThanOrEqual => l.number() <= r.number(),
        BinaryOperator::GreaterThan => l.number() > r.number(),
        BinaryOperator::GreaterThanOrEqual => l.number() >= r.number(),
        _ => false,
    }
}

/// Comparisons involving node-sets are existential: true if any member satisfies it.
fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    let strings = |nodes: &[N]| -> Vec<Operand> {
        nodes
            .iter()
            .map(|n| Operand::Str(n.string_value()))
            .collect()
    };
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let rights = strings(r);
            strings(l)
                .iter()
                .any(|a| rights.iter().any(|b| compare_scalars(op, a, b)))
        }
        // A node-set against a boolean compares the node-set's truth value.
        (XPathValue::NodeSet(_), XPathValue::Boolean(_))
        | (XPathValue::Boolean(_), XPathValue::NodeSet(_)) => compare_scalars(
            op,
            &Operand::from_value(left),
            &Operand::from_value(right),
        ),
        (XPathValue::NodeSet(l), other) => {
            let other = Operand::from_value(other);
            strings(l)
                .iter()
                .any(|a| compare_scalars(op, &coerce_like(a, &other), &other))
        }
        (other, XPathValue::NodeSet(r)) => {
            let other = Operand::from_value(other);
            strings(r)
                .iter()
                .any(|b| compare_scalars(op, &other, &coerce_like(b, &other)))
        }
        _ => compare_scalars(op, &Operand::from_value(left), &Operand::from_value(right)),
    }
}

/// A node's string value compared with a number is compared as a number.
fn coerce_like(node_value: &Operand, other: &Operand) -> Operand {
    match other {
        Operand::Num(_) => Operand::Num(node_value.number()),
        _ => match node_value {
            Operand::Str(s) => Operand::Str(s.clone()),
            Operand::Num(n) => Operand::Num(*n),
            Operand::Bool(b) => Operand::Bool(*b),
        },
    }
}

//! Built-in implementations of the XPath 1.0 core function library.

use super::engine::{EvaluationContext, XPathValue, parse_number};
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use crate::namespaces::XML_NAMESPACE;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-set
        "last" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_size as f64))
        }
        "position" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_position as f64))
        }
        "count" => func_count(name, args),
        "local-name" | "namespace-uri" | "name" => func_node_name(name, args, e_ctx),

        // String
        "string" => {
            arity(name, &args, 0, 1)?;
            Ok(XPathValue::String(string_arg_or_context(args, e_ctx)))
        }
        "concat" => {
            arity(name, &args, 2, usize::MAX)?;
            Ok(XPathValue::String(
                args.iter().map(|a| a.to_string()).collect(),
            ))
        }
        "starts-with" => {
            let (s, pattern) = two_strings(name, args)?;
            Ok(XPathValue::Boolean(s.starts_with(&pattern)))
        }
        "contains" => {
            let (s, pattern) = two_strings(name, args)?;
            Ok(XPathValue::Boolean(s.contains(&pattern)))
        }
        "substring-before" => {
            let (s, pattern) = two_strings(name, args)?;
            let before = s.find(&pattern).map(|i| &s[..i]).unwrap_or("");
            Ok(XPathValue::String(before.to_string()))
        }
        "substring-after" => {
            let (s, pattern) = two_strings(name, args)?;
            let after = s
                .find(&pattern)
                .map(|i| &s[i + pattern.len()..])
                .unwrap_or("");
            Ok(XPathValue::String(after.to_string()))
        }
        "substring" => func_substring(name, args),
        "string-length" => {
            arity(name, &args, 0, 1)?;
            let s = string_arg_or_context(args, e_ctx);
            Ok(XPathValue::Number(s.chars().count() as f64))
        }
        "normalize-space" => {
            arity(name, &args, 0, 1)?;
            let s = string_arg_or_context(args, e_ctx);
            Ok(XPathValue::String(
                s.split_whitespace().collect::<Vec<_>>().join(" "),
            ))
        }
        "translate" => func_translate(name, args),

        // Boolean
        "boolean" => {
            arity(name, &args, 1, 1)?;
            Ok(XPathValue::Boolean(args[0].to_bool()))
        }
        "not" => {
            arity(name, &args, 1, 1)?;
            Ok(XPathValue::Boolean(!args[0].to_bool()))
        }
        "true" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(true))
        }
        "false" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(false))
        }
        "lang" => func_lang(name, args, e_ctx),

        // Number
        "number" => {
            arity(name, &args, 0, 1)?;
            let n = match args.first() {
                Some(arg) => arg.to_number(),
                None => parse_number(&e_ctx.context_node.string_value()),
            };
            Ok(XPathValue::Number(n))
        }
        "sum" => func_sum(name, args),
        "floor" => unary_number(name, args, f64::floor),
        "ceiling" => unary_number(name, args, f64::ceil),
        "round" => unary_number(name, args, round_half_up),

        _ => Err(XPathError::FunctionError {
            function: name.to_string(),
            message: "Unknown XPath function".to_string(),
        }),
    }
}

fn arity<N>(
    name: &str,
    args: &[XPathValue<N>],
    min: usize,
    max: usize,
) -> Result<(), XPathError> {
    if args.len() < min || args.len() > max {
        let expected = match (min, max) {
            (min, max) if min == max => format!("{}", min),
            (min, usize::MAX) => format!("at least {}", min),
            (min, max) => format!("{} to {}", min, max),
        };
        return Err(XPathError::FunctionError {
            function: format!("{}()", name),
            message: format!("Expected {} argument(s), got {}", expected, args.len()),
        });
    }
    Ok(())
}

fn expect_nodes<N>(name: &str, value: XPathValue<N>) -> Result<Vec<N>, XPathError>
where
    N: std::fmt::Debug,
{
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        v => Err(XPathError::TypeError(format!(
            "{}() argument must be a node-set, got {:?}",
            name, v
        ))),
    }
}

fn string_arg_or_context<'a, N: DataSourceNode<'a>>(
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> String {
    match args.into_iter().next() {
        Some(arg) => arg.to_string(),
        None => e_ctx.context_node.string_value(),
    }
}

fn two_strings<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
) -> Result<(String, String), XPathError> {
    arity(name, &args, 2, 2)?;
    Ok((args[0].to_string(), args[1].to_string()))
}

fn unary_number<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    f: fn(f64) -> f64,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    Ok(XPathValue::Number(f(args[0].to_number())))
}

/// XPath rounds halves towards positive infinity, unlike `f64::round`.
fn round_half_up(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        return n;
    }
    if (-0.5..0.0).contains(&n) {
        return -0.0;
    }
    (n + 0.5).floor()
}

fn func_count<'a, N: DataSourceNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    let nodes = expect_nodes(name, args.remove(0))?;
    Ok(XPathValue::Number(nodes.len() as f64))
}

fn func_sum<'a, N: DataSourceNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    let total = expect_nodes(name, args.remove(0))?
        .iter()
        .map(|n| parse_number(&n.string_value()))
        .sum();
    Ok(XPathValue::Number(total))
}

/// `local-name()`, `namespace-uri()` and `name()` of the first node of the argument,
/// or of the context node.
fn func_node_name<'a, N: DataSourceNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 0, 1)?;
    let node = if args.is_empty() {
        Some(e_ctx.context_node)
    } else {
        expect_nodes(name, args.remove(0))?.first().copied()
    };
    let Some(q_name) = node.and_then(|n| n.name()) else {
        return Ok(XPathValue::String(String::new()));
    };
    let value = match name {
        "local-name" => q_name.local_part.to_string(),
        "namespace-uri" => q_name.namespace.unwrap_or_default().to_string(),
        _ => match q_name.prefix {
            Some(prefix) => format!("{}:{}", prefix, q_name.local_part),
            None => q_name.local_part.to_string(),
        },
    };
    Ok(XPathValue::String(value))
}

/// `substring(s, start, len?)` with 1-based, rounded character positions.
fn func_substring<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 2, 3)?;
    let s = args[0].to_string();
    let start = round_half_up(args[1].to_number());
    let end = match args.get(2) {
        Some(len) => start + round_half_up(len.to_number()),
        None => f64::INFINITY,
    };
    // NaN bounds fail both comparisons and select nothing.
    let result = s
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let pos = (*i + 1) as f64;
            pos >= start && pos < end
        })
        .map(|(_, c)| c)
        .collect();
    Ok(XPathValue::String(result))
}

fn func_translate<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 3, 3)?;
    let s = args[0].to_string();
    let from: Vec<char> = args[1].to_string().chars().collect();
    let to: Vec<char> = args[2].to_string().chars().collect();
    let result = s
        .chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(i) => to.get(i).copied(),
            None => Some(c),
        })
        .collect();
    Ok(XPathValue::String(result))
}

/// True when the nearest `xml:lang` in scope equals the argument or is a sub-language
/// of it, ignoring case.
fn func_lang<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    let wanted = args[0].to_string().to_lowercase();

    let mut current = Some(e_ctx.context_node);
    while let Some(node) = current {
        if node.node_type() == NodeType::Element {
            let declared = node.attributes().find(|attr| {
                attr.name()
                    .is_some_and(|q| q.matches(Some(XML_NAMESPACE), "lang"))
            });
            if let Some(attr) = declared {
                let lang = attr.string_value().to_lowercase();
                let matched = lang == wanted
                    || lang
                        .strip_prefix(&wanted)
                        .is_some_and(|rest| rest.starts_with('-'));
                return Ok(XPathValue::Boolean(matched));
            }
        }
        current = node.parent();
    }
    Ok(XPathValue::Boolean(false))
}

//! A `nom`-based parser for the XPath 1.0 expression language.

use super::ast::*;
use crate::error::XPathError;
use crate::namespaces::Namespaces;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, peek, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

// --- Main Public Parsers ---

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

/// Parses `input` and resolves its namespace prefixes against `namespaces`.
pub fn compile(input: &str, namespaces: &Namespaces) -> Result<Expression, XPathError> {
    let mut expr = parse_expression(input)?;
    namespaces.resolve_expression(&mut expr)?;
    Ok(expr)
}

// --- Combinators & Helpers ---

type ExprParser = fn(&str) -> IResult<&str, Expression>;
type OpParser = fn(&str) -> IResult<&str, BinaryOperator>;

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// An operator name such as `and` or `div`, which must not run into a following name.
fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(satisfy(is_name_char)))
}

/// Parses `operand (operator operand)*` into a left-associative chain.
fn binary_chain<'a>(
    input: &'a str,
    operand: ExprParser,
    operator: OpParser,
) -> IResult<&'a str, Expression> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |left, (op, right)| Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        });
    Ok((input, expr))
}

// --- Expression Parsers (lowest precedence first) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(keyword("or"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(keyword("and"), |_| BinaryOperator::And).parse(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("!="), |_| BinaryOperator::NotEquals),
        map(tag("="), |_| BinaryOperator::Equals),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        map(tag("<"), |_| BinaryOperator::LessThan),
        map(tag(">"), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(keyword("div"), |_| BinaryOperator::Divide),
        map(keyword("mod"), |_| BinaryOperator::Modulo),
    ))
    .parse(input)
}

fn union_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(char('|'), |_| BinaryOperator::Union).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, and_expr, or_op)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, equality_expr, and_op)
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, relational_expr, equality_op)
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, additive_expr, relational_op)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, multiplicative_expr, additive_op)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, unary_expr, multiplicative_op)
}

fn minus_sign(input: &str) -> IResult<&str, char> {
    ws(char('-')).parse(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    if let Ok((i, _)) = minus_sign(input) {
        let (i, expr) = unary_expr(i)?;
        return Ok((
            i,
            Expression::UnaryOp {
                op: UnaryOperator::Minus,
                expr: Box::new(expr),
            },
        ));
    }
    union_expr(input)
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    binary_chain(input, path_expr, union_op)
}

/// A location path, or a primary expression optionally filtered and followed by steps.
///
/// Primary expressions go first: the location path parser would otherwise read the
/// name of a function call like `count(...)` as a step.
fn path_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        filtered_path,
        map(location_path, Expression::LocationPath),
    )))
    .parse(input)
}

fn filtered_path(input: &str) -> IResult<&str, Expression> {
    let (i, primary) = primary_expr(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    let base = if predicates.is_empty() {
        primary
    } else {
        Expression::Filter {
            expr: Box::new(primary),
            predicates,
        }
    };

    let (i, rest) = many0(pair(ws(step_separator), step)).parse(i)?;
    if rest.is_empty() {
        return Ok((i, base));
    }
    let mut steps = Vec::new();
    push_steps(&mut steps, rest);
    Ok((
        i,
        Expression::LocationPath(LocationPath {
            start_point: Some(Box::new(base)),
            is_absolute: false,
            steps,
        }),
    ))
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        variable_reference,
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    )))
    .parse(input)
}

// --- Literal Parsers ---

/// `digits ('.' digits?)?` or `'.' digits`. Hand-rolled because nom's float parser
/// also accepts `inf`/`nan`, which would swallow step names like `info`.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn variable_reference(input: &str) -> IResult<&str, Expression> {
    map(preceded(char('$'), recognize(q_name)), |name: &str| {
        Expression::Variable(name.to_string())
    })
    .parse(input)
}

// --- Name and NodeTest Parsers ---

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char))).parse(input)
}

/// `prefix:local` or `local`.
fn q_name(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    pair(opt(terminated(nc_name, char(':'))), nc_name).parse(input)
}

fn node_type_test(input: &str) -> IResult<&str, NodeTest> {
    map(
        terminated(
            alt((
                tag("text"),
                tag("node"),
                tag("comment"),
                tag("processing-instruction"),
            )),
            pair(ws(char('(')), char(')')),
        ),
        |node_type: &str| match node_type {
            "text" => NodeTest::NodeType(NodeTypeTest::Text),
            "comment" => NodeTest::NodeType(NodeTypeTest::Comment),
            "processing-instruction" => NodeTest::NodeType(NodeTypeTest::ProcessingInstruction),
            _ => NodeTest::NodeType(NodeTypeTest::Node),
        },
    )
    .parse(input)
}

pub fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        map(char('*'), |_| NodeTest::Wildcard),
        node_type_test,
        map(terminated(nc_name, tag(":*")), |prefix: &str| {
            NodeTest::NamespaceWildcard {
                prefix: prefix.to_string(),
                namespace: None,
            }
        }),
        map(q_name, |(prefix, local)| {
            NodeTest::Name(NameTest::new(prefix, local))
        }),
    ))
    .parse(input)
}

// --- Path Parsers ---

fn axis_name(input: &str) -> IResult<&str, Axis> {
    map(
        terminated(
            alt((
                tag("child"),
                tag("descendant-or-self"),
                tag("descendant"),
                tag("attribute"),
                tag("parent"),
                tag("ancestor-or-self"),
                tag("ancestor"),
                tag("self"),
                tag("following-sibling"),
                tag("following"),
                tag("preceding-sibling"),
                tag("preceding"),
            )),
            ws(tag("::")),
        ),
        |axis_str: &str| match axis_str {
            "descendant-or-self" => Axis::DescendantOrSelf,
            "descendant" => Axis::Descendant,
            "attribute" => Axis::Attribute,
            "parent" => Axis::Parent,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "ancestor" => Axis::Ancestor,
            "self" => Axis::SelfAxis,
            "following-sibling" => Axis::FollowingSibling,
            "following" => Axis::Following,
            "preceding-sibling" => Axis::PrecedingSibling,
            "preceding" => Axis::Preceding,
            _ => Axis::Child,
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn axis_step(input: &str) -> IResult<&str, Step> {
    let (i, axis) = opt(alt((map(char('@'), |_| Axis::Attribute), axis_name))).parse(input)?;
    let (i, node_test) = node_test(i)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis: axis.unwrap_or(Axis::Child),
            node_test,
            predicates,
        },
    ))
}

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        map(tag(".."), |_| Step::any_node(Axis::Parent)),
        map(tag("."), |_| Step::any_node(Axis::SelfAxis)),
        axis_step,
    ))
    .parse(input)
}

fn step_separator(input: &str) -> IResult<&str, &str> {
    alt((tag("//"), tag("/"))).parse(input)
}

/// Appends `(separator, step)` pairs, expanding `//` to `/descendant-or-self::node()/`.
fn push_steps(steps: &mut Vec<Step>, rest: Vec<(&str, Step)>) {
    for (sep, next_step) in rest {
        if sep == "//" {
            steps.push(Step::any_node(Axis::DescendantOrSelf));
        }
        steps.push(next_step);
    }
}

fn relative_steps(input: &str) -> IResult<&str, Vec<Step>> {
    let (i, first) = step(input)?;
    let (i, rest) = many0(pair(ws(step_separator), step)).parse(i)?;
    let mut steps = vec![first];
    push_steps(&mut steps, rest);
    Ok((i, steps))
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    if let Ok((rem, _)) = tag::<&str, &str, nom::error::Error<&str>>("//").parse(input) {
        let (rem, rest) = relative_steps(rem)?;
        let mut steps = vec![Step::any_node(Axis::DescendantOrSelf)];
        steps.extend(rest);
        return Ok((
            rem,
            LocationPath {
                start_point: None,
                is_absolute: true,
                steps,
            },
        ));
    }

    if let Ok((rem, _)) = char::<&str, nom::error::Error<&str>>('/').parse(input) {
        // A lone `/` selects the root.
        let (rem, steps) = opt(relative_steps).parse(rem)?;
        return Ok((
            rem,
            LocationPath {
                start_point: None,
                is_absolute: true,
                steps: steps.unwrap_or_default(),
            },
        ));
    }

    let (rem, steps) = relative_steps(input)?;
    Ok((
        rem,
        LocationPath {
            start_point: None,
            is_absolute: false,
            steps,
        },
    ))
}

// --- Function Call Parser ---

fn function_call(input: &str) -> IResult<&str, Expression> {
    // Lookahead for '(' keeps a plain step name like 'foo' in 'foo/bar' out of here.
    let (i, name) = recognize(q_name).parse(input)?;
    let (i, _) = peek(ws(char::<&str, nom::error::Error<&str>>('('))).parse(i)?;

    // Node-type tests like text() belong to the step parser.
    if matches!(name, "text" | "node" | "comment" | "processing-instruction") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (i, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;

    Ok((
        i,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

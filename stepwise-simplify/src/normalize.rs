//! Restores the flattened, sign-normalized shape of a tree after each change, and puts the
//! arguments of sums and products in canonical order at the end of a simplification.

use crate::node::{is_coefficient_product, Node, Op};
use crate::node_type::{is_constant_or_constant_fraction, SymbolCache};
use crate::number::Number;
use std::cmp::Ordering;

/// Negates a normalized node, folding the sign into a constant.
fn negate(node: Node) -> Node {
    match node {
        Node::Constant(n) => Node::Constant(-n),
        node => Node::neg(node),
    }
}

/// Merges nested applications of an associative operator into one argument list.
fn merge(op: Op, args: Vec<Node>) -> Vec<Node> {
    let mut merged = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Node::Operator { op: inner, args, .. } if inner == op => merged.extend(args),
            arg => merged.push(arg),
        }
    }
    merged
}

/// Normalizes the given tree:
///
/// - parentheses are removed,
/// - `a - b` becomes `a + -b`,
/// - a unary minus around a constant is folded into the constant,
/// - nested sums and nested products are merged into one node,
/// - sums and products with fewer than two arguments are replaced by their identity or their
///   only argument,
/// - a constant coefficient times a symbol power, such as `2 * x`, is marked as implicit.
///
/// Normalizing a normalized tree returns it unchanged.
pub fn normalize(node: Node) -> Node {
    match node {
        Node::Parenthesis(inner) => normalize(*inner),
        Node::UnaryMinus(inner) => negate(normalize(*inner)),
        Node::Operator { op: Op::Sub, args, implicit } => {
            let mut args = args.into_iter().map(normalize);
            match (args.next(), args.next(), args.next()) {
                (Some(lhs), Some(rhs), None) => {
                    normalize_associative(Op::Add, vec![lhs, negate(rhs)])
                },
                (lhs, rhs, rest) => Node::Operator {
                    op: Op::Sub,
                    args: lhs.into_iter().chain(rhs).chain(rest).chain(args).collect(),
                    implicit,
                },
            }
        },
        Node::Operator { op: op @ (Op::Add | Op::Mul), args, .. } => {
            normalize_associative(op, args.into_iter().map(normalize).collect())
        },
        Node::Operator { op, args, implicit } => Node::Operator {
            op,
            args: args.into_iter().map(normalize).collect(),
            implicit,
        },
        Node::Function { name, presentation_name, args } => Node::Function {
            name,
            presentation_name,
            args: args.into_iter().map(normalize).collect(),
        },
        node @ (Node::Constant(_) | Node::Symbol(_)) => node,
    }
}

/// Builds a sum or product from normalized arguments.
fn normalize_associative(op: Op, args: Vec<Node>) -> Node {
    let args = merge(op, args);
    let implicit = op == Op::Mul && is_coefficient_product(&args);
    Node::Operator { op, args, implicit }.downgrade()
}

/// Returns the degree of a term in its symbols, or [`None`] if the term contains no symbols.
fn degree<'a>(node: &'a Node, cache: &mut SymbolCache<'a>) -> Option<Number> {
    if !cache.contains_symbol(node, None) {
        return None;
    }

    let degree = match node {
        Node::Symbol(_) => Number::one(),
        Node::UnaryMinus(inner) | Node::Parenthesis(inner) => degree(inner, cache)?,
        Node::Operator { op: Op::Pow, args, .. } => match args.as_slice() {
            [base, exponent] => match (degree(base, cache), exponent.signed_number()) {
                (Some(base), Some(exponent)) => &base * &exponent,
                _ => Number::zero(),
            },
            _ => Number::zero(),
        },
        Node::Operator { op: Op::Mul, args, .. } => args.iter()
            .filter_map(|arg| degree(arg, cache))
            .fold(Number::zero(), |acc, n| &acc + &n),
        Node::Operator { op: Op::Add, args, .. } => args.iter()
            .filter_map(|arg| degree(arg, cache))
            .max()
            .unwrap_or_else(Number::zero),
        Node::Operator { op: Op::Div, args, .. } => match args.as_slice() {
            [numerator, denominator] => {
                let numerator = degree(numerator, cache).unwrap_or_else(Number::zero);
                let denominator = degree(denominator, cache).unwrap_or_else(Number::zero);
                &numerator - &denominator
            },
            _ => Number::zero(),
        },
        _ => Number::zero(),
    };
    Some(degree)
}

/// Puts the arguments of every sum and product in canonical order, recursively.
fn sort_args<'a>(node: &'a Node, cache: &mut SymbolCache<'a>) -> Node {
    match node {
        Node::Operator { op: Op::Add, args, implicit } => {
            let mut keyed = args.iter()
                .map(|arg| (degree(arg, cache), sort_args(arg, cache)))
                .collect::<Vec<_>>();

            // highest degree first, constants last
            keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                (Some(a), Some(b)) => b.cmp(a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });

            Node::Operator {
                op: Op::Add,
                args: keyed.into_iter().map(|(_, arg)| arg).collect(),
                implicit: *implicit,
            }
        },
        Node::Operator { op: Op::Mul, args, implicit } => {
            let mut keyed = args.iter()
                .map(|arg| {
                    let constant = is_constant_or_constant_fraction(arg, true)
                        || !cache.contains_symbol(arg, None);
                    (constant, sort_args(arg, cache))
                })
                .collect::<Vec<_>>();

            // constants first
            keyed.sort_by_key(|(constant, _)| !constant);

            Node::Operator {
                op: Op::Mul,
                args: keyed.into_iter().map(|(_, arg)| arg).collect(),
                implicit: *implicit,
            }
        },
        Node::Operator { op, args, implicit } => Node::Operator {
            op: *op,
            args: args.iter().map(|arg| sort_args(arg, cache)).collect(),
            implicit: *implicit,
        },
        Node::UnaryMinus(inner) => Node::neg(sort_args(inner, cache)),
        Node::Parenthesis(inner) => Node::paren(sort_args(inner, cache)),
        Node::Function { name, presentation_name, args } => Node::Function {
            name: name.clone(),
            presentation_name: presentation_name.clone(),
            args: args.iter().map(|arg| sort_args(arg, cache)).collect(),
        },
        node @ (Node::Constant(_) | Node::Symbol(_)) => node.clone(),
    }
}

/// Returns the tree with the arguments of every sum and product in canonical order, then
/// normalized.
///
/// In a product, constant factors come first: `x * 2` becomes `2x`. In a sum, terms are ordered
/// by descending degree with constant terms last: `2 + x + x^2` becomes `x^2 + x + 2`. Both sorts
/// are stable, so arguments that compare equal keep their order.
pub fn canonical_order(node: &Node) -> Node {
    let mut cache = SymbolCache::new(node);
    normalize(sort_args(node, &mut cache))
}

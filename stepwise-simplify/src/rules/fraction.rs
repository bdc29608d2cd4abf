//! Adding a constant to a fraction.

use crate::node::{Node, Op};
use crate::node_type::{is_constant, is_integer_fraction};
use crate::number::Number;
use crate::rules::{do_operator, ExpressionCtx};
use crate::step::{ChangeType, Status};

/// Returns the signed numerator and denominator of an integer fraction, looking through a unary
/// minus around the whole fraction or around either side.
fn fraction_parts(node: &Node) -> Option<(Number, Number)> {
    match node {
        Node::UnaryMinus(inner) => fraction_parts(inner).map(|(numer, denom)| (-numer, denom)),
        Node::Operator { op: Op::Div, args, .. } => match args.as_slice() {
            [numer, denom] => Some((numer.signed_number()?, denom.signed_number()?)),
            _ => None,
        },
        _ => None,
    }
}

/// Puts the two terms of a sum back in their original order.
fn in_order(constant_first: bool, constant: Node, fraction: Node) -> Node {
    if constant_first {
        Node::add(vec![constant, fraction])
    } else {
        Node::add(vec![fraction, constant])
    }
}

/// Adds a constant to an integer fraction.
///
/// An integer constant is first written as a fraction with the same denominator, then the
/// numerators are added:
///
/// `2 + 1/3 = 6/3 + 1/3 = (6 + 1)/3 = 7/3`
///
/// A decimal constant is added to the fraction's value, as long as that value can be written
/// exactly as a decimal:
///
/// `0.5 + 1/4 = 0.5 + 0.25 = 0.75`
pub fn add_constant_and_fraction(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let (constant_first, constant, fraction) = do_operator(node, Op::Add, |terms| match terms {
        [lhs, rhs] if is_constant(lhs, false) && is_integer_fraction(rhs, true) => Some((true, lhs, rhs)),
        [lhs, rhs] if is_integer_fraction(lhs, true) && is_constant(rhs, false) => Some((false, rhs, lhs)),
        _ => None,
    })?;

    let value = constant.signed_number()?;
    let (numer, denom) = fraction_parts(fraction)?;
    if denom.is_zero() {
        return None;
    }

    let substeps = if value.is_integer() {
        // c + x/y = c*y/y + x/y
        let scaled = &value * &denom;
        let converted = Node::div(Node::Constant(scaled.clone()), Node::Constant(denom.clone()));
        let convert = Status::new(
            ChangeType::ConvertIntegerToFraction,
            in_order(constant_first, converted, fraction.clone()),
        );

        // c*y/y + x/y = (c*y + x)/y
        let numerators = if constant_first {
            vec![Node::Constant(scaled.clone()), Node::Constant(numer.clone())]
        } else {
            vec![Node::Constant(numer.clone()), Node::Constant(scaled.clone())]
        };
        let combine = Status::new(
            ChangeType::AddNumerators,
            Node::div(Node::add(numerators), Node::Constant(denom.clone())),
        );

        let evaluate = Status::new(
            ChangeType::SimplifyArithmetic,
            Node::div(Node::Constant(&scaled + &numer), Node::Constant(denom)),
        );

        vec![convert, combine, evaluate]
    } else {
        let quotient = numer.checked_div(&denom).filter(Number::is_terminating)?;
        let divide = Status::new(
            ChangeType::DivideFractionForAddition,
            in_order(constant_first, constant.clone(), Node::Constant(quotient.clone())),
        );
        let evaluate = Status::new(
            ChangeType::SimplifyArithmetic,
            Node::Constant(&value + &quotient),
        );

        vec![divide, evaluate]
    };

    Status::from_substeps(ChangeType::AddConstantAndFraction, substeps)
}

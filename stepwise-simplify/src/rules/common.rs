//! Rules that remove identities: exponents of one and zero, factors of one and zero, terms of
//! zero, division by one, and double negation.

use crate::node::{Node, Op};
use crate::node_type::{is_one, is_zero};
use crate::rules::{do_binary, do_operator, ExpressionCtx};
use crate::step::{ChangeType, Status};

/// `a^1 = a`
pub fn remove_exponent_by_one(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_binary(node, Op::Pow, |base, exponent| {
        is_one(exponent).then(|| base.clone())
    })?;

    Some(Status::new(ChangeType::RemoveExponentByOne, opt))
}

/// `a^0 = 1`, for any `a` other than `0`
pub fn reduce_exponent_by_zero(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_binary(node, Op::Pow, |base, exponent| {
        (is_zero(exponent) && !is_zero(base)).then(|| Node::int(1))
    })?;

    Some(Status::new(ChangeType::ReduceExponentByZero, opt))
}

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_by_zero(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_operator(node, Op::Mul, |factors| {
        factors.iter().any(is_zero).then(|| Node::int(0))
    })?;

    Some(Status::new(ChangeType::MultiplyByZero, opt))
}

/// `1*a = a`
/// `a*1 = a`
pub fn remove_multiplying_by_one(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_operator(node, Op::Mul, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !is_one(factor))
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(Node::product(new_factors))
        }
    })?;

    Some(Status::new(ChangeType::RemoveMultiplyingByOne, opt))
}

/// `a + 0 = a`
/// `0 + a = a`
pub fn remove_adding_zero(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_operator(node, Op::Add, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !is_zero(term))
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Node::add(new_terms).downgrade())
        }
    })?;

    Some(Status::new(ChangeType::RemoveAddingZero, opt))
}

/// `a/1 = a`
pub fn remove_division_by_one(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let opt = do_binary(node, Op::Div, |numerator, denominator| {
        is_one(denominator).then(|| numerator.clone())
    })?;

    Some(Status::new(ChangeType::RemoveDivisionByOne, opt))
}

/// `--a = a`
pub fn resolve_double_minus(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    match node {
        Node::UnaryMinus(inner) => match &**inner {
            Node::UnaryMinus(innermost) => {
                Some(Status::new(ChangeType::ResolveDoubleMinus, (**innermost).clone()))
            },
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Node {
        Node::symbol("x")
    }

    fn apply(
        rule: fn(&Node, &ExpressionCtx) -> Option<Status>,
        node: Node,
    ) -> Option<Node> {
        rule(&node, &ExpressionCtx::default()).map(|status| status.node)
    }

    #[test]
    fn exponents() {
        assert_eq!(apply(remove_exponent_by_one, Node::pow(x(), Node::int(1))), Some(x()));
        assert_eq!(apply(remove_exponent_by_one, Node::pow(x(), Node::int(2))), None);
        assert_eq!(apply(reduce_exponent_by_zero, Node::pow(x(), Node::int(0))), Some(Node::int(1)));
        assert_eq!(apply(reduce_exponent_by_zero, Node::pow(Node::int(0), Node::int(0))), None);
    }

    #[test]
    fn products() {
        let with_one = Node::mul(vec![Node::int(1), x(), Node::symbol("y")]);
        assert_eq!(
            apply(remove_multiplying_by_one, with_one),
            Some(Node::mul(vec![x(), Node::symbol("y")])),
        );
        assert_eq!(apply(remove_multiplying_by_one, Node::mul(vec![x(), Node::int(1)])), Some(x()));
        assert_eq!(apply(multiply_by_zero, Node::mul(vec![x(), Node::int(0)])), Some(Node::int(0)));
        assert_eq!(apply(multiply_by_zero, Node::mul(vec![x(), Node::int(2)])), None);
    }

    #[test]
    fn sums() {
        assert_eq!(apply(remove_adding_zero, Node::add(vec![Node::int(0), x()])), Some(x()));
        assert_eq!(apply(remove_adding_zero, Node::add(vec![Node::int(0), Node::int(0)])), Some(Node::int(0)));
        assert_eq!(apply(remove_adding_zero, Node::add(vec![Node::int(1), x()])), None);
    }

    #[test]
    fn division_and_negation() {
        assert_eq!(apply(remove_division_by_one, Node::div(x(), Node::int(1))), Some(x()));
        assert_eq!(apply(remove_division_by_one, Node::div(Node::int(1), x())), None);
        assert_eq!(apply(resolve_double_minus, Node::neg(Node::neg(x()))), Some(x()));
        assert_eq!(apply(resolve_double_minus, Node::neg(x())), None);
    }
}

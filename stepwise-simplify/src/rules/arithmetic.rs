//! Evaluation of operators whose arguments are all constants.

use crate::node::{Node, Op};
use crate::number::Number;
use crate::rules::ExpressionCtx;
use crate::step::{ChangeType, Status};

/// Builds the integer fraction `numerator/denominator` for a non-integer number.
pub(crate) fn fraction_node(n: &Number) -> Node {
    Node::div(
        Node::Constant(Number::from(n.numer().clone())),
        Node::Constant(Number::from(n.denom().clone())),
    )
}

/// Computes the value of the operator applied to the given values. Returns [`None`] for
/// division by zero and for powers that cannot be computed exactly.
fn evaluate(op: Op, values: &[Number]) -> Option<Number> {
    match (op, values) {
        (Op::Add, _) => Some(values.iter().fold(Number::zero(), |acc, n| &acc + n)),
        (Op::Mul, _) => Some(values.iter().fold(Number::one(), |acc, n| &acc * n)),
        (Op::Sub, [lhs, rhs]) => Some(lhs - rhs),
        (Op::Div, [lhs, rhs]) => lhs.checked_div(rhs),
        (Op::Pow, [base, exponent]) => base.checked_pow(exponent),
        _ => None,
    }
}

/// Evaluates an operator whose arguments are all constants (a unary minus around a constant is
/// allowed).
///
/// `2 + 3 = 5`
/// `2 * -3 = -6`
/// `2^-2 = 1/4`
///
/// A division of integers only resolves when it divides evenly, so `4/5` stays as it is. With
/// [`ExpressionCtx::decimal_output`], it resolves whenever the result is a terminating decimal.
pub fn evaluate_arithmetic(node: &Node, ctxt: &ExpressionCtx) -> Option<Status> {
    let Node::Operator { op, args, .. } = node else {
        return None;
    };
    let values = args.iter()
        .map(Node::signed_number)
        .collect::<Option<Vec<_>>>()?;
    let result = evaluate(*op, &values)?;

    let all_integers = values.iter().all(Number::is_integer);
    let replacement = if result.is_integer()
        || (result.is_terminating() && (!all_integers || ctxt.decimal_output)) {
        Node::Constant(result)
    } else if *op == Op::Div && all_integers {
        // an integer fraction that does not divide evenly is already in its final form
        return None;
    } else {
        fraction_node(&result)
    };

    (replacement != *node).then(|| Status::new(ChangeType::SimplifyArithmetic, replacement))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval(node: Node) -> Option<Node> {
        evaluate_arithmetic(&node, &ExpressionCtx::default()).map(|status| status.node)
    }

    fn decimal(s: &str) -> Node {
        Node::Constant(Number::from_decimal_str(s).unwrap())
    }

    #[test]
    fn sums_and_products() {
        assert_eq!(eval(Node::add(vec![Node::int(2), Node::int(2)])), Some(Node::int(4)));
        assert_eq!(eval(Node::mul(vec![Node::int(2), Node::neg(Node::int(3)), Node::int(4)])), Some(Node::int(-24)));
        assert_eq!(eval(Node::sub(Node::int(2), Node::int(5))), Some(Node::int(-3)));
        assert_eq!(eval(Node::add(vec![decimal("0.1"), decimal("0.2")])), Some(decimal("0.3")));
    }

    #[test]
    fn symbols_block_evaluation() {
        assert_eq!(eval(Node::add(vec![Node::int(2), Node::symbol("x")])), None);
        assert_eq!(eval(Node::symbol("x")), None);
        assert_eq!(eval(Node::int(3)), None);
    }

    #[test]
    fn integer_division() {
        assert_eq!(eval(Node::div(Node::int(8), Node::int(4))), Some(Node::int(2)));
        assert_eq!(eval(Node::div(Node::int(4), Node::int(5))), None);
        assert_eq!(eval(Node::div(Node::int(4), Node::int(0))), None);

        let ctxt = ExpressionCtx { decimal_output: true };
        let quarter = evaluate_arithmetic(&Node::div(Node::int(1), Node::int(4)), &ctxt);
        assert_eq!(quarter.map(|status| status.node), Some(decimal("0.25")));
        let third = evaluate_arithmetic(&Node::div(Node::int(1), Node::int(3)), &ctxt);
        assert_eq!(third, None);
    }

    #[test]
    fn decimal_division_that_does_not_terminate() {
        assert_eq!(
            eval(Node::div(decimal("0.1"), decimal("0.3"))),
            Some(Node::div(Node::int(1), Node::int(3))),
        );
    }

    #[test]
    fn powers() {
        assert_eq!(eval(Node::pow(Node::int(2), Node::int(10))), Some(Node::int(1024)));
        assert_eq!(
            eval(Node::pow(Node::int(2), Node::int(-2))),
            Some(Node::div(Node::int(1), Node::int(4))),
        );
        assert_eq!(eval(Node::pow(Node::int(0), Node::int(-1))), None);
        assert_eq!(eval(Node::pow(Node::int(2), decimal("0.5"))), None);
        // exponent differences left by cancellation
        assert_eq!(
            eval(Node::pow(Node::symbol("x"), Node::sub(Node::int(3), Node::int(2)))),
            None,
        );
        assert_eq!(eval(Node::sub(Node::int(3), Node::int(2))), Some(Node::int(1)));
    }
}

//! Conversion from the parser's syntax tree to [`Node`]s.

use crate::{error::InvalidNumber, node::{Node, Op}, number::Number};
use stepwise_error::Error;
use stepwise_parser::parser::{
    expr::Expr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
    Parser,
};

/// Reads text into an expression tree.
///
/// The simplifier uses a [`TextParser`] to reparse the text of a tree when it gets stuck, which
/// can regroup the tree in a way that lets more rules apply.
pub trait TextParser: Send + Sync {
    /// Parses the text into a tree.
    fn parse(&self, text: &str) -> Result<Node, Error>;
}

/// The [`TextParser`] backed by [`stepwise_parser`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultParser;

impl TextParser for DefaultParser {
    fn parse(&self, text: &str) -> Result<Node, Error> {
        parse_text(text)
    }
}

/// Parses the text into a tree. The tree is not normalized.
///
/// ```
/// use stepwise_simplify::{parse_text, Node};
///
/// let node = parse_text("2x + 1").unwrap();
/// assert_eq!(node, Node::add(vec![
///     Node::mul(vec![Node::int(2), Node::symbol("x")]),
///     Node::int(1),
/// ]));
/// ```
pub fn parse_text(text: &str) -> Result<Node, Error> {
    let expr = Parser::new(text).try_parse_full::<Expr>()?;
    Node::try_from(expr)
}

impl TryFrom<Expr> for Node {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        match expr {
            Expr::Literal(Literal::Number(num)) => Number::from_decimal_str(&num.value)
                .map(Node::Constant)
                .ok_or_else(|| Error::new(vec![num.span], InvalidNumber { literal: num.value })),
            Expr::Literal(Literal::Symbol(sym)) => Ok(Node::Symbol(sym.name)),
            Expr::Paren(paren) => Ok(Node::paren(Node::try_from(*paren.expr)?)),
            Expr::Call(call) => Ok(Node::function(
                call.name.name,
                call.args.into_iter().map(Node::try_from).collect::<Result<_, _>>()?,
            )),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Ok(Node::neg(Node::try_from(*unary.operand)?)),
            },
            Expr::Binary(binary) => {
                let op = match binary.op.kind {
                    BinOpKind::Exp => Op::Pow,
                    BinOpKind::Mul => Op::Mul,
                    BinOpKind::Div => Op::Div,
                    BinOpKind::Add => Op::Add,
                    BinOpKind::Sub => Op::Sub,
                };
                Ok(Node::Operator {
                    op,
                    args: vec![Node::try_from(*binary.lhs)?, Node::try_from(*binary.rhs)?],
                    implicit: binary.op.implicit,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::print;

    fn x() -> Node {
        Node::symbol("x")
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse_text("1 + 2 * x ^ 3").unwrap(),
            Node::add(vec![
                Node::int(1),
                Node::mul(vec![Node::int(2), Node::pow(x(), Node::int(3))]),
            ]),
        );
        assert_eq!(
            parse_text("-2/3").unwrap(),
            Node::div(Node::neg(Node::int(2)), Node::int(3)),
        );
    }

    #[test]
    fn implicit_multiplication() {
        match parse_text("4x").unwrap() {
            Node::Operator { op: Op::Mul, implicit, .. } => assert!(implicit),
            other => panic!("expected a product, got {:?}", other),
        }

        // a fraction followed by a symbol multiplies the whole fraction
        assert_eq!(
            parse_text("2/3x^2").unwrap(),
            Node::mul(vec![
                Node::div(Node::int(2), Node::int(3)),
                Node::pow(x(), Node::int(2)),
            ]),
        );
    }

    #[test]
    fn groups_and_calls() {
        assert_eq!(
            parse_text("(x - 1)").unwrap(),
            Node::paren(Node::sub(x(), Node::int(1))),
        );
        assert_eq!(
            parse_text("nthRoot(x, 3)").unwrap(),
            Node::function("nthRoot", vec![x(), Node::int(3)]),
        );
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(
            parse_text("0.25").unwrap(),
            Node::Constant(Number::from_decimal_str("0.25").unwrap()),
        );
    }

    #[test]
    fn errors() {
        assert!(parse_text("2 +").is_err());
        assert!(parse_text("(x").is_err());
        assert!(parse_text("()").is_err());
    }

    #[test]
    fn rendering_round_trips() {
        for text in ["2 + 4 - x - 4", "2/3x^2", "-2/3", "(2x + 5)^6", "1 / (2x)", "4x / 5"] {
            let node = parse_text(text).unwrap();
            assert_eq!(node.to_string(), text);
        }
    }

    #[test]
    fn rendering_is_a_fixed_point() {
        let inputs = [
            "2/3x^2",
            "-2/3x",
            "x^-2",
            "-x^2",
            "(-3)^2",
            "1 / (2x)",
            "x - (1 - x)",
            "x^(3 - 2) * y",
            "2^(2^3)",
            "2 + 1/0",
        ];

        for input in inputs {
            let node = parse_text(input).unwrap();
            let rendered = node.to_string();
            assert_eq!(node.to_string(), rendered, "rendering `{}` twice", input);
            assert_eq!(print::latex(&node), print::latex(&node), "rendering `{}` twice", input);

            let reparsed = parse_text(&rendered).unwrap();
            assert_eq!(reparsed.to_string(), rendered, "reparsing `{}`", input);
        }
    }
}

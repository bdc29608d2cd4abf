use std::{fmt, ops::Range};
use super::{
    expr::{Expr, Primary},
    error::Error,
    token::op::{BinOp, BinOpKind},
    unary::Unary,
    Associativity,
    Parser,
    Precedence,
};

/// A binary operator, or the implicit multiplication between two adjacent expressions.
#[derive(Debug, Clone, PartialEq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `x(x + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
        }
    }
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // before creating the `lhs op rhs` node, check the precedence of the following
            // operator, if any, so that `3 + 4 * 5` does not become `(3 + 4) * 5`

            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // higher precedence or right associative: `rhs` is the left side of the
                    // next operation
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
                } else {
                    // lower, or equal and left-associative: `1 * 2 + 3`, `1 * 2 * 3`
                    // let the outer loop build `lhs op rhs` first
                    break;
                }
            } else {
                // no operator: an adjacent expression is implicit multiplication, which binds as
                // tightly as `*`
                if precedence >= Precedence::Factor {
                    break;
                }

                let before = input.cursor;
                rhs = Self::parse_expr(input, rhs, Precedence::Factor)?;
                if input.cursor == before {
                    break;
                }
            }
        }

        // create the binary node representing `lhs op rhs`
        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        let op = match op {
            BinOpExt::Op(op) => op,
            BinOpExt::ImplicitMultiplication => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..rhs.span().start,
            },
        };

        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: start_span..end_span,
        }))
    }

    /// Parses binary operations that follow `lhs` and have at least the given precedence.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            let mut input_ahead = input.clone();
            if let Ok(op) = input_ahead.try_parse::<BinOp>() {
                if op.precedence() < precedence {
                    break;
                }

                input.set_cursor(&input_ahead);
                let rhs = Unary::parse_or_lower(input)?;
                lhs = Self::complete_rhs(input, lhs, BinOpExt::Op(op), rhs)?;
            } else if Precedence::Factor >= precedence {
                // implicit multiplication test: there is no operator, but there may be another
                // primary expression right after `lhs`
                let rhs = match input.try_parse::<Primary>() {
                    Ok(primary) => Expr::from(primary),
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                };
                lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
            } else {
                break;
            }
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Exp => write!(f, "{}{}{}", self.lhs, self.op, self.rhs),
            BinOpKind::Mul if self.op.implicit => write!(f, "{}{}", self.lhs, self.rhs),
            _ => write!(f, "{} {} {}", self.lhs, self.op, self.rhs),
        }
    }
}

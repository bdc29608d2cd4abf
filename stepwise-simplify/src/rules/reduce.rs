//! Cancellation of common factors between the numerator and denominator of a fraction.
//!
//! The node is split into a list of numerator factors and a list of denominator factors. The
//! pairs `(numerator, denominator)` are scanned in row-major order, and the first pair that can
//! be reduced is reduced:
//!
//! 1. factors that are equal, ignoring one unary minus on either side, cancel completely:
//!    `x / x = 1`, `-x / x = -1`
//! 2. integers with a common divisor are divided by it: `6 / 4 = 3 / 2`
//! 3. powers of the same base with constant exponents are combined on the side with the larger
//!    exponent: `x^3 / x = x^(3 - 1)`
//!
//! Only one pair is reduced per application. The exponent difference in case 3 is left as a
//! subtraction for the arithmetic rule to evaluate in the following step.

use crate::node::{Node, Op};
use crate::number::Number;
use crate::rules::ExpressionCtx;
use crate::step::{ChangeType, Status};

/// The factors of a fraction.
#[derive(Debug, Default, Clone, PartialEq)]
struct Factors {
    numerator: Vec<Node>,
    denominator: Vec<Node>,

    /// Whether the rebuilt fraction must be negated.
    negative: bool,
}

impl Factors {
    /// Splits a node into its numerator and denominator factors. Returns [`None`] if the node is
    /// not a division or a product containing a division.
    fn decompose(node: &Node) -> Option<Self> {
        match node {
            Node::Operator { op: Op::Div, .. } => {
                let mut factors = Self::default();
                factors.push(node);
                Some(factors)
            },
            Node::Operator { op: Op::Mul, args, .. }
                if args.iter().any(|arg| arg.operator() == Some(Op::Div)) => {
                let mut factors = Self::default();
                for arg in args {
                    factors.push(arg);
                }
                Some(factors)
            },
            _ => None,
        }
    }

    /// Adds the factors of one operand.
    fn push(&mut self, node: &Node) {
        match node {
            Node::Operator { op: Op::Div, args, .. } if args.len() == 2 => {
                self.numerator.extend(flatten_product(&args[0]));
                self.denominator.extend(flatten_product(&args[1]));
            },
            node => self.numerator.extend(flatten_product(node)),
        }
    }

    /// Finds the first pair of factors that can be reduced, and reduces it. Returns false if no
    /// pair can be reduced.
    fn reduce_first_pair(&mut self) -> bool {
        for i in 0..self.numerator.len() {
            for j in 0..self.denominator.len() {
                if let Some(reduction) = reduce_pair(&self.numerator[i], &self.denominator[j]) {
                    self.apply(i, j, reduction);
                    return true;
                }
            }
        }
        false
    }

    /// Replaces the factors at the given indices with the result of their reduction. Replacements
    /// keep the position of the factor they replace.
    fn apply(&mut self, i: usize, j: usize, reduction: Reduction) {
        self.negative ^= reduction.negate;

        match reduction.bottom {
            Some(bottom) => self.denominator[j] = bottom,
            None => {
                self.denominator.remove(j);
            },
        }
        match reduction.top {
            Some(top) => self.numerator[i] = top,
            None => {
                self.numerator.remove(i);
            },
        }
    }

    /// Builds the node for the fraction.
    fn rebuild(self) -> Node {
        let result = if self.denominator.is_empty() {
            Node::product(self.numerator)
        } else {
            Node::div(Node::product(self.numerator), Node::product(self.denominator))
        };

        if self.negative {
            Node::neg(result)
        } else {
            result
        }
    }
}

/// Returns the factors of a product, or the node itself if it is not a product.
fn flatten_product(node: &Node) -> Vec<Node> {
    match node {
        Node::Operator { op: Op::Mul, args, .. } => args.clone(),
        node => vec![node.clone()],
    }
}

/// The result of reducing a pair of factors. [`None`] means the factor is removed.
#[derive(Debug, Clone, PartialEq)]
struct Reduction {
    top: Option<Node>,
    bottom: Option<Node>,
    negate: bool,
}

/// Tries each kind of reduction on a pair of factors, in priority order.
fn reduce_pair(top: &Node, bottom: &Node) -> Option<Reduction> {
    cancel_equal(top, bottom)
        .or_else(|| cancel_common_divisor(top, bottom))
        .or_else(|| cancel_common_base(top, bottom))
}

/// Removes one unary minus from the node, returning whether one was removed.
fn strip_minus(node: &Node) -> (&Node, bool) {
    match node {
        Node::UnaryMinus(inner) => (&**inner, true),
        node => (node, false),
    }
}

/// `a / a = 1`
/// `-a / a = -1`
fn cancel_equal(top: &Node, bottom: &Node) -> Option<Reduction> {
    let (top, top_negated) = strip_minus(top);
    let (bottom, bottom_negated) = strip_minus(bottom);
    (top == bottom).then_some(Reduction {
        top: None,
        bottom: None,
        negate: top_negated != bottom_negated,
    })
}

/// `6 / 4 = 3 / 2`
/// `-6 / 4 = -(3 / 2)`
fn cancel_common_divisor(top: &Node, bottom: &Node) -> Option<Reduction> {
    let (top, bottom) = (top.signed_number()?, bottom.signed_number()?);
    if top.is_zero() || bottom.is_zero() {
        return None;
    }
    let gcd = top.gcd(&bottom)?;
    if gcd.is_zero() || gcd.is_one() {
        return None;
    }

    let reduce = |n: &Number| {
        let reduced = n.abs().checked_div(&gcd)?;
        Some((!reduced.is_one()).then(|| Node::Constant(reduced)))
    };

    Some(Reduction {
        top: reduce(&top)?,
        bottom: reduce(&bottom)?,
        negate: top.is_negative() != bottom.is_negative(),
    })
}

/// Splits a factor into its base and its constant exponent. A factor that is not a power is its
/// own base with an exponent of one.
fn base_and_exponent(node: &Node) -> Option<(&Node, Number, Node)> {
    match node {
        Node::Operator { op: Op::Pow, args, .. } => match args.as_slice() {
            [base, exponent] => Some((base, exponent.signed_number()?, exponent.clone())),
            _ => None,
        },
        node => Some((node, Number::one(), Node::int(1))),
    }
}

/// `x^3 / x^2 = x^(3 - 2)`
/// `x / x^3 = 1 / x^(3 - 1)`
fn cancel_common_base(top: &Node, bottom: &Node) -> Option<Reduction> {
    let (top_base, top_value, top_exponent) = base_and_exponent(top)?;
    let (bottom_base, bottom_value, bottom_exponent) = base_and_exponent(bottom)?;
    if top_base != bottom_base {
        return None;
    }

    let combined = |base: &Node, larger: Node, smaller: Node| {
        Node::pow(base.clone(), Node::sub(larger, smaller))
    };

    let (top, bottom) = if top_value > bottom_value {
        (Some(combined(top_base, top_exponent, bottom_exponent)), None)
    } else if top_value < bottom_value {
        (None, Some(combined(bottom_base, bottom_exponent, top_exponent)))
    } else {
        (None, None)
    };

    Some(Reduction { top, bottom, negate: false })
}

/// Cancels one pair of common factors between the numerator and denominator of a fraction, or
/// of a product that contains a fraction.
///
/// `(4x^2) / (5x^2) = 4 / 5`
/// `2 / (4x) = 1 / (2x)`
/// `x^3 y / x^2 = x^(3 - 2) y`
pub fn cancel_terms(node: &Node, _: &ExpressionCtx) -> Option<Status> {
    let mut factors = Factors::decompose(node)?;
    if !factors.reduce_first_pair() {
        return None;
    }

    let result = factors.rebuild();
    (result != *node).then(|| Status::new(ChangeType::CancelTerms, result))
}

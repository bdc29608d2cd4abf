//! The expression tree operated on by the simplifier.

pub mod iter;

use crate::{node_type, number::Number, print};
use iter::PostOrderIter;
use std::fmt;

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    /// Returns the symbol used to write the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
        }
    }

    /// Returns true if the operator is n-ary after normalization, i.e. nested applications of
    /// it are merged into one node.
    pub fn is_associative(self) -> bool {
        matches!(self, Op::Add | Op::Mul)
    }
}

/// A node in an expression tree.
///
/// Rules never mutate a node they are given. They build a new subtree and return it, and the
/// control loop splices it into the working tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An exact numeric value.
    Constant(Number),

    /// A named variable, such as `x`.
    Symbol(String),

    /// An operator applied to its arguments. `Add` and `Mul` take any number of arguments, the
    /// other operators take exactly two.
    Operator {
        op: Op,
        args: Vec<Node>,

        /// Whether a product is written by juxtaposition (`2x`). This only affects rendering
        /// and is ignored when comparing nodes.
        implicit: bool,
    },

    /// Negation of the inner node. This is distinct from subtraction.
    UnaryMinus(Box<Node>),

    /// Explicit grouping from the source text. Removed by normalization.
    Parenthesis(Box<Node>),

    /// A function call, such as `nthRoot(x, 3)`.
    Function {
        name: String,

        /// The name to print instead of `name`, if any.
        presentation_name: Option<String>,
        args: Vec<Node>,
    },
}

impl Node {
    /// Creates an integer constant.
    pub fn int(n: i64) -> Self {
        Node::Constant(Number::from(n))
    }

    /// Creates a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    /// Creates an operator node written explicitly.
    pub fn op(op: Op, args: Vec<Node>) -> Self {
        Node::Operator { op, args, implicit: false }
    }

    pub fn add(args: Vec<Node>) -> Self {
        Self::op(Op::Add, args)
    }

    pub fn sub(lhs: Node, rhs: Node) -> Self {
        Self::op(Op::Sub, vec![lhs, rhs])
    }

    pub fn mul(args: Vec<Node>) -> Self {
        Self::op(Op::Mul, args)
    }

    /// Creates a product written by juxtaposition, such as `2x`.
    pub fn implicit_mul(args: Vec<Node>) -> Self {
        Node::Operator { op: Op::Mul, args, implicit: true }
    }

    pub fn div(numerator: Node, denominator: Node) -> Self {
        Self::op(Op::Div, vec![numerator, denominator])
    }

    pub fn pow(base: Node, exponent: Node) -> Self {
        Self::op(Op::Pow, vec![base, exponent])
    }

    pub fn neg(node: Node) -> Self {
        Node::UnaryMinus(Box::new(node))
    }

    pub fn paren(node: Node) -> Self {
        Node::Parenthesis(Box::new(node))
    }

    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Function { name: name.into(), presentation_name: None, args }
    }

    /// Builds the product of the given factors.
    ///
    /// No factors gives `1`, one factor gives that factor, and nested products are merged into
    /// the result. A coefficient times a symbol power is marked as implicit.
    pub fn product(factors: Vec<Node>) -> Self {
        let mut merged = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Node::Operator { op: Op::Mul, args, .. } => merged.extend(args),
                factor => merged.push(factor),
            }
        }

        match merged.len() {
            0 => Node::int(1),
            1 => merged.remove(0),
            _ => {
                let implicit = is_coefficient_product(&merged);
                Node::Operator { op: Op::Mul, args: merged, implicit }
            },
        }
    }

    /// Returns the operator of this node, if it is an operator node.
    pub fn operator(&self) -> Option<Op> {
        match self {
            Node::Operator { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Returns the value of this node if it is a constant.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Node::Constant(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value of this node if it is a constant, or the negated value if it is a unary
    /// minus applied to a constant.
    pub fn signed_number(&self) -> Option<Number> {
        match self {
            Node::Constant(n) => Some(n.clone()),
            Node::UnaryMinus(inner) => inner.signed_number().map(|n| -n),
            _ => None,
        }
    }

    /// Returns the children of this node, in order.
    pub fn args(&self) -> &[Node] {
        match self {
            Node::Operator { args, .. } | Node::Function { args, .. } => args,
            Node::UnaryMinus(inner) | Node::Parenthesis(inner) => std::slice::from_ref(&**inner),
            Node::Constant(_) | Node::Symbol(_) => &[],
        }
    }

    /// Returns the children of this node, in order, mutably.
    pub fn args_mut(&mut self) -> &mut [Node] {
        match self {
            Node::Operator { args, .. } | Node::Function { args, .. } => args,
            Node::UnaryMinus(inner) | Node::Parenthesis(inner) => std::slice::from_mut(&mut **inner),
            Node::Constant(_) | Node::Symbol(_) => &mut [],
        }
    }

    /// Returns the node at the given path of child indices, if it exists.
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &idx| node.args().get(idx))
    }

    /// Returns the node at the given path of child indices mutably, if it exists.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &idx in path {
            node = node.args_mut().get_mut(idx)?;
        }
        Some(node)
    }

    /// Moves the node out, leaving a zero constant in its place.
    pub fn take(&mut self) -> Node {
        std::mem::replace(self, Node::Constant(Number::zero()))
    }

    /// If this is an `Add` or `Mul` with fewer than two arguments, replaces it with its identity
    /// element or its only argument.
    pub fn downgrade(self) -> Self {
        match self {
            Node::Operator { op: op @ (Op::Add | Op::Mul), mut args, implicit } => match args.len() {
                0 => Node::int(if op == Op::Add { 0 } else { 1 }),
                1 => args.remove(0),
                _ => Node::Operator { op, args, implicit },
            },
            node => node,
        }
    }

    /// Returns an iterator that traverses the tree in left-to-right post-order, yielding each
    /// node along with its path from `self`.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }
}

/// Returns true if the factors are a constant coefficient followed by a symbol or a power of a
/// symbol, such as `2 * x` or `2/3 * x^2`.
pub(crate) fn is_coefficient_product(factors: &[Node]) -> bool {
    match factors {
        [coefficient, term] => {
            node_type::is_constant_or_constant_fraction(coefficient, true)
                && node_type::is_symbol_power(term)
        },
        _ => false,
    }
}

/// Deep structural equality. The order of arguments matters, and the `implicit` flag of
/// products does not.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Constant(a), Node::Constant(b)) => a == b,
            (Node::Symbol(a), Node::Symbol(b)) => a == b,
            (
                Node::Operator { op: op_a, args: args_a, .. },
                Node::Operator { op: op_b, args: args_b, .. },
            ) => op_a == op_b && args_a == args_b,
            (Node::UnaryMinus(a), Node::UnaryMinus(b)) => a == b,
            (Node::Parenthesis(a), Node::Parenthesis(b)) => a == b,
            (
                Node::Function { name: name_a, args: args_a, .. },
                Node::Function { name: name_b, args: args_b, .. },
            ) => name_a == name_b && args_a == args_b,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl From<Number> for Node {
    fn from(n: Number) -> Self {
        Node::Constant(n)
    }
}

/// Formats the node in the linear (ascii) dialect.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", print::ascii(self))
    }
}

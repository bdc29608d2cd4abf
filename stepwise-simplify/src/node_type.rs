//! Predicates that classify nodes.
//!
//! Several predicates take an `allow_unary_minus` flag. When set, a single unary minus wrapping
//! the node is looked through, so `-3` counts as a constant and `-x` as a symbol.

use crate::node::{Node, Op};
use crate::number::Number;
use std::{collections::HashMap, marker::PhantomData};

/// Returns true if the node is an operator node, optionally with the given operator. A unary
/// minus is never an operator.
pub fn is_operator(node: &Node, op: Option<Op>) -> bool {
    match node {
        Node::Operator { op: node_op, .. } => op.map_or(true, |op| op == *node_op),
        _ => false,
    }
}

pub fn is_unary_minus(node: &Node) -> bool {
    matches!(node, Node::UnaryMinus(_))
}

pub fn is_parenthesis(node: &Node) -> bool {
    matches!(node, Node::Parenthesis(_))
}

/// Returns true if the node is a function call, optionally with the given name.
pub fn is_function(node: &Node, name: Option<&str>) -> bool {
    match node {
        Node::Function { name: node_name, .. } => name.map_or(true, |name| name == node_name),
        _ => false,
    }
}

/// Returns true if the node is a root, written `nthRoot(x, n)` or `sqrt(x)`.
pub fn is_nth_root(node: &Node) -> bool {
    is_function(node, Some("nthRoot")) || is_function(node, Some("sqrt"))
}

/// Strips one unary minus from the node if `allow_unary_minus` is set and there is one.
fn strip(node: &Node, allow_unary_minus: bool) -> &Node {
    match node {
        Node::UnaryMinus(inner) if allow_unary_minus => &**inner,
        node => node,
    }
}

pub fn is_symbol(node: &Node, allow_unary_minus: bool) -> bool {
    matches!(strip(node, allow_unary_minus), Node::Symbol(_))
}

/// Returns true if the node is the symbol with the given name.
pub fn is_named_symbol(node: &Node, name: &str) -> bool {
    matches!(node, Node::Symbol(s) if s == name)
}

pub fn is_constant(node: &Node, allow_unary_minus: bool) -> bool {
    matches!(strip(node, allow_unary_minus), Node::Constant(_))
}

/// Returns true if the node is a constant with an integer value, optionally equal to `value`.
pub fn is_integer_constant(node: &Node, value: Option<&Number>) -> bool {
    match node {
        Node::Constant(n) => n.is_integer() && value.map_or(true, |value| value == n),
        _ => false,
    }
}

pub fn is_zero(node: &Node) -> bool {
    node.as_number().map_or(false, Number::is_zero)
}

pub fn is_one(node: &Node) -> bool {
    node.as_number().map_or(false, Number::is_one)
}

/// Returns true if the node is a constant with a negative value, or a unary minus applied to a
/// constant with a positive value.
pub fn is_negative_constant(node: &Node) -> bool {
    node.signed_number().map_or(false, |n| n.is_negative())
}

/// Returns true if the node is a constant with a positive value.
pub fn is_positive_constant(node: &Node) -> bool {
    node.as_number().map_or(false, |n| !n.is_negative() && !n.is_zero())
}

/// Returns true if the node is a division of two constants, such as `2/3`.
///
/// With `allow_unary_minus`, a unary minus is allowed around the whole fraction and around
/// either side, so `-2/3`, `2/-3` and `-(2/3)` all count.
pub fn is_constant_fraction(node: &Node, allow_unary_minus: bool) -> bool {
    match strip(node, allow_unary_minus) {
        Node::Operator { op: Op::Div, args, .. } => {
            args.iter().all(|arg| is_constant(arg, allow_unary_minus))
        },
        _ => false,
    }
}

pub fn is_constant_or_constant_fraction(node: &Node, allow_unary_minus: bool) -> bool {
    is_constant(node, allow_unary_minus) || is_constant_fraction(node, allow_unary_minus)
}

/// Returns true if the node is a division of two integer constants, such as `4/5`.
pub fn is_integer_fraction(node: &Node, allow_unary_minus: bool) -> bool {
    match strip(node, allow_unary_minus) {
        Node::Operator { op: Op::Div, args, .. } => args.iter().all(|arg| {
            is_integer_constant(strip(arg, allow_unary_minus), None)
        }),
        _ => false,
    }
}

pub fn is_constant_or_symbol(node: &Node) -> bool {
    is_constant(node, false) || is_symbol(node, false)
}

/// Returns true if the node is a symbol, or a symbol raised to a constant power, such as `x^2`.
pub fn is_symbol_power(node: &Node) -> bool {
    match node {
        Node::Symbol(_) => true,
        Node::Operator { op: Op::Pow, args, .. } => matches!(
            args.as_slice(),
            [base, exponent] if is_symbol(base, false) && is_constant(exponent, true)
        ),
        _ => false,
    }
}

/// Returns true if the node contains a symbol anywhere, optionally restricted to the symbol with
/// the given name.
pub fn contains_symbol(node: &Node, name: Option<&str>) -> bool {
    match node {
        Node::Symbol(s) => name.map_or(true, |name| name == s),
        node => node.args().iter().any(|arg| contains_symbol(arg, name)),
    }
}

/// Returns true if every node in the tree is well-formed: binary operators have exactly two
/// arguments, `Add` and `Mul` have at least one, and symbol and function names are not empty.
pub fn is_supported(node: &Node) -> bool {
    let well_formed = match node {
        Node::Operator { op, args, .. } => match op {
            Op::Sub | Op::Div | Op::Pow => args.len() == 2,
            Op::Add | Op::Mul => !args.is_empty(),
        },
        Node::Symbol(name) | Node::Function { name, .. } => !name.is_empty(),
        Node::Constant(_) | Node::UnaryMinus(_) | Node::Parenthesis(_) => true,
    };
    well_formed && node.args().iter().all(is_supported)
}

/// Memoizes [`contains_symbol`] for the nodes of one tree.
///
/// Entries are keyed by node identity. The cache borrows the tree it answers for, so the tree
/// cannot be changed or dropped while the cache is alive, and every new tree gets a fresh cache.
#[derive(Debug)]
pub struct SymbolCache<'a> {
    entries: HashMap<(*const Node, Option<String>), bool>,
    tree: PhantomData<&'a Node>,
}

impl<'a> SymbolCache<'a> {
    /// Creates an empty cache for the given tree.
    pub fn new(_root: &'a Node) -> Self {
        Self {
            entries: HashMap::new(),
            tree: PhantomData,
        }
    }

    /// Returns true if `node` contains a symbol, optionally restricted to the given name.
    /// `node` must belong to the tree the cache was created for.
    pub fn contains_symbol(&mut self, node: &'a Node, name: Option<&str>) -> bool {
        let key = (node as *const Node, name.map(str::to_owned));
        if let Some(&cached) = self.entries.get(&key) {
            return cached;
        }

        let result = match node {
            Node::Symbol(s) => name.map_or(true, |name| name == s),
            node => node.args().iter().any(|arg| self.contains_symbol(arg, name)),
        };
        self.entries.insert(key, result);
        result
    }
}

/// A view of a node as a single polynomial term: an optional coefficient times a symbol raised
/// to an optional constant power, such as `x`, `x^2`, `3x` or `2/3 x^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialTerm<'a> {
    /// The constant or constant fraction multiplying the symbol, if any.
    pub coefficient: Option<&'a Node>,

    /// The symbol.
    pub symbol: &'a Node,

    /// The constant exponent of the symbol, if any.
    pub exponent: Option<&'a Node>,
}

impl<'a> PolynomialTerm<'a> {
    /// Views the node as a polynomial term, if it has that shape.
    pub fn new(node: &'a Node) -> Option<Self> {
        match node {
            Node::Symbol(_) => Some(Self { coefficient: None, symbol: node, exponent: None }),
            Node::Operator { op: Op::Pow, args, .. } if is_symbol_power(node) => Some(Self {
                coefficient: None,
                symbol: &args[0],
                exponent: Some(&args[1]),
            }),
            Node::Operator { op: Op::Mul, args, .. } if args.len() == 2 => {
                if !is_constant_or_constant_fraction(&args[0], true) {
                    return None;
                }
                let term = Self::new(&args[1]).filter(|term| term.coefficient.is_none())?;
                Some(Self { coefficient: Some(&args[0]), ..term })
            },
            _ => None,
        }
    }

    /// Returns true if the coefficient is a constant fraction, such as the `2/3` in `2/3 x^2`.
    pub fn has_fraction_coefficient(&self) -> bool {
        self.coefficient.map_or(false, |c| is_constant_fraction(c, true))
    }

    /// Returns the term without its coefficient, such as `x^2` for `3x^2`.
    pub fn without_coefficient(&self) -> Node {
        match self.exponent {
            Some(exponent) => Node::pow(self.symbol.clone(), exponent.clone()),
            None => self.symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Node {
        Node::symbol("x")
    }

    #[test]
    fn operator_predicates() {
        let sum = Node::add(vec![x(), Node::int(1)]);
        assert!(is_operator(&sum, None));
        assert!(is_operator(&sum, Some(Op::Add)));
        assert!(!is_operator(&sum, Some(Op::Mul)));
        assert!(!is_operator(&Node::neg(x()), None));
        assert!(is_unary_minus(&Node::neg(x())));
    }

    #[test]
    fn unary_minus_is_opt_in() {
        let neg_three = Node::neg(Node::int(3));
        assert!(is_constant(&neg_three, true));
        assert!(!is_constant(&neg_three, false));
        assert!(is_symbol(&Node::neg(x()), true));
        assert!(!is_symbol(&Node::neg(x()), false));
        assert!(is_negative_constant(&neg_three));
        assert!(is_negative_constant(&Node::int(-3)));
        assert!(!is_positive_constant(&Node::int(0)));
    }

    #[test]
    fn fractions() {
        let half = Node::div(Node::int(1), Node::int(2));
        assert!(is_constant_fraction(&half, false));
        assert!(is_integer_fraction(&half, false));

        let negated = Node::div(Node::neg(Node::int(1)), Node::int(2));
        assert!(!is_integer_fraction(&negated, false));
        assert!(is_integer_fraction(&negated, true));
        assert!(is_constant_fraction(&Node::neg(half), true));

        let decimal = Node::div(Node::Constant(Number::from_decimal_str("0.5").unwrap()), Node::int(2));
        assert!(is_constant_fraction(&decimal, false));
        assert!(!is_integer_fraction(&decimal, false));

        assert!(!is_constant_fraction(&Node::div(x(), Node::int(2)), true));
    }

    #[test]
    fn functions() {
        let root = Node::function("nthRoot", vec![x(), Node::int(3)]);
        assert!(is_function(&root, None));
        assert!(is_function(&root, Some("nthRoot")));
        assert!(is_nth_root(&root));
        assert!(!is_function(&root, Some("abs")));
    }

    #[test]
    fn symbol_containment() {
        let tree = Node::add(vec![
            Node::int(2),
            Node::mul(vec![Node::int(3), Node::pow(Node::symbol("y"), Node::int(2))]),
        ]);
        assert!(contains_symbol(&tree, None));
        assert!(contains_symbol(&tree, Some("y")));
        assert!(!contains_symbol(&tree, Some("x")));

        let mut cache = SymbolCache::new(&tree);
        assert!(cache.contains_symbol(&tree, Some("y")));
        assert!(!cache.contains_symbol(&tree.args()[0], None));
        assert!(cache.contains_symbol(&tree.args()[1], None));
        // cached answers agree with the uncached ones
        assert!(cache.contains_symbol(&tree, Some("y")));
        assert!(!cache.contains_symbol(&tree, Some("x")));
    }

    #[test]
    fn unsupported_nodes() {
        assert!(is_supported(&Node::pow(x(), Node::int(2))));
        assert!(!is_supported(&Node::op(Op::Pow, vec![x()])));
        assert!(!is_supported(&Node::add(vec![Node::int(1), Node::symbol("")])));
        assert!(!is_supported(&Node::function("", vec![])));
    }

    #[test]
    fn polynomial_terms() {
        let coefficient = Node::div(Node::int(2), Node::int(3));
        let term = Node::implicit_mul(vec![coefficient.clone(), Node::pow(x(), Node::int(2))]);
        let view = PolynomialTerm::new(&term).unwrap();
        assert_eq!(view.coefficient, Some(&coefficient));
        assert_eq!(view.exponent, Some(&Node::int(2)));
        assert!(view.has_fraction_coefficient());
        assert_eq!(view.without_coefficient(), Node::pow(x(), Node::int(2)));

        assert_eq!(PolynomialTerm::new(&x()).map(|t| t.coefficient), Some(None));
        assert!(PolynomialTerm::new(&Node::mul(vec![x(), Node::int(2)])).is_none());
        assert!(PolynomialTerm::new(&Node::pow(x(), Node::symbol("n"))).is_none());
    }
}

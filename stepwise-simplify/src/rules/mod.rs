//! The rewrite rules applied by the simplifier.
//!
//! Each rule looks at a single node and returns `Some(status)` with a replacement for that node
//! if the rule applies, or `None` if it does not. Rules never mutate the node they are given; the
//! control loop takes care of splicing the replacement into the tree.

pub mod arithmetic;
pub mod common;
pub mod fraction;
pub mod reduce;

use crate::node::{Node, Op};
use crate::step::Status;
use std::sync::Arc;

/// Settings that affect how rules rewrite expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionCtx {
    /// Whether integer divisions that do not divide evenly may be evaluated to a decimal, such
    /// as `1/4 = 0.25`. Otherwise they are left as fractions.
    pub decimal_output: bool,
}

/// A single rewrite rule.
///
/// Any function or closure with the signature `Fn(&Node, &ExpressionCtx) -> Option<Status>` is a
/// rule.
pub trait Rule: Send + Sync {
    /// The name of the rule, used in log messages and errors.
    fn name(&self) -> &str;

    /// Applies the rule to the given node.
    ///
    /// Returns a status whose node replaces `node` if the rule applies. The node of the status
    /// must differ from `node`, and if the status has substeps, the node of the last substep
    /// must match the node of the status.
    fn apply(&self, node: &Node, ctxt: &ExpressionCtx) -> Option<Status>;
}

impl<F> Rule for F
where
    F: Fn(&Node, &ExpressionCtx) -> Option<Status> + Send + Sync,
{
    fn name(&self) -> &str {
        let path = std::any::type_name::<F>();
        path.rsplit("::").next().unwrap_or(path)
    }

    fn apply(&self, node: &Node, ctxt: &ExpressionCtx) -> Option<Status> {
        self(node, ctxt)
    }
}

/// An ordered list of rules. Earlier rules take priority over later ones.
pub type RulePool = Vec<Arc<dyn Rule>>;

/// Returns the rules used by default, in priority order: arithmetic evaluation, identity
/// removal, adding a constant to a fraction, then cancellation of common factors.
pub fn default_rules() -> RulePool {
    fn rule(rule: impl Rule + 'static) -> Arc<dyn Rule> {
        Arc::new(rule)
    }

    vec![
        rule(arithmetic::evaluate_arithmetic),
        rule(common::remove_exponent_by_one),
        rule(common::reduce_exponent_by_zero),
        rule(common::multiply_by_zero),
        rule(common::remove_multiplying_by_one),
        rule(common::remove_adding_zero),
        rule(common::remove_division_by_one),
        rule(common::resolve_double_minus),
        rule(fraction::add_constant_and_fraction),
        rule(reduce::cancel_terms),
    ]
}

/// If the node is an operator node with the given operator, calls the given function with its
/// arguments.
///
/// Returns the result of the function, or `None` if the node does not match.
pub(crate) fn do_operator<'a, T>(
    node: &'a Node,
    op: Op,
    f: impl FnOnce(&'a [Node]) -> Option<T>,
) -> Option<T> {
    match node {
        Node::Operator { op: node_op, args, .. } if *node_op == op => f(args),
        _ => None,
    }
}

/// If the node is a binary operator node with the given operator, calls the given function with
/// its two arguments.
pub(crate) fn do_binary<'a, T>(
    node: &'a Node,
    op: Op,
    f: impl FnOnce(&'a Node, &'a Node) -> Option<T>,
) -> Option<T> {
    do_operator(node, op, |args| match args {
        [lhs, rhs] => f(lhs, rhs),
        _ => None,
    })
}

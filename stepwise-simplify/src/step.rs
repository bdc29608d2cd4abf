//! Records of the changes made while simplifying.

use crate::node::Node;
use std::fmt;

/// The kind of change a rule made. Labels are informational only and never affect control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// The input expression, before any change.
    OriginalExpression,

    /// An operator applied to constants was evaluated: `2 + 3 = 5`.
    SimplifyArithmetic,

    /// Common factors of a numerator and denominator were cancelled: `2x / 4 = x / 2`.
    CancelTerms,

    /// `a^1 = a`
    RemoveExponentByOne,

    /// `a^0 = 1`
    ReduceExponentByZero,

    /// `1 * a = a`
    RemoveMultiplyingByOne,

    /// `0 * a = 0`
    MultiplyByZero,

    /// `a + 0 = a`
    RemoveAddingZero,

    /// `a / 1 = a`
    RemoveDivisionByOne,

    /// `--a = a`
    ResolveDoubleMinus,

    /// A constant and a fraction were added.
    AddConstantAndFraction,

    /// An integer was written as a fraction with a given denominator: `2 = 6/3`.
    ConvertIntegerToFraction,

    /// A fraction was divided out so it can be added to a decimal: `1/4 = 0.25`.
    DivideFractionForAddition,

    /// Fractions with equal denominators were combined: `a/c + b/c = (a + b)/c`.
    AddNumerators,

    /// The arguments of sums and products were put in canonical order.
    RearrangeCoefficient,
}

impl ChangeType {
    /// Returns a short human-readable description of the change.
    pub fn description(self) -> &'static str {
        match self {
            Self::OriginalExpression => "original expression",
            Self::SimplifyArithmetic => "evaluate arithmetic",
            Self::CancelTerms => "cancel common factors",
            Self::RemoveExponentByOne => "remove exponent of one",
            Self::ReduceExponentByZero => "anything to the power of zero is one",
            Self::RemoveMultiplyingByOne => "remove multiplication by one",
            Self::MultiplyByZero => "anything times zero is zero",
            Self::RemoveAddingZero => "remove addition of zero",
            Self::RemoveDivisionByOne => "remove division by one",
            Self::ResolveDoubleMinus => "two negatives make a positive",
            Self::AddConstantAndFraction => "add a constant and a fraction",
            Self::ConvertIntegerToFraction => "write the integer as a fraction",
            Self::DivideFractionForAddition => "divide the fraction",
            Self::AddNumerators => "add the numerators",
            Self::RearrangeCoefficient => "rearrange terms",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// The change a rule made to the node it was applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// What kind of change was made.
    pub change_type: ChangeType,

    /// The replacement for the node the rule was applied to.
    pub node: Node,

    /// Finer-grained changes leading to `node`, in order. The node of the last substep must
    /// match `node` after normalization.
    pub substeps: Vec<Status>,
}

impl Status {
    /// Creates a status without substeps.
    pub fn new(change_type: ChangeType, node: Node) -> Self {
        Self { change_type, node, substeps: Vec::new() }
    }

    /// Creates a status whose result is the node of its last substep. Returns [`None`] if there
    /// are no substeps.
    pub fn from_substeps(change_type: ChangeType, substeps: Vec<Status>) -> Option<Self> {
        let node = substeps.last()?.node.clone();
        Some(Self { change_type, node, substeps })
    }
}

/// One entry in the trace of a simplification.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// What kind of change was made.
    pub change_type: ChangeType,

    /// A snapshot of the whole tree after the change.
    pub root: Node,

    /// Finer-grained steps leading to `root`, each with its own whole-tree snapshot.
    pub substeps: Vec<Step>,
}

impl Step {
    pub fn new(change_type: ChangeType, root: Node) -> Self {
        Self { change_type, root, substeps: Vec::new() }
    }
}

/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`, which discards every step, and
/// for [`Callback`], which hands each step to a closure as soon as it is produced.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// Adapts a closure into a [`StepCollector`].
pub struct Callback<F>(pub F);

impl<S, F: FnMut(S)> StepCollector<S> for Callback<F> {
    #[inline]
    fn push(&mut self, step: S) {
        (self.0)(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collectors() {
        let mut steps = Vec::new();
        StepCollector::push(&mut steps, 1);
        StepCollector::push(&mut steps, 2);
        assert_eq!(steps, vec![1, 2]);

        let mut seen = 0;
        let mut callback = Callback(|n: i32| seen += n);
        callback.push(3);
        callback.push(4);
        drop(callback);
        assert_eq!(seen, 7);

        ().push("ignored");
    }

    #[test]
    fn status_from_substeps() {
        assert_eq!(Status::from_substeps(ChangeType::AddNumerators, vec![]), None);

        let last = Status::new(ChangeType::SimplifyArithmetic, Node::int(5));
        let status = Status::from_substeps(ChangeType::AddConstantAndFraction, vec![last]).unwrap();
        assert_eq!(status.node, Node::int(5));
        assert_eq!(status.substeps.len(), 1);
    }
}

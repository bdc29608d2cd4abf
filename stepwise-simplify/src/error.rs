//! Error kinds reported by the simplifier.

use ariadne::Fmt;
use stepwise_attrs::ErrorKind;
use stepwise_error::EXPR;

/// A numeric literal could not be read as an exact number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", literal),
    labels = ["this number"],
    help = "numbers are written with digits and at most one decimal point, such as `3.14`",
)]
pub struct InvalidNumber {
    /// The literal as written in the source.
    pub literal: String,
}

/// A rule reported a change that breaks the rule contract.
///
/// This is an internal error. It means a rule in the rule pool is broken, not that the input is
/// wrong.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("rule `{}` reported an invalid change", rule),
    labels = [format!("while simplifying this {}", "expression".fg(EXPR))],
    help = reason,
)]
pub struct ContractViolation {
    /// The name of the rule.
    pub rule: String,

    /// What was wrong with the change.
    pub reason: &'static str,
}

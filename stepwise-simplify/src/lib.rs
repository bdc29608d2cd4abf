//! Step-by-step simplification of algebraic expressions.
//!
//! An expression is parsed into a [`Node`] tree, then simplified by repeatedly applying small
//! rewrite rules, such as evaluating `2 + 3` or cancelling `x^2 / x^2`. Every change is recorded as
//! a [`Step`] holding a snapshot of the whole tree, so the simplification can be shown one step at
//! a time.
//!
//! ```
//! use stepwise_simplify::{parse_text, simplify_with_steps, ChangeType, SimplifyOptions};
//!
//! let node = parse_text("(x^3 * y) / x^2").unwrap();
//! let (simplified, steps) = simplify_with_steps(node, &SimplifyOptions::default()).unwrap();
//!
//! assert_eq!(simplified.to_string(), "x * y");
//! assert_eq!(steps[0].change_type, ChangeType::OriginalExpression);
//! assert_eq!(steps[1].change_type, ChangeType::CancelTerms);
//! assert_eq!(steps[1].root.to_string(), "x^(3 - 2) * y");
//! ```
//!
//! Trees can be rendered in a linear ascii form, which is also what [`Node`]'s `Display`
//! implementation produces, or as LaTeX:
//!
//! ```
//! use stepwise_simplify::{parse_text, render, Dialect};
//!
//! let node = parse_text("2/3x^2").unwrap();
//! assert_eq!(render(&node, Dialect::Ascii, false), "2/3x^2");
//! assert_eq!(render(&node, Dialect::Latex, false), "\\frac{2}{3}~x^{2}");
//! ```

pub mod error;
pub mod node;
pub mod node_type;
pub mod normalize;
pub mod number;
pub mod parse;
pub mod print;
pub mod rules;
pub mod search;
pub mod simplify;
pub mod step;

pub use node::{Node, Op};
pub use number::Number;
pub use parse::{parse_text, DefaultParser, TextParser};
pub use print::{render, Dialect, PrintOptions, PrintOptionsBuilder};
pub use rules::{ExpressionCtx, Rule, RulePool};
pub use simplify::{simplify, simplify_with_steps, step_through, SimplifyOptions, SimplifyOptionsBuilder};
pub use step::{Callback, ChangeType, Status, Step, StepCollector};

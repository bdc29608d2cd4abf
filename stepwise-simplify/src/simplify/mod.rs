//! The control loop that applies rules to a tree until none applies.
//!
//! Each iteration runs the rules of the pool, in priority order, over the subtree at the
//! [`Cursor`] using a post-order search. The first change found is spliced into the tree, the
//! tree is normalized, a [`Step`] is emitted, and the cursor moves to the changed node so the next
//! search stays local.
//!
//! When no rule applies from the cursor, the search restarts from the root. When no rule applies
//! from the root either, the tree is rendered as text and parsed again (a _shuffle_), which can
//! regroup it so that more rules apply. A shuffle happens at most once per dead end, and never
//! twice in a row on the same text.
//!
//! The loop stops when nothing applies after a shuffle, or after [`SimplifyOptions::max_steps`]
//! changes. Finally, the arguments of sums and products are put in canonical order, which emits
//! one more step if it changes the text of the tree.

mod context;

pub use context::Cursor;

use crate::{
    node::Node,
    node_type::is_supported,
    normalize::normalize,
    parse::{DefaultParser, TextParser},
    print,
    rules::{default_rules, ExpressionCtx, RulePool},
    step::{ChangeType, Step, StepCollector},
};
use context::RewriteContext;
use log::{debug, trace};
use std::{fmt, sync::Arc};
use stepwise_error::Error;

/// The default limit on the number of changes in one simplification.
pub const DEFAULT_MAX_STEPS: usize = 64;

/// Options for a simplification.
#[derive(Clone)]
pub struct SimplifyOptions {
    /// Settings passed to every rule.
    pub expression_ctx: ExpressionCtx,

    /// Whether to log each accepted change at the `debug` level.
    pub debug: bool,

    /// The maximum number of changes to make. Reaching it stops the simplification early with the
    /// tree as it is at that point.
    pub max_steps: usize,

    /// The rules to apply, in priority order.
    pub rules: RulePool,

    /// The parser used to reparse the tree when no rule applies.
    pub parser: Arc<dyn TextParser>,
}

impl SimplifyOptions {
    /// Wraps the given [`SimplifyOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SimplifyOptionsBuilder {
        SimplifyOptionsBuilder(self)
    }
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            expression_ctx: ExpressionCtx::default(),
            debug: false,
            max_steps: DEFAULT_MAX_STEPS,
            rules: default_rules(),
            parser: Arc::new(DefaultParser),
        }
    }
}

impl fmt::Debug for SimplifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SimplifyOptions")
            .field("expression_ctx", &self.expression_ctx)
            .field("debug", &self.debug)
            .field("max_steps", &self.max_steps)
            .field("rules", &self.rules.iter().map(|rule| rule.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Helper struct to build a [`SimplifyOptions`] struct.
#[derive(Debug, Default, Clone)]
pub struct SimplifyOptionsBuilder(SimplifyOptions);

impl SimplifyOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the settings passed to every rule.
    pub fn expression_ctx(mut self, expression_ctx: ExpressionCtx) -> Self {
        self.0.expression_ctx = expression_ctx;
        self
    }

    /// Sets whether divisions may be evaluated to decimals. See
    /// [`ExpressionCtx::decimal_output`].
    pub fn decimal_output(mut self, decimal_output: bool) -> Self {
        self.0.expression_ctx.decimal_output = decimal_output;
        self
    }

    /// Sets whether to log each accepted change.
    pub fn debug(mut self, debug: bool) -> Self {
        self.0.debug = debug;
        self
    }

    /// Sets the maximum number of changes to make.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.0.max_steps = max_steps;
        self
    }

    /// Sets the rules to apply, in priority order.
    pub fn rules(mut self, rules: RulePool) -> Self {
        self.0.rules = rules;
        self
    }

    /// Sets the parser used to reparse the tree when no rule applies.
    pub fn parser(mut self, parser: Arc<dyn TextParser>) -> Self {
        self.0.parser = parser;
        self
    }

    /// Builds the [`SimplifyOptions`] struct.
    pub fn build(self) -> SimplifyOptions {
        self.0
    }
}

/// Simplifies the tree, pushing each step to `steps` as it is made, and returns the simplified
/// tree.
///
/// The first step is always [`ChangeType::OriginalExpression`] with the normalized input. If the
/// input contains malformed nodes, that is the only step and the input is returned as is.
///
/// Returns an error if a rule breaks the rule contract. The spans of the error point into the
/// ascii rendering of the input, [`print::ascii`].
///
/// ```
/// use stepwise_simplify::{parse_text, simplify::{step_through, SimplifyOptions}};
///
/// let node = parse_text("(4*x^2)/(5*x^2)").unwrap();
/// let mut steps = Vec::new();
/// let simplified = step_through(node, &SimplifyOptions::default(), &mut steps).unwrap();
///
/// assert_eq!(simplified.to_string(), "4/5");
/// assert_eq!(steps.len(), 2);
/// ```
pub fn step_through<C>(node: Node, options: &SimplifyOptions, steps: &mut C) -> Result<Node, Error>
where
    C: StepCollector<Step>,
{
    let root = normalize(node);
    if options.debug {
        debug!("simplifying `{}`", print::ascii(&root));
    }

    steps.push(Step::new(ChangeType::OriginalExpression, root.clone()));
    if !is_supported(&root) {
        trace!("`{}` has unsupported nodes, leaving it as is", print::ascii(&root));
        return Ok(root);
    }

    let mut ctxt = RewriteContext::new(root, options, steps);
    ctxt.run()?;
    Ok(ctxt.finish())
}

/// Simplifies the tree and returns the result, discarding the steps.
pub fn simplify(node: Node, options: &SimplifyOptions) -> Result<Node, Error> {
    step_through(node, options, &mut ())
}

/// Simplifies the tree and returns the result along with every step.
pub fn simplify_with_steps(
    node: Node,
    options: &SimplifyOptions,
) -> Result<(Node, Vec<Step>), Error> {
    let mut steps = Vec::new();
    let simplified = step_through(node, options, &mut steps)?;
    Ok((simplified, steps))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::{
        node::Op,
        parse::parse_text,
        rules::{Rule, ExpressionCtx},
        step::{Callback, Status},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Simplifies the text with the default options, returning the ascii rendering of the result
    /// and the change type of each step.
    fn run(text: &str) -> (String, Vec<ChangeType>) {
        init_logger();
        let node = parse_text(text).unwrap();
        let options = SimplifyOptionsBuilder::new().debug(true).build();
        let (simplified, steps) = simplify_with_steps(node, &options).unwrap();

        assert_eq!(steps.last().map(|step| &step.root), Some(&simplified));
        (simplified.to_string(), steps.iter().map(|step| step.change_type).collect())
    }

    #[test]
    fn arithmetic_in_one_step() {
        let (result, changes) = run("2+2");
        assert_eq!(result, "4");
        assert_eq!(changes, vec![ChangeType::OriginalExpression, ChangeType::SimplifyArithmetic]);
    }

    #[test]
    fn cancel_equal_powers() {
        assert_eq!(run("x^2/x^2").0, "1");
        assert_eq!(run("-x/-x").0, "1");
    }

    #[test]
    fn cancel_inside_products() {
        let (result, changes) = run("(4*x^2)/(5*x^2)");
        assert_eq!(result, "4/5");
        assert_eq!(changes, vec![ChangeType::OriginalExpression, ChangeType::CancelTerms]);
    }

    #[test]
    fn cancel_common_divisors() {
        assert_eq!(run("2/(4x)").0, "1 / (2x)");
        assert_eq!(run("6/(2x)").0, "3 / x");
    }

    #[test]
    fn cancel_compound_base() {
        let (result, changes) = run("(2x+5)^8/(2x+5)^2");
        assert_eq!(result, "(2x + 5)^6");
        assert_eq!(changes, vec![
            ChangeType::OriginalExpression,
            ChangeType::CancelTerms,
            ChangeType::SimplifyArithmetic,
        ]);
    }

    #[test]
    fn exponent_difference_is_evaluated() {
        let (result, changes) = run("(x^3*y)/x^2");
        assert_eq!(result, "x * y");
        assert_eq!(changes, vec![
            ChangeType::OriginalExpression,
            ChangeType::CancelTerms,
            ChangeType::SimplifyArithmetic,
            ChangeType::RemoveExponentByOne,
        ]);

        assert_eq!(run("(4x^3)/(5x^2)").0, "4x / 5");
    }

    #[test]
    fn constant_plus_fraction() {
        init_logger();
        let node = parse_text("2 + 1/3").unwrap();
        let (simplified, steps) = simplify_with_steps(node, &SimplifyOptions::default()).unwrap();
        assert_eq!(simplified.to_string(), "7/3");

        let step = &steps[1];
        assert_eq!(step.change_type, ChangeType::AddConstantAndFraction);
        let substeps = step.substeps.iter().map(|s| s.root.to_string()).collect::<Vec<_>>();
        assert_eq!(substeps, vec!["6/3 + 1/3", "(6 + 1) / 3", "7/3"]);
    }

    #[test]
    fn decimal_output() {
        init_logger();
        let node = parse_text("1/4 + x").unwrap();
        let options = SimplifyOptionsBuilder::new().decimal_output(true).build();
        assert_eq!(simplify(node.clone(), &options).unwrap().to_string(), "x + 0.25");
        assert_eq!(simplify(node, &SimplifyOptions::default()).unwrap().to_string(), "x + 1/4");
    }

    #[test]
    fn rearranges_at_the_end() {
        let (result, changes) = run("x * 2");
        assert_eq!(result, "2x");
        assert_eq!(changes, vec![ChangeType::OriginalExpression, ChangeType::RearrangeCoefficient]);

        // already in order: no extra step
        let (_, changes) = run("x + y");
        assert_eq!(changes, vec![ChangeType::OriginalExpression]);
    }

    #[test]
    fn division_by_zero_is_left_alone() {
        let (result, changes) = run("2 + 1/0");
        assert_eq!(result, "2 + 1/0");
        assert_eq!(changes, vec![ChangeType::OriginalExpression]);
    }

    #[test]
    fn nested_powers_stay_symbolic() {
        init_logger();
        let node = parse_text("((2^1024)^1024)^1024").unwrap();
        let (simplified, steps) = simplify_with_steps(node, &SimplifyOptions::default()).unwrap();

        // only the innermost power is small enough to evaluate
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].change_type, ChangeType::SimplifyArithmetic);
        let Node::Operator { op: Op::Pow, args, .. } = &simplified else {
            panic!("expected a power, got {}", simplified);
        };
        assert!(matches!(&args[0], Node::Operator { op: Op::Pow, .. }));
        assert_eq!(args[1], Node::int(1024));
    }

    #[test]
    fn unsupported_input_is_returned_as_is() {
        let node = Node::op(Op::Pow, vec![Node::int(2)]);
        let (simplified, steps) = simplify_with_steps(node.clone(), &SimplifyOptions::default()).unwrap();
        assert_eq!(simplified, node);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].change_type, ChangeType::OriginalExpression);
    }

    #[test]
    fn steps_stream_through_callbacks() {
        let node = parse_text("(2 + 3) * x").unwrap();
        let mut seen = Vec::new();
        let result = step_through(node, &SimplifyOptions::default(), &mut Callback(|step: Step| {
            seen.push(step.root.to_string());
        })).unwrap();

        assert_eq!(result.to_string(), "5x");
        assert_eq!(seen, vec!["(2 + 3) * x", "5x"]);
    }

    /// Swaps `x` and `y` forever.
    fn swap_symbols(node: &Node, _: &ExpressionCtx) -> Option<Status> {
        let swapped = match node {
            Node::Symbol(name) if name == "x" => Node::symbol("y"),
            Node::Symbol(name) if name == "y" => Node::symbol("x"),
            _ => return None,
        };
        Some(Status::new(ChangeType::SimplifyArithmetic, swapped))
    }

    #[test]
    fn step_limit() {
        init_logger();
        let options = SimplifyOptionsBuilder::new()
            .rules(vec![Arc::new(swap_symbols) as Arc<dyn Rule>])
            .build();
        let (simplified, steps) = simplify_with_steps(Node::symbol("x"), &options).unwrap();
        assert_eq!(steps.len(), DEFAULT_MAX_STEPS + 1);
        assert_eq!(simplified, Node::symbol("x"));

        let options = options.into_builder().max_steps(3).build();
        let (simplified, steps) = simplify_with_steps(Node::symbol("x"), &options).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(simplified, Node::symbol("y"));
    }

    fn unchanged(node: &Node, _: &ExpressionCtx) -> Option<Status> {
        Some(Status::new(ChangeType::CancelTerms, node.clone()))
    }

    fn mismatched_substeps(node: &Node, _: &ExpressionCtx) -> Option<Status> {
        matches!(node, Node::Symbol(_)).then(|| Status {
            change_type: ChangeType::AddConstantAndFraction,
            node: Node::int(1),
            substeps: vec![Status::new(ChangeType::AddNumerators, Node::int(2))],
        })
    }

    #[test]
    fn contract_violations() {
        for rule in [unchanged as fn(&Node, &ExpressionCtx) -> Option<Status>, mismatched_substeps] {
            let options = SimplifyOptionsBuilder::new()
                .rules(vec![Arc::new(rule) as Arc<dyn Rule>])
                .build();
            let error = simplify(Node::symbol("x"), &options).unwrap_err();
            assert_eq!(error.spans, vec![0..1]);

            let mut report = Vec::new();
            error.write_report("input", "x", &mut report).unwrap();
            let report = String::from_utf8(strip_ansi_escapes::strip(report)).unwrap();
            assert!(report.contains("reported an invalid change"));
        }
    }

    /// Counts calls, and reads `x + y` as `2 + 2`.
    #[derive(Default)]
    struct CountingParser(AtomicUsize);

    impl TextParser for CountingParser {
        fn parse(&self, text: &str) -> Result<Node, Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            match text {
                "x + y" => Ok(Node::add(vec![Node::int(2), Node::int(2)])),
                text => parse_text(text),
            }
        }
    }

    #[test]
    fn shuffle_recovers_from_dead_end() {
        init_logger();
        let parser = Arc::new(CountingParser::default());
        let options = SimplifyOptionsBuilder::new()
            .parser(parser.clone())
            .build();

        let (simplified, steps) = simplify_with_steps(parse_text("x + y").unwrap(), &options).unwrap();
        assert_eq!(simplified, Node::int(4));
        assert_eq!(steps.len(), 2);

        // once for `x + y`, once for `4`, and never again for the same text
        assert_eq!(parser.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shuffle_once_per_dead_end() {
        let parser = Arc::new(CountingParser::default());
        let options = SimplifyOptionsBuilder::new()
            .parser(parser.clone())
            .rules(Vec::new())
            .build();

        simplify(parse_text("x + y").unwrap(), &options).unwrap();
        assert_eq!(parser.0.load(Ordering::SeqCst), 1);
    }
}

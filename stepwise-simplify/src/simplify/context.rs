use crate::{
    error::ContractViolation,
    node::Node,
    node_type::is_supported,
    normalize::{canonical_order, normalize},
    print,
    rules::Rule,
    search,
    step::{ChangeType, Status, Step, StepCollector},
};
use log::{debug, trace, warn};
use stepwise_error::Error;
use super::SimplifyOptions;

/// The position in the working tree that the next search starts from, as a path of child
/// indices from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(pub Vec<usize>);

impl Cursor {
    /// Places the cursor at the node that was replaced at `path`, after the tree has been
    /// normalized.
    ///
    /// Normalization can fold the replacement into its surroundings, in which case the cursor
    /// moves up to the nearest node that still exists. A sum or product merged into a parent of
    /// the same operator moves the cursor to that parent. Returns [`None`] if the cursor ends up
    /// at the root.
    pub fn after_change(root: &Node, mut path: Vec<usize>, replacement: &Node) -> Option<Self> {
        while !path.is_empty() && root.get(&path).is_none() {
            path.pop();
        }

        if let Some(op) = replacement.operator().filter(|op| op.is_associative()) {
            let merged = path.len()
                .checked_sub(1)
                .and_then(|parent| root.get(&path[..parent]))
                .and_then(Node::operator) == Some(op);
            if merged {
                path.pop();
            }
        }

        (!path.is_empty()).then_some(Self(path))
    }
}

/// The state of one run of the simplifier.
pub(crate) struct RewriteContext<'a, C> {
    /// The tree being simplified.
    root: Node,

    /// The normalized input, used to report errors.
    input: Node,

    /// The last tree emitted as a step.
    last: Node,

    /// Where the next search starts. [`None`] means the root.
    cursor: Option<Cursor>,

    /// The number of changes accepted so far.
    iterations: usize,

    /// Whether the tree has been reparsed since the last accepted change.
    shuffled: bool,

    /// The text that was reparsed by the last shuffle.
    shuffle_text: Option<String>,

    options: &'a SimplifyOptions,
    steps: &'a mut C,
}

impl<'a, C: StepCollector<Step>> RewriteContext<'a, C> {
    pub fn new(root: Node, options: &'a SimplifyOptions, steps: &'a mut C) -> Self {
        Self {
            input: root.clone(),
            last: root.clone(),
            root,
            cursor: None,
            iterations: 0,
            shuffled: false,
            shuffle_text: None,
            options,
            steps,
        }
    }

    /// Applies rules until none applies anywhere in the tree or the step limit is reached.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            if self.iterations >= self.options.max_steps {
                warn!(
                    "stopped after {} steps, a rule may be looping on `{}`",
                    self.iterations,
                    print::ascii(&self.input),
                );
                return Ok(());
            }

            if self.apply_first_rule()? {
                continue;
            }

            if let Some(cursor) = self.cursor.take() {
                trace!("dead end at {:?}, searching from the root", cursor.0);
                continue;
            }

            if !self.shuffled && self.shuffle() {
                continue;
            }

            return Ok(());
        }
    }

    /// Runs each rule in priority order over the subtree at the cursor, and accepts the first
    /// change found. Returns true if a change was accepted.
    fn apply_first_rule(&mut self) -> Result<bool, Error> {
        let options = self.options;
        let base = self.cursor.as_ref().map(|cursor| cursor.0.clone()).unwrap_or_default();
        let Some(subtree) = self.root.get(&base) else {
            self.cursor = None;
            return Ok(false);
        };

        let found = options.rules.iter().find_map(|rule| {
            search::post_order(subtree, |node| rule.apply(node, &options.expression_ctx))
                .map(|found| (rule, found))
        });

        match found {
            Some((rule, found)) => {
                let mut path = base;
                path.extend(found.path);
                self.accept(rule.as_ref(), path, found.status)?;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Builds the error for a rule that broke the rule contract.
    fn violation(&self, rule: &dyn Rule, reason: &'static str) -> Error {
        let text = print::ascii(&self.input);
        Error::new(vec![0..text.len()], ContractViolation {
            rule: rule.name().to_owned(),
            reason,
        })
    }

    /// Splices the replacement reported by `rule` for the node at `path` into the tree, and
    /// emits the step.
    fn accept(&mut self, rule: &dyn Rule, path: Vec<usize>, status: Status) -> Result<(), Error> {
        if self.root.get(&path) == Some(&status.node) {
            return Err(self.violation(rule, "the rule reported a change but returned the node unchanged"));
        }
        if let Some(last) = status.substeps.last() {
            if normalize(last.node.clone()) != normalize(status.node.clone()) {
                return Err(self.violation(rule, "the last substep does not match the result of the rule"));
            }
        }

        let substeps = status.substeps.iter()
            .map(|substep| self.snapshot(&path, substep))
            .collect();

        let root = splice(&self.root, &path, status.node.clone());
        self.cursor = Cursor::after_change(&root, path, &status.node);
        self.root = root;
        self.iterations += 1;
        self.shuffled = false;

        if self.options.debug {
            debug!("{} ({}): {}", status.change_type, rule.name(), print::ascii(&self.root));
        }

        self.emit(Step {
            change_type: status.change_type,
            root: self.root.clone(),
            substeps,
        });
        Ok(())
    }

    /// Builds the step for a substep of a change at `path`, with a snapshot of the whole tree.
    fn snapshot(&self, path: &[usize], status: &Status) -> Step {
        Step {
            change_type: status.change_type,
            root: splice(&self.root, path, status.node.clone()),
            substeps: status.substeps.iter()
                .map(|substep| self.snapshot(path, substep))
                .collect(),
        }
    }

    fn emit(&mut self, step: Step) {
        self.last = step.root.clone();
        self.steps.push(step);
    }

    /// Renders the tree as text and parses it again, which can group the tree differently.
    ///
    /// This is tried at most once per dead end, and not at all if the text is the same as the
    /// last time. Returns true if the tree was replaced.
    fn shuffle(&mut self) -> bool {
        let text = print::ascii(&self.root);
        if self.shuffle_text.as_deref() == Some(text.as_str()) {
            return false;
        }

        self.shuffled = true;
        self.cursor = None;

        let reparsed = match self.options.parser.parse(&text) {
            Ok(node) => normalize(node),
            Err(_) => {
                warn!("could not reparse `{}`", text);
                return false;
            },
        };
        if !is_supported(&reparsed) {
            warn!("reparsing `{}` produced an unsupported tree", text);
            return false;
        }

        trace!("dead end, reparsed `{}`", text);
        self.root = reparsed;
        self.shuffle_text = Some(text);
        true
    }

    /// Puts the arguments of sums and products in canonical order, emitting a step if that
    /// changes the text of the tree, and returns the last emitted tree.
    pub fn finish(mut self) -> Node {
        let sorted = canonical_order(&self.last);
        if print::ascii(&sorted) != print::ascii(&self.last) {
            if self.options.debug {
                debug!("{}: {}", ChangeType::RearrangeCoefficient, print::ascii(&sorted));
            }
            self.emit(Step::new(ChangeType::RearrangeCoefficient, sorted));
        }
        self.last
    }
}

/// Returns a normalized copy of the tree with the node at `path` replaced.
fn splice(root: &Node, path: &[usize], replacement: Node) -> Node {
    let mut root = root.clone();
    if let Some(target) = root.get_mut(path) {
        *target = replacement;
    }
    normalize(root)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Node {
        Node::symbol("x")
    }

    #[test]
    fn cursor_stays_on_replaced_node() {
        // 1 + x^2, after replacing the 2 with 3
        let root = Node::add(vec![Node::int(1), Node::pow(x(), Node::int(3))]);
        assert_eq!(
            Cursor::after_change(&root, vec![1, 1], &Node::int(3)),
            Some(Cursor(vec![1, 1])),
        );
        assert_eq!(Cursor::after_change(&root, vec![], &root), None);
    }

    #[test]
    fn cursor_moves_up_when_folded() {
        // -(2 + 3) became -(5), which normalizes to -5
        let root = Node::add(vec![x(), Node::int(-5)]);
        assert_eq!(
            Cursor::after_change(&root, vec![1, 0], &Node::int(5)),
            Some(Cursor(vec![1])),
        );
    }

    #[test]
    fn cursor_moves_to_merging_parent() {
        // x * (2 * y) merges into x * 2 * y
        let root = Node::mul(vec![x(), Node::int(2), Node::symbol("y")]);
        let replacement = Node::mul(vec![Node::int(2), Node::symbol("y")]);
        assert_eq!(Cursor::after_change(&root, vec![1], &replacement), None);

        let root = Node::add(vec![Node::int(1), root]);
        assert_eq!(
            Cursor::after_change(&root, vec![1, 1], &replacement),
            Some(Cursor(vec![1])),
        );
    }

    #[test]
    fn splice_normalizes() {
        let root = Node::add(vec![x(), Node::int(1)]);
        let spliced = splice(&root, &[1], Node::add(vec![Node::int(2), Node::symbol("y")]));
        assert_eq!(spliced, Node::add(vec![x(), Node::int(2), Node::symbol("y")]));
    }
}

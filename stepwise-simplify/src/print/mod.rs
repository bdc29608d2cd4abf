//! Rendering of expression trees to text.
//!
//! Two dialects are supported: a linear, ascii dialect that the parser can read back, and a
//! typeset LaTeX dialect. Trees are normalized before they are rendered, so subtraction always
//! prints as the addition of a negated term, `2 + -3`. Unless [`PrintOptions::show_plus_minus`]
//! is set, the final text collapses each `+ -` into a single `-`.

mod ascii;
mod latex;

use crate::{node::Node, normalize::normalize};

/// The output dialect of the renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Linear text, such as `2/3x^2 + (x + 1) / (y)`.
    ///
    /// This is the default option.
    #[default]
    Ascii,

    /// LaTeX, such as `\frac{2}{3}~x^{2}`.
    Latex,
}

/// Options that control rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// The output dialect.
    pub dialect: Dialect,

    /// Whether to keep `+ -` sequences, such as in `2 + -3`. If false (the default), they are
    /// collapsed into `-`, as in `2 - 3`.
    pub show_plus_minus: bool,
}

impl PrintOptions {
    /// Wraps the given [`PrintOptions`] into a builder for further customization.
    pub fn into_builder(self) -> PrintOptionsBuilder {
        PrintOptionsBuilder(self)
    }

    /// Renders the node with these options.
    pub fn render(&self, node: &Node) -> String {
        render(node, self.dialect, self.show_plus_minus)
    }
}

/// Helper struct to build a [`PrintOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptionsBuilder(PrintOptions);

impl PrintOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output dialect. See [`Dialect`] for more information.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.0.dialect = dialect;
        self
    }

    /// Sets whether to keep `+ -` sequences. See [`PrintOptions::show_plus_minus`].
    pub fn show_plus_minus(mut self, show_plus_minus: bool) -> Self {
        self.0.show_plus_minus = show_plus_minus;
        self
    }

    /// Builds the [`PrintOptions`] struct.
    pub fn build(self) -> PrintOptions {
        self.0
    }
}

/// Renders the node in the given dialect.
pub fn render(node: &Node, dialect: Dialect, show_plus_minus: bool) -> String {
    let node = normalize(node.clone());
    let text = match dialect {
        Dialect::Ascii => ascii::render(&node),
        Dialect::Latex => latex::render(&node),
    };

    if show_plus_minus {
        text
    } else {
        collapse_plus_minus(&text)
    }
}

/// Renders the node in the ascii dialect, collapsing `+ -` into `-`.
pub fn ascii(node: &Node) -> String {
    render(node, Dialect::Ascii, false)
}

/// Renders the node in the LaTeX dialect, collapsing `+ -` into `-`.
pub fn latex(node: &Node) -> String {
    render(node, Dialect::Latex, false)
}

/// Replaces every `+`, followed by optional whitespace and a `-`, along with the whitespace
/// before the `+`, with ` - `.
fn collapse_plus_minus(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(plus) = rest.find('+') {
        let after = rest[plus + 1..].trim_start();
        if let Some(after_minus) = after.strip_prefix('-') {
            out.push_str(rest[..plus].trim_end());
            out.push_str(" - ");
            rest = after_minus;
        } else {
            out.push_str(&rest[..=plus]);
            rest = &rest[plus + 1..];
        }
    }

    out.push_str(rest);
    out
}

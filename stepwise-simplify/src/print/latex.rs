use crate::node::{Node, Op};
use crate::node_type::{is_negative_constant, is_nth_root};

/// Renders a normalized tree in the LaTeX dialect, with `+-` sequences intact.
pub fn render(node: &Node) -> String {
    match node {
        Node::Constant(n) => {
            if n.is_integer() || n.is_terminating() {
                n.to_string()
            } else {
                format!("\\frac{{{}}}{{{}}}", n.numer(), n.denom())
            }
        },
        Node::Symbol(name) => name.clone(),
        Node::Operator { op, args, implicit } => render_operator(*op, args, *implicit),
        Node::UnaryMinus(inner) => match &**inner {
            Node::Operator { op: Op::Add | Op::Sub, .. } => format!("-{}", paren(render(inner))),
            inner if is_negative_constant(inner) => format!("-{}", paren(render(inner))),
            inner => format!("-{}", render(inner)),
        },
        Node::Parenthesis(inner) => paren(render(inner)),
        Node::Function { args, .. } if is_nth_root(node) => match args.as_slice() {
            [radicand] => format!("\\sqrt{{{}}}", render(radicand)),
            [radicand, index] => format!("\\sqrt[{}]{{{}}}", render(index), render(radicand)),
            _ => render_function(node),
        },
        Node::Function { .. } => render_function(node),
    }
}

/// Wraps the text in LaTeX parentheses.
fn paren(text: String) -> String {
    format!("\\left({}\\right)", text)
}

/// Renders an operand, wrapping it in parentheses if `wrap` holds for it.
fn operand(node: &Node, wrap: impl Fn(&Node) -> bool) -> String {
    if wrap(node) {
        paren(render(node))
    } else {
        render(node)
    }
}

/// Returns true if the node is an operator node other than a fraction or a power, which are
/// already visually grouped.
fn is_ungrouped_operator(node: &Node) -> bool {
    matches!(node, Node::Operator { op, .. } if !matches!(op, Op::Div | Op::Pow))
}

fn render_operator(op: Op, args: &[Node], implicit: bool) -> String {
    match (op, args) {
        (Op::Add, _) => args.iter().map(render).collect::<Vec<_>>().join("+"),
        (Op::Sub, [lhs, rhs]) => format!(
            "{}-{}",
            render(lhs),
            operand(rhs, |rhs| is_ungrouped_operator(rhs) || is_negative_constant(rhs)),
        ),
        (Op::Mul, _) => {
            let separator = if implicit { "~" } else { "\\cdot " };
            args.iter()
                .enumerate()
                .map(|(index, arg)| operand(arg, |arg| {
                    is_ungrouped_operator(arg) || (index > 0 && is_negative_constant(arg))
                }))
                .collect::<Vec<_>>()
                .join(separator)
        },
        (Op::Div, [numerator, denominator]) => {
            format!("\\frac{{{}}}{{{}}}", render(numerator), render(denominator))
        },
        (Op::Pow, [base, exponent]) => format!(
            "{}^{{{}}}",
            operand(base, |base| {
                matches!(base, Node::Operator { .. } | Node::UnaryMinus(_))
                    || is_negative_constant(base)
            }),
            operand(exponent, |exponent| matches!(exponent, Node::Operator { .. })),
        ),
        // malformed operators print linearly
        _ => args.iter().map(render).collect::<Vec<_>>().join(op.symbol()),
    }
}

/// Renders a function call as `\mathrm{name}\left(a,b\right)`.
fn render_function(node: &Node) -> String {
    let Node::Function { name, presentation_name, args } = node else {
        return render(node);
    };
    format!(
        "\\mathrm{{{}}}{}",
        presentation_name.as_deref().unwrap_or(name),
        paren(args.iter().map(render).collect::<Vec<_>>().join(",")),
    )
}

use crate::node::{Node, Op};
use crate::node_type::{
    is_constant,
    is_constant_fraction,
    is_integer_fraction,
    is_negative_constant,
    is_operator,
    PolynomialTerm,
};

/// Renders a normalized tree in the ascii dialect, with `+ -` sequences intact.
pub fn render(node: &Node) -> String {
    render_child(node, None)
}

/// Wraps the text in parentheses.
fn paren(text: String) -> String {
    format!("({})", text)
}

/// Renders a node, given the operator node it is an argument of, if any, and its index there.
fn render_child(node: &Node, parent: Option<(&Node, usize)>) -> String {
    // 2/3 x^2 prints as 2/3x^2 rather than 2 / 3x^2
    if let Some(term) = PolynomialTerm::new(node) {
        if let (Some(coefficient), true) = (term.coefficient, term.has_fraction_coefficient()) {
            return format!("{}{}", render(coefficient), render(&term.without_coefficient()));
        }
    }

    match node {
        Node::Operator { op, args, implicit } => render_operator(node, *op, args, *implicit, parent),
        Node::UnaryMinus(inner) => render_unary_minus(inner),
        Node::Parenthesis(inner) => paren(render(inner)),
        Node::Function { name, presentation_name, args } => format!(
            "{}({})",
            presentation_name.as_deref().unwrap_or(name),
            args.iter().map(render).collect::<Vec<_>>().join(", "),
        ),
        Node::Constant(n) => {
            let text = n.to_string();
            match parent {
                // -3 - -3 prints as -3 - (-3)
                Some((Node::Operator { op: Op::Sub, .. }, index))
                    if index > 0 && n.is_negative() => paren(text),
                _ => text,
            }
        },
        Node::Symbol(name) => name.clone(),
    }
}

fn render_operator(
    node: &Node,
    op: Op,
    args: &[Node],
    implicit: bool,
    parent: Option<(&Node, usize)>,
) -> String {
    if op == Op::Div && is_integer_fraction(node, false) {
        return format!("{}/{}", render(&args[0]), render(&args[1]));
    }

    let text = match (op, args) {
        (Op::Div, [numerator, denominator]) if is_operator(denominator, None) => {
            format!(
                "{} / ({})",
                render_child(numerator, Some((node, 0))),
                render(denominator),
            )
        },
        (Op::Pow, [base, exponent]) => {
            // -3^2 would read as -(3^2)
            let base_text = if is_operator(base, None)
                || is_negative_constant(base)
                || matches!(base, Node::UnaryMinus(_)) {
                paren(render(base))
            } else {
                render(base)
            };
            let exponent_text = if is_operator(exponent, None) {
                paren(render(exponent))
            } else {
                render(exponent)
            };
            return format!("{}^{}", base_text, exponent_text);
        },
        _ => {
            let separator = match op {
                Op::Add | Op::Sub => format!(" {} ", op.symbol()),
                Op::Mul if implicit && !args.iter().skip(1).any(|arg| is_constant(arg, true)) => {
                    String::new()
                },
                Op::Div if is_constant_fraction(node, true) => op.symbol().to_owned(),
                _ => format!(" {} ", op.symbol()),
            };
            args.iter()
                .enumerate()
                .map(|(index, arg)| render_child(arg, Some((node, index))))
                .collect::<Vec<_>>()
                .join(&separator)
        },
    };

    // sums nested in products, fractions, and powers need parentheses, as do sums subtracted
    // from something
    let needs_paren = matches!(op, Op::Add | Op::Sub) && match parent {
        Some((Node::Operator { op: Op::Mul | Op::Div | Op::Pow, .. }, _)) => true,
        Some((Node::Operator { op: Op::Sub, .. }, index)) => index > 0,
        _ => false,
    };
    if needs_paren {
        paren(text)
    } else {
        text
    }
}

fn render_unary_minus(inner: &Node) -> String {
    match inner {
        Node::Operator { op: Op::Add | Op::Sub, .. } => format!("-({})", render(inner)),
        Node::Constant(n) if n.is_negative() => format!("-({})", n),
        _ => format!("-{}", render(inner)),
    }
}

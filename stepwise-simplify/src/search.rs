//! Generic traversal that applies a rule across a tree.

use crate::{node::Node, step::Status};

/// The first change found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    /// The path of child indices from the searched node to the node that changed.
    pub path: Vec<usize>,

    /// The change made at that node.
    pub status: Status,
}

/// Visits the nodes of the tree in depth-first post-order (children left to right, then the
/// parent) and returns the first change reported by `f`. The search stops at the first change.
///
/// Returns [`None`] if `f` reports no change anywhere.
pub fn post_order<F>(node: &Node, mut f: F) -> Option<Found>
where
    F: FnMut(&Node) -> Option<Status>,
{
    node.post_order_iter()
        .find_map(|(path, node)| f(node).map(|status| Found { path, status }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::step::ChangeType;

    /// Replaces any constant other than 0 and 1 with 1, recording each visit.
    fn shrink(visits: &mut Vec<String>) -> impl FnMut(&Node) -> Option<Status> + '_ {
        move |node| {
            visits.push(node.to_string());
            match node.as_number() {
                Some(n) if !n.is_zero() && !n.is_one() => Some(Status::new(ChangeType::SimplifyArithmetic, Node::int(1))),
                _ => None,
            }
        }
    }

    #[test]
    fn first_hit_in_post_order() {
        // (x * 2) + 3
        let tree = Node::add(vec![
            Node::mul(vec![Node::symbol("x"), Node::int(2)]),
            Node::int(3),
        ]);

        let mut visits = Vec::new();
        let found = post_order(&tree, shrink(&mut visits)).unwrap();
        assert_eq!(found.path, vec![0, 1]);
        assert_eq!(found.status.node, Node::int(1));
        assert_eq!(visits, vec!["x", "2"]);
    }

    #[test]
    fn no_change() {
        let tree = Node::neg(Node::symbol("y"));
        let mut visits = Vec::new();
        assert_eq!(post_order(&tree, shrink(&mut visits)), None);
        assert_eq!(visits, vec!["y", "-y"]);
    }

    #[test]
    fn root_can_change() {
        let tree = Node::int(9);
        let mut visits = Vec::new();
        let found = post_order(&tree, shrink(&mut visits)).unwrap();
        assert!(found.path.is_empty());
    }
}

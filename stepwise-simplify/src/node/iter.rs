use super::Node;

/// An iterator that traverses a tree of nodes in left-to-right post-order (children before their
/// parent), yielding each node together with its path of child indices from the root.
///
/// This iterator is created by [`Node::post_order_iter`].
pub struct PostOrderIter<'a> {
    /// The nodes on the way from the root to the current node, each with the index of the next
    /// child to visit.
    stack: Vec<(&'a Node, usize)>,

    /// The path of child indices to the node on top of the stack.
    path: Vec<usize>,
}

impl<'a> PostOrderIter<'a> {
    pub fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![(root, 0)],
            path: Vec::new(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (Vec<usize>, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, next_child) = self.stack.last_mut()?;
            let node: &'a Node = *node;

            if let Some(child) = node.args().get(*next_child) {
                self.path.push(*next_child);
                *next_child += 1;
                self.stack.push((child, 0));
                continue;
            }

            self.stack.pop();
            let path = self.path.clone();
            self.path.pop();
            return Some((path, node));
        }
    }
}

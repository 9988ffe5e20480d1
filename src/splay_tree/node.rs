use crate::arena::NodeId;

/// A tree node. Children are arena handles; there is no link back to the parent.
pub struct Node<T> {
    pub value: T,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
        }
    }

    /// Returns `true` if `child` hangs off the left slot of this node.
    pub fn is_left_child(&self, child: NodeId) -> bool {
        self.left == Some(child)
    }
}

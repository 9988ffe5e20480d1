use crate::arena::{Arena, NodeId};
use crate::error::Result;
use crate::splay_tree::node::Node;
use crate::splay_tree::tree::{self, Nodes, Tree};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree: every insertion, removal and membership
/// test rotates the last node it touched to the root, so recently accessed values are quick to
/// reach again. Nodes live in an arena and carry no parent links; a rotation finds the parent it
/// has to repoint by descending from the root.
///
/// Values need a total order (`Ord`) for positioning. Cloning, structural equality and `undo` use
/// value equality (`PartialEq`) instead.
///
/// # Examples
///
/// ```
/// use splay_set::SplaySet;
///
/// let mut set = SplaySet::new();
/// set.insert(10);
/// set.insert(5);
/// set.insert(15);
/// assert_eq!(set.root().map(|node| *node.value()), Some(15));
///
/// assert!(set.contains(&5));
/// assert_eq!(set.root().map(|node| *node.value()), Some(5));
///
/// assert_eq!(set.remove(&10), Some(10));
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&5, &15]);
/// ```
pub struct SplaySet<T> {
    nodes: Nodes<T>,
    root: Tree,
}

impl<T> SplaySet<T> {
    /// Constructs a new, empty `SplaySet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self {
        SplaySet {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Constructs a new, empty `SplaySet<T>` with room for `capacity` values before its node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::with_capacity(16);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        SplaySet {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of values in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns a read-only handle to the root node, or `None` if the set is empty. Walking the
    /// handles does not splay.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let root = set.root().unwrap();
    /// assert_eq!(*root.value(), 1);
    /// assert!(root.left().is_none());
    /// assert_eq!(root.right().map(|node| *node.value()), Some(2));
    /// ```
    pub fn root(&self) -> Option<NodeRef<T>> {
        self.root.map(|id| NodeRef {
            nodes: &self.nodes,
            id,
        })
    }

    /// Returns the minimum value of the set without splaying.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.nodes, self.root)
    }

    /// Returns the maximum value of the set without splaying.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.nodes, self.root)
    }

    /// Returns an iterator over the set. The iterator yields values using in-order traversal and
    /// does not splay.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplaySetIter<T> {
        SplaySetIter {
            nodes: &self.nodes,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<T> SplaySet<T>
where
    T: Ord,
{
    /// Inserts a value into the set and splays it to the root. If an equal value is already in
    /// the set, that value is splayed to the root instead, the set is left unchanged and `false`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        tree::insert(&mut self.nodes, &mut self.root, value)
    }

    /// Removes a value from the set, returning it if it was present.
    ///
    /// The access path of `value` is splayed before anything is deleted, so the set is
    /// restructured even when `value` is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        tree::remove(&mut self.nodes, &mut self.root, value)
    }

    /// Checks if a value exists in the set. The last node compared is splayed to the root whether
    /// or not the value is found.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(4);
    /// assert!(!set.contains(&3));
    /// assert!(set.contains(&1));
    /// assert_eq!(set.root().map(|node| *node.value()), Some(1));
    /// ```
    pub fn contains(&mut self, value: &T) -> bool {
        let path = tree::access(&self.nodes, self.root, value);
        tree::splay(&mut self.nodes, &mut self.root, path);
        match self.root {
            Some(id) => self.nodes[id].value.cmp(value) == Ordering::Equal,
            None => false,
        }
    }

    /// Best-effort reversal of the last insertion, returned as a new set; `self` is untouched.
    ///
    /// No insertion history is kept. The copy is scanned bottom-up and a node is excised, together
    /// with the child subtree that triggered it, only when that processed child comes back rooted
    /// at a value equal to the node's own; the node's other subtree takes its place and the
    /// excised value is splayed afterwards. A set holding no equal values comes back
    /// structurally equal to `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(5);
    /// set.insert(20);
    ///
    /// let undone = set.undo();
    /// assert!(undone == set);
    /// ```
    pub fn undo(&self) -> Self
    where
        T: Clone,
    {
        let mut copy = self.clone();
        tree::undo(&mut copy.nodes, &mut copy.root);
        copy
    }

    /// Checks the structural invariants of the set: values strictly increase in order, no node is
    /// reachable twice, and every stored node is reachable from the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let set: SplaySet<u32> = (0..10).collect();
    /// assert!(set.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        tree::validate(&self.nodes, self.root)
    }
}

impl<T> Clone for SplaySet<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let (nodes, root) = tree::deep_clone(&self.nodes, self.root);
        SplaySet { nodes, root }
    }
}

impl<T> PartialEq for SplaySet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &SplaySet<T>) -> bool {
        tree::structurally_equal(&self.nodes, self.root, &other.nodes, other.root)
    }
}

impl<T> Eq for SplaySet<T> where T: Eq {}

impl<T> fmt::Debug for SplaySet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for SplaySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SplaySet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = SplaySet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for SplaySet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> IntoIterator for SplaySet<T> {
    type IntoIter = SplaySetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            nodes: self.nodes,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SplaySet<T>
where
    T: 'a,
{
    type IntoIter = SplaySetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only handle to a node of a `SplaySet<T>`.
///
/// Handles borrow the set, so the tree cannot be restructured while one is alive.
pub struct NodeRef<'a, T>
where
    T: 'a,
{
    nodes: &'a Nodes<T>,
    id: NodeId,
}

impl<'a, T> NodeRef<'a, T>
where
    T: 'a,
{
    /// Returns the value held by this node.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(7);
    /// assert_eq!(set.root().map(|node| *node.value()), Some(7));
    /// ```
    pub fn value(&self) -> &'a T {
        &self.nodes[self.id].value
    }

    /// Returns a handle to the left child, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    ///
    /// let root = set.root().unwrap();
    /// assert_eq!(root.left().map(|node| *node.value()), Some(1));
    /// ```
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.child(self.nodes[self.id].left)
    }

    /// Returns a handle to the right child, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_set::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let root = set.root().unwrap();
    /// assert_eq!(root.right().map(|node| *node.value()), Some(2));
    /// ```
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.child(self.nodes[self.id].right)
    }

    fn child(&self, id: Tree) -> Option<NodeRef<'a, T>> {
        let nodes = self.nodes;
        id.map(|id| NodeRef { nodes, id })
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

/// An owning iterator for `SplaySet<T>`.
///
/// This iterator traverses the values of the set in-order and yields owned values.
pub struct SplaySetIntoIter<T> {
    nodes: Nodes<T>,
    current: Tree,
    stack: Vec<NodeId>,
}

impl<T> Iterator for SplaySetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.current = self.nodes[id].left;
            self.stack.push(id);
        }
        self.stack.pop().map(|id| {
            let Node { value, right, .. } = self.nodes.free(id);
            self.current = right;
            value
        })
    }
}

/// An iterator for `SplaySet<T>`.
///
/// This iterator traverses the values of the set in-order and yields immutable references.
pub struct SplaySetIter<'a, T>
where
    T: 'a,
{
    nodes: &'a Nodes<T>,
    current: Tree,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(id) = self.current {
            self.current = nodes[id].left;
            self.stack.push(id);
        }
        self.stack.pop().map(|id| {
            let node = &nodes[id];
            self.current = node.right;
            &node.value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SplaySet;
    use std::cmp::Ordering;

    fn root_value(set: &SplaySet<u32>) -> Option<u32> {
        set.root().map(|node| *node.value())
    }

    // Reverse in-order rendering, one value per line and four spaces per level.
    fn render(set: &SplaySet<u32>) -> Vec<String> {
        let mut lines = Vec::new();
        let mut stack = Vec::new();
        let mut current = set.root().map(|node| (node, 0));
        loop {
            while let Some((node, depth)) = current {
                stack.push((node, depth));
                current = node.right().map(|child| (child, depth + 1));
            }
            let (node, depth) = match stack.pop() {
                Some(entry) => entry,
                None => break,
            };
            lines.push(format!("{}{}", " ".repeat(depth * 4), node.value()));
            current = node.left().map(|child| (child, depth + 1));
        }
        lines
    }

    #[test]
    fn test_len_empty() {
        let set: SplaySet<u32> = SplaySet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(set.root().is_none());
    }

    #[test]
    fn test_min_max_empty() {
        let set: SplaySet<u32> = SplaySet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert_splays_last_inserted() {
        let mut set = SplaySet::new();
        set.insert(10);
        assert_eq!(root_value(&set), Some(10));
        set.insert(5);
        assert_eq!(root_value(&set), Some(5));
        set.insert(15);
        assert_eq!(root_value(&set), Some(15));
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&5, &10, &15]);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = SplaySet::new();
        assert!(set.insert(10));
        assert!(set.insert(5));
        assert!(!set.insert(10));
        assert_eq!(set.len(), 2);
        assert_eq!(root_value(&set), Some(10));
    }

    #[test]
    fn test_contains_splays_hit() {
        let mut set: SplaySet<u32> = vec![10, 5, 15].into_iter().collect();
        assert!(set.contains(&5));
        assert_eq!(root_value(&set), Some(5));
        assert_eq!(render(&set), vec!["        15", "    10", "5"]);
    }

    #[test]
    fn test_contains_splays_miss() {
        let mut set: SplaySet<u32> = vec![10, 5, 15].into_iter().collect();
        assert!(!set.contains(&11));
        assert_eq!(root_value(&set), Some(10));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_contains_empty() {
        let mut set: SplaySet<u32> = SplaySet::new();
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_remove_after_contains() {
        let mut set: SplaySet<u32> = vec![10, 5, 15].into_iter().collect();
        assert!(set.contains(&5));
        assert_eq!(set.remove(&10), Some(10));
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&5, &15]);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&10));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_remove_absent() {
        let mut set: SplaySet<u32> = vec![10, 5, 15].into_iter().collect();
        assert_eq!(set.remove(&7), None);
        assert_eq!(set.len(), 3);
        assert_eq!(root_value(&set), Some(5));
    }

    #[test]
    fn test_remove_last_value() {
        let mut set = SplaySet::new();
        set.insert(1);
        assert_eq!(set.remove(&1), Some(1));
        assert!(set.is_empty());
        assert!(set.root().is_none());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_min_max() {
        let set: SplaySet<u32> = vec![3, 1, 5].into_iter().collect();
        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_clone_is_equal_and_independent() {
        let mut set: SplaySet<u32> = vec![4, 2, 6, 1].into_iter().collect();
        let mut copy = set.clone();
        assert!(set == copy);

        copy.insert(3);
        copy.remove(&4);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &2, &4, &6]);
        assert_eq!(set.len(), 4);
        assert!(set != copy);

        set.clear();
        assert_eq!(copy.len(), 4);
    }

    #[test]
    fn test_equality_is_structural() {
        let first: SplaySet<u32> = vec![1, 2, 3].into_iter().collect();
        let second: SplaySet<u32> = vec![3, 2, 1].into_iter().collect();
        assert_eq!(first.iter().collect::<Vec<&u32>>(), second.iter().collect::<Vec<&u32>>());
        assert!(first != second);

        let third: SplaySet<u32> = vec![1, 2, 3].into_iter().collect();
        assert!(first == third);
    }

    #[test]
    fn test_equality_empty() {
        let first: SplaySet<u32> = SplaySet::new();
        let second: SplaySet<u32> = SplaySet::new();
        assert!(first == second);
    }

    #[test]
    fn test_undo_empty() {
        let set: SplaySet<u32> = SplaySet::new();
        let undone = set.undo();
        assert!(undone.is_empty());
    }

    #[test]
    fn test_undo_without_duplicates() {
        let mut set: SplaySet<u32> = vec![10, 5, 15].into_iter().collect();
        set.remove(&10);
        set.insert(20);
        let undone = set.undo();
        assert!(undone == set);
        assert_eq!(undone.iter().collect::<Vec<&u32>>(), vec![&5, &15, &20]);
        assert!(undone.validate().is_ok());
    }

    // Ordered by `key` but compared for equality by `tag`, so the undo scan can see equal values
    // at distinct positions.
    #[derive(Clone, Debug)]
    struct Tagged {
        key: u32,
        tag: u32,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Tagged) -> bool {
            self.tag == other.tag
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Tagged) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Tagged) -> Ordering {
            self.key.cmp(&other.key)
        }
    }

    #[test]
    fn test_undo_excises_node_with_equal_child() {
        let mut set = SplaySet::new();
        set.insert(Tagged { key: 1, tag: 0 });
        set.insert(Tagged { key: 2, tag: 1 });
        set.insert(Tagged { key: 3, tag: 1 });

        // 3 is the root with 2 as its left child; 2 holds 1 on its left.
        let undone = set.undo();
        assert_eq!(set.len(), 3);
        assert!(undone.is_empty());
        assert!(undone.validate().is_ok());
    }

    #[test]
    fn test_undo_keeps_opposite_subtree() {
        let mut set = SplaySet::new();
        set.insert(Tagged { key: 1, tag: 7 });
        set.insert(Tagged { key: 3, tag: 8 });
        set.insert(Tagged { key: 2, tag: 7 });

        // 2 is the root holding 1 and 3. The scan excises 2 together with 1 and 3 takes its place.
        let undone = set.undo();
        assert_eq!(
            undone.iter().map(|value| value.key).collect::<Vec<u32>>(),
            vec![3],
        );
        assert_eq!(undone.root().map(|node| node.value().key), Some(3));
        assert!(undone.validate().is_ok());
        assert_eq!(set.len(), 3);
        assert_eq!(set.root().map(|node| node.value().key), Some(2));
    }

    #[test]
    fn test_undo_excises_node_with_equal_right_child() {
        let mut set = SplaySet::new();
        set.insert(Tagged { key: 3, tag: 7 });
        set.insert(Tagged { key: 1, tag: 8 });
        set.insert(Tagged { key: 2, tag: 7 });

        // 2 is the root holding 1 and 3. Only 3 shares its tag, so 2 goes together with 3 and 1
        // takes its place.
        let undone = set.undo();
        assert_eq!(
            undone.iter().map(|value| value.key).collect::<Vec<u32>>(),
            vec![1],
        );
        assert_eq!(undone.root().map(|node| node.value().key), Some(1));
        assert!(undone.validate().is_ok());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_undo_prefers_left_when_both_children_equal() {
        let mut set = SplaySet::new();
        set.insert(Tagged { key: 3, tag: 7 });
        set.insert(Tagged { key: 1, tag: 7 });
        set.insert(Tagged { key: 2, tag: 7 });

        // Both children of 2 share its tag. The left side is checked first, so 1 is dropped
        // and 3 is kept.
        let undone = set.undo();
        assert_eq!(
            undone.iter().map(|value| value.key).collect::<Vec<u32>>(),
            vec![3],
        );
        assert_eq!(undone.len(), 1);
        assert!(undone.validate().is_ok());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_validate() {
        let mut set = SplaySet::with_capacity(16);
        for value in &[8, 3, 12, 1, 5, 10, 14] {
            set.insert(*value);
            assert!(set.validate().is_ok());
        }
        set.remove(&8);
        set.remove(&1);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_into_iter() {
        let set: SplaySet<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let set: SplaySet<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!((&set).into_iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_debug() {
        let set: SplaySet<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_deep_tree_is_stack_safe() {
        let mut set = SplaySet::new();
        for value in 0..2_000u32 {
            set.insert(value);
        }
        let copy = set.clone();
        assert!(copy == set);
        assert!(set.contains(&0));
        assert_eq!(root_value(&set), Some(0));
        assert!(set.validate().is_ok());
    }
}

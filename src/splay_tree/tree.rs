use crate::arena::{Arena, NodeId};
use crate::error::{Error, Result};
use crate::splay_tree::node::Node;
use log::{debug, trace};
use std::cmp::Ordering;
use std::mem;

pub type Tree = Option<NodeId>;
pub type Nodes<T> = Arena<Node<T>>;

/// Descends from `root` toward `value`, recording every node compared. The last entry is either
/// the node holding `value` or the last node visited before running out of children.
pub fn access<T>(nodes: &Nodes<T>, root: Tree, value: &T) -> Vec<NodeId>
where
    T: Ord,
{
    let mut path = Vec::new();
    let mut curr = root;
    while let Some(id) = curr {
        path.push(id);
        let node = &nodes[id];
        curr = match value.cmp(&node.value) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => None,
        };
    }
    path
}

/// Re-derives the parent of `target` by descending from `root` in comparator order. Returns
/// `None` when `target` is the root.
pub fn find_parent<T>(nodes: &Nodes<T>, root: Tree, target: NodeId) -> Option<NodeId>
where
    T: Ord,
{
    let value = &nodes[target].value;
    let mut parent = None;
    let mut curr = root;
    while let Some(id) = curr {
        if id == target {
            return parent;
        }
        parent = Some(id);
        let node = &nodes[id];
        curr = if *value < node.value { node.left } else { node.right };
    }
    panic!("Error: node is not reachable from the root.");
}

// Points whichever slot held `old` (a child slot of `parent`, or the root) at `new`.
fn replace_child<T>(
    nodes: &mut Nodes<T>,
    root: &mut Tree,
    parent: Option<NodeId>,
    old: NodeId,
    new: Tree,
) {
    match parent {
        None => *root = new,
        Some(parent) => {
            let node = &mut nodes[parent];
            if node.is_left_child(old) {
                node.left = new;
            } else {
                node.right = new;
            }
        },
    }
}

pub fn rotate_right<T>(nodes: &mut Nodes<T>, root: &mut Tree, pivot: NodeId)
where
    T: Ord,
{
    let parent = find_parent(nodes, *root, pivot);
    let child = nodes[pivot].left.expect("Expected left child node to be `Some`.");
    nodes[pivot].left = nodes[child].right;
    nodes[child].right = Some(pivot);
    replace_child(nodes, root, parent, pivot, Some(child));
}

pub fn rotate_left<T>(nodes: &mut Nodes<T>, root: &mut Tree, pivot: NodeId)
where
    T: Ord,
{
    let parent = find_parent(nodes, *root, pivot);
    let child = nodes[pivot].right.expect("Expected right child node to be `Some`.");
    nodes[pivot].right = nodes[child].left;
    nodes[child].left = Some(pivot);
    replace_child(nodes, root, parent, pivot, Some(child));
}

fn zig<T>(nodes: &mut Nodes<T>, root: &mut Tree, current: NodeId, parent: NodeId)
where
    T: Ord,
{
    trace!("zig");
    if nodes[parent].is_left_child(current) {
        rotate_right(nodes, root, parent);
    } else {
        rotate_left(nodes, root, parent);
    }
}

fn zig_zig<T>(
    nodes: &mut Nodes<T>,
    root: &mut Tree,
    current: NodeId,
    parent: NodeId,
    grandparent: NodeId,
) where
    T: Ord,
{
    trace!("zig-zig");
    if nodes[parent].is_left_child(current) {
        rotate_right(nodes, root, grandparent);
        rotate_right(nodes, root, parent);
    } else {
        rotate_left(nodes, root, grandparent);
        rotate_left(nodes, root, parent);
    }
}

fn zig_zag<T>(
    nodes: &mut Nodes<T>,
    root: &mut Tree,
    current: NodeId,
    parent: NodeId,
    grandparent: NodeId,
) where
    T: Ord,
{
    trace!("zig-zag");
    if nodes[parent].is_left_child(current) {
        rotate_right(nodes, root, parent);
        rotate_left(nodes, root, grandparent);
    } else {
        rotate_left(nodes, root, parent);
        rotate_right(nodes, root, grandparent);
    }
}

/// Rotates the last node of `path` up to the root. `path` must be an access path of the tree,
/// root first.
pub fn splay<T>(nodes: &mut Nodes<T>, root: &mut Tree, mut path: Vec<NodeId>)
where
    T: Ord,
{
    trace!("splaying access path of length {}", path.len());
    let current = match path.pop() {
        Some(current) => current,
        None => return,
    };
    while let Some(parent) = path.pop() {
        match path.pop() {
            Some(grandparent) => {
                let same_side = nodes[parent].is_left_child(current)
                    == nodes[grandparent].is_left_child(parent);
                if same_side {
                    zig_zig(nodes, root, current, parent, grandparent);
                } else {
                    zig_zag(nodes, root, current, parent, grandparent);
                }
            },
            None => zig(nodes, root, current, parent),
        }
    }
}

/// Inserts `value` at the first empty slot on its side and splays it to the root. An equal value
/// already in the tree is splayed instead and `value` is dropped. Returns `true` if a node was
/// created.
pub fn insert<T>(nodes: &mut Nodes<T>, root: &mut Tree, value: T) -> bool
where
    T: Ord,
{
    let mut path = Vec::new();
    let mut slot: Option<(NodeId, Ordering)> = None;
    let mut curr = *root;
    while let Some(id) = curr {
        path.push(id);
        let node = &nodes[id];
        let ordering = value.cmp(&node.value);
        curr = match ordering {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => {
                splay(nodes, root, path);
                return false;
            },
        };
        slot = Some((id, ordering));
    }

    let id = nodes.allocate(Node::new(value));
    match slot {
        None => *root = Some(id),
        Some((parent, Ordering::Less)) => nodes[parent].left = Some(id),
        Some((parent, _)) => nodes[parent].right = Some(id),
    }
    path.push(id);
    splay(nodes, root, path);
    true
}

/// Splays the access path of `value`, then deletes the node holding it. A node with two children
/// takes the maximum value of its left subtree, and that maximum node is spliced out instead.
pub fn remove<T>(nodes: &mut Nodes<T>, root: &mut Tree, value: &T) -> Option<T>
where
    T: Ord,
{
    let path = access(nodes, *root, value);
    splay(nodes, root, path);

    let mut parent = None;
    let mut curr = *root;
    let target = loop {
        let id = match curr {
            Some(id) => id,
            None => {
                debug!("remove of an absent value left the tree unchanged");
                return None;
            },
        };
        let node = &nodes[id];
        match value.cmp(&node.value) {
            Ordering::Less => curr = node.left,
            Ordering::Greater => curr = node.right,
            Ordering::Equal => break id,
        }
        parent = Some(id);
    };

    match (nodes[target].left, nodes[target].right) {
        (Some(left), Some(_)) => {
            let mut max_parent = target;
            let mut max = left;
            while let Some(next) = nodes[max].right {
                max_parent = max;
                max = next;
            }
            let max_left = nodes[max].left;
            if max_parent == target {
                nodes[target].left = max_left;
            } else {
                nodes[max_parent].right = max_left;
            }
            let predecessor = nodes.free(max).value;
            Some(mem::replace(&mut nodes[target].value, predecessor))
        },
        (child, None) | (None, child) => {
            replace_child(nodes, root, parent, target, child);
            Some(nodes.free(target).value)
        },
    }
}

pub fn min<T>(nodes: &Nodes<T>, root: Tree) -> Option<&T> {
    root.map(move |mut curr| {
        while let Some(left) = nodes[curr].left {
            curr = left;
        }
        &nodes[curr].value
    })
}

pub fn max<T>(nodes: &Nodes<T>, root: Tree) -> Option<&T> {
    root.map(move |mut curr| {
        while let Some(right) = nodes[curr].right {
            curr = right;
        }
        &nodes[curr].value
    })
}

/// Copies the tree rooted at `root` into a fresh arena, preserving its shape.
pub fn deep_clone<T>(nodes: &Nodes<T>, root: Tree) -> (Nodes<T>, Tree)
where
    T: Clone,
{
    let mut copies = Arena::with_capacity(nodes.len());
    let source_root = match root {
        Some(source_root) => source_root,
        None => return (copies, None),
    };

    let copy_root = copies.allocate(Node::new(nodes[source_root].value.clone()));
    let mut stack = vec![(source_root, copy_root)];
    while let Some((source, copy)) = stack.pop() {
        let Node { left, right, .. } = nodes[source];
        if let Some(left) = left {
            let id = copies.allocate(Node::new(nodes[left].value.clone()));
            copies[copy].left = Some(id);
            stack.push((left, id));
        }
        if let Some(right) = right {
            let id = copies.allocate(Node::new(nodes[right].value.clone()));
            copies[copy].right = Some(id);
            stack.push((right, id));
        }
    }
    (copies, Some(copy_root))
}

/// Returns `true` if both trees have the same shape and equal values at every position.
pub fn structurally_equal<T>(
    nodes: &Nodes<T>,
    root: Tree,
    other_nodes: &Nodes<T>,
    other_root: Tree,
) -> bool
where
    T: PartialEq,
{
    let mut stack = vec![(root, other_root)];
    while let Some(pair) = stack.pop() {
        match pair {
            (None, None) => {},
            (Some(id), Some(other_id)) => {
                let (node, other_node) = (&nodes[id], &other_nodes[other_id]);
                if node.value != other_node.value {
                    return false;
                }
                stack.push((node.right, other_node.right));
                stack.push((node.left, other_node.left));
            },
            _ => return false,
        }
    }
    true
}

enum Visit {
    Enter(Tree),
    Exit(NodeId),
}

/// Bottom-up scan that excises any node whose processed child subtree comes back rooted at a
/// value equal to its own. The excised node and that child subtree are dropped and the opposite
/// subtree takes their place; each excised value is then splayed. Returns the number of nodes
/// excised.
pub fn undo<T>(nodes: &mut Nodes<T>, root: &mut Tree) -> usize
where
    T: Ord,
{
    let mut stack = vec![Visit::Enter(*root)];
    let mut results: Vec<Tree> = Vec::new();
    let mut dropped = Vec::new();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(None) => results.push(None),
            Visit::Enter(Some(id)) => {
                stack.push(Visit::Exit(id));
                stack.push(Visit::Enter(nodes[id].right));
                stack.push(Visit::Enter(nodes[id].left));
            },
            Visit::Exit(id) => {
                let right = results.pop().and_then(|tree| tree);
                let left = results.pop().and_then(|tree| tree);
                let matches = |child: Tree| {
                    child.map_or(false, |child| nodes[child].value == nodes[id].value)
                };
                let left_matches = matches(left);
                let right_matches = !left_matches && matches(right);

                if left_matches {
                    nodes[id].left = left;
                    nodes[id].right = None;
                    dropped.push(id);
                    results.push(right);
                } else if right_matches {
                    nodes[id].right = right;
                    nodes[id].left = None;
                    dropped.push(id);
                    results.push(left);
                } else {
                    nodes[id].left = left;
                    nodes[id].right = right;
                    results.push(Some(id));
                }
            },
        }
    }
    *root = results.pop().and_then(|tree| tree);

    let excised = dropped.len();
    let mut values = Vec::with_capacity(excised);
    for id in dropped {
        let Node { value, left, right } = nodes.free(id);
        free_subtree(nodes, left);
        free_subtree(nodes, right);
        values.push(value);
    }
    for value in &values {
        debug!("undo excised a node holding a duplicated value");
        let path = access(nodes, *root, value);
        splay(nodes, root, path);
    }
    excised
}

fn free_subtree<T>(nodes: &mut Nodes<T>, root: Tree) {
    let mut stack: Vec<NodeId> = root.into_iter().collect();
    while let Some(id) = stack.pop() {
        let node = nodes.free(id);
        stack.extend(node.left);
        stack.extend(node.right);
    }
}

/// Checks ordering, sharing, and reachability of every allocated node.
pub fn validate<T>(nodes: &Nodes<T>, root: Tree) -> Result<()>
where
    T: Ord,
{
    let mut stack = Vec::new();
    let mut curr = root;
    let mut prev: Option<&T> = None;
    let mut reached = 0;
    let mut position = 0;
    loop {
        while let Some(id) = curr {
            let node = nodes.get(id).ok_or(Error::DanglingNode)?;
            reached += 1;
            if reached > nodes.len() {
                return Err(Error::Cycle);
            }
            stack.push(node);
            curr = node.left;
        }
        let node = match stack.pop() {
            Some(node) => node,
            None => break,
        };
        if let Some(prev) = prev {
            if *prev >= node.value {
                return Err(Error::OrderViolation { position });
            }
        }
        prev = Some(&node.value);
        position += 1;
        curr = node.right;
    }

    if reached != nodes.len() {
        return Err(Error::LengthMismatch {
            expected: nodes.len(),
            actual: reached,
        });
    }
    Ok(())
}

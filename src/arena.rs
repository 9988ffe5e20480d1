//! Index-addressed node storage.

use std::mem;
use std::ops::{Index, IndexMut};

/// A stable handle to a slot in an `Arena<T>`.
///
/// Handles stay valid until the slot they name is freed, after which the slot may be handed out
/// again by a later allocation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// Storage for the nodes of a single tree.
///
/// Nodes refer to each other through `NodeId`s instead of owning pointers, so restructuring the
/// tree only reassigns handles. Freed slots are threaded onto a free list and reused before the
/// backing `Vec` grows.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Moves `value` into the arena and returns its handle.
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.free_head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                NodeId(self.slots.len() - 1)
            },
            Some(index) => {
                let vacant = mem::replace(&mut self.slots[index], Slot::Occupied(value));
                match vacant {
                    Slot::Vacant(next) => {
                        self.free_head = next;
                        NodeId(index)
                    },
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
            },
        }
    }

    /// Removes the value behind `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or names a vacant slot.
    pub fn free(&mut self, id: NodeId) -> T {
        if id.0 >= self.slots.len() {
            panic!("Error: attempting to free invalid slot.");
        }
        let old = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.free_head));
        match old {
            Slot::Vacant(next) => {
                self.slots[id.0] = Slot::Vacant(next);
                panic!("Error: attempting to free vacant slot.");
            },
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                value
            },
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node id out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node id out of bounds.")
    }
}

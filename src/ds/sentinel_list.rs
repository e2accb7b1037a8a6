//! Sentinel-anchored circular doubly-linked list backed by [`SlotArena`].
//!
//! One permanent sentinel node (holding no value) closes the list into a
//! cycle, so insert and remove never branch on list ends: every node,
//! including the boundary ones, has live `prev` and `next` links.
//!
//! ## Architecture
//!
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            ▼                                                │
//!   ┌──────────────┐      ┌───────┐      ┌───────┐      ┌───────┐
//!   │   sentinel   │ ◄──► │ front │ ◄──► │  ...  │ ◄──► │ back  │
//!   │ (value:None) │      │ (MRU) │      │       │      │ (LRU) │
//!   └──────────────┘      └───────┘      └───────┘      └───────┘
//!
//!   front = sentinel.next        back = sentinel.prev
//! ```
//!
//! Nodes live in a [`SlotArena`] and reference each other by [`SlotId`],
//! never by pointer, so the cycle owns nothing and the arena reclaims slots
//! eagerly on removal. Building the same cycle from shared
//! reference-counted node handles would leak: a cycle of strong handles is
//! never reclaimed.
//!
//! ## Operations
//!
//! | Operation        | Time | Notes                              |
//! |------------------|------|------------------------------------|
//! | `push_front`     | O(1) | New node right after the sentinel  |
//! | `move_to_front`  | O(1) | Recency touch                      |
//! | `remove`         | O(1) | Four-link splice + slot free       |
//! | `pop_back`       | O(1) | Eviction victim (before sentinel)  |
//! | `iter`           | O(n) | Front to back                      |

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    prev: SlotId,
    next: SlotId,
    value: Option<T>,
}

/// Circular doubly-linked list with a non-data sentinel anchor.
///
/// Front (right after the sentinel) is the most-recently-used position;
/// back (right before the sentinel) is the eviction victim.
#[derive(Debug)]
pub struct SentinelList<T> {
    arena: SlotArena<Node<T>>,
    sentinel: SlotId,
}

impl<T> SentinelList<T> {
    /// Creates an empty list. The sentinel is allocated up front and lives
    /// for the lifetime of the list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = SlotArena::with_capacity(capacity + 1);
        let sentinel = arena.insert(Node {
            prev: SlotId(0),
            next: SlotId(0),
            value: None,
        });
        let node = arena.get_mut(sentinel).expect("sentinel missing");
        node.prev = sentinel;
        node.next = sentinel;
        Self { arena, sentinel }
    }

    /// Returns the number of value-holding nodes (the sentinel is not
    /// counted).
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` is a value-holding node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        id != self.sentinel && self.arena.contains(id)
    }

    /// Returns the id of the front (most recent) node.
    pub fn front_id(&self) -> Option<SlotId> {
        let next = self.node(self.sentinel).next;
        (next != self.sentinel).then_some(next)
    }

    /// Returns the id of the back (least recent) node.
    pub fn back_id(&self) -> Option<SlotId> {
        let prev = self.node(self.sentinel).prev;
        (prev != self.sentinel).then_some(prev)
    }

    /// Returns the value at the front of the list.
    pub fn front(&self) -> Option<&T> {
        self.front_id().and_then(|id| self.get(id))
    }

    /// Returns the value at the back of the list.
    pub fn back(&self) -> Option<&T> {
        self.back_id().and_then(|id| self.get(id))
    }

    /// Returns the value for a node id, if present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        if id == self.sentinel {
            return None;
        }
        self.arena.get(id).and_then(|node| node.value.as_ref())
    }

    /// Returns a mutable reference to a node value, if present.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        if id == self.sentinel {
            return None;
        }
        self.arena.get_mut(id).and_then(|node| node.value.as_mut())
    }

    /// Inserts a value at the front and returns its id.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            prev: self.sentinel,
            next: self.sentinel,
            value: Some(value),
        });
        self.attach_front(id);
        id
    }

    /// Moves an existing node to the front; returns `false` if `id` is not
    /// a node of this list.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.node(self.sentinel).next == id {
            return true;
        }
        self.unlink(id);
        self.attach_front(id);
        true
    }

    /// Removes the node `id` from the list and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.unlink(id);
        self.arena.remove(id).and_then(|node| node.value)
    }

    /// Removes and returns the back (least recent) value.
    pub fn pop_back(&mut self) -> Option<(SlotId, T)> {
        let id = self.back_id()?;
        self.unlink(id);
        let value = self.arena.remove(id).and_then(|node| node.value)?;
        Some((id, value))
    }

    /// Returns an iterator of `(SlotId, &T)` from front to back.
    pub fn iter(&self) -> SentinelListIter<'_, T> {
        SentinelListIter {
            list: self,
            current: self.node(self.sentinel).next,
        }
    }

    /// Clears the list, keeping only the sentinel.
    pub fn clear(&mut self) {
        self.arena.clear();
        let sentinel = self.arena.insert(Node {
            prev: SlotId(0),
            next: SlotId(0),
            value: None,
        });
        let node = self.arena.get_mut(sentinel).expect("sentinel missing");
        node.prev = sentinel;
        node.next = sentinel;
        self.sentinel = sentinel;
    }

    /// Walks the cycle both ways and verifies link integrity.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut count = 0usize;
        let mut current = self.node(self.sentinel).next;
        while current != self.sentinel {
            let node = self
                .arena
                .get(current)
                .ok_or_else(|| InvariantError::new("list link points at a freed slot"))?;
            if node.value.is_none() {
                return Err(InvariantError::new("non-sentinel node holds no value"));
            }
            let next = node.next;
            let back_ref = self
                .arena
                .get(next)
                .ok_or_else(|| InvariantError::new("next link points at a freed slot"))?
                .prev;
            if back_ref != current {
                return Err(InvariantError::new("prev/next links disagree"));
            }
            current = next;
            count += 1;
            if count > self.len() {
                return Err(InvariantError::new("cycle longer than arena population"));
            }
        }
        if count != self.len() {
            return Err(InvariantError::new(format!(
                "walked {} nodes but arena holds {}",
                count,
                self.len()
            )));
        }
        Ok(())
    }

    fn node(&self, id: SlotId) -> &Node<T> {
        self.arena.get(id).expect("list node missing")
    }

    // Four-link splice: neighbors bypass `id`. The node's own links are left
    // dangling; callers either re-attach or free the slot immediately.
    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = {
            let node = self.node(id);
            (node.prev, node.next)
        };
        self.arena.get_mut(prev).expect("list node missing").next = next;
        self.arena.get_mut(next).expect("list node missing").prev = prev;
    }

    fn attach_front(&mut self, id: SlotId) {
        let first = self.node(self.sentinel).next;
        {
            let node = self.arena.get_mut(id).expect("list node missing");
            node.prev = self.sentinel;
            node.next = first;
        }
        self.arena
            .get_mut(self.sentinel)
            .expect("sentinel missing")
            .next = id;
        self.arena.get_mut(first).expect("list node missing").prev = id;
    }
}

impl<T> Default for SentinelList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SentinelListIter<'a, T> {
    list: &'a SentinelList<T>,
    current: SlotId,
}

impl<'a, T> Iterator for SentinelListIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.list.sentinel {
            return None;
        }
        let id = self.current;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        node.value.as_ref().map(|value| (id, value))
    }
}

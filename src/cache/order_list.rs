//! Order List Module
//!
//! Arena-backed doubly linked list that keeps entries in recency order.
//!
//! Nodes live in a `Vec` and link to each other through `NodeId` indices
//! instead of pointers:
//! - Head = Most recently used
//! - Tail = Least recently used
//!
//! Slots freed by removal are recycled through a free list, so the arena
//! never holds more slots than the peak number of live entries.

use std::iter::FusedIterator;

use crate::cache::Entry;

// == Node Handle ==
/// Stable handle to a node in an [`OrderList`].
///
/// A handle stays valid until its node is removed; after that the slot may
/// be reused for a different entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == Order List ==
/// Doubly linked list of cache entries ordered by recency.
#[derive(Debug, Clone)]
pub struct OrderList<K, V> {
    /// Node arena; `None` marks a free slot
    slots: Vec<Option<Node<K, V>>>,
    /// Free slots available for reuse
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<K, V> OrderList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Insert At Head ==
    /// Places `entry` as the most recently used node and returns its handle.
    pub fn insert_at_head(&mut self, entry: Entry<K, V>) -> NodeId {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };

        self.attach_head(id);
        self.len += 1;
        id
    }

    // == Remove Head ==
    /// Detaches and returns the most recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn remove_head(&mut self) -> Option<Entry<K, V>> {
        let head = self.head?;
        self.remove(head)
    }

    // == Remove Tail ==
    /// Detaches and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn remove_tail(&mut self) -> Option<Entry<K, V>> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Move To Head ==
    /// Marks a linked node as most recently used.
    ///
    /// A node that is already the head (including a sole node) keeps its
    /// position. A tail or interior node is unlinked, its neighbours are
    /// joined, and it is relinked at the head. The length never changes.
    ///
    /// Returns false if `id` does not refer to a linked node.
    pub fn move_to_head(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }

        self.detach(id);
        self.attach_head(id);
        true
    }

    // == Remove ==
    /// Detaches the node wherever it sits and returns its entry.
    ///
    /// Returns None if `id` does not refer to a linked node.
    pub fn remove(&mut self, id: NodeId) -> Option<Entry<K, V>> {
        if !self.contains(id) {
            return None;
        }

        self.detach(id);
        let node = self.slots[id.0].take()?;
        self.free.push(id);
        self.len -= 1;

        debug_assert_eq!(self.len == 0, self.head.is_none());
        debug_assert_eq!(self.head.is_none(), self.tail.is_none());
        Some(node.entry)
    }

    // == Clear ==
    /// Drops every node and releases the arena's slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Accessors ==
    /// Returns the entry behind `id`, if it is linked.
    pub fn get(&self, id: NodeId) -> Option<&Entry<K, V>> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|node| &node.entry)
    }

    /// Returns the entry behind `id` mutably, if it is linked.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Entry<K, V>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.entry)
    }

    /// Checks if `id` refers to a linked node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Handle of the most recently used node.
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Handle of the least recently used node.
    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no nodes are linked.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // == Key Sequence ==
    /// Returns keys from most to least recently used.
    pub fn to_key_sequence(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Consistency Check ==
    /// Walks the list in both directions and verifies its structure.
    ///
    /// Checks that head, tail and length agree, that both walks visit
    /// exactly `len` nodes with matching back links, and that every slot is
    /// either linked or on the free list. O(n); meant for tests.
    pub fn is_consistent(&self) -> bool {
        if self.head.is_none() != self.tail.is_none() || self.head.is_none() != (self.len == 0) {
            return false;
        }
        if self.len + self.free.len() != self.slots.len() {
            return false;
        }
        if self.slots.iter().filter(|slot| slot.is_some()).count() != self.len {
            return false;
        }

        let mut steps = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.node(id) else {
                return false;
            };
            if node.prev != prev || steps >= self.len {
                return false;
            }
            steps += 1;
            prev = Some(id);
            cursor = node.next;
        }
        if steps != self.len || prev != self.tail {
            return false;
        }

        let mut steps = 0;
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            let Some(node) = self.node(id) else {
                return false;
            };
            if steps >= self.len {
                return false;
            }
            steps += 1;
            cursor = node.prev;
        }
        steps == self.len
    }

    // == Internal Linking ==
    fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.slots[id.0].as_mut() {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.slots[id.0].as_mut() {
            node.next = next;
        }
    }

    /// Links a detached node in front of the current head.
    fn attach_head(&mut self, id: NodeId) {
        let old_head = self.head;
        self.set_prev(id, None);
        self.set_next(id, old_head);

        match old_head {
            Some(old) => self.set_prev(old, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Unlinks a node and joins its neighbours. Does not touch `len`.
    fn detach(&mut self, id: NodeId) {
        let Some((prev, next)) = self.node(id).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        self.set_prev(id, None);
        self.set_next(id, None);
    }
}

impl<K, V> Default for OrderList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Iterator over an [`OrderList`], most recently used first.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    list: &'a OrderList<K, V>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a OrderList<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Recency List Module
//!
//! Orders resident keys from least to most recently used.
//!
//! Nodes live in a slot vector and are linked by index, so a key's position
//! can be promoted or unlinked in O(1) through the handle handed out on insert.
//!
//! ```text
//!   head (LRU) ─► [3] ◄──► [0] ◄──► [5] ◄── tail (MRU)
//! ```

// == Node Handle ==
/// Position of a key inside a [`RecencyList`].
///
/// A handle is only meaningful while its key is linked; once removed, the slot
/// may be reused for another key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Doubly linked list over a slot vector with a free list for reuse.
#[derive(Debug)]
pub struct RecencyList<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    /// Least recently used
    head: Option<usize>,
    /// Most recently used
    tail: Option<usize>,
    len: usize,
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates an empty list.
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

    // == Push Back ==
    /// Links `key` as most recently used and returns its handle.
    pub fn push_back(&mut self, key: K) -> NodeHandle {
        let node = Node {
            key,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.len += 1;
        self.link_back(idx);
        NodeHandle(idx)
    }

    // == Move To Back ==
    /// Promotes the node at `handle` to most recently used.
    ///
    /// Returns false if the handle does not point at a linked node.
    pub fn move_to_back(&mut self, handle: NodeHandle) -> bool {
        let idx = handle.0;
        if self.node(idx).is_none() {
            return false;
        }
        if self.tail != Some(idx) {
            self.unlink(idx);
            self.link_back(idx);
        }
        true
    }

    // == Remove ==
    /// Unlinks the node at `handle` and returns its key.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<K> {
        let idx = handle.0;
        self.node(idx)?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.key)
    }

    // == Pop Front ==
    /// Removes and returns the least recently used key.
    pub fn pop_front(&mut self) -> Option<K> {
        let head = self.head?;
        self.remove(NodeHandle(head))
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_front(&self) -> Option<&K> {
        self.head.and_then(|idx| self.node(idx)).map(|n| &n.key)
    }

    /// Returns the key linked at `handle`.
    pub fn get(&self, handle: NodeHandle) -> Option<&K> {
        self.node(handle.0).map(|n| &n.key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn unlink(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => {
                if let Some(node) = self.node_mut(t) {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

// == Iterator ==
/// LRU to MRU iterator over a [`RecencyList`].
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    current: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.next;
        Some(&node.key)
    }
}

//! LRU List Module
//!
//! Implements the recency ordering used for LRU eviction as a doubly linked list
//! stored in a slot arena. Links are slot indices, so the lookup map can hold a
//! `Handle` straight into the list and relocate or unlink a node in O(1).

use crate::cache::Entry;

// == Handle ==
/// Opaque reference to a node stored in an [`LruList`].
///
/// A handle stays valid until its node is removed or the list is cleared. Using a
/// stale handle panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

#[derive(Debug)]
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Doubly linked list of entries ordered by access time.
///
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub(crate) struct LruList<K, V> {
    /// Node storage, None marks a free slot
    slots: Vec<Option<Node<K, V>>>,
    /// Indices of free slots available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LruList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores an entry at the front (most recently used) and returns its handle.
    pub(crate) fn push_front(&mut self, entry: Entry<K, V>) -> Handle {
        let node = Node {
            entry,
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

        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    pub(crate) fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle.0) {
            return;
        }
        self.unlink(handle.0);
        self.link_front(handle.0);
    }

    // == Remove ==
    /// Unlinks a node, frees its slot and returns the entry it held.
    pub(crate) fn remove(&mut self, handle: Handle) -> Entry<K, V> {
        self.unlink(handle.0);
        let node = self.slots[handle.0]
            .take()
            .expect("handle refers to a vacant slot");
        self.free.push(handle.0);
        self.len -= 1;
        node.entry
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub(crate) fn pop_back(&mut self) -> Option<Entry<K, V>> {
        let idx = self.tail?;
        Some(self.remove(Handle(idx)))
    }

    /// Returns the handle of the least recently used node.
    pub(crate) fn back(&self) -> Option<Handle> {
        self.tail.map(Handle)
    }

    /// Returns the handle of the node one step closer to the front.
    pub(crate) fn prev(&self, handle: Handle) -> Option<Handle> {
        self.node(handle.0).prev.map(Handle)
    }

    /// Returns the entry behind a handle.
    pub(crate) fn get(&self, handle: Handle) -> &Entry<K, V> {
        &self.node(handle.0).entry
    }

    /// Returns the entry behind a handle for in-place mutation.
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut Entry<K, V> {
        &mut self.node_mut(handle.0).entry
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every node. All outstanding handles become invalid.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates entries from most to least recently used.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // == Internal Links ==
    fn node(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx]
            .as_ref()
            .expect("handle refers to a vacant slot")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx]
            .as_mut()
            .expect("handle refers to a vacant slot")
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Iterator over entries from most to least recently used.
pub(crate) struct Iter<'a, K, V> {
    list: &'a LruList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let list: &'a LruList<K, V> = self.list;
        let node = list.node(idx);
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

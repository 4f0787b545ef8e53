#![forbid(unsafe_code)]

//! Handle table mapping [`NodeId`]s to host objects.
//!
//! Ids are never reused: a released slot stays empty, so a stale id held by
//! a pending timer resolves to nothing instead of an unrelated element.

use portfolio_core::NodeId;

#[derive(Debug)]
pub struct NodeRegistry<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for NodeRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }
}

impl<T> NodeRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle` under a fresh id.
    pub fn insert(&mut self, handle: T) -> NodeId {
        let raw = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Some(handle));
        self.live += 1;
        NodeId::new(raw)
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.slots.get(node.get() as usize)?.as_ref()
    }

    /// Drop the handle; later lookups of `node` miss.
    pub fn release(&mut self, node: NodeId) -> Option<T> {
        let handle = self.slots.get_mut(node.get() as usize)?.take();
        if handle.is_some() {
            self.live -= 1;
        }
        handle
    }

    /// Handles currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

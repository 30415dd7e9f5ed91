//! Low-level storage primitives behind [`Diagram`](super::Diagram).
//!
//! - [`Arena`]: Id-addressed slots that remember insertion order and support
//!   O(1) removal through tombstones.
//! - [`Adjacency`]: Incoming and outgoing edge ids per node, maintained
//!   incrementally as edges are added, retargeted or removed.
//!
//! Neither type validates references. That is the job of the diagram, which
//! is the only public mutation surface.

use std::collections::HashMap;

use indexmap::IndexMap;

use cadence_core::identifier::Id;

// =============================================================================
// Arena
// =============================================================================

/// Insertion-ordered storage addressed by [`Id`].
///
/// Removed entries leave a `None` slot behind so the slot index of every live
/// entry stays stable. The slot index doubles as the insertion rank used for
/// deterministic tie-breaking.
#[derive(Debug, Clone)]
pub(super) struct Arena<T> {
    slots: Vec<Option<T>>,
    index: IndexMap<Id, usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: IndexMap::new(),
        }
    }
}

impl<T> Arena<T> {
    /// Inserts `value` under `id`. Returns `false` if the id is taken.
    pub(super) fn insert(&mut self, id: Id, value: T) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(value));
        true
    }

    pub(super) fn contains(&self, id: Id) -> bool {
        self.index.contains_key(&id)
    }

    pub(super) fn get(&self, id: Id) -> Option<&T> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_ref()
    }

    pub(super) fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_mut()
    }

    /// Removes the entry for `id`, leaving a tombstone in its slot.
    pub(super) fn remove(&mut self, id: Id) -> Option<T> {
        let slot = self.index.swap_remove(&id)?;
        self.slots[slot].take()
    }

    /// Moves the entry for `from` under `to`, keeping its slot and rank.
    /// Returns `false` if `from` is missing or `to` is taken.
    pub(super) fn rename(&mut self, from: Id, to: Id) -> bool {
        if self.index.contains_key(&to) {
            return false;
        }
        let Some(slot) = self.index.swap_remove(&from) else {
            return false;
        };
        self.index.insert(to, slot);
        true
    }

    /// Returns the insertion rank of `id`.
    ///
    /// Ranks are strictly increasing in insertion order but not contiguous
    /// once entries have been removed.
    pub(super) fn rank(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Returns the number of live entries.
    pub(super) fn len(&self) -> usize {
        self.index.len()
    }

    /// Iterates live entries in insertion order.
    pub(super) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterates live entries mutably in insertion order.
    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }
}

// =============================================================================
// Adjacency
// =============================================================================

/// Incoming and outgoing edge ids per node.
///
/// A self-loop appears in both the outgoing and the incoming list of its node.
#[derive(Debug, Clone, Default)]
pub(super) struct Adjacency {
    outgoing: HashMap<Id, Vec<Id>>,
    incoming: HashMap<Id, Vec<Id>>,
}

impl Adjacency {
    pub(super) fn connect(&mut self, edge: Id, source: Id, target: Id) {
        self.outgoing.entry(source).or_default().push(edge);
        self.incoming.entry(target).or_default().push(edge);
    }

    pub(super) fn disconnect(&mut self, edge: Id, source: Id, target: Id) {
        if let Some(edges) = self.outgoing.get_mut(&source) {
            edges.retain(|e| *e != edge);
        }
        if let Some(edges) = self.incoming.get_mut(&target) {
            edges.retain(|e| *e != edge);
        }
    }

    pub(super) fn outgoing(&self, node: Id) -> &[Id] {
        self.outgoing.get(&node).map_or(&[], Vec::as_slice)
    }

    pub(super) fn incoming(&self, node: Id) -> &[Id] {
        self.incoming.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Drops the (empty) adjacency lists of a removed node.
    pub(super) fn forget(&mut self, node: Id) {
        self.outgoing.remove(&node);
        self.incoming.remove(&node);
    }
}

#![forbid(unsafe_code)]

//! Width bookkeeping.
//!
//! [`WidthLedger`] holds the widths registered by the last render pass,
//! keyed by item identity. [`MovedWidths`] remembers, for every item the
//! engine pushed into overflow, how wide it was just before it moved.

use std::collections::HashMap;

use prionav_core::item::ItemId;

/// Rendered widths from the most recent commit, keyed by [`ItemId`].
///
/// Each render pass starts with [`begin_pass`](Self::begin_pass), which
/// drops every registration from the previous pass, so an item that was not
/// rendered this time (moved to overflow, or removed from the item set) has
/// no width at all rather than a stale one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidthLedger {
    widths: HashMap<ItemId, u16>,
    pass: u64,
}

impl WidthLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render pass, forgetting all previous registrations.
    pub fn begin_pass(&mut self) {
        self.widths.clear();
        self.pass = self.pass.wrapping_add(1);
    }

    /// Register the rendered width of `id` for the current pass.
    ///
    /// Registering the same id twice keeps the latest width.
    pub fn record(&mut self, id: ItemId, width: u16) {
        self.widths.insert(id, width);
    }

    /// Width registered for `id` in the current pass.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<u16> {
        self.widths.get(&id).copied()
    }

    /// Number of registered items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Number of passes started so far.
    #[inline]
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }
}

/// Stack of pre-move widths, one per contraction.
///
/// Contractions push, expansions pop. Because the engine only ever moves
/// the boundary item, the top of the stack always belongs to the item at
/// the front of the overflow list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovedWidths {
    stack: Vec<u16>,
}

impl MovedWidths {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the width of an item that was just moved to overflow.
    pub fn push(&mut self, width: u16) {
        self.stack.push(width);
    }

    /// Width of the most recently moved item.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<u16> {
        self.stack.last().copied()
    }

    /// Forget the most recently moved item's width.
    pub fn pop(&mut self) -> Option<u16> {
        self.stack.pop()
    }

    /// Recorded widths, oldest first.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.stack
    }

    /// Number of recorded widths.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing is recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop every recorded width.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_pass_drops_previous_registrations() {
        let mut ledger = WidthLedger::new();
        ledger.begin_pass();
        ledger.record(ItemId(1), 10);
        ledger.record(ItemId(2), 12);
        assert_eq!(ledger.len(), 2);

        ledger.begin_pass();
        ledger.record(ItemId(2), 14);
        assert_eq!(ledger.get(ItemId(1)), None);
        assert_eq!(ledger.get(ItemId(2)), Some(14));
        assert_eq!(ledger.pass(), 2);
    }

    #[test]
    fn record_overwrites() {
        let mut ledger = WidthLedger::new();
        ledger.record(ItemId(0), 3);
        ledger.record(ItemId(0), 4);
        assert_eq!(ledger.get(ItemId(0)), Some(4));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn moved_widths_are_lifo() {
        let mut moved = MovedWidths::new();
        moved.push(100);
        moved.push(40);
        assert_eq!(moved.last(), Some(40));
        assert_eq!(moved.pop(), Some(40));
        assert_eq!(moved.last(), Some(100));
        assert_eq!(moved.as_slice(), &[100]);
    }

    #[test]
    fn empty_stack_has_no_last() {
        let mut moved = MovedWidths::new();
        assert!(moved.is_empty());
        assert_eq!(moved.last(), None);
        assert_eq!(moved.pop(), None);
    }
}

#![forbid(unsafe_code)]

//! Stable item identity.
//!
//! Widths and dropdown keys are associated with an item's identity rather
//! than its position in the row, so moving an item between the row and the
//! overflow list never mismatches a measurement with the wrong item.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Identity of one navigation item.
///
/// # Creating ItemIds
///
/// ## From the item's index in the caller's original list:
/// ```
/// use prionav_core::item::ItemId;
/// let id = ItemId::from_index(2);
/// assert_eq!(id.get(), 2);
/// ```
///
/// ## From a caller-supplied key (stable across item-set changes):
/// ```
/// use prionav_core::item::ItemId;
/// assert_eq!(ItemId::from_key(&"settings"), ItemId::from_key(&"settings"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Identity derived from a position in the original item list.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u64)
    }

    /// Identity derived from a hashable key.
    #[inline]
    pub fn from_key<T: Hash + ?Sized>(key: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Raw identity value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Identities `0..count` in original order.
pub fn sequential_ids(count: usize) -> Vec<ItemId> {
    (0..count).map(ItemId::from_index).collect()
}

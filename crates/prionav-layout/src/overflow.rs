#![forbid(unsafe_code)]

//! Overflow engine.
//!
//! The engine keeps the caller's items in their original order and a
//! boundary index. Items before the boundary are visible, items from the
//! boundary on are in overflow. Every fit-check moves the boundary by at
//! most one position, so the visible set is always a prefix of the original
//! order, the overflow set is always the complementary suffix, and no item
//! can be lost or duplicated.
//!
//! # Decision rule
//!
//! Let `C` be the container width, `R` the committed row width, `M` the
//! expansion margin, and `W` the pre-move width of the most recently
//! contracted item.
//!
//! 1. **Contract** when the visible set is non-empty and `R > C`: the last
//!    visible item moves to the front of overflow and its width is pushed
//!    onto the moved-width stack.
//! 2. **Expand** otherwise, when overflow is non-empty and `C > R + W + M`:
//!    the first overflow item moves back to the end of the row and `W` is
//!    popped.
//! 3. Otherwise **hold**.
//!
//! Both comparisons are strict, so a row exactly as wide as its container
//! stays put, and an expansion can never immediately re-trigger the
//! contraction it undoes.
//!
//! # Failure Modes
//!
//! | Condition                         | Behavior                      |
//! |-----------------------------------|-------------------------------|
//! | Container or row not measurable   | `Unmeasured`, no move         |
//! | Boundary item has no width        | `Unmeasured`, no move         |
//! | Zero items                        | `Stable` forever              |
//! | Same id given twice               | Later occurrences dropped     |

use std::collections::HashSet;

use prionav_core::item::ItemId;

use crate::ledger::MovedWidths;
use crate::measure::{Measure, MeasureError};

/// What a fit-check would do, computed without mutating the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitDecision {
    /// Move `item` (currently last visible, `width` cells wide) to overflow.
    Contract { item: ItemId, width: u16 },
    /// Move `item` (currently first in overflow) back into the row.
    /// `reserved` is the moved-width entry the decision was based on.
    Expand { item: ItemId, reserved: u16 },
    /// Leave both sets unchanged.
    Hold,
}

/// Result of one [`OverflowEngine::check_fit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// One item moved from the row into overflow.
    Contracted { item: ItemId, width: u16 },
    /// One item moved from overflow back into the row.
    Expanded { item: ItemId, reserved: u16 },
    /// Nothing needed to move for the current measurements.
    Stable,
    /// Measurements were unavailable; retried on the next trigger.
    Unmeasured(MeasureError),
}

impl FitOutcome {
    /// Whether an item moved (and the row must be re-rendered).
    #[inline]
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(self, Self::Contracted { .. } | Self::Expanded { .. })
    }

    /// Stable string label, used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contracted { .. } => "contract",
            Self::Expanded { .. } => "expand",
            Self::Stable => "stable",
            Self::Unmeasured(_) => "unmeasured",
        }
    }
}

/// Counters over the engine's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitStats {
    /// Total fit-checks.
    pub checks: u64,
    /// Fit-checks that contracted.
    pub contractions: u64,
    /// Fit-checks that expanded.
    pub expansions: u64,
    /// Fit-checks skipped for missing measurements.
    pub unmeasured: u64,
}

/// Splits an ordered item list into a visible prefix and overflow suffix.
#[derive(Debug, Clone, Default)]
pub struct OverflowEngine {
    items: Vec<ItemId>,
    boundary: usize,
    moved: MovedWidths,
    expansion_margin: u16,
    stats: FitStats,
}

impl OverflowEngine {
    /// Seed the engine with every item visible.
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Self {
        let mut ids = Vec::new();
        extend_unique(&mut ids, items);
        let boundary = ids.len();
        Self {
            items: ids,
            boundary,
            moved: MovedWidths::new(),
            expansion_margin: 0,
            stats: FitStats::default(),
        }
    }

    /// Extra spare width required before an item is pulled back.
    #[must_use]
    pub fn with_expansion_margin(mut self, margin: u16) -> Self {
        self.expansion_margin = margin;
        self
    }

    /// Change the expansion margin. Takes effect on the next fit-check.
    pub fn set_expansion_margin(&mut self, margin: u16) {
        self.expansion_margin = margin;
    }

    /// Current expansion margin.
    #[inline]
    #[must_use]
    pub fn expansion_margin(&self) -> u16 {
        self.expansion_margin
    }

    /// Replace the whole item set. Every item becomes visible again and the
    /// moved-width stack is cleared.
    pub fn reset(&mut self, items: impl IntoIterator<Item = ItemId>) {
        self.items.clear();
        extend_unique(&mut self.items, items);
        self.boundary = self.items.len();
        self.moved.clear();
    }

    /// Items in the row, in original order.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> &[ItemId] {
        &self.items[..self.boundary]
    }

    /// Items in overflow, in original order.
    #[inline]
    #[must_use]
    pub fn overflow(&self) -> &[ItemId] {
        &self.items[self.boundary..]
    }

    /// Every item in original order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Index of the first overflowed item (equals `items().len()` when
    /// nothing overflows).
    #[inline]
    #[must_use]
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Whether any item is in overflow.
    #[inline]
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.boundary < self.items.len()
    }

    /// Pre-move widths of overflowed items, oldest contraction first.
    #[inline]
    #[must_use]
    pub fn moved_widths(&self) -> &MovedWidths {
        &self.moved
    }

    /// Lifetime counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> FitStats {
        self.stats
    }

    /// Decide what the next fit-check would do, without moving anything.
    pub fn decide<M: Measure + ?Sized>(&self, measure: &M) -> Result<FitDecision, MeasureError> {
        if self.items.is_empty() {
            return Ok(FitDecision::Hold);
        }

        let container = measure.container_width()?;
        let row = measure.row_width()?;

        if let Some(&item) = self.visible().last()
            && row > container
        {
            let width = measure.item_width(item)?;
            return Ok(FitDecision::Contract { item, width });
        }

        if let (Some(&item), Some(reserved)) = (self.overflow().first(), self.moved.last()) {
            let needed = row as u32 + reserved as u32 + self.expansion_margin as u32;
            if container as u32 > needed {
                return Ok(FitDecision::Expand { item, reserved });
            }
        }

        Ok(FitDecision::Hold)
    }

    /// Run one fit-check: measure, then move at most one item.
    ///
    /// The caller must re-render after a move and call this again with the
    /// fresh measurements; repeated calls converge in at most
    /// `items().len()` moves for fixed item widths.
    pub fn check_fit<M: Measure + ?Sized>(&mut self, measure: &M) -> FitOutcome {
        self.stats.checks += 1;

        let outcome = match self.decide(measure) {
            Ok(FitDecision::Contract { item, width }) => {
                self.boundary -= 1;
                self.moved.push(width);
                self.stats.contractions += 1;
                FitOutcome::Contracted { item, width }
            }
            Ok(FitDecision::Expand { item, reserved }) => {
                self.boundary += 1;
                self.moved.pop();
                self.stats.expansions += 1;
                FitOutcome::Expanded { item, reserved }
            }
            Ok(FitDecision::Hold) => FitOutcome::Stable,
            Err(err) => {
                self.stats.unmeasured += 1;
                prionav_core::debug!(target: "prionav.fit", error = %err, "fit_check_deferred");
                FitOutcome::Unmeasured(err)
            }
        };

        debug_assert_eq!(self.moved.len(), self.items.len() - self.boundary);

        if outcome.moved() {
            prionav_core::debug!(
                target: "prionav.fit",
                action = outcome.as_str(),
                boundary = self.boundary,
                overflow = self.items.len() - self.boundary,
                "fit_check_moved"
            );
        }

        outcome
    }
}

/// Append `items` to `out`, skipping ids already present.
fn extend_unique(out: &mut Vec<ItemId>, items: impl IntoIterator<Item = ItemId>) {
    let mut seen: HashSet<ItemId> = out.iter().copied().collect();
    for id in items {
        if seen.insert(id) {
            out.push(id);
        } else {
            prionav_core::debug!(target: "prionav.fit", item = id.get(), "duplicate item id dropped");
        }
    }
}

#![forbid(unsafe_code)]

//! Width measurement capability.
//!
//! The engine never measures anything itself. It asks a [`Measure`]
//! implementation for the container width, the total row width, and the
//! rendered width of individual items. Any of those may be unavailable
//! (nothing mounted yet, or an item that was not rendered in the last
//! commit); the engine treats that as "skip this cycle".

use std::fmt;

use prionav_core::item::ItemId;

use crate::ledger::WidthLedger;

/// Why a measurement could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureError {
    /// Container or row has not been laid out yet.
    NotMounted,
    /// No width is registered for this item in the last commit.
    MissingItem(ItemId),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureError::NotMounted => write!(f, "container is not mounted"),
            MeasureError::MissingItem(id) => write!(f, "no rendered width for {id}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Read access to committed layout widths, in cells.
pub trait Measure {
    /// Available width of the outer container.
    fn container_width(&self) -> Result<u16, MeasureError>;

    /// Total width of the rendered row, including any trailing controls.
    fn row_width(&self) -> Result<u16, MeasureError>;

    /// Rendered width of one visible item.
    fn item_width(&self, id: ItemId) -> Result<u16, MeasureError>;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn container_width(&self) -> Result<u16, MeasureError> {
        (**self).container_width()
    }

    fn row_width(&self) -> Result<u16, MeasureError> {
        (**self).row_width()
    }

    fn item_width(&self, id: ItemId) -> Result<u16, MeasureError> {
        (**self).item_width(id)
    }
}

/// Snapshot of one committed row.
///
/// Built by whoever renders the row, after the render, and handed to the
/// engine for the next fit-check. `None` widths mean "not laid out".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMeasurement {
    container_width: Option<u16>,
    row_width: Option<u16>,
    items: WidthLedger,
}

impl RowMeasurement {
    /// A snapshot where nothing is mounted.
    #[must_use]
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// A snapshot with known container and row widths.
    #[must_use]
    pub fn new(container_width: u16, row_width: u16, items: WidthLedger) -> Self {
        Self {
            container_width: Some(container_width),
            row_width: Some(row_width),
            items,
        }
    }

    /// Lay `visible` out back to back and measure the result.
    ///
    /// `trailing` is the width of chrome rendered after the items (the
    /// overflow trigger, for instance). Row width saturates at `u16::MAX`.
    #[must_use]
    pub fn simulate(
        container_width: u16,
        visible: &[ItemId],
        trailing: u16,
        mut width_of: impl FnMut(ItemId) -> u16,
    ) -> Self {
        let mut items = WidthLedger::new();
        items.begin_pass();
        let mut row: u32 = trailing as u32;
        for &id in visible {
            let w = width_of(id);
            items.record(id, w);
            row += w as u32;
        }
        let row_width = u16::try_from(row).unwrap_or(u16::MAX);
        Self::new(container_width, row_width, items)
    }

    /// Replace the container width, keeping the row as committed.
    ///
    /// Models a resize observed before the next render.
    #[must_use]
    pub fn with_container_width(mut self, width: u16) -> Self {
        self.container_width = Some(width);
        self
    }

    /// The per-item widths in this snapshot.
    #[must_use]
    pub fn items(&self) -> &WidthLedger {
        &self.items
    }
}

impl Measure for RowMeasurement {
    fn container_width(&self) -> Result<u16, MeasureError> {
        self.container_width.ok_or(MeasureError::NotMounted)
    }

    fn row_width(&self) -> Result<u16, MeasureError> {
        self.row_width.ok_or(MeasureError::NotMounted)
    }

    fn item_width(&self, id: ItemId) -> Result<u16, MeasureError> {
        self.items.get(id).ok_or(MeasureError::MissingItem(id))
    }
}

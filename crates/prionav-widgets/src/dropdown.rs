#![forbid(unsafe_code)]

//! Overflow popup.
//!
//! [`OverflowRenderer`] draws the items that did not fit, in their original
//! order, in a box anchored one row below the trigger. Every drawn row is
//! reported back keyed by the item's [`ItemId`], so hit-testing survives
//! the list changing between frames.

use prionav_core::geometry::Rect;
use prionav_core::item::ItemId;
use prionav_render::buffer::Buffer;
use prionav_render::cell::Cell;
use prionav_render::style::Style;
use prionav_render::{display_width, width_u16};

use crate::priority_nav::NavItem;
use crate::{draw_text_span, set_style_area};

/// Draws the overflow popup.
pub trait OverflowRenderer {
    /// Width and height the popup wants for `items`.
    fn size(&self, items: &[&NavItem]) -> (u16, u16);

    /// Draw `items` into `area` and return the row drawn for each item.
    ///
    /// Items that do not fit in `area` get no row.
    fn render(&self, area: Rect, buf: &mut Buffer, items: &[&NavItem]) -> Vec<(ItemId, Rect)>;
}

/// Default popup: one item per line on a filled background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownList {
    style: Style,
    item_style: Style,
    padding: u16,
}

impl Default for DropdownList {
    fn default() -> Self {
        Self {
            style: Style::new().reverse(),
            item_style: Style::new(),
            padding: 1,
        }
    }
}

impl DropdownList {
    /// Popup with the default look.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Background style for the whole popup.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style patched over the background for item labels.
    #[must_use]
    pub fn item_style(mut self, style: Style) -> Self {
        self.item_style = style;
        self
    }

    /// Horizontal padding on each side of a label.
    #[must_use]
    pub fn padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }
}

impl OverflowRenderer for DropdownList {
    fn size(&self, items: &[&NavItem]) -> (u16, u16) {
        let widest = items
            .iter()
            .map(|item| width_u16(display_width(item.label())))
            .max()
            .unwrap_or(0);
        let width = widest.saturating_add(self.padding.saturating_mul(2));
        let height = u16::try_from(items.len()).unwrap_or(u16::MAX);
        (width, height)
    }

    fn render(&self, area: Rect, buf: &mut Buffer, items: &[&NavItem]) -> Vec<(ItemId, Rect)> {
        if area.is_empty() {
            return Vec::new();
        }
        buf.fill(area, Cell::default());
        set_style_area(buf, area, self.style);

        let label_style = self.style.patch(&self.item_style);
        let label_x = area.x.saturating_add(self.padding);
        let max_x = area.right().saturating_sub(self.padding);

        let mut rows = Vec::with_capacity(items.len());
        for (item, y) in items.iter().zip(area.y..area.bottom()) {
            draw_text_span(buf, label_x, y, item.label(), label_style, max_x);
            rows.push((item.id(), Rect::new(area.x, y, area.width, 1)));
        }
        rows
    }
}

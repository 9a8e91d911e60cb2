#![forbid(unsafe_code)]

//! Widgets for priority navigation bars.
//!
//! - [`PriorityNav`] - the navigation row with inline trigger and popup
//! - [`ToggleButton`] - default trigger visual ([`IconRenderer`])
//! - [`DropdownList`] - default popup ([`OverflowRenderer`])
//! - [`Toggle`] - Open/Closed state of the popup

pub mod dropdown;
pub mod priority_nav;
pub mod toggle;

pub use dropdown::{DropdownList, OverflowRenderer};
pub use priority_nav::{ItemSlot, NavHit, NavItem, NavShell, NavState, PriorityNav, RowLayout};
pub use toggle::{IconRenderer, IconSettings, Toggle, ToggleButton, ToggleState};

use prionav_core::geometry::Rect;
use prionav_render::buffer::Buffer;
use prionav_render::cell::Cell;
use prionav_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the buffer with mutable state.
    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut Self::State);
}

/// Apply a style to all cells in a rectangular area, keeping content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    let area = area.intersection(&buf.bounds());
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                style.apply_to(cell);
            }
        }
    }
}

/// Draw a text span, clipping at `max_x`. Returns the x after the last
/// drawn grapheme.
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x + w as u16 > max_x {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            style.apply_to(&mut cell);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}

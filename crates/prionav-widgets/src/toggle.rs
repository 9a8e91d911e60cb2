#![forbid(unsafe_code)]

//! Overflow trigger: the Open/Closed state and its visual.
//!
//! [`Toggle`] holds the popup state. A left click inside the trigger area,
//! or an explicit [`Toggle::toggle`], flips it. There is no timed close.
//! While the overflow set is empty the trigger is not drawn and the state
//! is held at [`ToggleState::Closed`] (see [`Toggle::sync`]).
//!
//! [`IconRenderer`] draws the trigger. [`ToggleButton`] is the default: a
//! single glyph padded by one cell on each side.

use prionav_core::event::{Event, MouseEventKind};
use prionav_core::geometry::Rect;
use prionav_render::buffer::Buffer;
use prionav_render::style::Style;
use prionav_render::{display_width, width_u16};

use crate::draw_text_span;

/// Popup visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleState {
    /// Popup hidden.
    #[default]
    Closed,
    /// Popup visible below the trigger.
    Open,
}

/// Popup state plus pointer hover over the trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggle {
    state: ToggleState,
    hovered: bool,
}

impl Toggle {
    /// Closed, not hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Whether the popup is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ToggleState::Open
    }

    /// Whether the pointer is over the trigger.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Flip Open/Closed.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            ToggleState::Closed => ToggleState::Open,
            ToggleState::Open => ToggleState::Closed,
        };
        prionav_core::debug!(target: "prionav.nav", open = self.is_open(), "toggle");
    }

    /// Force Closed.
    pub fn close(&mut self) {
        self.state = ToggleState::Closed;
    }

    /// Reconcile with the overflow set: no overflow means no trigger, so the
    /// popup closes and hover is dropped.
    pub fn sync(&mut self, has_overflow: bool) {
        if !has_overflow {
            self.state = ToggleState::Closed;
            self.hovered = false;
        }
    }

    /// Feed a pointer event given where the trigger was last drawn.
    ///
    /// Returns `true` when the event toggled the popup.
    pub fn handle_event(&mut self, event: &Event, trigger: Option<Rect>) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let Some(area) = trigger else {
            self.hovered = false;
            return false;
        };
        let (x, y) = mouse.position();
        let inside = area.contains(x, y);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.hovered = inside;
                false
            }
            _ if mouse.is_left_press() && inside => {
                self.toggle();
                true
            }
            _ => false,
        }
    }
}

/// Appearance of the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSettings {
    /// Text drawn inside the trigger.
    pub glyph: String,
    /// Style when idle.
    pub style: Style,
    /// Style patched over `style` while hovered.
    pub hover_style: Style,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            glyph: "≡".to_string(),
            style: Style::new(),
            hover_style: Style::new().reverse(),
        }
    }
}

impl IconSettings {
    /// Set the glyph.
    #[must_use]
    pub fn glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }

    /// Set the idle style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the hover style.
    #[must_use]
    pub fn hover_style(mut self, style: Style) -> Self {
        self.hover_style = style;
        self
    }

    /// Style for the given hover state.
    #[must_use]
    pub fn effective_style(&self, hovered: bool) -> Style {
        if hovered {
            self.style.patch(&self.hover_style)
        } else {
            self.style
        }
    }
}

/// Draws the overflow trigger.
///
/// The trigger sits inline at the end of the row, so its width counts
/// toward the measured row width.
pub trait IconRenderer {
    /// Cells the trigger occupies.
    fn width(&self, settings: &IconSettings) -> u16;

    /// Draw the trigger into `area` (one row, [`Self::width`] cells).
    fn render(&self, area: Rect, buf: &mut Buffer, settings: &IconSettings, toggle: &Toggle);
}

/// Default trigger: ` ≡ `.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleButton;

impl IconRenderer for ToggleButton {
    fn width(&self, settings: &IconSettings) -> u16 {
        width_u16(display_width(&settings.glyph)).saturating_add(2)
    }

    fn render(&self, area: Rect, buf: &mut Buffer, settings: &IconSettings, toggle: &Toggle) {
        if area.is_empty() {
            return;
        }
        let style = settings.effective_style(toggle.is_hovered());
        let max_x = area.right();
        let x = draw_text_span(buf, area.x, area.y, " ", style, max_x);
        let x = draw_text_span(buf, x, area.y, &settings.glyph, style, max_x);
        draw_text_span(buf, x, area.y, " ", style, max_x);
    }
}

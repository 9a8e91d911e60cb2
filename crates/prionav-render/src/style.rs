#![forbid(unsafe_code)]

//! Optional foreground/background/attribute overrides applied to cells.

use crate::cell::{Cell, PackedRgba, StyleFlags};

/// A set of optional overrides. `None` fields leave the cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground override.
    pub fg: Option<PackedRgba>,
    /// Background override.
    pub bg: Option<PackedRgba>,
    /// Attributes added to the cell.
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add bold.
    #[must_use]
    pub fn bold(self) -> Self {
        self.with_attr(StyleFlags::BOLD)
    }

    /// Add reverse video.
    #[must_use]
    pub fn reverse(self) -> Self {
        self.with_attr(StyleFlags::REVERSE)
    }

    fn with_attr(mut self, flag: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flag);
        self
    }

    /// Whether no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `child` over `self`: child fields win where set.
    #[must_use]
    pub fn patch(&self, child: &Style) -> Style {
        Style {
            fg: child.fg.or(self.fg),
            bg: child.bg.or(self.bg),
            attrs: match (self.attrs, child.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => b.or(a),
            },
        }
    }

    /// Apply the overrides to `cell`.
    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.attrs |= attrs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_style_is_noop() {
        let mut cell = Cell::from_char('a');
        let before = cell;
        Style::default().apply_to(&mut cell);
        assert_eq!(cell, before);
        assert!(Style::new().is_empty());
    }

    #[test]
    fn apply_sets_colors_and_attrs() {
        let mut cell = Cell::default();
        Style::new()
            .fg(PackedRgba::rgb(1, 2, 3))
            .bg(PackedRgba::BLACK)
            .bold()
            .apply_to(&mut cell);
        assert_eq!(cell.fg, PackedRgba::rgb(1, 2, 3));
        assert_eq!(cell.bg, PackedRgba::BLACK);
        assert!(cell.attrs.contains(StyleFlags::BOLD));
    }

    #[test]
    fn patch_prefers_child_and_unions_attrs() {
        let parent = Style::new().fg(PackedRgba::WHITE).bold();
        let child = Style::new().fg(PackedRgba::BLACK).reverse();
        let merged = parent.patch(&child);
        assert_eq!(merged.fg, Some(PackedRgba::BLACK));
        let attrs = merged.attrs.unwrap_or_default();
        assert!(attrs.contains(StyleFlags::BOLD | StyleFlags::REVERSE));
    }
}

#![forbid(unsafe_code)]

//! Render kernel: styled cells and the buffer grid widgets draw into.

pub mod buffer;
pub mod cell;
pub mod style;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal cells.
///
/// Sums grapheme widths so combining sequences count once.
#[inline]
pub fn display_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Display width of a single grapheme cluster.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

/// Saturating conversion of a display width to cell units.
#[inline]
pub fn width_u16(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

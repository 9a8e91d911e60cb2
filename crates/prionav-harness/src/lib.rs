#![forbid(unsafe_code)]

//! Test harness for priority navigation bars.
//!
//! - [`buffer_to_text`] / [`diff_text`]: readable assertions on rendered
//!   buffers
//! - [`NavFixture`]: widget, state, and runtime wired together on a virtual
//!   clock
//! - [`resize_storm`]: deterministic resize sequences and their replay
//!
//! # Quick Start
//!
//! ```
//! use prionav_harness::NavFixture;
//! use prionav_runtime::NavConfig;
//! use prionav_widgets::{NavItem, PriorityNav};
//!
//! let nav = PriorityNav::new(NavItem::sequence(["Home", "Blog", "About"]));
//! let mut fx = NavFixture::new(nav, NavConfig::default().with_item_spacing(1));
//! fx.mount(30);
//! assert_eq!(fx.text(), "Home  Blog  About");
//! ```

pub mod resize_storm;

use std::fmt::Write as FmtWrite;
use std::time::{Duration, Instant};

use prionav_core::event::{Event, MouseEvent};
use prionav_core::geometry::Rect;
use prionav_render::buffer::Buffer;
use prionav_runtime::{DebounceAction, NavConfig, NavRuntime, SettleReport};
use prionav_widgets::{NavHit, NavState, PriorityNav, StatefulWidget};

pub use prionav_render::buffer;
pub use prionav_render::cell;

// ============================================================================
// Buffer → Text Conversion
// ============================================================================

/// Convert a `Buffer` to plain text, one line per row.
///
/// Empty cells become spaces. Continuation cells (trailing cells of wide
/// characters) are skipped so wide characters occupy their natural display
/// width in the output string.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let capacity = (buf.width() as usize + 1) * buf.height() as usize;
    let mut out = String::with_capacity(capacity);

    for y in 0..buf.height() {
        if y > 0 {
            out.push('\n');
        }
        for cell in buf.row_cells(y) {
            if cell.is_continuation() {
                continue;
            }
            out.push(cell.content.as_char().unwrap_or(' '));
        }
    }
    out
}

/// [`buffer_to_text`] with trailing spaces and trailing blank lines removed.
pub fn buffer_to_trimmed_text(buf: &Buffer) -> String {
    let text = buffer_to_text(buf);
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let keep = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(0, |i| i + 1);
    lines[..keep].join("\n")
}

/// Line diff of two texts.
///
/// Lines prefixed with ` ` are identical, `-` only in `expected`, `+` only
/// in `actual`. Returns an empty string when the inputs are identical.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        let exp = expected_lines.get(i).copied();
        let act = actual_lines.get(i).copied();

        let _ = match (exp, act) {
            (Some(e), Some(a)) if e == a => writeln!(out, " {e}"),
            (Some(e), Some(a)) => {
                has_diff = true;
                writeln!(out, "-{e}").and_then(|()| writeln!(out, "+{a}"))
            }
            (Some(e), None) => {
                has_diff = true;
                writeln!(out, "-{e}")
            }
            (None, Some(a)) => {
                has_diff = true;
                writeln!(out, "+{a}")
            }
            (None, None) => Ok(()),
        };
    }

    if has_diff { out } else { String::new() }
}

/// Assert that a buffer renders to `expected` (trailing whitespace ignored).
#[track_caller]
pub fn assert_buffer_text(buf: &Buffer, expected: &str) {
    let actual = buffer_to_trimmed_text(buf);
    let expected: Vec<&str> = expected.lines().map(str::trim_end).collect();
    let expected = expected.join("\n");
    let expected = expected.trim_end_matches('\n');
    if actual != expected {
        let diff = diff_text(expected, &actual);
        panic!("\n=== Buffer mismatch ===\nDiff (- expected, + actual):\n{diff}");
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// A navigation bar, its state and its runtime on a virtual clock.
///
/// The row is rendered at the runtime's current container width. The
/// buffer is at least that wide and tall enough for the open popup, or the
/// size given to [`NavFixture::with_screen`] when larger.
#[derive(Debug)]
pub struct NavFixture {
    nav: PriorityNav,
    state: NavState,
    runtime: NavRuntime,
    clock: Instant,
    viewport: u16,
    screen: (u16, u16),
}

impl NavFixture {
    /// Wire `nav` to a fresh runtime with `config`. The runtime hands
    /// `config` to every commit, so it governs both layout and timing.
    pub fn new(nav: PriorityNav, config: NavConfig) -> Self {
        let runtime = NavRuntime::new(nav.ids(), config);
        Self {
            nav,
            state: NavState::default(),
            runtime,
            clock: Instant::now(),
            viewport: 0,
            screen: (0, 0),
        }
    }

    /// Minimum buffer size for [`Self::render`].
    #[must_use]
    pub fn with_screen(mut self, width: u16, height: u16) -> Self {
        self.screen = (width, height);
        self
    }

    /// Mount at `width` and settle.
    pub fn mount(&mut self, width: u16) -> Option<SettleReport> {
        self.viewport = width;
        let mut shell = self.nav.shell(&mut self.state);
        self.runtime.mount_at(width, self.clock, &mut shell)
    }

    /// Deliver a terminal resize event at the current virtual time.
    pub fn resize(&mut self, width: u16) -> DebounceAction {
        self.viewport = width;
        self.runtime
            .handle_event_at(&Event::Resize { width, height: 1 }, self.clock)
    }

    /// Tear down at the current virtual time.
    pub fn unmount(&mut self) {
        self.runtime.unmount_at(self.clock);
    }

    /// Advance the virtual clock and run any due recomputation.
    pub fn advance(&mut self, by: Duration) -> Option<SettleReport> {
        self.clock += by;
        self.tick()
    }

    /// Run a due recomputation at the current virtual time.
    pub fn tick(&mut self) -> Option<SettleReport> {
        let mut shell = self.nav.shell(&mut self.state);
        self.runtime.tick_settle_at(self.clock, &mut shell)
    }

    /// Resize and, for a zero delay, recompute immediately.
    pub fn resize_and_settle(&mut self, width: u16) -> Option<SettleReport> {
        self.resize(width);
        self.advance(self.runtime.config().resize_debounce_delay)
    }

    /// Left click at `(x, y)` in the last render.
    pub fn click(&mut self, x: u16, y: u16) -> Option<NavHit> {
        self.state
            .handle_event(&Event::Mouse(MouseEvent::left_click(x, y)))
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.clock
    }

    /// Render into a fresh buffer.
    pub fn render(&mut self) -> Buffer {
        let width = self.runtime.container_width().unwrap_or(self.viewport).max(1);
        let popup_rows = u16::try_from(self.runtime.overflow().len()).unwrap_or(u16::MAX - 1);
        let (screen_w, screen_h) = self.screen;
        let mut buf = Buffer::new(width.max(screen_w), (popup_rows + 1).max(screen_h));
        self.nav
            .render(Rect::new(0, 0, width, 1), &mut buf, &mut self.state);
        buf
    }

    /// Render and convert to trimmed text.
    pub fn text(&mut self) -> String {
        let buf = self.render();
        buffer_to_trimmed_text(&buf)
    }

    /// The widget.
    pub fn nav(&self) -> &PriorityNav {
        &self.nav
    }

    /// The widget state.
    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// Mutable widget state.
    pub fn state_mut(&mut self) -> &mut NavState {
        &mut self.state
    }

    /// The runtime.
    pub fn runtime(&self) -> &NavRuntime {
        &self.runtime
    }

    /// Mutable runtime.
    pub fn runtime_mut(&mut self) -> &mut NavRuntime {
        &mut self.runtime
    }
}

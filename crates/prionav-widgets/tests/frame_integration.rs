#![forbid(unsafe_code)]

//! End-to-end: runtime, widget, and buffer together.
//!
//! Items are 100 cells wide with zero spacing so row arithmetic matches the
//! walkthroughs in the crate docs; the trigger adds 3 cells.

use std::time::{Duration, Instant};

use prionav_core::event::{Event, MouseEvent};
use prionav_core::geometry::Rect;
use prionav_core::item::ItemId;
use prionav_render::buffer::Buffer;
use prionav_runtime::{NavConfig, NavRuntime};
use prionav_widgets::{NavHit, NavItem, NavState, PriorityNav, StatefulWidget};

fn wide_items(n: usize) -> Vec<NavItem> {
    (0..n)
        .map(|i| {
            let c = char::from(b'a' + i as u8);
            NavItem::new(ItemId::from_index(i), c.to_string().repeat(100))
        })
        .collect()
}

struct Harness {
    nav: PriorityNav,
    state: NavState,
    runtime: NavRuntime,
}

impl Harness {
    fn new(n: usize, config: NavConfig) -> Self {
        let nav = PriorityNav::new(wide_items(n));
        let runtime = NavRuntime::new(nav.ids(), config.with_item_spacing(0));
        Self {
            nav,
            state: NavState::default(),
            runtime,
        }
    }

    fn mount(&mut self, width: u16) {
        let mut shell = self.nav.shell(&mut self.state);
        self.runtime.mount(width, &mut shell);
    }

    fn resize(&mut self, width: u16, now: Instant) {
        self.runtime.on_resize_at(width, now);
        let mut shell = self.nav.shell(&mut self.state);
        self.runtime.tick_settle_at(now, &mut shell);
    }

    fn render(&mut self, width: u16) -> Buffer {
        let mut buf = Buffer::new(width, 6);
        self.nav
            .render(Rect::new(0, 0, width, 1), &mut buf, &mut self.state);
        buf
    }

    fn visible(&self) -> Vec<u64> {
        self.runtime.visible().iter().map(|id| id.get()).collect()
    }

    fn overflow(&self) -> Vec<u64> {
        self.runtime.overflow().iter().map(|id| id.get()).collect()
    }
}

#[test]
fn everything_fits_without_trigger() {
    let mut h = Harness::new(3, NavConfig::default());
    h.mount(300);
    assert_eq!(h.visible(), vec![0, 1, 2]);
    assert!(h.overflow().is_empty());
    h.render(300);
    assert_eq!(h.state.trigger_area(), None);
}

#[test]
fn narrow_container_moves_last_item_behind_trigger() {
    let mut h = Harness::new(3, NavConfig::default());
    h.mount(250);
    assert_eq!(h.visible(), vec![0, 1]);
    assert_eq!(h.overflow(), vec![2]);
    h.render(250);
    assert_eq!(h.state.trigger_area(), Some(Rect::new(200, 0, 3, 1)));
}

#[test]
fn widening_restores_overflowed_item() {
    let mut h = Harness::new(3, NavConfig::default());
    h.mount(250);
    h.resize(320, Instant::now());
    assert_eq!(h.visible(), vec![0, 1, 2]);
    assert!(h.overflow().is_empty());
    assert!(h.runtime.engine().moved_widths().is_empty());
}

#[test]
fn single_item_returns_only_when_it_fits_again() {
    let mut h = Harness::new(1, NavConfig::default());
    h.mount(50);
    assert!(h.visible().is_empty());
    assert_eq!(h.overflow(), vec![0]);

    let t0 = Instant::now();
    h.resize(90, t0);
    assert_eq!(h.overflow(), vec![0]);
    h.resize(150, t0 + Duration::from_millis(1));
    assert_eq!(h.visible(), vec![0]);
    assert!(h.overflow().is_empty());
}

#[test]
fn resize_burst_commits_only_final_width() {
    let config = NavConfig::default().with_resize_debounce_delay(Duration::from_millis(40));
    let mut h = Harness::new(3, config);
    h.mount(300);
    let commits_after_mount = h.state.commits();

    let t0 = Instant::now();
    for (i, w) in [290u16, 270, 240, 220, 150].into_iter().enumerate() {
        h.runtime
            .on_resize_at(w, t0 + Duration::from_millis(i as u64 * 10));
    }
    assert_eq!(h.state.commits(), commits_after_mount);

    let mut shell = h.nav.shell(&mut h.state);
    assert!(h.runtime.tick_settle_at(t0 + Duration::from_millis(50), &mut shell).is_none());
    let report = h
        .runtime
        .tick_settle_at(t0 + Duration::from_millis(80), &mut shell)
        .expect("fired");
    assert_eq!(report.container_width, 150);
    assert_eq!(h.runtime.stats().resize_checks, 1);
    assert_eq!(h.visible(), vec![0]);
}

#[test]
fn popup_lists_overflow_in_order_and_reports_clicks() {
    let mut h = Harness::new(4, NavConfig::default());
    h.mount(150);
    assert_eq!(h.overflow(), vec![1, 2, 3]);

    h.render(150);
    let trigger = h.state.trigger_area().expect("trigger drawn");
    let click = Event::Mouse(MouseEvent::left_click(trigger.x + 1, trigger.y));
    assert_eq!(h.state.handle_event(&click), Some(NavHit::Trigger));

    let buf = h.render(150);
    let popup = h.state.popup_area().expect("popup open");
    assert_eq!(popup.y, 1);
    let keys: Vec<_> = h.state.popup_rows().iter().map(|(id, _)| id.get()).collect();
    assert_eq!(keys, vec![1, 2, 3]);
    assert_eq!(
        buf.get(popup.x + 1, 2).and_then(|c| c.content.as_char()),
        Some('c')
    );

    let pick = Event::Mouse(MouseEvent::left_click(popup.x + 1, 3));
    assert_eq!(h.state.handle_event(&pick), Some(NavHit::OverflowItem(ItemId(3))));
}

#[test]
fn popup_closes_when_everything_fits_again() {
    let mut h = Harness::new(2, NavConfig::default());
    h.mount(150);
    h.state.toggle_popup();
    assert!(h.state.toggle().is_open());

    h.resize(300, Instant::now());
    assert!(h.overflow().is_empty());
    assert!(!h.state.toggle().is_open());
    h.render(300);
    assert_eq!(h.state.popup_area(), None);
}

#[test]
fn unmount_freezes_the_layout() {
    let config = NavConfig::default().with_resize_debounce_delay(Duration::from_millis(40));
    let mut h = Harness::new(3, config);
    h.mount(300);
    let t0 = Instant::now();
    h.runtime.on_resize_at(120, t0);
    h.runtime.unmount();

    let mut shell = h.nav.shell(&mut h.state);
    assert!(h.runtime.tick_settle_at(t0 + Duration::from_secs(1), &mut shell).is_none());
    assert_eq!(h.visible(), vec![0, 1, 2]);
}

//! Trailing-edge resize debouncer.
//!
//! A burst of resize events collapses into a single fit recomputation that
//! uses the width from the last event in the burst. Each event cancels the
//! pending recomputation and schedules a fresh one `delay` later.
//!
//! - **Latest-wins**: the width delivered on fire is always the most recent.
//! - **Generation tokens**: every schedule issues a [`PendingResize`] with a
//!   new generation. A host that drives the debouncer from its own timers
//!   hands the token back through [`ResizeDebouncer::fire`]; a token that has
//!   been superseded or cancelled is ignored.
//! - **Deterministic**: all time-dependent methods have an `_at(now)` form.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use prionav_runtime::debounce::{DebounceAction, ResizeDebouncer};
//!
//! let mut debouncer = ResizeDebouncer::new(Duration::from_millis(50));
//! let t0 = Instant::now();
//!
//! debouncer.handle_resize_at(120, t0);
//! debouncer.handle_resize_at(90, t0 + Duration::from_millis(20));
//! assert_eq!(debouncer.tick_at(t0 + Duration::from_millis(60)), DebounceAction::None);
//!
//! match debouncer.tick_at(t0 + Duration::from_millis(70)) {
//!     DebounceAction::Fire { width, coalesced, .. } => {
//!         assert_eq!(width, 90);
//!         assert_eq!(coalesced, 2);
//!     }
//!     other => panic!("expected fire, got {other:?}"),
//! }
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `delay = 0` | Fires on the next tick, never inside `handle_resize` |
//! | Stale token passed to `fire` | `Ignored`, logged as `ignore_stale` |
//! | Event after `cancel` | Scheduled normally; `cancel` is not terminal |
//! | Clock goes backwards | Elapsed time reads as zero |

#![forbid(unsafe_code)]

use std::fmt;
use std::time::{Duration, Instant};

fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// A scheduled recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResize {
    /// Monotonic schedule number; only the newest generation may fire.
    pub generation: u64,
    /// Container width carried by the most recent event.
    pub width: u16,
    /// When the recomputation becomes due.
    pub due: Instant,
}

/// What the caller should do after feeding the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceAction {
    /// Nothing to do.
    None,
    /// A recomputation is pending; `token` identifies it.
    Scheduled(PendingResize),
    /// Recompute the layout now against `width`.
    Fire {
        /// Width from the last event in the burst.
        width: u16,
        /// Number of events folded into this fire.
        coalesced: u32,
        /// Time from the first event of the burst to the fire.
        waited: Duration,
    },
    /// A token was handed back after being superseded or cancelled.
    Ignored,
}

impl DebounceAction {
    /// Width to recompute against, when this action fires.
    #[must_use]
    pub fn fired_width(&self) -> Option<u16> {
        match self {
            DebounceAction::Fire { width, .. } => Some(*width),
            _ => None,
        }
    }
}

/// One recorded debouncer decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DebounceLog {
    /// Elapsed time since logging started (ms).
    pub elapsed_ms: f64,
    /// Index of the resize event this decision concerns.
    pub event_idx: u64,
    /// `schedule`, `reschedule`, `fire`, `cancel` or `ignore_stale`.
    pub action: &'static str,
    /// Generation of the token involved.
    pub generation: u64,
    /// Width carried by the token, if any.
    pub width: Option<u16>,
    /// Burst length so far.
    pub coalesced: u32,
}

impl DebounceLog {
    /// Serialize as a single JSON object.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let width = self
            .width
            .map_or_else(|| "null".to_string(), |w| w.to_string());
        format!(
            r#"{{"event":"debounce","idx":{},"elapsed_ms":{:.3},"action":"{}","generation":{},"width":{},"coalesced":{}}}"#,
            self.event_idx, self.elapsed_ms, self.action, self.generation, width, self.coalesced
        )
    }
}

/// Debouncer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceStats {
    /// Resize events received.
    pub events: u64,
    /// Recomputations fired.
    pub fires: u64,
    /// Events superseded by a later event before firing.
    pub superseded: u64,
    /// Pending recomputations dropped by `cancel`.
    pub cancelled: u64,
    /// Stale tokens handed back to `fire`.
    pub stale: u64,
}

type OnDecision = Box<dyn Fn(&DebounceLog) + Send + Sync>;

/// Callbacks for observing debouncer decisions.
#[derive(Default)]
pub struct DebounceHooks {
    on_decision: Option<OnDecision>,
    emit_tracing: bool,
}

impl fmt::Debug for DebounceHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceHooks")
            .field("on_decision", &self.on_decision.is_some())
            .field("emit_tracing", &self.emit_tracing)
            .finish()
    }
}

impl DebounceHooks {
    /// Hooks with no callbacks and tracing off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `callback` for every decision.
    #[must_use]
    pub fn on_decision<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DebounceLog) + Send + Sync + 'static,
    {
        self.on_decision = Some(Box::new(callback));
        self
    }

    /// Emit a `prionav.resize` tracing event for every decision.
    #[must_use]
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.emit_tracing = enabled;
        self
    }

    fn dispatch(&self, entry: &DebounceLog) {
        if let Some(ref cb) = self.on_decision {
            cb(entry);
        }
        if self.emit_tracing {
            tracing::debug!(
                target: "prionav.resize",
                action = entry.action,
                generation = entry.generation,
                width = entry.width,
                coalesced = entry.coalesced,
                "resize debounce decision"
            );
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Burst {
    token: PendingResize,
    started: Instant,
    coalesced: u32,
}

/// Trailing-edge debouncer for container resize events.
#[derive(Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<Burst>,
    generation: u64,
    stats: DebounceStats,
    enable_logging: bool,
    log_start: Option<Instant>,
    logs: Vec<DebounceLog>,
    hooks: DebounceHooks,
}

impl ResizeDebouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
            stats: DebounceStats::default(),
            enable_logging: false,
            log_start: None,
            logs: Vec::new(),
            hooks: DebounceHooks::default(),
        }
    }

    /// Record decisions in [`Self::logs`].
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Attach decision hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: DebounceHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Change the quiet period. A pending recomputation keeps its due time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Current quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle a resize event using the wall clock.
    pub fn handle_resize(&mut self, width: u16) -> DebounceAction {
        self.handle_resize_at(width, Instant::now())
    }

    /// Handle a resize event at `now`.
    ///
    /// Never fires: even with a zero delay the recomputation waits for the
    /// next tick, so a burst delivered within one frame collapses.
    pub fn handle_resize_at(&mut self, width: u16, now: Instant) -> DebounceAction {
        self.stats.events += 1;
        self.generation += 1;
        let token = PendingResize {
            generation: self.generation,
            width,
            due: now + self.delay,
        };

        let (action, started, coalesced) = match self.pending.take() {
            Some(prev) => {
                self.stats.superseded += 1;
                ("reschedule", prev.started, prev.coalesced.saturating_add(1))
            }
            None => ("schedule", now, 1),
        };
        self.pending = Some(Burst {
            token,
            started,
            coalesced,
        });
        self.log_decision(now, action, Some(token.generation), Some(width));
        DebounceAction::Scheduled(token)
    }

    /// Poll using the wall clock.
    pub fn tick(&mut self) -> DebounceAction {
        self.tick_at(Instant::now())
    }

    /// Fire the pending recomputation if it is due at `now`.
    pub fn tick_at(&mut self, now: Instant) -> DebounceAction {
        match self.pending {
            Some(burst) if now >= burst.token.due => self.fire_pending(now),
            _ => DebounceAction::None,
        }
    }

    /// Fire `token` from an external timer.
    ///
    /// Only the newest outstanding token fires; anything else is ignored.
    pub fn fire(&mut self, token: PendingResize, now: Instant) -> DebounceAction {
        if self.is_current(&token) {
            return self.fire_pending(now);
        }
        self.stats.stale += 1;
        self.log_decision(now, "ignore_stale", Some(token.generation), Some(token.width));
        DebounceAction::Ignored
    }

    /// Drop any pending recomputation using the wall clock.
    pub fn cancel(&mut self) {
        self.cancel_at(Instant::now());
    }

    /// Drop any pending recomputation at `now`. Outstanding tokens become
    /// stale.
    pub fn cancel_at(&mut self, now: Instant) {
        if let Some(burst) = self.pending.take() {
            self.stats.cancelled += 1;
            self.generation += 1;
            self.log_decision_with(
                now,
                "cancel",
                Some(burst.token.generation),
                Some(burst.token.width),
                burst.coalesced,
            );
        }
    }

    /// Whether `token` is the one that would fire next.
    #[must_use]
    pub fn is_current(&self, token: &PendingResize) -> bool {
        self.pending
            .is_some_and(|burst| burst.token.generation == token.generation)
    }

    /// Whether a recomputation is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding token, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PendingResize> {
        self.pending.map(|burst| burst.token)
    }

    /// Time remaining until the pending recomputation is due.
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|burst| burst.token.due.saturating_duration_since(now))
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> DebounceStats {
        self.stats
    }

    /// Recorded decisions (empty unless logging is enabled).
    #[must_use]
    pub fn logs(&self) -> &[DebounceLog] {
        &self.logs
    }

    /// Drop recorded decisions.
    pub fn clear_logs(&mut self) {
        self.logs.clear();
        self.log_start = None;
    }

    /// All recorded decisions as newline-separated JSON objects.
    #[must_use]
    pub fn decision_logs_jsonl(&self) -> String {
        self.logs
            .iter()
            .map(DebounceLog::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn fire_pending(&mut self, now: Instant) -> DebounceAction {
        let Some(burst) = self.pending.take() else {
            return DebounceAction::None;
        };
        self.stats.fires += 1;
        let waited = duration_since_or_zero(now, burst.started);
        self.log_decision_with(
            now,
            "fire",
            Some(burst.token.generation),
            Some(burst.token.width),
            burst.coalesced,
        );
        DebounceAction::Fire {
            width: burst.token.width,
            coalesced: burst.coalesced,
            waited,
        }
    }

    fn log_decision(
        &mut self,
        now: Instant,
        action: &'static str,
        generation: Option<u64>,
        width: Option<u16>,
    ) {
        let coalesced = self.pending.map_or(0, |burst| burst.coalesced);
        self.log_decision_with(now, action, generation, width, coalesced);
    }

    fn log_decision_with(
        &mut self,
        now: Instant,
        action: &'static str,
        generation: Option<u64>,
        width: Option<u16>,
        coalesced: u32,
    ) {
        if !self.enable_logging && self.hooks.on_decision.is_none() && !self.hooks.emit_tracing {
            return;
        }
        let start = *self.log_start.get_or_insert(now);
        let entry = DebounceLog {
            elapsed_ms: duration_ms(duration_since_or_zero(now, start)),
            event_idx: self.stats.events,
            action,
            generation: generation.unwrap_or(self.generation),
            width,
            coalesced,
        };
        self.hooks.dispatch(&entry);
        if self.enable_logging {
            self.logs.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DELAY: Duration = Duration::from_millis(50);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn single_event_fires_after_delay() {
        let mut d = ResizeDebouncer::new(DELAY);
        let t0 = Instant::now();
        assert!(matches!(d.handle_resize_at(80, t0), DebounceAction::Scheduled(_)));
        assert_eq!(d.tick_at(t0 + ms(49)), DebounceAction::None);
        assert_eq!(d.tick_at(t0 + ms(50)).fired_width(), Some(80));
        assert!(!d.has_pending());
        assert_eq!(d.tick_at(t0 + ms(100)), DebounceAction::None);
    }

    #[test]
    fn burst_fires_once_with_last_width() {
        let mut d = ResizeDebouncer::new(DELAY);
        let t0 = Instant::now();
        for (i, w) in [100u16, 90, 80, 70, 60].into_iter().enumerate() {
            d.handle_resize_at(w, t0 + ms(i as u64 * 10));
        }
        let mut fires = Vec::new();
        for step in 0..20 {
            if let DebounceAction::Fire { width, coalesced, .. } = d.tick_at(t0 + ms(step * 10)) {
                fires.push((width, coalesced));
            }
        }
        assert_eq!(fires, vec![(60, 5)]);
        assert_eq!(d.stats().superseded, 4);
        assert_eq!(d.stats().fires, 1);
    }

    #[test]
    fn each_event_pushes_due_time_back() {
        let mut d = ResizeDebouncer::new(DELAY);
        let t0 = Instant::now();
        d.handle_resize_at(100, t0);
        d.handle_resize_at(90, t0 + ms(40));
        assert_eq!(d.tick_at(t0 + ms(60)), DebounceAction::None);
        assert_eq!(d.time_until_fire(t0 + ms(60)), Some(ms(30)));
        assert_eq!(d.tick_at(t0 + ms(90)).fired_width(), Some(90));
    }

    #[test]
    fn zero_delay_waits_for_tick() {
        let mut d = ResizeDebouncer::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(matches!(d.handle_resize_at(40, t0), DebounceAction::Scheduled(_)));
        assert!(d.has_pending());
        assert_eq!(d.tick_at(t0).fired_width(), Some(40));
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut d = ResizeDebouncer::new(DELAY);
        let t0 = Instant::now();
        let DebounceAction::Scheduled(first) = d.handle_resize_at(100, t0) else {
            panic!("expected schedule");
        };
        let DebounceAction::Scheduled(second) = d.handle_resize_at(70, t0 + ms(5)) else {
            panic!("expected schedule");
        };
        assert!(!d.is_current(&first));
        assert_eq!(d.fire(first, t0 + ms(50)), DebounceAction::Ignored);
        assert!(d.has_pending());
        assert_eq!(d.fire(second, t0 + ms(55)).fired_width(), Some(70));
        assert_eq!(d.fire(second, t0 + ms(56)), DebounceAction::Ignored);
        assert_eq!(d.stats().stale, 2);
    }

    #[test]
    fn cancel_invalidates_outstanding_token() {
        let mut d = ResizeDebouncer::new(DELAY);
        let t0 = Instant::now();
        let DebounceAction::Scheduled(token) = d.handle_resize_at(100, t0) else {
            panic!("expected schedule");
        };
        d.cancel();
        assert!(!d.has_pending());
        assert_eq!(d.tick_at(t0 + ms(100)), DebounceAction::None);
        assert_eq!(d.fire(token, t0 + ms(100)), DebounceAction::Ignored);
        assert_eq!(d.stats().cancelled, 1);

        // Cancel with nothing pending is a no-op.
        d.cancel();
        assert_eq!(d.stats().cancelled, 1);
    }

    #[test]
    fn cancel_is_logged_when_it_happens() {
        let mut d = ResizeDebouncer::new(DELAY).with_logging(true);
        let t0 = Instant::now();
        d.handle_resize_at(100, t0);
        d.handle_resize_at(80, t0 + ms(5));
        d.cancel_at(t0 + ms(20));

        let cancel = d.logs().last().expect("cancel logged");
        assert_eq!(cancel.action, "cancel");
        assert!((cancel.elapsed_ms - 20.0).abs() < 1e-6);
        assert_eq!(cancel.width, Some(80));
        assert_eq!(cancel.coalesced, 2);
    }

    #[test]
    fn logs_render_as_jsonl() {
        let mut d = ResizeDebouncer::new(DELAY).with_logging(true);
        let t0 = Instant::now();
        d.handle_resize_at(100, t0);
        d.handle_resize_at(90, t0 + ms(10));
        d.tick_at(t0 + ms(60));

        let actions: Vec<_> = d.logs().iter().map(|l| l.action).collect();
        assert_eq!(actions, vec!["schedule", "reschedule", "fire"]);

        let jsonl = d.decision_logs_jsonl();
        let lines: Vec<_> = jsonl.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains(r#""action":"fire""#));
        assert!(lines[2].contains(r#""width":90"#));
        assert!(lines[2].contains(r#""coalesced":2"#));

        d.clear_logs();
        assert!(d.logs().is_empty());
    }

    #[test]
    fn hooks_see_every_decision() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let hooks = DebounceHooks::new().on_decision(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut d = ResizeDebouncer::new(DELAY).with_hooks(hooks);
        let t0 = Instant::now();
        d.handle_resize_at(100, t0);
        d.cancel();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(d.logs().is_empty());
    }

    #[test]
    fn backwards_clock_reads_zero_wait() {
        let mut d = ResizeDebouncer::new(Duration::ZERO);
        let t0 = Instant::now() + ms(100);
        let DebounceAction::Scheduled(token) = d.handle_resize_at(10, t0) else {
            panic!("expected schedule");
        };
        match d.fire(token, t0 - ms(50)) {
            DebounceAction::Fire { waited, .. } => assert_eq!(waited, Duration::ZERO),
            other => panic!("expected fire, got {other:?}"),
        }
    }
}

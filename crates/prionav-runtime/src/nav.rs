#![forbid(unsafe_code)]

//! Fit cycle and lifecycle for a priority navigation bar.
//!
//! [`NavRuntime`] ties the [`OverflowEngine`] to the resize debouncer and
//! the configuration. Every layout change runs as a two-phase cycle:
//!
//! 1. **Commit**: the presentation renders the current visible and overflow
//!    sets and reports fresh measurements.
//! 2. **Decide**: one [`OverflowEngine::check_fit`] against those
//!    measurements. If an item moved, go back to 1.
//!
//! A host either drives the phases itself ([`NavRuntime::tick_at`] then
//! [`NavRuntime::after_render`] after each frame), or hands over a
//! [`FitShell`] and lets [`NavRuntime::settle`] loop until the row is
//! stable.
//!
//! # Lifecycle
//!
//! ```text
//! Unmounted --mount--> Mounted --unmount--> TornDown
//! ```
//!
//! Resize events are only observed while mounted: the width passed to
//! `mount` is the freshest one, so nothing from before mount may replace it.
//! After `unmount` every entry point is a no-op and any pending debounce
//! token is stale.
//!
//! Every commit sees the runtime's [`NavConfig`], so spacing and the width
//! floor have a single source.
//!
//! # Invariants
//!
//! - A settle loop performs at most `items + 1` fit-checks.
//! - A resize burst produces exactly one resize-triggered fit-check, against
//!   the width of the last event in the burst.

use std::time::Instant;

use prionav_core::event::Event;
use prionav_core::item::ItemId;
use prionav_layout::{FitOutcome, FitStats, Measure, MeasureError, OverflowEngine};

use crate::config::NavConfig;
use crate::debounce::{DebounceAction, PendingResize, ResizeDebouncer};

/// Presentation side of the fit cycle.
pub trait FitShell {
    /// Measurements produced by a commit.
    type Measurement: Measure;

    /// Render `visible` inline and `overflow` behind the trigger inside a
    /// container `container_width` cells wide, laid out per `config`, then
    /// measure the result.
    ///
    /// `container_width` is already floored at
    /// [`NavConfig::min_container_width`].
    ///
    /// Returns `None` when there is nothing mounted to measure.
    fn commit(
        &mut self,
        config: &NavConfig,
        container_width: u16,
        visible: &[ItemId],
        overflow: &[ItemId],
    ) -> Option<Self::Measurement>;
}

/// Lifecycle phase of a [`NavRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created; nothing rendered yet.
    Unmounted,
    /// Rendering and reacting to resizes.
    Mounted,
    /// Unmounted; all entry points are inert.
    TornDown,
}

/// What started a fit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTrigger {
    /// First render.
    Mount,
    /// Debounced container resize.
    Resize,
    /// The item list was replaced.
    ItemsChanged,
    /// Host-driven re-check after a render.
    Render,
}

impl CycleTrigger {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CycleTrigger::Mount => "mount",
            CycleTrigger::Resize => "resize",
            CycleTrigger::ItemsChanged => "items_changed",
            CycleTrigger::Render => "render",
        }
    }
}

/// Summary of one settle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleReport {
    /// What started the loop.
    pub trigger: CycleTrigger,
    /// Container width used throughout.
    pub container_width: u16,
    /// Fit-checks performed.
    pub checks: u32,
    /// Items moved into overflow.
    pub contractions: u32,
    /// Items moved back out of overflow.
    pub expansions: u32,
    /// Outcome of the last fit-check.
    pub last: FitOutcome,
}

impl SettleReport {
    fn new(trigger: CycleTrigger, container_width: u16) -> Self {
        Self {
            trigger,
            container_width,
            checks: 0,
            contractions: 0,
            expansions: 0,
            last: FitOutcome::Stable,
        }
    }

    fn record(&mut self, outcome: FitOutcome) {
        self.checks += 1;
        match outcome {
            FitOutcome::Contracted { .. } => self.contractions += 1,
            FitOutcome::Expanded { .. } => self.expansions += 1,
            FitOutcome::Stable | FitOutcome::Unmeasured(_) => {}
        }
        self.last = outcome;
    }

    /// Whether the loop ended on a stable row.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.last == FitOutcome::Stable
    }

    /// Net items moved in either direction.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.contractions + self.expansions
    }
}

/// Runtime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Fit-checks started by a debounced resize.
    pub resize_checks: u64,
    /// Fit-checks started by a render (including settle iterations).
    pub render_checks: u64,
    /// Settle loops run.
    pub settles: u64,
    /// Settle loops that hit the step bound without stabilizing.
    pub unsettled: u64,
}

/// Owner of the overflow engine, the debouncer and the configuration.
#[derive(Debug)]
pub struct NavRuntime {
    engine: OverflowEngine,
    debouncer: ResizeDebouncer,
    config: NavConfig,
    lifecycle: Lifecycle,
    container_width: Option<u16>,
    stats: RuntimeStats,
}

impl NavRuntime {
    /// Create a runtime over `items` in priority order.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = ItemId>, config: NavConfig) -> Self {
        let config = config.sanitized();
        Self {
            engine: OverflowEngine::new(items).with_expansion_margin(config.expansion_margin),
            debouncer: ResizeDebouncer::new(config.resize_debounce_delay),
            config,
            lifecycle: Lifecycle::Unmounted,
            container_width: None,
            stats: RuntimeStats::default(),
        }
    }

    /// Replace the debouncer, e.g. to enable decision logging.
    #[must_use]
    pub fn with_debouncer(mut self, debouncer: ResizeDebouncer) -> Self {
        self.debouncer = debouncer;
        self.debouncer.set_delay(self.config.resize_debounce_delay);
        self
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the runtime is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The overflow engine.
    #[must_use]
    pub fn engine(&self) -> &OverflowEngine {
        &self.engine
    }

    /// The resize debouncer.
    #[must_use]
    pub fn debouncer(&self) -> &ResizeDebouncer {
        &self.debouncer
    }

    /// Items rendered inline.
    #[must_use]
    pub fn visible(&self) -> &[ItemId] {
        self.engine.visible()
    }

    /// Items behind the trigger.
    #[must_use]
    pub fn overflow(&self) -> &[ItemId] {
        self.engine.overflow()
    }

    /// Container width after the configured floor, once one is known.
    #[must_use]
    pub fn container_width(&self) -> Option<u16> {
        self.container_width
    }

    /// Runtime counters.
    #[must_use]
    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    /// Engine counters.
    #[must_use]
    pub fn fit_stats(&self) -> FitStats {
        self.engine.stats()
    }

    /// Mount at `container_width` and settle the first layout.
    pub fn mount<S: FitShell + ?Sized>(
        &mut self,
        container_width: u16,
        shell: &mut S,
    ) -> Option<SettleReport> {
        self.mount_at(container_width, Instant::now(), shell)
    }

    /// Mount at `now`. Any recomputation still pending on the debouncer is
    /// dropped: `container_width` supersedes it.
    pub fn mount_at<S: FitShell + ?Sized>(
        &mut self,
        container_width: u16,
        now: Instant,
        shell: &mut S,
    ) -> Option<SettleReport> {
        if self.lifecycle != Lifecycle::Unmounted {
            return None;
        }
        self.debouncer.cancel_at(now);
        self.lifecycle = Lifecycle::Mounted;
        self.container_width = Some(self.config.effective_container_width(container_width));
        tracing::debug!(
            target: "prionav.nav",
            items = self.engine.items().len(),
            container_width = self.container_width,
            "mount"
        );
        Some(self.settle_with(CycleTrigger::Mount, shell))
    }

    /// Record a container resize using the wall clock.
    pub fn on_resize(&mut self, width: u16) -> DebounceAction {
        self.on_resize_at(width, Instant::now())
    }

    /// Record a container resize at `now` and schedule a recomputation.
    ///
    /// Ignored unless mounted.
    pub fn on_resize_at(&mut self, width: u16, now: Instant) -> DebounceAction {
        if !self.is_mounted() {
            return DebounceAction::None;
        }
        self.debouncer.handle_resize_at(width, now)
    }

    /// Feed an input event using the wall clock.
    pub fn handle_event(&mut self, event: &Event) -> DebounceAction {
        self.handle_event_at(event, Instant::now())
    }

    /// Feed an input event at `now`. Resizes go to the debouncer; other
    /// events are left to the presentation.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> DebounceAction {
        match *event {
            Event::Resize { width, .. } => self.on_resize_at(width, now),
            Event::Mouse(_) | Event::Tick => DebounceAction::None,
        }
    }

    /// Fire a due recomputation, performing one fit-check against `measure`.
    ///
    /// `measure` should reflect a render at the new
    /// [`container_width`](Self::container_width); callers that cannot
    /// render in between use [`Self::tick_settle_at`] instead.
    pub fn tick_at<M: Measure + ?Sized>(&mut self, now: Instant, measure: &M) -> Option<FitOutcome> {
        if !self.is_mounted() {
            return None;
        }
        let width = self.debouncer.tick_at(now).fired_width()?;
        self.apply_width(width);
        self.stats.resize_checks += 1;
        Some(self.engine.check_fit(measure))
    }

    /// Fire a due recomputation and settle it through `shell`.
    pub fn tick_settle_at<S: FitShell + ?Sized>(
        &mut self,
        now: Instant,
        shell: &mut S,
    ) -> Option<SettleReport> {
        if !self.is_mounted() {
            return None;
        }
        let width = self.debouncer.tick_at(now).fired_width()?;
        self.apply_width(width);
        Some(self.settle_with(CycleTrigger::Resize, shell))
    }

    /// Fire a token from an external timer and settle it through `shell`.
    ///
    /// Stale tokens are ignored.
    pub fn fire_settle<S: FitShell + ?Sized>(
        &mut self,
        token: PendingResize,
        now: Instant,
        shell: &mut S,
    ) -> Option<SettleReport> {
        if !self.is_mounted() {
            return None;
        }
        let width = self.debouncer.fire(token, now).fired_width()?;
        self.apply_width(width);
        Some(self.settle_with(CycleTrigger::Resize, shell))
    }

    /// One post-render fit-check.
    pub fn after_render<M: Measure + ?Sized>(&mut self, measure: &M) -> Option<FitOutcome> {
        if !self.is_mounted() {
            return None;
        }
        self.stats.render_checks += 1;
        Some(self.engine.check_fit(measure))
    }

    /// Drive commit and fit-check until the row is stable.
    pub fn settle<S: FitShell + ?Sized>(&mut self, shell: &mut S) -> Option<SettleReport> {
        if !self.is_mounted() {
            return None;
        }
        Some(self.settle_with(CycleTrigger::Render, shell))
    }

    /// Replace the item list, returning everything to the visible set.
    ///
    /// While mounted the new list is settled through `shell` immediately.
    pub fn set_items<S: FitShell + ?Sized>(
        &mut self,
        items: impl IntoIterator<Item = ItemId>,
        shell: &mut S,
    ) -> Option<SettleReport> {
        if self.lifecycle == Lifecycle::TornDown {
            return None;
        }
        self.engine.reset(items);
        if !self.is_mounted() {
            return None;
        }
        Some(self.settle_with(CycleTrigger::ItemsChanged, shell))
    }

    /// Tear down using the wall clock.
    pub fn unmount(&mut self) {
        self.unmount_at(Instant::now());
    }

    /// Tear down at `now`: cancel any pending recomputation and go inert.
    pub fn unmount_at(&mut self, now: Instant) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.debouncer.cancel_at(now);
        self.lifecycle = Lifecycle::TornDown;
        tracing::debug!(target: "prionav.nav", "unmount");
    }

    fn apply_width(&mut self, observed: u16) {
        let width = self.config.effective_container_width(observed);
        if self.container_width != Some(width) {
            tracing::trace!(
                target: "prionav.nav",
                from = self.container_width,
                to = width,
                "container width changed"
            );
        }
        self.container_width = Some(width);
    }

    fn settle_with<S: FitShell + ?Sized>(
        &mut self,
        trigger: CycleTrigger,
        shell: &mut S,
    ) -> SettleReport {
        let container_width = self.container_width.unwrap_or(self.config.min_container_width);
        let mut report = SettleReport::new(trigger, container_width);
        let bound = self.engine.items().len() + 1;
        self.stats.settles += 1;

        for step in 0..bound {
            let outcome = match shell.commit(
                &self.config,
                container_width,
                self.engine.visible(),
                self.engine.overflow(),
            ) {
                Some(measure) => self.engine.check_fit(&measure),
                None => FitOutcome::Unmeasured(MeasureError::NotMounted),
            };
            if step == 0 && trigger == CycleTrigger::Resize {
                self.stats.resize_checks += 1;
            } else {
                self.stats.render_checks += 1;
            }
            report.record(outcome);
            if !outcome.moved() {
                break;
            }
        }

        if report.last.moved() {
            // Bound reached mid-move; bring the presentation up to date.
            self.stats.unsettled += 1;
            tracing::warn!(
                target: "prionav.nav",
                checks = report.checks,
                "fit cycle did not stabilize"
            );
            let _ = shell.commit(
                &self.config,
                container_width,
                self.engine.visible(),
                self.engine.overflow(),
            );
        }

        tracing::debug!(
            target: "prionav.nav",
            trigger = trigger.as_str(),
            container_width,
            checks = report.checks,
            contractions = report.contractions,
            expansions = report.expansions,
            visible = self.engine.visible().len(),
            overflow = self.engine.overflow().len(),
            "fit cycle settled"
        );
        report
    }
}

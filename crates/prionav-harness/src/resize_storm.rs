#![forbid(unsafe_code)]

//! Resize storm generator and replay.
//!
//! Generates deterministic container-width sequences and replays them
//! against a [`NavFixture`], checking after every recomputation that the
//! item partition is intact and that the settled row fits.
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"storm_start","case":"burst","seed":42,"pattern":"burst","events":50}
//! {"event":"storm_resize","idx":0,"width":80,"delay_ms":10,"elapsed_ms":0}
//! {"event":"storm_fire","idx":0,"width":80,"checks":2,"visible":3,"overflow":1}
//! {"event":"storm_complete","outcome":"pass","fires":12,"checks":30,"checksum":"..."}
//! ```
//!
//! # Usage
//!
//! ```
//! use prionav_harness::NavFixture;
//! use prionav_harness::resize_storm::{ResizeStorm, StormConfig, StormPattern};
//! use prionav_runtime::NavConfig;
//! use prionav_widgets::{NavItem, PriorityNav};
//!
//! let storm = ResizeStorm::new(
//!     StormConfig::default()
//!         .with_seed(42)
//!         .with_pattern(StormPattern::Burst { count: 20 }),
//! );
//! let nav = PriorityNav::new(NavItem::sequence(["one", "two", "three", "four"]));
//! let mut fx = NavFixture::new(nav, NavConfig::default());
//! let result = storm.replay(&mut fx);
//! result.assert_passed();
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as FmtWrite;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use prionav_layout::Measure;

use crate::NavFixture;

// ============================================================================
// Configuration
// ============================================================================

/// Pattern type for storm generation.
#[derive(Debug, Clone, PartialEq)]
pub enum StormPattern {
    /// Rapid burst of small width changes.
    Burst {
        /// Number of resize events.
        count: usize,
    },
    /// Linear sweep between two widths.
    Sweep {
        /// Starting width.
        start: u16,
        /// Ending width.
        end: u16,
        /// Number of steps.
        steps: usize,
    },
    /// Alternate between two widths.
    Oscillate {
        /// First width.
        a: u16,
        /// Second width.
        b: u16,
        /// Number of round trips.
        cycles: usize,
    },
    /// Explicit `(width, delay_ms)` sequence.
    Custom {
        /// Events in order.
        events: Vec<(u16, u64)>,
    },
}

impl StormPattern {
    /// Pattern name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Burst { .. } => "burst",
            Self::Sweep { .. } => "sweep",
            Self::Oscillate { .. } => "oscillate",
            Self::Custom { .. } => "custom",
        }
    }

    /// Number of events the pattern generates.
    pub fn event_count(&self) -> usize {
        match self {
            Self::Burst { count } => *count,
            Self::Sweep { steps, .. } => *steps,
            Self::Oscillate { cycles, .. } => cycles * 2,
            Self::Custom { events } => events.len(),
        }
    }
}

impl Default for StormPattern {
    fn default() -> Self {
        Self::Burst { count: 50 }
    }
}

/// Storm generation settings.
#[derive(Debug, Clone)]
pub struct StormConfig {
    /// Seed for deterministic generation.
    pub seed: u64,
    /// Pattern to generate.
    pub pattern: StormPattern,
    /// Container width before the storm.
    pub initial_width: u16,
    /// Minimum delay between events (ms).
    pub min_delay_ms: u64,
    /// Maximum delay between events (ms).
    pub max_delay_ms: u64,
    /// Smallest generated width.
    pub min_width: u16,
    /// Largest generated width.
    pub max_width: u16,
    /// Case name for logging.
    pub case_name: String,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pattern: StormPattern::default(),
            initial_width: 80,
            min_delay_ms: 0,
            max_delay_ms: 40,
            min_width: 1,
            max_width: 200,
            case_name: "default".into(),
        }
    }
}

impl StormConfig {
    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: StormPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the starting width.
    #[must_use]
    pub fn with_initial_width(mut self, width: u16) -> Self {
        self.initial_width = width;
        self
    }

    /// Set the delay range.
    #[must_use]
    pub fn with_delay_range(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms;
        self
    }

    /// Set the width bounds.
    #[must_use]
    pub fn with_width_bounds(mut self, min: u16, max: u16) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Set the case name.
    #[must_use]
    pub fn with_case_name(mut self, name: impl Into<String>) -> Self {
        self.case_name = name.into();
        self
    }
}

// ============================================================================
// Seeded RNG
// ============================================================================

struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % (max - min))
    }

    fn chance(&mut self, p: f64) -> bool {
        (self.next_u64() as f64) / (u64::MAX as f64) < p
    }
}

// ============================================================================
// Events
// ============================================================================

/// One resize in a storm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StormEvent {
    /// Target container width.
    pub width: u16,
    /// Delay before this event (ms).
    pub delay_ms: u64,
    /// Index in the sequence.
    pub index: usize,
}

impl StormEvent {
    /// Create an event.
    pub fn new(width: u16, delay_ms: u64, index: usize) -> Self {
        Self {
            width,
            delay_ms,
            index,
        }
    }

    /// Convert to JSONL.
    pub fn to_jsonl(&self, elapsed_ms: u64) -> String {
        format!(
            r#"{{"event":"storm_resize","idx":{},"width":{},"delay_ms":{},"elapsed_ms":{}}}"#,
            self.index, self.width, self.delay_ms, elapsed_ms
        )
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Deterministic resize storm.
#[derive(Debug, Clone)]
pub struct ResizeStorm {
    config: StormConfig,
    events: Vec<StormEvent>,
}

impl ResizeStorm {
    /// Generate the storm described by `config`.
    pub fn new(config: StormConfig) -> Self {
        let mut rng = SeededRng::new(config.seed);
        let events = match &config.pattern {
            StormPattern::Burst { count } => generate_burst(&config, &mut rng, *count),
            StormPattern::Sweep { start, end, steps } => {
                generate_sweep(&config, *start, *end, *steps)
            }
            StormPattern::Oscillate { a, b, cycles } => {
                generate_oscillate(&config, &mut rng, *a, *b, *cycles)
            }
            StormPattern::Custom { events } => events
                .iter()
                .enumerate()
                .map(|(i, (w, d))| StormEvent::new(*w, *d, i))
                .collect(),
        };
        Self { config, events }
    }

    /// Generated events.
    pub fn events(&self) -> &[StormEvent] {
        &self.events
    }

    /// Generation settings.
    pub fn config(&self) -> &StormConfig {
        &self.config
    }

    /// Deterministic checksum of the event sequence.
    pub fn sequence_checksum(&self) -> String {
        let mut hasher = DefaultHasher::new();
        for event in &self.events {
            event.hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }

    /// Sum of all delays.
    pub fn total_duration_ms(&self) -> u64 {
        self.events.iter().map(|e| e.delay_ms).sum()
    }

    /// Replay against `fixture`: mount at the initial width, deliver every
    /// event with its delay (ticking in between), then let the final
    /// debounce window elapse.
    pub fn replay(&self, fixture: &mut NavFixture) -> StormResult {
        let mut result = StormResult::default();
        let mut log = String::new();
        let _ = writeln!(
            log,
            r#"{{"event":"storm_start","case":"{}","seed":{},"pattern":"{}","events":{}}}"#,
            self.config.case_name,
            self.config.seed,
            self.config.pattern.name(),
            self.events.len()
        );

        if let Some(report) = fixture.mount(self.config.initial_width) {
            result.checks += u64::from(report.checks);
            check_fixture(fixture, None, &mut result);
        }

        let mut elapsed_ms = 0u64;
        for event in &self.events {
            if let Some(report) = fixture.advance(Duration::from_millis(event.delay_ms)) {
                result.record_fire(report.checks);
                check_fixture(fixture, None, &mut result);
            }
            elapsed_ms += event.delay_ms;
            let _ = writeln!(log, "{}", event.to_jsonl(elapsed_ms));
            fixture.resize(event.width);
        }

        let delay = fixture.runtime().config().resize_debounce_delay;
        if let Some(report) = fixture.advance(delay) {
            result.record_fire(report.checks);
            let _ = writeln!(
                log,
                r#"{{"event":"storm_fire","idx":{},"width":{},"checks":{},"visible":{},"overflow":{}}}"#,
                result.fires,
                report.container_width,
                report.checks,
                fixture.runtime().visible().len(),
                fixture.runtime().overflow().len()
            );
            let last = self.events.last().map(|e| e.width);
            check_fixture(fixture, last, &mut result);
        }

        let _ = write!(
            log,
            r#"{{"event":"storm_complete","outcome":"{}","fires":{},"checks":{},"checksum":"{}"}}"#,
            if result.passed() { "pass" } else { "fail" },
            result.fires,
            result.checks,
            self.sequence_checksum()
        );
        result.jsonl = log;
        result
    }
}

fn clamp_width(config: &StormConfig, width: i32) -> u16 {
    let clamped = width.clamp(i32::from(config.min_width), i32::from(config.max_width));
    u16::try_from(clamped).unwrap_or(config.max_width)
}

fn generate_burst(config: &StormConfig, rng: &mut SeededRng, count: usize) -> Vec<StormEvent> {
    let mut events = Vec::with_capacity(count);
    let mut width = i32::from(config.initial_width);
    for i in 0..count {
        // Rapid resizes with minimal delay
        let delay = rng.next_range(config.min_delay_ms, config.max_delay_ms / 2);
        if rng.chance(0.8) {
            let delta = rng.next_range(1, 20) as i32;
            let sign = if rng.chance(0.5) { 1 } else { -1 };
            width = i32::from(clamp_width(config, width + delta * sign));
        }
        events.push(StormEvent::new(clamp_width(config, width), delay, i));
    }
    events
}

fn generate_sweep(config: &StormConfig, start: u16, end: u16, steps: usize) -> Vec<StormEvent> {
    let delay = (config.min_delay_ms + config.max_delay_ms) / 2;
    (0..steps)
        .map(|i| {
            let t = if steps > 1 {
                i as f64 / (steps - 1) as f64
            } else {
                1.0
            };
            let width = (f64::from(start) + (f64::from(end) - f64::from(start)) * t).round();
            StormEvent::new(clamp_width(config, width as i32), delay, i)
        })
        .collect()
}

fn generate_oscillate(
    config: &StormConfig,
    rng: &mut SeededRng,
    a: u16,
    b: u16,
    cycles: usize,
) -> Vec<StormEvent> {
    let mut events = Vec::with_capacity(cycles * 2);
    for cycle in 0..cycles {
        let delay_a = rng.next_range(config.min_delay_ms, config.max_delay_ms);
        let delay_b = rng.next_range(config.min_delay_ms, config.max_delay_ms);
        events.push(StormEvent::new(a, delay_a, cycle * 2));
        events.push(StormEvent::new(b, delay_b, cycle * 2 + 1));
    }
    events
}

/// Check the fixture after a recomputation.
///
/// `expected_width`, when given, is the raw width of the last delivered
/// event; the runtime must have settled against it (after the floor).
fn check_fixture(fixture: &NavFixture, expected_width: Option<u16>, result: &mut StormResult) {
    let runtime = fixture.runtime();
    let engine = runtime.engine();

    if engine.visible().len() + engine.overflow().len() != fixture.nav().items().len() {
        result
            .violations
            .push("visible and overflow do not partition the items".into());
    }
    if engine.moved_widths().len() != engine.overflow().len() {
        result
            .violations
            .push("moved widths out of step with overflow".into());
    }

    let layout = fixture.state().layout();
    if let (Ok(row), Ok(container)) = (layout.row_width(), layout.container_width())
        && row > container
        && !engine.visible().is_empty()
    {
        result
            .violations
            .push(format!("settled row {row} exceeds container {container}"));
    }

    if let Some(width) = expected_width {
        let floored = runtime.config().effective_container_width(width);
        if runtime.container_width() != Some(floored) {
            result.violations.push(format!(
                "settled against {:?}, expected {floored}",
                runtime.container_width()
            ));
        }
    }
    result.max_visible = result.max_visible.max(engine.visible().len());
}

// ============================================================================
// Result
// ============================================================================

/// Outcome of a storm replay.
#[derive(Debug, Clone, Default)]
pub struct StormResult {
    /// Debounced recomputations that fired.
    pub fires: u64,
    /// Fit-checks performed, including the mount.
    pub checks: u64,
    /// Most fit-checks in a single settle.
    pub max_checks_per_fire: u32,
    /// Most items visible at any settled point.
    pub max_visible: usize,
    /// Invariant violations found.
    pub violations: Vec<String>,
    /// Replay log.
    pub jsonl: String,
}

impl StormResult {
    fn record_fire(&mut self, checks: u32) {
        self.fires += 1;
        self.checks += u64::from(checks);
        self.max_checks_per_fire = self.max_checks_per_fire.max(checks);
    }

    /// Whether no violation was found.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Panic with every violation if the replay failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        if !self.passed() {
            panic!(
                "storm replay failed:\n  {}\n\nlog:\n{}",
                self.violations.join("\n  "),
                self.jsonl
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let config = StormConfig::default().with_seed(7);
        let a = ResizeStorm::new(config.clone());
        let b = ResizeStorm::new(config);
        assert_eq!(a.events(), b.events());
        assert_eq!(a.sequence_checksum(), b.sequence_checksum());
    }

    #[test]
    fn different_seeds_diverge() {
        let a = ResizeStorm::new(StormConfig::default().with_seed(1));
        let b = ResizeStorm::new(StormConfig::default().with_seed(2));
        assert_ne!(a.sequence_checksum(), b.sequence_checksum());
    }

    #[test]
    fn burst_respects_bounds() {
        let storm = ResizeStorm::new(
            StormConfig::default()
                .with_width_bounds(30, 60)
                .with_initial_width(45)
                .with_pattern(StormPattern::Burst { count: 200 }),
        );
        assert_eq!(storm.events().len(), 200);
        assert!(storm.events().iter().all(|e| (30..=60).contains(&e.width)));
        assert!(storm.events().iter().all(|e| e.delay_ms < 20));
    }

    #[test]
    fn sweep_hits_both_ends() {
        let storm = ResizeStorm::new(StormConfig::default().with_pattern(StormPattern::Sweep {
            start: 10,
            end: 110,
            steps: 11,
        }));
        let widths: Vec<_> = storm.events().iter().map(|e| e.width).collect();
        assert_eq!(widths.first(), Some(&10));
        assert_eq!(widths.last(), Some(&110));
        assert_eq!(widths[5], 60);
    }

    #[test]
    fn oscillate_alternates() {
        let storm = ResizeStorm::new(StormConfig::default().with_pattern(StormPattern::Oscillate {
            a: 40,
            b: 90,
            cycles: 3,
        }));
        let widths: Vec<_> = storm.events().iter().map(|e| e.width).collect();
        assert_eq!(widths, vec![40, 90, 40, 90, 40, 90]);
        assert_eq!(storm.config().pattern.event_count(), 6);
    }

    #[test]
    fn event_jsonl_is_stable() {
        let event = StormEvent::new(80, 10, 3);
        assert_eq!(
            event.to_jsonl(25),
            r#"{"event":"storm_resize","idx":3,"width":80,"delay_ms":10,"elapsed_ms":25}"#
        );
    }
}

#![forbid(unsafe_code)]

//! Runtime for priority navigation bars.
//!
//! - [`NavRuntime`] - lifecycle, fit cycles and resize handling
//! - [`ResizeDebouncer`] - trailing-edge debounce with generation tokens
//! - [`NavConfig`] - spacing, width floor, debounce delay, expansion margin
//!
//! # Role in prionav
//! `prionav-runtime` decides *when* the overflow engine runs. The engine in
//! `prionav-layout` decides *what* moves; the widgets in `prionav-widgets`
//! render and measure.
//!
//! # Tracing targets
//! - `prionav.nav`: mount, unmount, and settle summaries
//! - `prionav.resize`: debounce decisions, when enabled on [`DebounceHooks`]

pub mod config;
pub mod debounce;
pub mod nav;

pub use config::{MAX_DEBOUNCE_DELAY, MAX_ITEM_SPACING, NavConfig};
#[cfg(feature = "serde")]
pub use config::ConfigError;
pub use debounce::{
    DebounceAction, DebounceHooks, DebounceLog, DebounceStats, PendingResize, ResizeDebouncer,
};
pub use nav::{CycleTrigger, FitShell, Lifecycle, NavRuntime, RuntimeStats, SettleReport};

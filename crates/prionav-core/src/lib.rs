#![forbid(unsafe_code)]

//! Core: geometry, input events, item identity, and logging.

pub mod event;
pub mod geometry;
pub mod item;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#![forbid(unsafe_code)]

//! Priority-navigation layout: the overflow engine and its measurements.
//!
//! - [`OverflowEngine`] - splits an ordered item list into a visible prefix
//!   and an overflow suffix, moving the boundary by at most one item per
//!   [`OverflowEngine::check_fit`]
//! - [`Measure`] - the width capability the engine reads on every fit-check
//! - [`WidthLedger`] - identity-keyed rendered widths from the last commit
//! - [`RowMeasurement`] - a committed row snapshot implementing [`Measure`]
//!
//! # Fit cycle
//!
//! ```
//! use prionav_core::item::sequential_ids;
//! use prionav_layout::{FitOutcome, OverflowEngine, RowMeasurement};
//!
//! let ids = sequential_ids(3);
//! let mut engine = OverflowEngine::new(ids.iter().copied());
//!
//! // Commit: render the visible items and measure them.
//! let row = RowMeasurement::simulate(250, engine.visible(), 0, |_| 100);
//! assert!(matches!(engine.check_fit(&row), FitOutcome::Contracted { .. }));
//!
//! // Re-measure after the re-render; two items fit in 250.
//! let row = RowMeasurement::simulate(250, engine.visible(), 0, |_| 100);
//! assert_eq!(engine.check_fit(&row), FitOutcome::Stable);
//! assert_eq!(engine.overflow(), &ids[2..]);
//! ```

pub mod ledger;
pub mod measure;
pub mod overflow;

pub use ledger::{MovedWidths, WidthLedger};
pub use measure::{Measure, MeasureError, RowMeasurement};
pub use overflow::{FitDecision, FitOutcome, FitStats, OverflowEngine};
pub use prionav_core::item::ItemId;

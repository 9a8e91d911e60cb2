#![forbid(unsafe_code)]

//! prionav public facade crate.
//!
//! A priority navigation bar shows as many items as fit in one row, in
//! priority order, and moves the rest behind a trigger that opens a popup.
//! This crate re-exports the pieces an application needs and a prelude.
//!
//! ```
//! use prionav::prelude::*;
//!
//! # fn main() -> prionav::Result<()> {
//! let nav = PriorityNav::new(NavItem::sequence(["Home", "Docs", "Blog"]));
//! let mut state = NavState::default();
//! let mut runtime = NavRuntime::new(nav.ids(), NavConfig::default());
//! let report = prionav::mount(&mut runtime, 12, &mut nav.shell(&mut state))?;
//! assert!(report.is_stable());
//! assert_eq!(runtime.visible().len() + runtime.overflow().len(), 3);
//! # Ok(())
//! # }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use prionav_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
pub use prionav_core::geometry::Rect;
pub use prionav_core::item::ItemId;

// --- Render re-exports -----------------------------------------------------

pub use prionav_render::buffer::Buffer;
pub use prionav_render::cell::{Cell, PackedRgba, StyleFlags};
pub use prionav_render::style::Style;

// --- Layout re-exports -----------------------------------------------------

pub use prionav_layout::{FitOutcome, Measure, MeasureError, OverflowEngine, RowMeasurement};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "serde")]
pub use prionav_runtime::ConfigError;
pub use prionav_runtime::{
    DebounceAction, FitShell, Lifecycle, NavConfig, NavRuntime, ResizeDebouncer, SettleReport,
};

// --- Widget re-exports -----------------------------------------------------

pub use prionav_widgets::{
    DropdownList, IconRenderer, IconSettings, NavHit, NavItem, NavState, OverflowRenderer,
    PriorityNav, StatefulWidget, Toggle, ToggleButton, ToggleState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for prionav.
#[derive(Debug)]
pub enum Error {
    /// Layout could not be measured.
    Measure(MeasureError),
    /// Configuration could not be loaded.
    #[cfg(feature = "serde")]
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measure(err) => write!(f, "{err}"),
            #[cfg(feature = "serde")]
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Measure(err) => Some(err),
            #[cfg(feature = "serde")]
            Self::Config(err) => Some(err),
        }
    }
}

impl From<MeasureError> for Error {
    fn from(err: MeasureError) -> Self {
        Self::Measure(err)
    }
}

#[cfg(feature = "serde")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for prionav APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Checked entry points -------------------------------------------------

/// Mount `runtime` at `width` and settle the first layout.
///
/// Fails with [`MeasureError::NotMounted`] when the runtime was already
/// mounted or torn down, and with the measurement error when the shell
/// could not be measured.
pub fn mount<S: FitShell + ?Sized>(
    runtime: &mut NavRuntime,
    width: u16,
    shell: &mut S,
) -> Result<SettleReport> {
    checked(runtime.mount(width, shell))
}

/// Settle `runtime` through `shell`, with the same failures as [`mount`].
pub fn settle<S: FitShell + ?Sized>(runtime: &mut NavRuntime, shell: &mut S) -> Result<SettleReport> {
    checked(runtime.settle(shell))
}

/// Parse a JSON configuration.
#[cfg(feature = "serde")]
pub fn load_config(json: &str) -> Result<NavConfig> {
    Ok(NavConfig::from_json_str(json)?)
}

fn checked(report: Option<SettleReport>) -> Result<SettleReport> {
    let report = report.ok_or(MeasureError::NotMounted)?;
    match report.last {
        FitOutcome::Unmeasured(err) => Err(err.into()),
        _ => Ok(report),
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Buffer, Error, Event, FitShell, ItemId, NavConfig, NavHit, NavItem, NavRuntime,
        NavState, PriorityNav, Rect, Result, StatefulWidget, Style,
    };

    pub use crate::{core, layout, render, runtime, widgets};
}

pub use prionav_core as core;
pub use prionav_layout as layout;
pub use prionav_render as render;
pub use prionav_runtime as runtime;
pub use prionav_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_error_converts_and_displays() {
        let err: Error = MeasureError::MissingItem(ItemId(4)).into();
        assert_eq!(err.to_string(), MeasureError::MissingItem(ItemId(4)).to_string());
        assert!(std::error::Error::source(&err).is_some());
    }

    struct Fixed(u16);

    impl FitShell for Fixed {
        type Measurement = RowMeasurement;

        fn commit(
            &mut self,
            _: &NavConfig,
            container_width: u16,
            visible: &[ItemId],
            _: &[ItemId],
        ) -> Option<RowMeasurement> {
            let width = self.0;
            Some(RowMeasurement::simulate(container_width, visible, 0, |_| width))
        }
    }

    struct Detached;

    impl FitShell for Detached {
        type Measurement = RowMeasurement;

        fn commit(
            &mut self,
            _: &NavConfig,
            _: u16,
            _: &[ItemId],
            _: &[ItemId],
        ) -> Option<RowMeasurement> {
            None
        }
    }

    fn runtime() -> NavRuntime {
        NavRuntime::new(prionav_core::item::sequential_ids(3), NavConfig::default())
    }

    #[test]
    fn mount_reports_settled_layout() {
        let mut rt = runtime();
        let report = mount(&mut rt, 50, &mut Fixed(20)).expect("settled");
        assert!(report.is_stable());
        assert_eq!(rt.visible().len(), 2);
        assert!(settle(&mut rt, &mut Fixed(20)).is_ok());
    }

    #[test]
    fn mount_twice_is_an_error() {
        let mut rt = runtime();
        mount(&mut rt, 50, &mut Fixed(20)).expect("settled");
        assert!(matches!(
            mount(&mut rt, 50, &mut Fixed(20)),
            Err(Error::Measure(MeasureError::NotMounted))
        ));
    }

    #[test]
    fn unmeasurable_shell_is_an_error() {
        let mut rt = runtime();
        assert!(matches!(
            mount(&mut rt, 50, &mut Detached),
            Err(Error::Measure(MeasureError::NotMounted))
        ));
        rt.unmount();
        assert!(settle(&mut rt, &mut Fixed(20)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_error_converts() {
        let err = load_config("not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("invalid nav config"));
        assert!(load_config(r#"{"itemSpacing": 1}"#).is_ok());
    }
}

#![forbid(unsafe_code)]

//! End-to-end fit-cycle scenarios for the overflow engine.
//!
//! Each scenario drives the engine the way a renderer would: commit the
//! current visible set, measure it, run one fit-check, and repeat until the
//! engine reports `Stable`.
//!
//! ```sh
//! cargo test -p prionav-layout --test overflow_scenarios
//! ```

use prionav_core::item::{ItemId, sequential_ids};
use prionav_layout::{FitOutcome, OverflowEngine, RowMeasurement};

/// Fixed per-item widths plus the width of the overflow trigger.
struct Row {
    widths: Vec<u16>,
    trigger: u16,
}

impl Row {
    fn uniform(count: usize, width: u16) -> Self {
        Self {
            widths: vec![width; count],
            trigger: 0,
        }
    }

    fn measure(&self, engine: &OverflowEngine, container: u16) -> RowMeasurement {
        let trailing = if engine.has_overflow() { self.trigger } else { 0 };
        RowMeasurement::simulate(container, engine.visible(), trailing, |id| {
            self.widths[id.get() as usize]
        })
    }

    /// Run fit-checks until stable; returns the number of moves.
    fn settle(&self, engine: &mut OverflowEngine, container: u16) -> usize {
        let mut moves = 0;
        for _ in 0..=self.widths.len() {
            match engine.check_fit(&self.measure(engine, container)) {
                FitOutcome::Stable => return moves,
                outcome => {
                    assert!(outcome.moved(), "unexpected outcome {outcome:?}");
                    moves += 1;
                }
            }
        }
        panic!("engine did not settle within {} steps", self.widths.len() + 1);
    }
}

fn ids(n: usize) -> Vec<ItemId> {
    sequential_ids(n)
}

#[test]
fn scenario_a_everything_fits() {
    let row = Row::uniform(3, 100);
    let mut engine = OverflowEngine::new(ids(3));
    assert_eq!(row.settle(&mut engine, 300), 0);
    assert_eq!(engine.visible(), ids(3).as_slice());
    assert!(!engine.has_overflow());
}

#[test]
fn scenario_b_third_item_overflows() {
    let row = Row::uniform(3, 100);
    let mut engine = OverflowEngine::new(ids(3));
    assert_eq!(row.settle(&mut engine, 250), 1);
    assert_eq!(engine.visible(), &ids(3)[..2]);
    assert_eq!(engine.overflow(), &ids(3)[2..]);
    assert!(engine.has_overflow());
}

#[test]
fn scenario_c_widening_restores_item() {
    let row = Row::uniform(3, 100);
    let mut engine = OverflowEngine::new(ids(3));
    row.settle(&mut engine, 250);

    assert_eq!(engine.moved_widths().last(), Some(100));
    assert_eq!(row.settle(&mut engine, 320), 1);
    assert_eq!(engine.visible(), ids(3).as_slice());
    assert!(engine.overflow().is_empty());
}

#[test]
fn scenario_d_single_wide_item() {
    let row = Row::uniform(1, 100);
    let mut engine = OverflowEngine::new(ids(1));

    assert_eq!(row.settle(&mut engine, 50), 1);
    assert!(engine.visible().is_empty());
    assert_eq!(engine.overflow(), ids(1).as_slice());

    // 90 is not more than 0 + 100 + 0.
    assert_eq!(row.settle(&mut engine, 90), 0);
    assert!(engine.visible().is_empty());

    assert_eq!(row.settle(&mut engine, 150), 1);
    assert_eq!(engine.visible(), ids(1).as_slice());
}

#[test]
fn zero_items_never_move() {
    let row = Row::uniform(0, 0);
    let mut engine = OverflowEngine::new(ids(0));
    for width in [0, 1, 100, u16::MAX] {
        assert_eq!(row.settle(&mut engine, width), 0);
    }
}

#[test]
fn contraction_converges_one_item_per_check() {
    let row = Row::uniform(6, 10);
    let mut engine = OverflowEngine::new(ids(6));
    let mut last_boundary = engine.boundary();
    loop {
        let outcome = engine.check_fit(&row.measure(&engine, 25));
        let boundary = engine.boundary();
        assert!(last_boundary.abs_diff(boundary) <= 1);
        last_boundary = boundary;
        if outcome == FitOutcome::Stable {
            break;
        }
    }
    assert_eq!(engine.visible().len(), 2);
}

#[test]
fn trigger_width_counts_toward_the_row() {
    // Without the trigger two items would fit in 250; the 60-cell trigger
    // pushes the second one out as well.
    let row = Row {
        widths: vec![100; 3],
        trigger: 60,
    };
    let mut engine = OverflowEngine::new(ids(3));
    assert_eq!(row.settle(&mut engine, 250), 2);
    assert_eq!(engine.visible(), &ids(3)[..1]);
}

#[test]
fn stable_state_is_idempotent() {
    let row = Row::uniform(4, 30);
    let mut engine = OverflowEngine::new(ids(4));
    row.settle(&mut engine, 70);
    let visible = engine.visible().to_vec();
    for _ in 0..10 {
        assert_eq!(engine.check_fit(&row.measure(&engine, 70)), FitOutcome::Stable);
    }
    assert_eq!(engine.visible(), visible.as_slice());
}

#[test]
fn expansion_uses_width_of_item_that_returns() {
    // Items of different widths: contract the 80-wide item, then the
    // 20-wide one. The next expansion must reserve 20 (the item at the
    // front of overflow), not 80.
    let row = Row {
        widths: vec![50, 20, 80],
        trigger: 0,
    };
    let mut engine = OverflowEngine::new(ids(3));
    row.settle(&mut engine, 60);
    assert_eq!(engine.visible(), &ids(3)[..1]);
    assert_eq!(engine.moved_widths().as_slice(), &[80, 20]);

    // 71 > 50 + 20: the 20-wide item comes back even though 80 would not fit.
    let outcome = engine.check_fit(&row.measure(&engine, 71));
    assert_eq!(
        outcome,
        FitOutcome::Expanded {
            item: ids(3)[1],
            reserved: 20
        }
    );
    assert_eq!(engine.moved_widths().as_slice(), &[80]);
    assert_eq!(row.settle(&mut engine, 71), 0);
}

#[test]
fn narrowing_after_expansion_does_not_oscillate() {
    let row = Row::uniform(3, 100);
    let mut engine = OverflowEngine::new(ids(3));
    row.settle(&mut engine, 250);
    row.settle(&mut engine, 301);
    assert!(!engine.has_overflow());

    // Right after the expansion the row is 300 wide in a 301 container.
    assert_eq!(engine.check_fit(&row.measure(&engine, 301)), FitOutcome::Stable);
}

//! Property-based invariant tests for the geometry primitives the
//! navigation bar relies on for hit testing and popup clipping.
//!
//! 1. Intersection is commutative.
//! 2. Intersection result fits within both inputs.
//! 3. Contains agrees with intersection.
//! 4. Edges saturate instead of overflowing.
//! 5. No panics on extreme u16 values.

use prionav_core::geometry::Rect;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn small_rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..=500, 0u16..=500, 0u16..=500, 0u16..=500).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn intersection_commutative(a in small_rect_strategy(), b in small_rect_strategy()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn intersection_fits_within_inputs(a in small_rect_strategy(), b in small_rect_strategy()) {
        let i = a.intersection(&b);
        if !i.is_empty() {
            prop_assert!(i.x >= a.x && i.right() <= a.right());
            prop_assert!(i.x >= b.x && i.right() <= b.right());
            prop_assert!(i.y >= a.y && i.bottom() <= a.bottom());
            prop_assert!(i.y >= b.y && i.bottom() <= b.bottom());
        }
    }

    #[test]
    fn contains_agrees_with_intersection(
        a in small_rect_strategy(),
        b in small_rect_strategy(),
        px in 0u16..=1000,
        py in 0u16..=1000,
    ) {
        let i = a.intersection(&b);
        prop_assert_eq!(i.contains(px, py), a.contains(px, py) && b.contains(px, py));
    }

    #[test]
    fn edges_saturate(r in rect_strategy()) {
        prop_assert!(r.right() >= r.x);
        prop_assert!(r.bottom() >= r.y);
        prop_assert_eq!(u32::from(r.right()), (u32::from(r.x) + u32::from(r.width)).min(u32::from(u16::MAX)));
    }

    #[test]
    fn extreme_values_do_not_panic(a in rect_strategy(), b in rect_strategy()) {
        let _ = a.intersection(&b);
        let _ = a.intersection_opt(&b);
        let _ = a.right();
        let _ = a.bottom();
    }
}

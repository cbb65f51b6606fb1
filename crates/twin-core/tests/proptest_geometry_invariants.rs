//! Property tests for `Point` and `Rect`.
//!
//! The compositor relies on these holding for any coordinates, including
//! negative origins and rectangles that extend past the screen.

use proptest::prelude::*;
use twin_core::geometry::{Point, Rect};

fn coord() -> impl Strategy<Value = i16> {
    -300i16..=300
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (coord(), coord(), 0i16..=200, 0i16..=200)
        .prop_map(|(x, y, w, h)| Rect::from_origin_size(Point::new(x, y), Point::new(w, h)))
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-400i16..=400, -400i16..=400).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn intersect_is_commutative(a in rect_strategy(), b in rect_strategy()) {
        let ab = a.intersect(&b);
        let ba = b.intersect(&a);
        prop_assert_eq!(ab.is_empty(), ba.is_empty());
        if !ab.is_empty() {
            prop_assert_eq!(ab, ba);
        }
    }

    #[test]
    fn intersect_with_self_is_identity(a in rect_strategy()) {
        prop_assume!(!a.is_empty());
        prop_assert_eq!(a.intersect(&a), a);
    }

    #[test]
    fn contains_agrees_with_intersect(a in rect_strategy(), b in rect_strategy(), p in point_strategy()) {
        let both = a.contains(p) && b.contains(p);
        prop_assert_eq!(a.intersect(&b).contains(p), both);
    }

    #[test]
    fn union_covers_both(a in rect_strategy(), b in rect_strategy(), p in point_strategy()) {
        let u = a.union(&b);
        if a.contains(p) || b.contains(p) {
            prop_assert!(u.contains(p));
        }
    }

    #[test]
    fn area_matches_extent(a in rect_strategy()) {
        prop_assert_eq!(a.area(), a.width() as u32 * a.height() as u32);
        prop_assert_eq!(a.is_empty(), a.area() == 0);
    }

    #[test]
    fn moved_preserves_size(a in rect_strategy(), dx in -50i16..=50, dy in -50i16..=50) {
        let m = a.moved(dx, dy);
        prop_assert_eq!(m.size(), a.size());
        prop_assert_eq!(m.moved(-dx, -dy), a);
    }

    #[test]
    fn grown_then_shrunk_round_trips(a in rect_strategy(), d in 0i16..=20) {
        prop_assume!(!a.is_empty());
        prop_assert_eq!(a.grown(d, d).grown(-d, -d), a);
    }

    #[test]
    fn extremes_do_not_panic(ax in any::<i16>(), ay in any::<i16>(), bx in any::<i16>(), by in any::<i16>()) {
        let r = Rect::new(ax, ay, bx, by);
        let _ = r.width();
        let _ = r.height();
        let _ = r.area();
        let _ = r.intersect(&Rect::from_size(80, 25));
        let _ = r.moved(1, 1);
    }
}

use keylattice::geometry::BoardGeometry;
use keylattice::hex::{ring, HexCoord};
use keylattice::hexmap::{HexMap, KeyAddress, MapOrigin};
use keylattice::tiling::{Point, Rect, RegularFit, SkewedFit, TilingGeometry};
use proptest::prelude::*;
use std::collections::HashSet;

// --- STRATEGIES ---

prop_compose! {
    fn arb_hex()(q in -200i32..200, r in -200i32..200) -> HexCoord {
        HexCoord::new(q, r)
    }
}

prop_compose! {
    fn arb_origin()(
        point in arb_hex(),
        board in 0u8..5,
        key in 0u8..56
    ) -> MapOrigin {
        MapOrigin {
            point,
            address: KeyAddress::new(board, key),
        }
    }
}

prop_compose! {
    fn arb_point()(x in -1000.0..1000.0f32, y in -1000.0..1000.0f32) -> Point {
        Point::new(x, y)
    }
}

prop_compose! {
    fn arb_fit()(
        w in 200.0..2500.0f32,
        h in 200.0..2500.0f32,
        margin in 0.0..40.0f32,
        widest in 1usize..40,
        longest in 1usize..30,
        rotation in -3.2..3.2f32,
        scale_to_fit in any::<bool>()
    ) -> RegularFit {
        RegularFit {
            rotation,
            margin,
            scale_to_fit,
            ..RegularFit::new(Rect::new(0.0, 0.0, w, h), widest, longest)
        }
    }
}

proptest! {
    #[test]
    fn prop_ring_has_six_r_distinct_points(origin in arb_hex(), radius in 1i32..25) {
        let points = ring(origin, radius).unwrap();
        prop_assert_eq!(points.len(), 6 * radius as usize);

        let unique: HashSet<_> = points.iter().copied().collect();
        prop_assert_eq!(unique.len(), points.len());
        for p in &points {
            prop_assert_eq!(p.distance(origin), radius);
        }
    }

    #[test]
    fn prop_map_is_bijective_for_any_origin(origin in arb_origin()) {
        let map = HexMap::new(BoardGeometry::lumatone(), 5, origin).unwrap();
        prop_assert_eq!(map.key_to_hex(origin.address).unwrap(), origin.point);

        let mut seen = HashSet::new();
        for board in 0..5u8 {
            for key in 0..56u8 {
                let address = KeyAddress::new(board, key);
                let point = map.key_to_hex(address).unwrap();
                prop_assert!(seen.insert(point));
                prop_assert_eq!(map.hex_to_key(point), address);
            }
        }
        prop_assert_eq!(map.snapshot().len(), 280);
    }

    #[test]
    fn prop_hex_key_round_trips(point in arb_hex()) {
        prop_assert_eq!(HexCoord::from_key(point.key()), point);
    }

    #[test]
    fn prop_regular_fit_stays_in_bounds(params in arb_fit()) {
        let mut tiling = TilingGeometry::new();
        tiling.fit(params).unwrap();
        prop_assert!(tiling.radius() > 0.0);

        let placed = tiling.transformed_tile_bounds();
        let tolerance = 1e-3 * params.bounds.w.max(params.bounds.h);
        if params.scale_to_fit {
            prop_assert!(params.bounds.contains(&placed, tolerance));
        } else if params.rotation == 0.0 {
            let usable = params.bounds.reduced(params.margin);
            prop_assert!(usable.contains(&placed, tolerance));
        }
    }

    #[test]
    fn prop_skewed_fit_reproduces_calibration_points(
        first in arb_point(),
        second in arb_point(),
        third in arb_point(),
        row_steps in 1i32..12,
        column_steps in 1i32..12
    ) {
        let mut tiling = TilingGeometry::new();
        tiling.fit_skewed(SkewedFit {
            first,
            second,
            row_steps,
            third,
            column_steps,
            derive_angles: false,
        }).unwrap();

        prop_assert!(tiling.position_at(0, 0).distance(first) < 1e-2);
        prop_assert!(tiling.position_at(0, row_steps).distance(second) < 1e-2);
        prop_assert!(tiling.position_at(column_steps, row_steps).distance(third) < 1e-2);
    }
}

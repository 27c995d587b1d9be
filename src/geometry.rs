//! Tile geometry: inner drop zones and point-in-rectangle tests.
//!
//! A tile's *inner zone* is a rectangle concentric with the tile, scaled by
//! a ratio along both axes.  Only the inner zone counts as "on the tile" for
//! folder drops and merges; the outer band lets the pointer pass over a tile
//! while the grid keeps reordering.
//!
//! ```text
//!  ┌──────────────────────┐   margin = dimension * (1 - ratio) / 2
//!  │  ┌────────────────┐  │
//!  │  │   inner zone   │  │
//!  │  └────────────────┘  │
//!  └──────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Default fraction of a tile that counts as its inner zone.
pub const INNER_ZONE_RATIO: f64 = 0.9;

/// Axis-aligned bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether either dimension is zero (unmounted or collapsed tile).
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Centre of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Compute the inner drop zone of `tile`, scaled by `ratio` and centred.
///
/// For a 90×80 tile at `(100, 200)` and ratio `0.65` the margins are
/// `15.75` and `14`, giving `{ left: 115.75, top: 214, width: 58.5, height: 52 }`.
pub fn inner_zone(tile: &Rect, ratio: f64) -> Rect {
    let margin_x = tile.width * (1.0 - ratio) / 2.0;
    let margin_y = tile.height * (1.0 - ratio) / 2.0;
    Rect {
        left: tile.left + margin_x,
        top: tile.top + margin_y,
        width: tile.width * ratio,
        height: tile.height * ratio,
    }
}

/// Inclusive containment test: points on an edge count as inside.
pub fn point_in_rect(point: Point, rect: &Rect) -> bool {
    point.x >= rect.left
        && point.x <= rect.right()
        && point.y >= rect.top
        && point.y <= rect.bottom()
}

/// Whether `point` lies in the inner zone of `tile`.
///
/// Always `false` for a tile with zero width or height.
pub fn pointer_in_inner_zone(point: Point, tile: &Rect, ratio: f64) -> bool {
    if tile.is_empty() {
        return false;
    }
    point_in_rect(point, &inner_zone(tile, ratio))
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn inner_zone_is_centred_and_scaled() {
        let tile = Rect::new(100.0, 200.0, 90.0, 80.0);
        let inner = inner_zone(&tile, 0.65);
        assert!((inner.left - 115.75).abs() < EPS);
        assert!((inner.top - 214.0).abs() < EPS);
        assert!((inner.width - 58.5).abs() < EPS);
        assert!((inner.height - 52.0).abs() < EPS);
    }

    #[test]
    fn inner_zone_custom_ratio() {
        let tile = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(inner_zone(&tile, 0.5), Rect::new(25.0, 25.0, 50.0, 50.0));
    }

    #[test]
    fn inner_zone_of_full_ratio_is_the_tile() {
        let tile = Rect::new(3.0, 4.0, 10.0, 20.0);
        assert_eq!(inner_zone(&tile, 1.0), tile);
    }

    #[test]
    fn inner_zone_of_zero_tile_is_zero() {
        let inner = inner_zone(&Rect::new(50.0, 50.0, 0.0, 0.0), INNER_ZONE_RATIO);
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
    }

    #[test]
    fn point_in_rect_inside_and_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(point_in_rect(Point::new(50.0, 40.0), &rect));
        assert!(point_in_rect(Point::new(10.0, 20.0), &rect));
        assert!(point_in_rect(Point::new(110.0, 70.0), &rect));
    }

    #[test]
    fn point_in_rect_outside() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(!point_in_rect(Point::new(9.0, 20.0), &rect));
        assert!(!point_in_rect(Point::new(111.0, 40.0), &rect));
        assert!(!point_in_rect(Point::new(50.0, 19.0), &rect));
        assert!(!point_in_rect(Point::new(50.0, 71.0), &rect));
    }

    #[test]
    fn centre_is_in_inner_zone() {
        let tile = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(pointer_in_inner_zone(Point::new(50.0, 50.0), &tile, INNER_ZONE_RATIO));
    }

    #[test]
    fn corners_are_outside_inner_zone() {
        let tile = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!pointer_in_inner_zone(Point::new(1.0, 1.0), &tile, INNER_ZONE_RATIO));
        assert!(!pointer_in_inner_zone(Point::new(99.0, 99.0), &tile, INNER_ZONE_RATIO));
    }

    #[test]
    fn inner_edge_is_inclusive() {
        let tile = Rect::new(0.0, 0.0, 100.0, 100.0);
        let margin = 100.0 * (1.0 - INNER_ZONE_RATIO) / 2.0;
        assert!(pointer_in_inner_zone(Point::new(margin, margin), &tile, INNER_ZONE_RATIO));
        assert!(!pointer_in_inner_zone(
            Point::new(margin - 1.0, margin - 1.0),
            &tile,
            INNER_ZONE_RATIO
        ));
    }

    #[test]
    fn zero_dimension_tile_never_matches() {
        let tile = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert!(!pointer_in_inner_zone(Point::new(0.0, 0.0), &tile, INNER_ZONE_RATIO));
    }

    proptest! {
        #[test]
        fn inner_zone_is_centred_with_scaled_area(
            left in -1000.0f64..1000.0,
            top in -1000.0f64..1000.0,
            width in 0.0f64..500.0,
            height in 0.0f64..500.0,
            ratio in 0.01f64..=1.0,
        ) {
            let tile = Rect::new(left, top, width, height);
            let inner = inner_zone(&tile, ratio);
            let (tc, ic) = (tile.center(), inner.center());
            prop_assert!((tc.x - ic.x).abs() < 1e-6);
            prop_assert!((tc.y - ic.y).abs() < 1e-6);
            prop_assert!((inner.area() - tile.area() * ratio * ratio).abs() < 1e-6 * tile.area().max(1.0));
        }

        #[test]
        fn degenerate_tiles_reject_every_point(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            extent in 0.0f64..500.0,
            horizontal in any::<bool>(),
        ) {
            let tile = if horizontal {
                Rect::new(0.0, 0.0, extent, 0.0)
            } else {
                Rect::new(0.0, 0.0, 0.0, extent)
            };
            prop_assert!(!pointer_in_inner_zone(Point::new(x, y), &tile, INNER_ZONE_RATIO));
        }
    }
}

// Planar geometry helpers for the layout engine
//
// World space is the canvas centred on the origin, x to the right and
// y downwards (screen convention). Nothing here guards degenerate input:
// zero-length segments and coincident points produce a defined boolean or
// a zero distance, never a division.

/// A position in world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point on the circle of `radius` around `self` at `degrees`
    pub fn on_circle(&self, radius: f64, degrees: f64) -> Point {
        let angle = degrees.to_radians();
        Point::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }

    /// Midpoint between two points (used for connection labels)
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Counter-clockwise orientation test for the triple (a, b, c)
///
/// Strict comparison: collinear triples report `false`.
pub fn ccw(a: Point, b: Point, c: Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Whether segment `p1-p2` crosses segment `q1-q2`
///
/// Uses the four orientation tests. Shared endpoints and collinear overlaps
/// are not special-cased; they resolve to whatever the strict test yields.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    ccw(p1, q1, q2) != ccw(p2, q1, q2) && ccw(p1, p2, q1) != ccw(p1, p2, q2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn test_on_circle() {
        let center = Point::new(10.0, 10.0);
        let p = center.on_circle(200.0, 90.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 210.0).abs() < 1e-9);
        assert!((center.distance_to(p) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossing_segments() {
        let a1 = Point::new(-10.0, 0.0);
        let a2 = Point::new(10.0, 0.0);
        let b1 = Point::new(0.0, -10.0);
        let b2 = Point::new(0.0, 10.0);
        assert!(segments_intersect(a1, a2, b1, b2));
    }

    #[test]
    fn test_parallel_segments_do_not_cross() {
        let a1 = Point::new(0.0, 0.0);
        let a2 = Point::new(10.0, 0.0);
        let b1 = Point::new(0.0, 5.0);
        let b2 = Point::new(10.0, 5.0);
        assert!(!segments_intersect(a1, a2, b1, b2));
    }

    #[test]
    fn test_disjoint_segments_on_crossing_lines() {
        // Lines cross at (5, 5) but neither segment reaches it
        let a1 = Point::new(0.0, 0.0);
        let a2 = Point::new(2.0, 2.0);
        let b1 = Point::new(10.0, 0.0);
        let b2 = Point::new(8.0, 2.0);
        assert!(!segments_intersect(a1, a2, b1, b2));
    }

    #[test]
    fn test_degenerate_segments_are_defined() {
        let p = Point::new(1.0, 1.0);
        // Zero-length segments and fully coincident points must not panic
        assert!(!segments_intersect(p, p, p, p));
        assert!(!segments_intersect(p, p, Point::new(0.0, 0.0), Point::new(2.0, 2.0)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Swapping the two segments never changes the answer.
        /// Integer-valued coordinates keep the products exact.
        #[test]
        fn prop_intersection_is_symmetric(
            coords in proptest::collection::vec(-1000i32..1000i32, 8),
        ) {
            let p = |i: usize| Point::new(coords[i] as f64, coords[i + 1] as f64);
            let (a1, a2, b1, b2) = (p(0), p(2), p(4), p(6));
            prop_assert_eq!(
                segments_intersect(a1, a2, b1, b2),
                segments_intersect(b1, b2, a1, a2)
            );
        }
    }
}

//! Scalar geometric predicates.
//!
//! Pure functions with no state. The clippers lean on these for
//! degeneracy detection (zero-area corner triangles, coincident points).

use crate::geometry::{Bounds, Coord, Domain, Point};

/// Dot-product slack for [`colinear`]'s unit-vector test.
pub const COLINEAR_TOLERANCE: f64 = 1e-6;

/// Below this reciprocal line length [`point_line_distance`] stops dividing.
pub const MIN_RECIPROCAL_LENGTH: f64 = 1e-12;

/// Relative slack for [`point_in_triangle`]'s area comparison.
const POINT_IN_TRIANGLE_TOLERANCE: f64 = 1e-6;

/// Area of the triangle (p1, p2, p3). Always >= 0.
///
/// The cross product of the two edge vectors is twice the signed area.
#[inline]
pub fn area_of_triangle<T: Coord>(p1: Point<T>, p2: Point<T>, p3: Point<T>) -> T {
    let cross = (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y);
    cross.abs() * T::lit(0.5)
}

/// Test if `p` lies inside or on the triangle (a, b, c).
///
/// Compares the triangle area with the sum of the three sub-triangles
/// formed with `p`. A zero-area triangle only contains points on the
/// segment it collapses to.
pub fn point_in_triangle<T: Coord>(p: Point<T>, a: Point<T>, b: Point<T>, c: Point<T>) -> bool {
    let area = area_of_triangle(a, b, c);
    let sum = area_of_triangle(p, a, b) + area_of_triangle(p, b, c) + area_of_triangle(p, c, a);

    if area == T::zero() {
        return sum == T::zero()
            && Bounds::of_points(&[a, b, c]).is_some_and(|extent| extent.contains(p));
    }

    (sum - area).abs() <= T::lit(POINT_IN_TRIANGLE_TOLERANCE) * area
}

/// Do the three points lie on one line?
///
/// Coincident points and reflections through the origin are checked
/// exactly first: the unit-vector test below is unreliable for them.
pub fn colinear<T: Coord>(p1: Point<T>, p2: Point<T>, p3: Point<T>) -> bool {
    if p1 == p2 || p1 == p3 || p2 == p3 {
        return true;
    }

    let origin = Point::<T>::default();
    let reflected = |o: Point<T>, a: Point<T>, b: Point<T>| o == origin && a.x == -b.x && a.y == -b.y;
    if reflected(p1, p2, p3) || reflected(p2, p1, p3) || reflected(p3, p1, p2) {
        return true;
    }

    let (ux, uy) = (p2.x - p1.x, p2.y - p1.y);
    let (vx, vy) = (p3.x - p1.x, p3.y - p1.y);
    let u_len = (ux * ux + uy * uy).sqrt();
    let v_len = (vx * vx + vy * vy).sqrt();

    // Differences small enough to underflow behave like coincident points.
    if u_len == T::zero() || v_len == T::zero() {
        return true;
    }

    let dot = (ux / u_len) * (vx / v_len) + (uy / u_len) * (vy / v_len);
    (dot.abs() - T::one()).abs() <= T::lit(COLINEAR_TOLERANCE)
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// Degenerates to point distance when `a == b`. When the line is so long
/// that its reciprocal length is at most [`MIN_RECIPROCAL_LENGTH`], the
/// division is skipped: the result is 0 for colinear input and
/// `T::max_value()` otherwise. Callers rely on that sentinel.
pub fn point_line_distance<T: Coord>(p: Point<T>, a: Point<T>, b: Point<T>) -> T {
    if a == b {
        return p.distance(a);
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let reciprocal = T::one() / (dx * dx + dy * dy).sqrt();

    if reciprocal <= T::lit(MIN_RECIPROCAL_LENGTH) {
        return if colinear(p, a, b) { T::zero() } else { T::max_value() };
    }

    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() * reciprocal
}

/// Do two ordered rectangles intersect (closed edges)?
#[inline]
pub fn overlap<T: Coord>(a: &Bounds<T>, b: &Bounds<T>) -> bool {
    a.overlaps(b)
}

/// Does `a` completely contain `b`?
#[inline]
pub fn subsumes<T: Coord>(a: &Bounds<T>, b: &Bounds<T>) -> bool {
    a.subsumes(b)
}

/// Longitude/latitude validity: ordered and inside `[-180,180] x [-90,90]`.
#[inline]
pub fn is_valid_bounds<T: Coord>(bounds: &Bounds<T>) -> bool {
    bounds.is_valid_in(&Domain::lon_lat())
}

//! Liang-Barsky clipping of a single segment against a rectangle.
//!
//! This is the HOT PATH for polyline subsetting: it runs once per input
//! edge, so it validates bounds only in debug builds.
//!
//! Reference: Liang & Barsky, "A New Concept and Method for Line Clipping",
//! ACM TOG 3(1), 1984.

use crate::geometry::{Bounds, Coord, Point, Segment};

/// The surviving parametric interval `[t1, t2]` of a segment.
///
/// `t1` only ever increases and `t2` only ever decreases while the four
/// boundary tests run. The segment is visible iff `t1 <= t2` at the end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipState<T = f64> {
    pub t1: T,
    pub t2: T,
}

/// Result of clipping one segment.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// Instead of rewriting the caller's coordinates in place and returning a
/// bool, the clipped segment travels *inside* the variant. You can't read
/// stale coordinates from a `NotVisible` result - there are none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentClip<T = f64> {
    /// Some sub-segment survives (possibly a single point).
    Clipped(Segment<T>),
    /// Nothing of the segment lies inside the window.
    NotVisible,
}

impl<T: Coord> SegmentClip<T> {
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, SegmentClip::Clipped(_))
    }

    #[inline]
    pub fn segment(self) -> Option<Segment<T>> {
        match self {
            SegmentClip::Clipped(segment) => Some(segment),
            SegmentClip::NotVisible => None,
        }
    }
}

impl<T: Coord> ClipState<T> {
    /// The whole segment: `t1 = 0`, `t2 = 1`.
    #[inline]
    pub fn new() -> Self {
        Self { t1: T::zero(), t2: T::one() }
    }

    /// Apply one half-plane test.
    ///
    /// `p` is the directional delta against the boundary (negative when the
    /// segment enters through it) and `q` the signed offset of the start
    /// point from it. Returns false once the segment is known to be invisible.
    #[inline]
    pub fn clip_coordinate(&mut self, p: T, q: T) -> bool {
        if p < T::zero() {
            let r = q / p;
            if r > self.t2 {
                return false;
            }
            if r > self.t1 {
                self.t1 = r;
            }
        } else if p > T::zero() {
            let r = q / p;
            if r < self.t1 {
                return false;
            }
            if r < self.t2 {
                self.t2 = r;
            }
        } else if q < T::zero() {
            // Parallel to this boundary and on the outside of it.
            return false;
        }
        true
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.t1 <= self.t2
    }
}

impl<T: Coord> Default for ClipState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clip the segment `start -> end` to `bounds`.
///
/// Tests run left, right, bottom, top and stop at the first rejection.
/// The end point is recomputed from the original start before the start
/// itself is moved; endpoints whose parameter did not change are returned
/// bit-for-bit unchanged.
pub fn clip_line<T: Coord>(bounds: &Bounds<T>, start: Point<T>, end: Point<T>) -> SegmentClip<T> {
    debug_assert!(bounds.is_ordered(), "clip_line: crossed or non-finite bounds");

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut state = ClipState::new();

    let visible = state.clip_coordinate(-dx, start.x - bounds.x_min)
        && state.clip_coordinate(dx, bounds.x_max - start.x)
        && state.clip_coordinate(-dy, start.y - bounds.y_min)
        && state.clip_coordinate(dy, bounds.y_max - start.y);

    if !visible || !state.is_visible() {
        return SegmentClip::NotVisible;
    }

    let mut clipped = Segment::new(start, end);
    if state.t2 < T::one() {
        clipped.end = Point::new(start.x + state.t2 * dx, start.y + state.t2 * dy);
    }
    if state.t1 > T::zero() {
        clipped.start = Point::new(start.x + state.t1 * dx, start.y + state.t1 * dy);
    }

    SegmentClip::Clipped(clipped)
}

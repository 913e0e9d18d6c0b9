//! Core geometry types for geoclip.
//!
//! ## Rust Lesson #3: Generic Structs
//!
//! Every type here is generic over the coordinate scalar `T`.
//! The clipping code is written once and the compiler stamps out an
//! `f32` copy and an `f64` copy (monomorphization), so single and double
//! precision share every line of logic with zero runtime cost.
//!
//! `Point<T = f64>` sets a *default* type parameter: writing plain `Point`
//! in a type position means `Point<f64>`.

use std::fmt;

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ClipError, Result};

// ============================================================================
// COORDINATE SCALAR
// ============================================================================

/// A floating-point coordinate type (`f32` or `f64`).
///
/// `num_traits::Float` supplies the arithmetic; this trait adds lossless-enough
/// conversions to and from `f64` for constants and error reporting.
pub trait Coord: Float + Default + fmt::Debug + Send + Sync + 'static {
    /// Convert an `f64` literal into this precision.
    fn lit(value: f64) -> Self;

    /// Widen to `f64`.
    fn as_f64(self) -> f64;
}

impl Coord for f32 {
    #[inline]
    fn lit(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Coord for f64 {
    #[inline]
    fn lit(value: f64) -> Self {
        value
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

// ============================================================================
// POINT & SEGMENT
// ============================================================================

/// A 2D point: (longitude, latitude) or generic (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point<T = f64> {
    pub x: T,
    pub y: T,
}

/// A line segment defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<T = f64> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T: Coord> Point<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: Point<T>) -> T {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Convert to another precision (e.g. `f64` input into an `f32` pipeline).
    #[inline]
    pub fn cast<U: Coord>(self) -> Point<U> {
        Point::new(U::lit(self.x.as_f64()), U::lit(self.y.as_f64()))
    }
}

impl<T: Coord> Segment<T> {
    #[inline]
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> T {
        self.start.distance(self.end)
    }
}

// ============================================================================
// BOUNDS & DOMAIN
// ============================================================================

/// An axis-aligned rectangle used as the clipping window.
///
/// Invariant: `x_min <= x_max` and `y_min <= y_max`, all finite.
/// [`Bounds::new`] enforces it; the fields stay public so callers can build
/// literals, and every batch entry point re-validates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds<T = f64> {
    pub x_min: T,
    pub x_max: T,
    pub y_min: T,
    pub y_max: T,
}

/// The coordinate range a [`Bounds`] must lie inside to be valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain<T = f64> {
    pub x_min: T,
    pub x_max: T,
    pub y_min: T,
    pub y_max: T,
}

impl<T: Coord> Domain<T> {
    /// Longitude/latitude degrees: `[-180, 180] x [-90, 90]`.
    pub fn lon_lat() -> Self {
        Self {
            x_min: T::lit(-180.0),
            x_max: T::lit(180.0),
            y_min: T::lit(-90.0),
            y_max: T::lit(90.0),
        }
    }

    /// Any finite rectangle.
    pub fn unbounded() -> Self {
        Self {
            x_min: T::min_value(),
            x_max: T::max_value(),
            y_min: T::min_value(),
            y_max: T::max_value(),
        }
    }
}

impl<T: Coord> Default for Domain<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: Coord> Bounds<T> {
    /// Create validated bounds. Fails if either axis is inverted or non-finite.
    pub fn new(x_min: T, x_max: T, y_min: T, y_max: T) -> Result<Self> {
        let bounds = Self { x_min, x_max, y_min, y_max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Create bounds and additionally require them to lie inside `domain`.
    pub fn within(x_min: T, x_max: T, y_min: T, y_max: T, domain: &Domain<T>) -> Result<Self> {
        let bounds = Self::new(x_min, x_max, y_min, y_max)?;
        if !bounds.is_valid_in(domain) {
            return Err(ClipError::BoundsOutsideDomain {
                x_min: x_min.as_f64(),
                x_max: x_max.as_f64(),
                y_min: y_min.as_f64(),
                y_max: y_max.as_f64(),
            });
        }
        Ok(bounds)
    }

    /// True if all four values are finite and neither axis is crossed.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
            && self.x_min <= self.x_max
            && self.y_min <= self.y_max
    }

    /// Check [`Bounds::is_ordered`], reporting the offending rectangle.
    pub fn validate(&self) -> Result<()> {
        if self.is_ordered() {
            Ok(())
        } else {
            Err(ClipError::InvalidBounds {
                x_min: self.x_min.as_f64(),
                x_max: self.x_max.as_f64(),
                y_min: self.y_min.as_f64(),
                y_max: self.y_max.as_f64(),
            })
        }
    }

    /// Ordered and inside `domain` on both axes.
    pub fn is_valid_in(&self, domain: &Domain<T>) -> bool {
        self.is_ordered()
            && self.x_min >= domain.x_min
            && self.x_max <= domain.x_max
            && self.y_min >= domain.y_min
            && self.y_max <= domain.y_max
    }

    #[inline]
    pub fn contains(&self, p: Point<T>) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// True if the two closed rectangles share at least one point.
    #[inline]
    pub fn overlaps(&self, other: &Bounds<T>) -> bool {
        debug_assert!(self.is_ordered() && other.is_ordered());
        !(self.x_max < other.x_min
            || self.x_min > other.x_max
            || self.y_max < other.y_min
            || self.y_min > other.y_max)
    }

    /// True if `other` lies entirely inside `self`.
    #[inline]
    pub fn subsumes(&self, other: &Bounds<T>) -> bool {
        debug_assert!(self.is_ordered() && other.is_ordered());
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Grow each side by `margin` (used for tolerance checks).
    pub fn expanded(&self, margin: T) -> Self {
        Self {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            y_min: self.y_min - margin,
            y_max: self.y_max + margin,
        }
    }

    pub fn width(&self) -> T {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> T {
        self.y_max - self.y_min
    }

    /// Convert to another precision.
    pub fn cast<U: Coord>(&self) -> Bounds<U> {
        Bounds {
            x_min: U::lit(self.x_min.as_f64()),
            x_max: U::lit(self.x_max.as_f64()),
            y_min: U::lit(self.y_min.as_f64()),
            y_max: U::lit(self.y_max.as_f64()),
        }
    }

    /// Smallest bounds enclosing `points`, or `None` for an empty slice.
    pub fn of_points(points: &[Point<T>]) -> Option<Self> {
        let first = points.first()?;

        // Same fold-over-iterator shape as a JS reduce, but a single pass.
        let init = Self {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            x_min: b.x_min.min(p.x),
            x_max: b.x_max.max(p.x),
            y_min: b.y_min.min(p.y),
            y_max: b.y_max.max(p.y),
        }))
    }
}

/// Calculate signed area of a closed point ring using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding
/// - Negative value for clockwise winding
/// - Zero for rings with fewer than three points or no enclosed area
pub fn signed_area_of_points<T: Coord>(points: &[Point<T>]) -> T {
    let n = points.len();
    if n < 3 {
        return T::zero();
    }

    let mut area = T::zero();
    for i in 0..n {
        let j = (i + 1) % n;
        area = area + points[i].x * points[j].y;
        area = area - points[j].x * points[i].y;
    }
    area * T::lit(0.5)
}

/// Floating-point slack for "every output vertex lies inside the window".
///
/// Intersections are computed as `start + t * delta`, so the error grows with
/// the magnitude of the coordinates involved, not with the window size.
pub(crate) fn containment_tolerance<T: Coord>(bounds: &Bounds<T>, extent: &Bounds<T>) -> T {
    let scale = [
        bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max,
        extent.x_min, extent.x_max, extent.y_min, extent.y_max,
    ]
    .iter()
    .fold(T::one(), |acc, v| acc.max(v.abs()));
    scale * T::epsilon() * T::lit(64.0)
}

// ============================================================================
// TESTS
// ============================================================================

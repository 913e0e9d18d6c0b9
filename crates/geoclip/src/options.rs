//! Bundled clipping knobs.

use crate::error::{ClipError, Result};
use crate::geometry::{Bounds, Coord, Domain, Point};
use crate::polygon::clip_polygons;
use crate::subset::{PolylineBatch, SubsetCounts, subset_count, subset_map};

/// Settings shared by a run of clip calls.
///
/// The free functions take these as plain arguments; `ClipOptions` keeps
/// them together and additionally checks the window against `domain`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipOptions {
    /// Polyline thinning distance. 0 keeps every vertex.
    pub resolution: f64,
    /// Trim zero-area spikes from clipped polygons.
    pub discard_degenerates: bool,
    /// Where a clip window is allowed to lie.
    pub domain: Domain<f64>,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            resolution: 0.0,
            discard_degenerates: true,
            domain: Domain::unbounded(),
        }
    }
}

impl ClipOptions {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_discard_degenerates(mut self, discard: bool) -> Self {
        self.discard_degenerates = discard;
        self
    }

    /// Restrict windows to `[-180, 180] x [-90, 90]`.
    pub fn lon_lat(mut self) -> Self {
        self.domain = Domain::lon_lat();
        self
    }

    /// Reject `bounds` if it is crossed or falls outside the domain.
    pub fn check_bounds<T: Coord>(&self, bounds: &Bounds<T>) -> Result<()> {
        bounds.validate()?;
        let wide: Bounds<f64> = bounds.cast();
        if wide.is_valid_in(&self.domain) {
            Ok(())
        } else {
            Err(ClipError::BoundsOutsideDomain {
                x_min: wide.x_min,
                x_max: wide.x_max,
                y_min: wide.y_min,
                y_max: wide.y_max,
            })
        }
    }

    pub fn subset<T: Coord>(&self, input: &PolylineBatch<T>, bounds: &Bounds<T>) -> Result<PolylineBatch<T>> {
        self.check_bounds(bounds)?;
        subset_map(input, T::lit(self.resolution), bounds)
    }

    pub fn subset_count<T: Coord>(&self, input: &PolylineBatch<T>, bounds: &Bounds<T>) -> Result<SubsetCounts> {
        self.check_bounds(bounds)?;
        subset_count(input, T::lit(self.resolution), bounds)
    }

    pub fn clip_polygons<T, R>(&self, bounds: &Bounds<T>, polygons: &[R]) -> Result<Vec<Vec<Point<T>>>>
    where
        T: Coord,
        R: AsRef<[Point<T>]>,
    {
        self.check_bounds(bounds)?;
        clip_polygons(self.discard_degenerates, bounds, polygons)
    }
}

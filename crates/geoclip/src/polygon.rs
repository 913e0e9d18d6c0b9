//! Liang-Barsky polygon clipping against a rectangle.
//!
//! One pass over the closed vertex ring. Each edge contributes at most a
//! handful of vertices: an entry intersection, an exit intersection (or the
//! edge's own end vertex), and window corners the edge swings past while
//! outside. Corner emission is what keeps the output a closed ring when the
//! polygon wraps around the window, but it also produces zero-area spikes
//! along the boundary; those are trimmed as they appear.

use smallvec::SmallVec;

use crate::error::{ClipError, Result};
use crate::geometry::{Bounds, Coord, Point, containment_tolerance, signed_area_of_points};
use crate::predicates::area_of_triangle;

/// Colinear-trailing-vertex checks per emitted vertex. Two consecutive
/// degenerate corners can appear, so one pass is not enough.
const MAX_TRIM_PASSES: usize = 2;

/// Vertices a single edge can emit.
type EdgeVertices<T> = SmallVec<[Point<T>; 3]>;

/// Output slots a caller must provide for a ring of `vertex_count` vertices.
///
/// Simple rings rarely need more than `2 * vertex_count + 2`, but a
/// self-intersecting ring can make every edge emit all three of its
/// vertices. Trimming only removes, so this bound always holds.
#[inline]
pub fn polygon_output_capacity(vertex_count: usize) -> usize {
    3 * vertex_count
}

// ============================================================================
// OUTPUT SINKS
// ============================================================================
//
// ## Rust Lesson #22: Traits as Seams
//
// The clipping loop doesn't care whether it writes into a growable Vec or a
// caller-owned slice. A small private trait lets one generic function drive
// both, and the compiler monomorphizes each use - no dynamic dispatch.

trait RingSink<T> {
    fn push(&mut self, p: Point<T>) -> Result<()>;
    fn remove(&mut self, index: usize);
    fn clear(&mut self);
    fn as_slice(&self) -> &[Point<T>];
}

impl<T: Coord> RingSink<T> for Vec<Point<T>> {
    fn push(&mut self, p: Point<T>) -> Result<()> {
        Vec::push(self, p);
        Ok(())
    }

    fn remove(&mut self, index: usize) {
        Vec::remove(self, index);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn as_slice(&self) -> &[Point<T>] {
        self
    }
}

/// A caller-owned buffer plus a write cursor.
struct SliceSink<'a, T> {
    buf: &'a mut [Point<T>],
    len: usize,
}

impl<T: Coord> RingSink<T> for SliceSink<'_, T> {
    fn push(&mut self, p: Point<T>) -> Result<()> {
        let got = self.buf.len();
        let slot = self
            .buf
            .get_mut(self.len)
            .ok_or(ClipError::OutputTooSmall { needed: self.len + 1, got })?;
        *slot = p;
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, index: usize) {
        self.buf.copy_within(index + 1..self.len, index);
        self.len -= 1;
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn as_slice(&self) -> &[Point<T>] {
        &self.buf[..self.len]
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Clip a closed polygon ring to `bounds`.
///
/// Returns the clipped ring, or an empty vector when nothing of the polygon
/// is inside the window. Non-empty results always have at least 3 vertices.
/// With `discard_degenerates`, zero-area spikes and zero-area rings are
/// removed.
///
/// A ring that lies entirely inside the window comes back unchanged, in the
/// same order (apart from trimmed colinear vertices).
pub fn clip_polygon<T: Coord>(
    discard_degenerates: bool,
    bounds: &Bounds<T>,
    vertices: &[Point<T>],
) -> Result<Vec<Point<T>>> {
    check_input(bounds, vertices).inspect_err(|e| tracing::trace!(error = %e, "rejected polygon"))?;

    let mut output = Vec::with_capacity(polygon_output_capacity(vertices.len()));
    clip_ring(discard_degenerates, bounds, vertices, &mut output)?;

    tracing::trace!(input = vertices.len(), output = output.len(), "clipped polygon");
    Ok(output)
}

/// Like [`clip_polygon`], writing into a caller-provided buffer.
///
/// `output` must hold at least [`polygon_output_capacity`] points; with that
/// much room the clip itself never fails. Returns the number of vertices
/// written.
pub fn clip_polygon_into<T: Coord>(
    discard_degenerates: bool,
    bounds: &Bounds<T>,
    vertices: &[Point<T>],
    output: &mut [Point<T>],
) -> Result<usize> {
    check_input(bounds, vertices).inspect_err(|e| tracing::trace!(error = %e, "rejected polygon"))?;

    let needed = polygon_output_capacity(vertices.len());
    if output.len() < needed {
        return Err(ClipError::OutputTooSmall { needed, got: output.len() });
    }

    let mut sink = SliceSink { buf: output, len: 0 };
    clip_ring(discard_degenerates, bounds, vertices, &mut sink)?;
    Ok(sink.len)
}

/// Clip many rings against one window.
///
/// The result is index-aligned with `rings`; excluded polygons come back
/// as empty vectors.
pub fn clip_polygons<T, R>(
    discard_degenerates: bool,
    bounds: &Bounds<T>,
    rings: &[R],
) -> Result<Vec<Vec<Point<T>>>>
where
    T: Coord,
    R: AsRef<[Point<T>]>,
{
    let clipped = rings
        .iter()
        .map(|ring| clip_polygon(discard_degenerates, bounds, ring.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        polygons = rings.len(),
        kept = clipped.iter().filter(|ring| !ring.is_empty()).count(),
        "clipped polygon batch"
    );
    Ok(clipped)
}

// ============================================================================
// IMPLEMENTATION
// ============================================================================

fn check_input<T: Coord>(bounds: &Bounds<T>, vertices: &[Point<T>]) -> Result<()> {
    bounds.validate()?;
    if vertices.len() < 3 {
        return Err(ClipError::TooFewVertices { needed: 3, got: vertices.len() });
    }
    if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
        return Err(ClipError::NonFiniteCoordinate { index });
    }
    Ok(())
}

fn clip_ring<T: Coord, S: RingSink<T>>(
    discard_degenerates: bool,
    bounds: &Bounds<T>,
    vertices: &[Point<T>],
    out: &mut S,
) -> Result<()> {
    // A ring whose extent misses the window cannot intersect it, but the edge
    // loop could still emit corner vertices for it.
    let Some(extent) = Bounds::of_points(vertices) else {
        return Ok(());
    };
    if !bounds.overlaps(&extent) {
        return Ok(());
    }

    // Start with the closing edge so a contained ring keeps its vertex order.
    let mut from = vertices[vertices.len() - 1];
    for &to in vertices {
        for p in clip_edge(bounds, from, to) {
            out.push(p)?;
            if discard_degenerates {
                trim_trailing_spike(out);
            }
        }
        from = to;
    }

    if discard_degenerates {
        trim_wraparound(out);
        if signed_area_of_points(out.as_slice()) == T::zero() {
            out.clear();
        }
    }

    if out.as_slice().len() < 3 {
        out.clear();
    }

    debug_assert!(
        {
            let tolerance = containment_tolerance(bounds, &extent);
            let window = bounds.expanded(tolerance);
            out.as_slice().iter().all(|p| window.contains(*p))
        },
        "clip_polygon emitted a vertex outside the window"
    );
    Ok(())
}

/// Emit the vertices produced by edge `from -> to`.
fn clip_edge<T: Coord>(bounds: &Bounds<T>, from: Point<T>, to: Point<T>) -> EdgeVertices<T> {
    let mut emitted = EdgeVertices::new();
    let zero = T::zero();
    let one = T::one();

    let dx = to.x - from.x;
    let dy = to.y - from.y;

    // Which boundary the edge crosses first on each axis. A zero-delta axis
    // beyond the max side looks "outward" through the max boundary.
    let (x_in, x_out) = if dx > zero || (dx == zero && from.x > bounds.x_max) {
        (bounds.x_min, bounds.x_max)
    } else {
        (bounds.x_max, bounds.x_min)
    };
    let (y_in, y_out) = if dy > zero || (dy == zero && from.y > bounds.y_max) {
        (bounds.y_min, bounds.y_max)
    } else {
        (bounds.y_max, bounds.y_min)
    };

    let t_out_x = exit_parameter(x_out, from.x, dx, bounds.x_min, bounds.x_max);
    let t_out_y = exit_parameter(y_out, from.y, dy, bounds.y_min, bounds.y_max);
    let (t_out1, t_out2) = if t_out_x < t_out_y { (t_out_x, t_out_y) } else { (t_out_y, t_out_x) };

    // Edge points away from the window on some axis for its whole length.
    if t_out2 <= zero {
        return emitted;
    }

    let t_in_x = entry_parameter(x_in, from.x, dx);
    let t_in_y = entry_parameter(y_in, from.y, dy);
    let t_in2 = t_in_x.max(t_in_y);

    if t_out1 < t_in2 {
        // Leaves one slab before entering the other: passes a corner region.
        if zero < t_out1 && t_out1 <= one {
            let corner = if t_in_x < t_in_y {
                Point::new(x_out, y_in)
            } else {
                Point::new(x_in, y_out)
            };
            emitted.push(corner);
        }
    } else if zero < t_out1 && t_in2 <= one {
        if zero <= t_in2 {
            let entry = if t_in_x > t_in_y {
                Point::new(x_in, from.y + t_in_x * dy)
            } else {
                Point::new(from.x + t_in_y * dx, y_in)
            };
            emitted.push(entry);
        }

        let exit = if t_out1 <= one {
            if t_out_x < t_out_y {
                Point::new(x_out, from.y + t_out_x * dy)
            } else {
                Point::new(from.x + t_out_y * dx, y_out)
            }
        } else {
            to
        };
        emitted.push(exit);
    }

    if zero < t_out2 && t_out2 <= one {
        emitted.push(Point::new(x_out, y_out));
    }

    emitted
}

/// Parameter where the edge leaves the `[lo, hi]` slab through `out`.
/// A zero delta never leaves (+inf) if already inside, else is never in (-inf).
#[inline]
fn exit_parameter<T: Coord>(out: T, start: T, delta: T, lo: T, hi: T) -> T {
    if delta != T::zero() {
        (out - start) / delta
    } else if lo <= start && start <= hi {
        T::infinity()
    } else {
        T::neg_infinity()
    }
}

#[inline]
fn entry_parameter<T: Coord>(entry: T, start: T, delta: T) -> T {
    if delta != T::zero() {
        (entry - start) / delta
    } else {
        T::neg_infinity()
    }
}

/// Drop the middle of the last three vertices while they have zero area.
///
/// This removes the `_/\_` hat an excursion past a window corner leaves
/// behind, along with duplicated corner vertices.
fn trim_trailing_spike<T: Coord, S: RingSink<T>>(out: &mut S) {
    for _ in 0..MAX_TRIM_PASSES {
        let ring = out.as_slice();
        let n = ring.len();
        if n < 3 || area_of_triangle(ring[n - 3], ring[n - 2], ring[n - 1]) != T::zero() {
            return;
        }
        out.remove(n - 2);
    }
}

/// The trailing check never sees the two triples that span the ring's seam.
fn trim_wraparound<T: Coord, S: RingSink<T>>(out: &mut S) {
    let ring = out.as_slice();
    let n = ring.len();
    if n > 3 && area_of_triangle(ring[n - 2], ring[n - 1], ring[0]) == T::zero() {
        out.remove(n - 1);
    }

    let ring = out.as_slice();
    let n = ring.len();
    if n > 3 && area_of_triangle(ring[n - 1], ring[0], ring[1]) == T::zero() {
        out.remove(0);
    }
}

// ============================================================================
// TESTS
// ============================================================================

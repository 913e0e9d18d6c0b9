//! Polyline subsetting - clip a batch of polylines to a window and re-chain
//! the surviving pieces.
//!
//! Each input edge is clipped on its own. Pieces that pick up exactly where
//! the previous piece ended extend the current output polyline; anything
//! else (the polyline left the window and came back) starts a new one.

use crate::error::{ClipError, Result};
use crate::geometry::{Bounds, Coord, Point, containment_tolerance};
use crate::segment::{SegmentClip, clip_line};

// ============================================================================
// POLYLINE BATCH
// ============================================================================

/// A flat run of points plus per-polyline vertex counts.
///
/// The points are the concatenation of every polyline's vertices in order;
/// `counts[i]` says how many belong to polyline `i`. Every count is >= 1 and
/// the counts sum to the number of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineBatch<T = f64> {
    points: Vec<Point<T>>,
    counts: Vec<usize>,
}

impl<T: Coord> Default for PolylineBatch<T> {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl<T: Coord> PolylineBatch<T> {
    /// Build a batch, checking the count invariants and coordinate finiteness.
    pub fn new(points: Vec<Point<T>>, counts: Vec<usize>) -> Result<Self> {
        if let Some(polyline) = counts.iter().position(|&c| c == 0) {
            return Err(ClipError::ZeroCount { polyline });
        }
        let counted: usize = counts.iter().sum();
        if counted != points.len() {
            return Err(ClipError::CountMismatch { counted, vertices: points.len() });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ClipError::NonFiniteCoordinate { index });
        }
        Ok(Self { points, counts })
    }

    /// A batch with no polylines.
    pub fn new_empty() -> Self {
        Self { points: Vec::new(), counts: Vec::new() }
    }

    /// Build from separate polylines.
    pub fn from_polylines<I, P>(polylines: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Point<T>]>,
    {
        let mut points = Vec::new();
        let mut counts = Vec::new();
        for polyline in polylines {
            let polyline = polyline.as_ref();
            points.extend_from_slice(polyline);
            counts.push(polyline.len());
        }
        Self::new(points, counts)
    }

    /// Build from interleaved `[x0, y0, x1, y1, ...]` coordinates.
    pub fn from_interleaved(coordinates: &[T], counts: Vec<usize>) -> Result<Self> {
        if coordinates.len() % 2 != 0 {
            return Err(ClipError::OddCoordinateCount(coordinates.len()));
        }
        let points = coordinates
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect();
        Self::new(points, counts)
    }

    /// Export coordinates interleaved `x, y` per vertex.
    pub fn to_interleaved(&self) -> Vec<T> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn polyline_count(&self) -> usize {
        self.counts.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over each polyline's vertices.
    pub fn polylines(&self) -> impl Iterator<Item = &[Point<T>]> + '_ {
        let mut offset = 0;
        self.counts.iter().map(move |&count| {
            let polyline = &self.points[offset..offset + count];
            offset += count;
            polyline
        })
    }

    /// Take the points and counts apart.
    pub fn into_parts(self) -> (Vec<Point<T>>, Vec<usize>) {
        (self.points, self.counts)
    }

    /// Convert every coordinate to another precision.
    ///
    /// Fails with [`ClipError::NonFiniteCoordinate`] when a coordinate does
    /// not fit the target type.
    pub fn cast<U: Coord>(&self) -> Result<PolylineBatch<U>> {
        PolylineBatch::new(self.points.iter().map(|p| p.cast()).collect(), self.counts.clone())
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Receives the output of [`subset_into`].
///
/// `start_polyline` opens a new output polyline with its first two vertices;
/// `extend_polyline` appends one vertex to the most recently opened one.
pub trait SubsetSink<T> {
    fn start_polyline(&mut self, start: Point<T>, end: Point<T>);
    fn extend_polyline(&mut self, next: Point<T>);
}

impl<T: Coord> SubsetSink<T> for PolylineBatch<T> {
    fn start_polyline(&mut self, start: Point<T>, end: Point<T>) {
        self.points.push(start);
        self.points.push(end);
        self.counts.push(2);
    }

    fn extend_polyline(&mut self, next: Point<T>) {
        debug_assert!(!self.counts.is_empty(), "extend_polyline before start_polyline");
        if let Some(count) = self.counts.last_mut() {
            self.points.push(next);
            *count += 1;
        }
    }
}

/// Output sizes without the coordinates: the dry run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsetCounts {
    pub polylines: usize,
    pub vertices: usize,
}

impl<T: Coord> SubsetSink<T> for SubsetCounts {
    fn start_polyline(&mut self, _start: Point<T>, _end: Point<T>) {
        self.polylines += 1;
        self.vertices += 2;
    }

    fn extend_polyline(&mut self, _next: Point<T>) {
        self.vertices += 1;
    }
}

// ============================================================================
// SUBSETTING
// ============================================================================

/// Worst-case output vertex count: every edge can come back as a fresh
/// two-vertex polyline.
#[inline]
pub fn subset_output_capacity<T: Coord>(input: &PolylineBatch<T>) -> usize {
    2 * input.vertex_count()
}

/// Clip every polyline in `input` to `bounds`.
///
/// With `resolution > 0`, an edge spanning less than `resolution` on both
/// axes is skipped and the next edge starts from the last vertex kept, which
/// thins dense polylines without breaking them apart.
///
/// The output satisfies `sum(counts) == vertex_count` and every count is at
/// least 2. Polylines entirely outside the window contribute nothing.
pub fn subset_map<T: Coord>(
    input: &PolylineBatch<T>,
    resolution: T,
    bounds: &Bounds<T>,
) -> Result<PolylineBatch<T>> {
    let mut output = PolylineBatch::new_empty();
    subset_into(input, resolution, bounds, &mut output)?;

    debug_assert_eq!(output.counts.iter().sum::<usize>(), output.points.len());
    debug_assert!(output.counts.iter().all(|&c| c >= 2));
    debug_assert!(
        Bounds::of_points(&input.points).is_none_or(|extent| {
            let window = bounds.expanded(containment_tolerance(bounds, &extent));
            output.points.iter().all(|p| window.contains(*p))
        }),
        "subset_map emitted a vertex outside the window"
    );

    tracing::debug!(
        input_polylines = input.polyline_count(),
        input_vertices = input.vertex_count(),
        output_polylines = output.polyline_count(),
        output_vertices = output.vertex_count(),
        "subset polylines"
    );
    Ok(output)
}

/// Compute the output sizes of [`subset_map`] without storing coordinates.
pub fn subset_count<T: Coord>(
    input: &PolylineBatch<T>,
    resolution: T,
    bounds: &Bounds<T>,
) -> Result<SubsetCounts> {
    let mut counts = SubsetCounts::default();
    subset_into(input, resolution, bounds, &mut counts)?;
    Ok(counts)
}

/// Drive `sink` with the clipped, re-chained polylines of `input`.
pub fn subset_into<T, S>(
    input: &PolylineBatch<T>,
    resolution: T,
    bounds: &Bounds<T>,
    sink: &mut S,
) -> Result<()>
where
    T: Coord,
    S: SubsetSink<T>,
{
    check_request(bounds, resolution).inspect_err(|e| tracing::trace!(error = %e, "rejected subset request"))?;

    let thinning = resolution > T::zero();

    for polyline in input.polylines() {
        let Some((&first, rest)) = polyline.split_first() else {
            continue;
        };

        // Pieces never join across input polylines.
        let mut last_emitted: Option<Point<T>> = None;
        let mut prev = first;

        for &next in rest {
            let from = prev;
            prev = next;

            if thinning
                && (next.x - from.x).abs() < resolution
                && (next.y - from.y).abs() < resolution
            {
                continue;
            }

            let SegmentClip::Clipped(piece) = clip_line(bounds, from, next) else {
                continue;
            };

            if last_emitted == Some(piece.start) {
                sink.extend_polyline(piece.end);
            } else {
                sink.start_polyline(piece.start, piece.end);
            }
            last_emitted = Some(piece.end);
        }
    }

    Ok(())
}

fn check_request<T: Coord>(bounds: &Bounds<T>, resolution: T) -> Result<()> {
    bounds.validate()?;
    if !resolution.is_finite() || resolution < T::zero() {
        return Err(ClipError::InvalidResolution(resolution.as_f64()));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Bounds {
        Bounds::new(0.0, 10.0, 0.0, 10.0).unwrap()
    }

    fn line(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn batch(polylines: &[&[(f64, f64)]]) -> PolylineBatch {
        PolylineBatch::from_polylines(polylines.iter().map(|coords| line(coords))).unwrap()
    }

    #[test]
    fn straddling_polyline_keeps_inside_vertices() {
        // Two vertices inside: one output polyline of 3 vertices.
        let input = batch(&[&[(2.0, 5.0), (8.0, 5.0), (15.0, 5.0)]]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output.counts(), &[3]);
        assert_eq!(output.points(), line(&[(2.0, 5.0), (8.0, 5.0), (10.0, 5.0)]).as_slice());

        // One vertex inside: one output polyline of 2 vertices.
        let input = batch(&[&[(2.0, 5.0), (15.0, 5.0), (15.0, 8.0)]]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output.counts(), &[2]);
        assert_eq!(output.points(), line(&[(2.0, 5.0), (10.0, 5.0)]).as_slice());
    }

    #[test]
    fn leaving_and_reentering_splits_polyline() {
        let input = batch(&[&[(5.0, 5.0), (15.0, 5.0), (15.0, 8.0), (5.0, 8.0)]]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output.counts(), &[2, 2]);
        assert_eq!(
            output.points(),
            line(&[(5.0, 5.0), (10.0, 5.0), (10.0, 8.0), (5.0, 8.0)]).as_slice()
        );
    }

    #[test]
    fn contained_polyline_is_unchanged() {
        let coords = [(1.0, 1.0), (3.0, 7.0), (9.0, 2.0), (4.0, 4.0)];
        let input = batch(&[&coords]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn input_polylines_never_merge() {
        let input = batch(&[&[(1.0, 1.0), (2.0, 2.0)], &[(2.0, 2.0), (3.0, 3.0)]]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output.counts(), &[2, 2]);
    }

    #[test]
    fn fully_outside_gives_empty_batch() {
        let input = batch(&[&[(-5.0, 1.0), (-1.0, 9.0), (-3.0, 20.0)], &[(11.0, 0.0), (20.0, 5.0)]]);
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert!(output.is_empty());
        assert_eq!(output.vertex_count(), 0);
        assert!(output.to_interleaved().is_empty());
    }

    #[test]
    fn single_vertex_polylines_emit_nothing() {
        let input = PolylineBatch::new(line(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]), vec![1, 2]).unwrap();
        let output = subset_map(&input, 0.0, &window()).unwrap();
        assert_eq!(output.counts(), &[2]);
        assert_eq!(output.points(), line(&[(2.0, 2.0), (3.0, 3.0)]).as_slice());
    }

    #[test]
    fn resolution_drops_short_edges() {
        // Only the long edge (1.2,1.2) -> (5,5) survives.
        let input = batch(&[&[(1.0, 1.0), (1.1, 1.1), (1.2, 1.2), (5.0, 5.0), (5.3, 5.0)]]);
        let output = subset_map(&input, 0.5, &window()).unwrap();
        assert_eq!(output.counts(), &[2]);
        assert_eq!(output.points(), line(&[(1.2, 1.2), (5.0, 5.0)]).as_slice());
    }

    #[test]
    fn resolution_compares_neighbouring_vertices() {
        // Every step is 0.1 even though the run spans 0.9.
        let coords: Vec<(f64, f64)> = (0..10).map(|i| (1.0 + 0.1 * i as f64, 1.0)).collect();
        let input = batch(&[coords.as_slice()]);
        let output = subset_map(&input, 0.5, &window()).unwrap();
        assert!(output.is_empty());
        assert_eq!(subset_count(&input, 0.5, &window()).unwrap(), SubsetCounts::default());
    }

    #[test]
    fn resolution_needs_both_axes_close() {
        // Tiny in x but long in y: kept.
        let input = batch(&[&[(1.0, 1.0), (1.1, 6.0)]]);
        let output = subset_map(&input, 0.5, &window()).unwrap();
        assert_eq!(output.vertex_count(), 2);
    }

    #[test]
    fn count_only_matches_full_run() {
        let input = batch(&[
            &[(5.0, 5.0), (15.0, 5.0), (15.0, 8.0), (5.0, 8.0)],
            &[(-5.0, -5.0), (5.0, 5.0), (6.0, 6.0)],
            &[(20.0, 20.0), (30.0, 30.0)],
        ]);
        let full = subset_map(&input, 0.0, &window()).unwrap();
        let counts = subset_count(&input, 0.0, &window()).unwrap();
        assert_eq!(counts, SubsetCounts { polylines: 3, vertices: 7 });
        assert_eq!(counts.polylines, full.polyline_count());
        assert_eq!(counts.vertices, full.vertex_count());
        assert!(full.vertex_count() <= subset_output_capacity(&input));
    }

    #[test]
    fn interleaved_round_trip_layout() {
        let input = PolylineBatch::from_interleaved(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], vec![3]).unwrap();
        assert_eq!(input.points()[1], Point::new(2.0, 3.0));
        assert_eq!(input.to_interleaved(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            PolylineBatch::<f64>::from_interleaved(&[0.0, 1.0, 2.0], vec![1]),
            Err(ClipError::OddCoordinateCount(3))
        );
    }

    #[test]
    fn polylines_iterator_splits_on_counts() {
        let input = batch(&[&[(1.0, 1.0), (2.0, 2.0)], &[(3.0, 3.0), (4.0, 4.0), (5.0, 5.0)]]);
        let lengths: Vec<usize> = input.polylines().map(|p| p.len()).collect();
        assert_eq!(lengths, vec![2, 3]);
    }

    #[test]
    fn batch_contract_violations() {
        let pts = line(&[(1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(
            PolylineBatch::new(pts.clone(), vec![1, 0, 1]),
            Err(ClipError::ZeroCount { polyline: 1 })
        );
        assert_eq!(
            PolylineBatch::new(pts.clone(), vec![3]),
            Err(ClipError::CountMismatch { counted: 3, vertices: 2 })
        );
        assert_eq!(
            PolylineBatch::new(line(&[(1.0, f64::INFINITY)]), vec![1]),
            Err(ClipError::NonFiniteCoordinate { index: 0 })
        );

        let input = PolylineBatch::new(pts, vec![2]).unwrap();
        assert_eq!(
            subset_map(&input, -1.0, &window()),
            Err(ClipError::InvalidResolution(-1.0))
        );
        let crossed = Bounds { x_min: 0.0, x_max: 10.0, y_min: 10.0, y_max: 0.0 };
        assert!(matches!(subset_map(&input, 0.0, &crossed), Err(ClipError::InvalidBounds { .. })));
    }

    #[test]
    fn single_and_double_precision_agree() {
        let input = batch(&[&[(5.0, 5.0), (15.0, 5.0), (15.0, 8.0), (5.0, 8.0)]]);
        let double = subset_map(&input, 0.0, &window()).unwrap();

        let single_input: PolylineBatch<f32> = input.cast().unwrap();
        let single_window = Bounds::new(0.0f32, 10.0, 0.0, 10.0).unwrap();
        let single = subset_map(&single_input, 0.0, &single_window).unwrap();

        assert_eq!(single.counts(), double.counts());
        assert_eq!(single, double.cast::<f32>().unwrap());
    }

    #[test]
    fn cast_rejects_coordinates_out_of_range() {
        let input = batch(&[&[(5.0, 5.0), (1e39, 5.0)]]);
        assert_eq!(input.cast::<f32>(), Err(ClipError::NonFiniteCoordinate { index: 1 }));
        assert!(input.cast::<f64>().is_ok());
    }
}

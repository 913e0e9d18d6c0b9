//! # geoclip
//!
//! Rectangular-window clipping for 2D geometry: single segments, polygon
//! rings and batches of polylines, in `f32` or `f64`.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.
//!
//! ## Quick tour
//!
//! ```
//! use geoclip::{Bounds, Point, PolylineBatch, clip_polygon, subset_map};
//!
//! let window = Bounds::new(0.0, 10.0, 0.0, 10.0)?;
//!
//! let square = [
//!     Point::new(-5.0, -5.0),
//!     Point::new(5.0, -5.0),
//!     Point::new(5.0, 5.0),
//!     Point::new(-5.0, 5.0),
//! ];
//! assert_eq!(clip_polygon(true, &window, &square)?.len(), 4);
//!
//! let roads = PolylineBatch::from_polylines([[Point::new(2.0, 5.0), Point::new(15.0, 5.0)]])?;
//! assert_eq!(subset_map(&roads, 0.0, &window)?.counts(), &[2]);
//! # Ok::<(), geoclip::ClipError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod options;
pub mod polygon;
pub mod predicates;
pub mod segment;
pub mod subset;

// Re-export common types at crate root for convenience.
pub use error::{ClipError, Result};
pub use geometry::{Bounds, Coord, Domain, Point, Segment, signed_area_of_points};
pub use options::ClipOptions;
pub use polygon::{clip_polygon, clip_polygon_into, clip_polygons, polygon_output_capacity};
pub use predicates::{
    area_of_triangle, colinear, is_valid_bounds, overlap, point_in_triangle, point_line_distance, subsumes,
};
pub use segment::{ClipState, SegmentClip, clip_line};
pub use subset::{
    PolylineBatch, SubsetCounts, SubsetSink, subset_count, subset_into, subset_map, subset_output_capacity,
};

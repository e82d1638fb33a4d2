//! Foundational primitives for skeleton/surface voxel analysis.
//!
//! ## Volume Layout
//! Volumes are dense 3-D grids stored with `x` varying fastest, then `y`,
//! then `z`: `index = (z * ny + y) * nx + x`. Dimensions are always given as
//! `[nx, ny, nz]`.
//!
//! ## Coordinate Frames
//! Physical coordinates are in dataset units (microns in practice). Voxel
//! coordinates are continuous; the integer voxel containing a point is the
//! per-axis `floor` of its continuous coordinate.
//!
//! ## Axis Flip
//! Some datasets report an extent whose `min` has a larger magnitude than its
//! `max` on the depth axis. [`CoordinateTransform`] detects this once, from
//! the extent, and then uses `max` as that axis' origin with a negated scale
//! for every conversion it performs.

mod error;
mod geom;
mod transform;
mod volume;

pub use error::Error;
pub use geom::{Axis, Point3, Vec3};
pub use transform::{CoordinateTransform, DatasetInfo, Extent, FlipPolicy};
pub use volume::{Block, Volume};

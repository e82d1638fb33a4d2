//! Region statistics for labeled surface volumes.
//!
//! For each non-zero label: voxel count, physical volume, physical centroid
//! and the distance from that centroid to a reference point. All outputs are
//! in the frame given by the per-axis voxel size, with voxel index 0 at the
//! physical origin.

mod region;

pub use region::{RegionStats, region_stats};

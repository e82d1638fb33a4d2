//! Skeleton segment / surface label intersection.
//!
//! Each tree edge is mapped to voxel space through the
//! [`sv_core::CoordinateTransform`] using only its two endpoint voxels. The
//! voxels in between come from a digital line ([`LineIter`]): one voxel per
//! step along the dominant axis, the other axes rounded (ties to even), both
//! endpoints included. Consecutive voxels are 26-connected.
//!
//! Every label volume is sampled at every line voxel; the distinct non-zero
//! labels, sorted ascending, form that edge's annotation for the surface.
//! Voxels outside the grid are skipped and counted.

mod intersect;
mod line;

pub use intersect::{
    DebugOverlay, EdgeAnnotations, LABEL_OVERLAY_OFFSET, NO_LABEL_OVERLAY, annotate_edges,
    labels_along,
};
pub use line::LineIter;

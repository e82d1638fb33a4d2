//! Label volume construction for labeled surfaces.
//!
//! Two host data modes are supported:
//! - **Combined**: one full-resolution short mask per surface, enumerated by
//!   3-D connected-component labeling ([`Connectivity::C26`] by default).
//! - **Blocks**: one physical bounding box plus cropped boolean sub-mask per
//!   surface id. Each box is converted to a voxel [`sv_core::Block`], clipped
//!   to the volume, and the sub-mask is written as `id + 1`. Sub-masks whose
//!   shape disagrees with the clipped block are resampled (nearest neighbor)
//!   instead of rejected.
//!
//! Host masks are expected in host orientation (index 0 at the extent
//! minimum). They are mirrored along every axis the
//! [`sv_core::CoordinateTransform`] flipped before being composed.
//!
//! Data anomalies never fail a build: they are logged and returned as
//! [`SurfaceIssue`] values next to the (possibly empty) label volume.

mod builder;
mod label;
mod resample;

pub use builder::{
    BlockMaskSource, CombinedMaskSource, InMemoryBlocks, InMemoryCombined, LabelSet, MaskBuilder,
    SurfaceIssue, SurfaceLabels, SurfaceSource,
};
pub use label::{Connectivity, LabelVolume, label_components};
pub use resample::resize_nearest;

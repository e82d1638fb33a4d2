use thiserror::Error;

use crate::geom::Axis;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("degenerate extent on axis {axis}: min {min} and max {max} span no width")]
    DegenerateExtent { axis: Axis, min: f64, max: f64 },
    #[error("non-finite extent on axis {axis}")]
    NonFiniteExtent { axis: Axis },
    #[error("zero voxel count on axis {axis}")]
    ZeroVoxelCount { axis: Axis },
}

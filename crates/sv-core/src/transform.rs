use crate::Error;
use crate::geom::{Axis, Point3, Vec3};

/// Physical bounding box of a dataset's voxel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Point3,
    pub max: Point3,
}

impl Extent {
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn width(&self, axis: Axis) -> f64 {
        self.max.get(axis) - self.min.get(axis)
    }
}

/// Dataset descriptor pulled from the host: extent plus voxel counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetInfo {
    pub extent: Extent,
    pub size: [usize; 3],
}

/// Which axes may receive the inverted-extent correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipPolicy {
    /// Only the depth (`z`) axis, the only axis observed inverted in practice.
    #[default]
    DepthOnly,
    AllAxes,
    Disabled,
}

impl FlipPolicy {
    fn applies_to(self, axis: Axis) -> bool {
        match self {
            FlipPolicy::DepthOnly => axis == Axis::Z,
            FlipPolicy::AllAxes => true,
            FlipPolicy::Disabled => false,
        }
    }
}

/// Physical <-> voxel mapping for one dataset session.
///
/// `voxel = (p - origin) * scale` per axis, with `scale = count / (max - min)`.
/// The flip decision is taken once in [`CoordinateTransform::new`]; a flipped
/// axis uses `max` as origin and a negated scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    origin: Point3,
    scale: [f64; 3],
    flipped: [bool; 3],
    size: [usize; 3],
}

impl CoordinateTransform {
    pub fn new(info: &DatasetInfo, policy: FlipPolicy) -> Result<Self, Error> {
        let mut origin = [0.0; 3];
        let mut scale = [0.0; 3];
        let mut flipped = [false; 3];

        for axis in Axis::ALL {
            let a = axis.index();
            let lo = info.extent.min.get(axis);
            let hi = info.extent.max.get(axis);

            if !lo.is_finite() || !hi.is_finite() {
                return Err(Error::NonFiniteExtent { axis });
            }
            if info.size[a] == 0 {
                return Err(Error::ZeroVoxelCount { axis });
            }
            let width = hi - lo;
            if width == 0.0 {
                return Err(Error::DegenerateExtent {
                    axis,
                    min: lo,
                    max: hi,
                });
            }

            let s = info.size[a] as f64 / width;
            if policy.applies_to(axis) && lo.abs() > hi.abs() {
                origin[a] = hi;
                scale[a] = -s;
                flipped[a] = true;
            } else {
                origin[a] = lo;
                scale[a] = s;
            }
        }

        Ok(Self {
            origin: Point3::from_array(origin),
            scale,
            flipped,
            size: info.size,
        })
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Signed voxels-per-unit factor per axis.
    pub fn scale(&self) -> Vec3 {
        Vec3::from_array(self.scale)
    }

    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    pub fn is_flipped(&self, axis: Axis) -> bool {
        self.flipped[axis.index()]
    }

    pub fn any_flipped(&self) -> bool {
        self.flipped.contains(&true)
    }

    /// Continuous voxel coordinate of a physical point.
    pub fn to_voxel(&self, p: Point3) -> Point3 {
        let d = (p - self.origin).to_array();
        Point3::from_array([0, 1, 2].map(|a| d[a] * self.scale[a]))
    }

    pub fn to_physical(&self, v: Point3) -> Point3 {
        let v = v.to_array();
        self.origin + Vec3::from_array([0, 1, 2].map(|a| v[a] / self.scale[a]))
    }

    /// Integer voxel containing `p`; may lie outside the grid.
    pub fn voxel_index(&self, p: Point3) -> [i64; 3] {
        self.to_voxel(p).floor_index()
    }

    /// Offset of `p` from the transform origin, in physical units.
    pub fn offset(&self, p: Point3) -> Vec3 {
        p - self.origin
    }

    /// Unsigned physical edge length of one voxel per axis.
    pub fn voxel_size(&self) -> Vec3 {
        Vec3::from_array(self.scale.map(|s| 1.0 / s.abs()))
    }

    pub fn voxel_volume(&self) -> f64 {
        self.voxel_size().product()
    }
}

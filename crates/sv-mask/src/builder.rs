use core::fmt;

use sv_core::{Axis, Block, CoordinateTransform, DatasetInfo, Extent, Volume};

use crate::label::{Connectivity, LabelVolume, label_components};
use crate::resample::resize_nearest;

/// Host callable returning one full-resolution mask for a whole surface.
pub trait CombinedMaskSource {
    /// Number of surface ids the host reports.
    fn id_count(&self) -> usize;

    /// Short-integer mask at the dataset's native resolution, in host
    /// orientation. Non-zero voxels are foreground.
    fn combined_mask(&self, info: &DatasetInfo) -> Volume<i16>;
}

/// Host callable returning per-id bounding boxes and cropped sub-masks.
pub trait BlockMaskSource {
    fn id_count(&self) -> usize;

    /// Physical bounding box of surface id `id`.
    fn id_extent(&self, id: usize) -> Extent;

    /// Sub-mask of `id` sampled over `extent` at `shape` voxels. Hosts may
    /// return a different shape than requested.
    fn id_mask(&self, id: usize, extent: &Extent, shape: [usize; 3]) -> Volume<bool>;
}

#[derive(Clone, Copy)]
pub enum SurfaceSource<'a> {
    Combined(&'a dyn CombinedMaskSource),
    Blocks(&'a dyn BlockMaskSource),
}

impl fmt::Debug for SurfaceSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined(s) => write!(f, "Combined({} ids)", s.id_count()),
            Self::Blocks(s) => write!(f, "Blocks({} ids)", s.id_count()),
        }
    }
}

/// Recoverable per-surface anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceIssue {
    /// Zero ids, an empty mask, or nothing written to the volume.
    NoSurfaceData,
    /// Host mask shape differed from the requested shape and was resampled.
    /// `id` is `None` for a combined mask.
    ShapeMismatch {
        id: Option<usize>,
        requested: [usize; 3],
        actual: [usize; 3],
    },
    /// The id's bounding box does not overlap the volume after clipping.
    BlockOutsideVolume { id: usize },
    /// Connected-component count differs from the ids the host reported.
    LabelCountMismatch { reported: usize, labeled: u32 },
}

impl fmt::Display for SurfaceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSurfaceData => write!(f, "no surface data"),
            Self::ShapeMismatch {
                id,
                requested,
                actual,
            } => {
                match id {
                    Some(id) => write!(f, "id {id}: ")?,
                    None => write!(f, "combined mask: ")?,
                }
                write!(
                    f,
                    "shape mismatch block != mask: {requested:?} != {actual:?}, resampled"
                )
            }
            Self::BlockOutsideVolume { id } => {
                write!(f, "id {id}: bounding box lies outside the volume")
            }
            Self::LabelCountMismatch { reported, labeled } => {
                write!(f, "host reports {reported} ids, labeling found {labeled}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLabels {
    pub name: String,
    pub labels: LabelVolume,
    pub issues: Vec<SurfaceIssue>,
}

/// Label volumes of every processed surface, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    pub surfaces: Vec<SurfaceLabels>,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.surfaces.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&SurfaceLabels> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    pub fn issue_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.issues.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct MaskBuilder {
    info: DatasetInfo,
    transform: CoordinateTransform,
    connectivity: Connectivity,
}

impl MaskBuilder {
    pub fn new(
        info: DatasetInfo,
        transform: CoordinateTransform,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            info,
            transform,
            connectivity,
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.transform.size()
    }

    /// Builds every surface in order. One surface's anomalies never affect
    /// its siblings.
    pub fn build_all<'a, I>(&self, sources: I) -> LabelSet
    where
        I: IntoIterator<Item = (&'a str, SurfaceSource<'a>)>,
    {
        let surfaces = sources
            .into_iter()
            .map(|(name, source)| {
                log::info!("{name}: building surface label volume");
                let (labels, issues) = self.build(source);
                for issue in &issues {
                    log::warn!("{name}: {issue}");
                }
                log::info!("{name}: {} labels", labels.count());
                SurfaceLabels {
                    name: name.to_string(),
                    labels,
                    issues,
                }
            })
            .collect();

        LabelSet { surfaces }
    }

    pub fn build(&self, source: SurfaceSource<'_>) -> (LabelVolume, Vec<SurfaceIssue>) {
        match source {
            SurfaceSource::Combined(s) => self.build_combined(s),
            SurfaceSource::Blocks(s) => self.build_blocks(s),
        }
    }

    pub fn build_combined(
        &self,
        source: &dyn CombinedMaskSource,
    ) -> (LabelVolume, Vec<SurfaceIssue>) {
        let dims = self.dims();
        let mut issues = Vec::new();

        let mut mask = source.combined_mask(&self.info);
        if mask.is_empty() || mask.data().iter().all(|&v| v == 0) {
            issues.push(SurfaceIssue::NoSurfaceData);
            return (LabelVolume::empty(dims), issues);
        }

        if mask.dims() != dims {
            issues.push(SurfaceIssue::ShapeMismatch {
                id: None,
                requested: dims,
                actual: mask.dims(),
            });
            mask = resize_nearest(&mask, dims);
        }
        self.orient(&mut mask);

        let labels = label_components(&mask, self.connectivity);
        let reported = source.id_count();
        log::debug!("ids reported {reported}, labels retrieved {}", labels.count());
        if reported != labels.count() as usize {
            issues.push(SurfaceIssue::LabelCountMismatch {
                reported,
                labeled: labels.count(),
            });
        }

        (labels, issues)
    }

    pub fn build_blocks(
        &self,
        source: &dyn BlockMaskSource,
    ) -> (LabelVolume, Vec<SurfaceIssue>) {
        let dims = self.dims();
        let mut issues = Vec::new();
        let count = source.id_count();
        if count == 0 {
            issues.push(SurfaceIssue::NoSurfaceData);
            return (LabelVolume::empty(dims), issues);
        }

        let mut labels = Volume::new_fill(dims, 0u32);
        let mut written = 0usize;

        for id in 0..count {
            let extent = source.id_extent(id);
            let Some(block) = self.block_for(&extent) else {
                issues.push(SurfaceIssue::BlockOutsideVolume { id });
                continue;
            };

            let shape = block.shape();
            let mut mask = source.id_mask(id, &extent, shape);
            if mask.dims() != shape {
                issues.push(SurfaceIssue::ShapeMismatch {
                    id: Some(id),
                    requested: shape,
                    actual: mask.dims(),
                });
                mask = resize_nearest(&mask, shape);
            }
            self.orient(&mut mask);

            let value = u32::try_from(id + 1).unwrap_or(u32::MAX);
            written += write_block(&mut labels, &block, &mask, value);
            log::debug!("id {id}: block {block:?}");
        }

        if written == 0 {
            issues.push(SurfaceIssue::NoSurfaceData);
        }

        let count = u32::try_from(count).unwrap_or(u32::MAX);
        (LabelVolume::new(labels, count), issues)
    }

    /// Voxel block covered by a physical bounding box, clipped to the
    /// volume. `None` when nothing of the box lies inside.
    pub fn block_for(&self, extent: &Extent) -> Option<Block> {
        let a = self.transform.to_voxel(extent.min).to_array();
        let b = self.transform.to_voxel(extent.max).to_array();
        let dims = self.dims();

        let mut start = [0usize; 3];
        let mut end = [0usize; 3];
        for axis in 0..3 {
            let n = dims[axis] as i64;
            let lo = a[axis].min(b[axis]).floor() as i64;
            let hi = a[axis].max(b[axis]).floor() as i64 + 1;
            start[axis] = lo.clamp(0, n) as usize;
            end[axis] = hi.clamp(0, n) as usize;
        }

        let block = Block { start, end };
        (!block.is_empty()).then_some(block)
    }

    fn orient<T>(&self, mask: &mut Volume<T>) {
        for axis in Axis::ALL {
            if self.transform.is_flipped(axis) {
                mask.flip_axis(axis);
            }
        }
    }
}

/// Writes `value` wherever `mask` is set inside `block`; never writes zeros.
/// Returns the number of voxels written.
fn write_block(
    labels: &mut Volume<u32>,
    block: &Block,
    mask: &Volume<bool>,
    value: u32,
) -> usize {
    let mut written = 0;
    for z in block.start[2]..block.end[2] {
        for y in block.start[1]..block.end[1] {
            for x in block.start[0]..block.end[0] {
                let set = mask
                    .get(x - block.start[0], y - block.start[1], z - block.start[2])
                    .copied()
                    .unwrap_or(false);
                if !set {
                    continue;
                }
                if let Some(slot) = labels.get_mut(x, y, z) {
                    *slot = value;
                    written += 1;
                }
            }
        }
    }
    written
}

/// Combined-mask source backed by an owned volume.
#[derive(Debug, Clone)]
pub struct InMemoryCombined {
    pub ids: usize,
    pub mask: Volume<i16>,
}

impl CombinedMaskSource for InMemoryCombined {
    fn id_count(&self) -> usize {
        self.ids
    }

    fn combined_mask(&self, _info: &DatasetInfo) -> Volume<i16> {
        self.mask.clone()
    }
}

/// Block source backed by owned `(extent, sub-mask)` pairs. The stored masks
/// are returned as-is, whatever shape was requested.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlocks {
    pub blocks: Vec<(Extent, Volume<bool>)>,
}

impl BlockMaskSource for InMemoryBlocks {
    fn id_count(&self) -> usize {
        self.blocks.len()
    }

    fn id_extent(&self, id: usize) -> Extent {
        self.blocks[id].0
    }

    fn id_mask(&self, id: usize, _extent: &Extent, _shape: [usize; 3]) -> Volume<bool> {
        self.blocks[id].1.clone()
    }
}

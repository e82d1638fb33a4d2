use std::collections::BTreeMap;

use sv_core::{Point3, Vec3};
use sv_mask::LabelVolume;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub label: u32,
    pub voxel_count: usize,
    /// `voxel_count * voxel volume`.
    pub volume: f64,
    /// Mean voxel index scaled per axis by the voxel size.
    pub centroid: Point3,
    /// Euclidean distance from `centroid` to the reference point.
    pub distance: f64,
}

#[derive(Default)]
struct Accum {
    count: usize,
    sum: [f64; 3],
}

/// Statistics for every distinct non-zero label, sorted by label.
///
/// `voxel_size` is taken by absolute value per axis. A volume without
/// foreground yields an empty vector.
pub fn region_stats(labels: &LabelVolume, voxel_size: Vec3, reference: Point3) -> Vec<RegionStats> {
    let size = voxel_size.to_array().map(f64::abs);
    let voxel_volume = size.iter().product::<f64>();

    let mut regions: BTreeMap<u32, Accum> = BTreeMap::new();
    for ([x, y, z], &label) in labels.volume().iter_voxels() {
        if label == 0 {
            continue;
        }
        let acc = regions.entry(label).or_default();
        acc.count += 1;
        acc.sum[0] += x as f64;
        acc.sum[1] += y as f64;
        acc.sum[2] += z as f64;
    }

    if regions.is_empty() {
        log::debug!("label volume has no foreground, no regions");
    }

    regions
        .into_iter()
        .map(|(label, acc)| {
            let n = acc.count as f64;
            let centroid = Point3::from_array([0, 1, 2].map(|a| acc.sum[a] / n * size[a]));
            RegionStats {
                label,
                voxel_count: acc.count,
                volume: n * voxel_volume,
                centroid,
                distance: centroid.distance(reference),
            }
        })
        .collect()
}

use sv_core::{CoordinateTransform, Point3, Volume};
use sv_mask::{LabelSet, LabelVolume};
use sv_tree::LinearizedTree;

use crate::line::LineIter;

/// Overlay value written on every traced voxel.
pub const NO_LABEL_OVERLAY: u32 = 100;
/// Added to the smallest crossed label when an edge hits at least one.
pub const LABEL_OVERLAY_OFFSET: u32 = 100;

/// Per-sample label lists, one list per surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAnnotations {
    surfaces: Vec<String>,
    // rows[sample_id - 1][surface]; the root row holds empty lists
    rows: Vec<Vec<Vec<u32>>>,
    outside_samples: usize,
}

impl EdgeAnnotations {
    pub fn surfaces(&self) -> &[String] {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct labels crossed by the edge ending at `sample_id`.
    /// Empty for the root, unknown samples or unknown surfaces.
    pub fn labels(&self, sample_id: usize, surface: usize) -> &[u32] {
        sample_id
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .and_then(|row| row.get(surface))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn row(&self, sample_id: usize) -> Option<&[Vec<u32>]> {
        sample_id
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(Vec::as_slice)
    }

    /// Line voxels that fell outside the grid and were not sampled.
    pub fn outside_samples(&self) -> usize {
        self.outside_samples
    }

    /// Number of edges crossing at least one label of `surface`.
    pub fn edges_hit(&self, surface: usize) -> usize {
        self.rows
            .iter()
            .filter(|row| row.get(surface).is_some_and(|l| !l.is_empty()))
            .count()
    }
}

/// Copies of the label volumes with every traced segment burned in.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    volumes: Vec<(String, Volume<u32>)>,
}

impl DebugOverlay {
    pub fn from_labels(labels: &LabelSet) -> Self {
        Self {
            volumes: labels
                .surfaces
                .iter()
                .map(|s| (s.name.clone(), s.labels.volume().clone()))
                .collect(),
        }
    }

    pub fn volumes(&self) -> &[(String, Volume<u32>)] {
        &self.volumes
    }

    fn mark(&mut self, surface: usize, voxels: &[[i64; 3]], crossed: &[u32]) {
        let Some((_, vol)) = self.volumes.get_mut(surface) else {
            return;
        };
        let value = match crossed.first() {
            Some(&smallest) => smallest.saturating_add(LABEL_OVERLAY_OFFSET),
            None => NO_LABEL_OVERLAY,
        };
        for &p in voxels {
            if let Some(v) = vol.get_signed_mut(p) {
                *v = value;
            }
        }
    }
}

/// Sorted distinct non-zero labels of `labels` at `voxels`, plus the number of
/// voxels outside the volume.
pub fn labels_along(labels: &LabelVolume, voxels: &[[i64; 3]]) -> (Vec<u32>, usize) {
    let mut out = Vec::new();
    let mut outside = 0;
    for &p in voxels {
        match labels.label_at(p) {
            Some(0) => {}
            Some(l) => out.push(l),
            None => outside += 1,
        }
    }
    out.sort_unstable();
    out.dedup();
    (out, outside)
}

/// Annotates every parent -> child edge of `tree` with the labels it crosses
/// in each surface of `labels`.
///
/// `positions` are the source skeleton vertex positions the tree was built
/// from. When `overlay` is given, traced voxels are written into it.
pub fn annotate_edges(
    tree: &LinearizedTree,
    positions: &[Point3],
    transform: &CoordinateTransform,
    labels: &LabelSet,
    mut overlay: Option<&mut DebugOverlay>,
) -> EdgeAnnotations {
    let n_surfaces = labels.len();
    let dims = transform.size();
    let mut rows = vec![vec![Vec::new(); n_surfaces]; tree.len()];
    let mut outside_samples = 0usize;
    let mut voxels = Vec::new();

    for edge in tree.edges() {
        let (Some(&a), Some(&b)) = (positions.get(edge.parent), positions.get(edge.child))
        else {
            log::warn!(
                "edge {} -> {} refers to a missing vertex, skipped",
                edge.parent,
                edge.child
            );
            continue;
        };

        let line = LineIter::new(transform.voxel_index(a), transform.voxel_index(b));
        let total = line.voxel_count();
        voxels.clear();
        voxels.extend(line.clip_to(dims));
        outside_samples = outside_samples.saturating_add(total - voxels.len());

        let row = &mut rows[edge.sample_id - 1];
        for (s, surface) in labels.surfaces.iter().enumerate() {
            let (crossed, _) = labels_along(&surface.labels, &voxels);
            if let Some(ov) = overlay.as_deref_mut() {
                ov.mark(s, &voxels, &crossed);
            }
            row[s] = crossed;
        }
    }

    if outside_samples > 0 {
        log::debug!("{outside_samples} traced voxels fell outside the volume");
    }

    EdgeAnnotations {
        surfaces: labels.names().map(str::to_owned).collect(),
        rows,
        outside_samples,
    }
}

#[cfg(test)]
mod tests {
    use sv_core::{CoordinateTransform, DatasetInfo, Extent, FlipPolicy, Point3, Volume};
    use sv_mask::{LabelSet, LabelVolume, SurfaceLabels};
    use sv_tree::{SkeletonGraph, Traversal, linearize};

    use super::{DebugOverlay, annotate_edges, labels_along};

    fn unit_transform(n: usize) -> CoordinateTransform {
        let info = DatasetInfo {
            extent: Extent::new(Point3::new(0.0, 0.0, 0.0), Point3::from_array([n as f64; 3])),
            size: [n, n, n],
        };
        CoordinateTransform::new(&info, FlipPolicy::DepthOnly).expect("valid transform")
    }

    fn surface(name: &str, vol: Volume<u32>) -> SurfaceLabels {
        SurfaceLabels {
            name: name.to_owned(),
            labels: LabelVolume::from_volume(vol),
            issues: Vec::new(),
        }
    }

    fn two_point_tree(a: Point3, b: Point3) -> (SkeletonGraph, sv_tree::LinearizedTree) {
        let g = SkeletonGraph::new(vec![a, b], vec![(0, 1)], vec![1.0; 2], vec![0; 2])
            .expect("valid graph");
        let tree = linearize(&g, Traversal::DepthFirst).expect("connected");
        (g, tree)
    }

    #[test]
    fn straight_edge_reports_crossed_label() {
        let mut vol = Volume::new_fill([10, 10, 10], 0u32);
        for x in 2..=4 {
            *vol.get_mut(x, 0, 0).expect("in range") = 1;
        }
        let set = LabelSet {
            surfaces: vec![surface("membrane", vol)],
        };
        let t = unit_transform(10);
        let (g, tree) = two_point_tree(Point3::new(0.5, 0.5, 0.5), Point3::new(5.5, 0.5, 0.5));

        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);

        assert_eq!(ann.len(), 2);
        assert!(ann.labels(1, 0).is_empty());
        assert_eq!(ann.labels(2, 0), &[1]);
        assert_eq!(ann.edges_hit(0), 1);
        assert_eq!(ann.outside_samples(), 0);
        assert_eq!(ann.surfaces(), &["membrane".to_owned()]);
    }

    #[test]
    fn labels_are_sorted_distinct_and_skip_background() {
        let mut vol = Volume::new_fill([8, 1, 1], 0u32);
        for (x, l) in [(1, 7), (2, 3), (3, 7), (5, 3), (6, 2)] {
            *vol.get_mut(x, 0, 0).expect("in range") = l;
        }
        let lv = LabelVolume::from_volume(vol);
        let voxels: Vec<[i64; 3]> = (0..8).map(|x| [x, 0, 0]).collect();
        assert_eq!(labels_along(&lv, &voxels), (vec![2, 3, 7], 0));
    }

    #[test]
    fn out_of_volume_voxels_are_skipped_and_counted() {
        let mut vol = Volume::new_fill([4, 4, 4], 0u32);
        *vol.get_mut(3, 0, 0).expect("in range") = 5;
        let set = LabelSet {
            surfaces: vec![surface("s", vol)],
        };
        let t = unit_transform(4);
        let (g, tree) = two_point_tree(Point3::new(1.5, 0.5, 0.5), Point3::new(6.5, 0.5, 0.5));

        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);
        assert_eq!(ann.labels(2, 0), &[5]);
        assert_eq!(ann.outside_samples(), 3);
    }

    #[test]
    fn far_outside_vertex_is_counted_not_traced() {
        let mut vol = Volume::new_fill([4, 4, 4], 0u32);
        *vol.get_mut(2, 0, 0).expect("in range") = 3;
        let set = LabelSet {
            surfaces: vec![surface("s", vol)],
        };
        let t = unit_transform(4);
        let (g, tree) = two_point_tree(Point3::new(0.5, 0.5, 0.5), Point3::new(2e7, 0.5, 0.5));

        let mut overlay = DebugOverlay::from_labels(&set);
        let ann = annotate_edges(&tree, g.positions(), &t, &set, Some(&mut overlay));
        assert_eq!(ann.labels(2, 0), &[3]);
        assert_eq!(ann.outside_samples(), 19_999_997);
        assert_eq!(overlay.volumes()[0].1.get(3, 0, 0), Some(&103));
    }

    #[test]
    fn edge_inside_one_voxel_samples_that_voxel() {
        let mut vol = Volume::new_fill([4, 4, 4], 0u32);
        *vol.get_mut(1, 1, 1).expect("in range") = 9;
        let set = LabelSet {
            surfaces: vec![surface("s", vol)],
        };
        let t = unit_transform(4);
        let (g, tree) = two_point_tree(Point3::new(1.2, 1.2, 1.2), Point3::new(1.8, 1.7, 1.1));
        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);
        assert_eq!(ann.labels(2, 0), &[9]);
    }

    #[test]
    fn surfaces_are_annotated_independently() {
        let mut a = Volume::new_fill([6, 1, 1], 0u32);
        *a.get_mut(2, 0, 0).expect("in range") = 4;
        let b = Volume::new_fill([6, 1, 1], 0u32);
        let set = LabelSet {
            surfaces: vec![surface("a", a), surface("b", b)],
        };
        let info = DatasetInfo {
            extent: Extent::new(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0)),
            size: [6, 1, 1],
        };
        let t = CoordinateTransform::new(&info, FlipPolicy::DepthOnly).expect("valid transform");
        let (g, tree) = two_point_tree(Point3::new(0.5, 0.5, 0.5), Point3::new(5.5, 0.5, 0.5));

        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);
        assert_eq!(ann.row(2).expect("present"), &[vec![4], Vec::new()]);
        assert_eq!(ann.edges_hit(1), 0);
    }

    #[test]
    fn overlay_marks_line_and_crossing() {
        let mut vol = Volume::new_fill([6, 2, 1], 0u32);
        *vol.get_mut(3, 0, 0).expect("in range") = 2;
        *vol.get_mut(3, 1, 0).expect("in range") = 1;
        let set = LabelSet {
            surfaces: vec![
                surface("s", vol),
                surface("t", Volume::new_fill([6, 2, 1], 0)),
            ],
        };
        let info = DatasetInfo {
            extent: Extent::new(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 2.0, 1.0)),
            size: [6, 2, 1],
        };
        let t = CoordinateTransform::new(&info, FlipPolicy::DepthOnly).expect("valid transform");
        let (g, tree) = two_point_tree(Point3::new(0.5, 0.5, 0.5), Point3::new(5.5, 0.5, 0.5));

        let mut overlay = DebugOverlay::from_labels(&set);
        let ann = annotate_edges(&tree, g.positions(), &t, &set, Some(&mut overlay));
        assert_eq!(ann.labels(2, 0), &[2]);

        let (name, marked) = &overlay.volumes()[0];
        assert_eq!(name, "s");
        for x in 0..6 {
            assert_eq!(marked.get(x, 0, 0), Some(&102));
        }
        assert_eq!(marked.get(3, 1, 0), Some(&1));

        let (_, untouched) = &overlay.volumes()[1];
        for x in 0..6 {
            assert_eq!(untouched.get(x, 0, 0), Some(&100));
        }
        assert_eq!(untouched.get(0, 1, 0), Some(&0));
    }
}

use std::io::{self, Write};

use sv_core::CoordinateTransform;
use sv_trace::EdgeAnnotations;
use sv_tree::{LinearizedTree, TreeNode};

use crate::units::{SwcUnits, to_swc_coords};

/// Writes `tree` as plain SWC: `id type x y z r parent`, six decimals.
pub fn write_swc_plain<W: Write>(
    out: &mut W,
    tree: &LinearizedTree,
    transform: &CoordinateTransform,
    units: SwcUnits,
) -> io::Result<()> {
    for node in tree.iter() {
        let [x, y, z] = to_swc_coords(node.position, transform, units);
        writeln!(
            out,
            "{} {} {x:.6} {y:.6} {z:.6} {:.6} {}",
            node.sample_id, node.type_id, node.radius, node.parent_id
        )?;
    }
    Ok(())
}

/// Header of the label column for surface `name`. Whitespace inside the name
/// becomes `_` so the header keeps one token per column.
pub fn label_column(name: &str) -> String {
    let mut col: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    col.push_str("_labels");
    col
}

/// Writes `tree` with a header row and one label column per annotated
/// surface. A label cell holds the comma-joined ids the edge ending at that
/// sample crosses, or `-1`.
pub fn write_swc_extended<W: Write>(
    out: &mut W,
    tree: &LinearizedTree,
    annotations: &EdgeAnnotations,
    transform: &CoordinateTransform,
    units: SwcUnits,
) -> io::Result<()> {
    write!(out, "SampleID TypeID x y z r ParentID")?;
    for name in annotations.surfaces() {
        write!(out, " {}", label_column(name))?;
    }
    writeln!(out)?;

    for node in tree.iter() {
        write_extended_row(out, node, annotations, transform, units)?;
    }
    Ok(())
}

fn write_extended_row<W: Write>(
    out: &mut W,
    node: &TreeNode,
    annotations: &EdgeAnnotations,
    transform: &CoordinateTransform,
    units: SwcUnits,
) -> io::Result<()> {
    let [x, y, z] = to_swc_coords(node.position, transform, units);
    write!(
        out,
        "{} {} {x} {y} {z} {} {}",
        node.sample_id, node.type_id, node.radius, node.parent_id
    )?;

    for s in 0..annotations.surfaces().len() {
        let labels = annotations.labels(node.sample_id, s);
        if labels.is_empty() {
            write!(out, " -1")?;
            continue;
        }
        let joined: Vec<String> = labels.iter().map(u32::to_string).collect();
        write!(out, " {}", joined.join(","))?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use sv_core::{CoordinateTransform, DatasetInfo, Extent, FlipPolicy, Point3, Volume};
    use sv_mask::{LabelSet, LabelVolume, SurfaceLabels};
    use sv_trace::{EdgeAnnotations, annotate_edges};
    use sv_tree::{LinearizedTree, SkeletonGraph, Traversal, linearize};

    use super::{label_column, write_swc_extended, write_swc_plain};
    use crate::SwcUnits;

    fn transform() -> CoordinateTransform {
        let info = DatasetInfo {
            extent: Extent::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(9.0, 10.0, 10.0)),
            size: [10, 10, 10],
        };
        CoordinateTransform::new(&info, FlipPolicy::DepthOnly).expect("valid transform")
    }

    fn chain() -> (SkeletonGraph, LinearizedTree) {
        let g = SkeletonGraph::new(
            vec![
                Point3::new(0.5, 0.5, 0.5),
                Point3::new(5.5, 0.5, 0.5),
                Point3::new(5.5, 4.25, 0.5),
            ],
            vec![(0, 1), (1, 2)],
            vec![1.5, 0.5, 0.25],
            vec![1, 0, 2],
        )
        .expect("valid graph");
        let tree = linearize(&g, Traversal::DepthFirst).expect("connected");
        (g, tree)
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to memory");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn plain_rows_use_six_decimals() {
        let (_, tree) = chain();
        let text = render(|b| write_swc_plain(b, &tree, &transform(), SwcUnits::Micron));
        assert_eq!(
            text,
            "1 1 1.500000 0.500000 0.500000 1.500000 -1\n\
             2 0 6.500000 0.500000 0.500000 0.500000 1\n\
             3 2 6.500000 4.250000 0.500000 0.250000 2\n"
        );
    }

    #[test]
    fn plain_rows_in_pixel_units() {
        let (_, tree) = chain();
        let text = render(|b| write_swc_plain(b, &tree, &transform(), SwcUnits::Pixel));
        let first = text.lines().next().expect("one row");
        assert_eq!(first, "1 1 1.500000 0.500000 0.500000 1.500000 -1");
    }

    #[test]
    fn extended_rows_carry_label_columns_and_sentinels() {
        let mut a = Volume::new_fill([10, 10, 10], 0u32);
        for x in 3..5 {
            *a.get_mut(x, 0, 0).expect("in range") = 2;
        }
        *a.get_mut(5, 0, 0).expect("in range") = 1;
        let set = LabelSet {
            surfaces: vec![
                SurfaceLabels {
                    name: "spines".to_owned(),
                    labels: LabelVolume::from_volume(a),
                    issues: Vec::new(),
                },
                SurfaceLabels {
                    name: "boutons".to_owned(),
                    labels: LabelVolume::empty([10, 10, 10]),
                    issues: Vec::new(),
                },
            ],
        };
        let (g, tree) = chain();
        let t = transform();
        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);

        let text = render(|b| write_swc_extended(b, &tree, &ann, &t, SwcUnits::Micron));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SampleID TypeID x y z r ParentID spines_labels boutons_labels",
                "1 1 1.5 0.5 0.5 1.5 -1 -1 -1",
                "2 0 6.5 0.5 0.5 0.5 1 1,2 -1",
                "3 2 6.5 4.25 0.5 0.25 2 -1 -1",
            ]
        );
    }

    #[test]
    fn spaced_surface_names_keep_header_aligned_with_rows() {
        let set = LabelSet {
            surfaces: vec![SurfaceLabels {
                name: "Surfaces 1".to_owned(),
                labels: LabelVolume::empty([10, 10, 10]),
                issues: Vec::new(),
            }],
        };
        let (g, tree) = chain();
        let t = transform();
        let ann = annotate_edges(&tree, g.positions(), &t, &set, None);

        let text = render(|b| write_swc_extended(b, &tree, &ann, &t, SwcUnits::Micron));
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("SampleID TypeID x y z r ParentID Surfaces_1_labels")
        );
        assert!(lines.all(|l| l.split_whitespace().count() == 8));
        assert_eq!(label_column("a\tb c"), "a_b_c_labels");
    }

    #[test]
    fn extended_without_surfaces_has_seven_columns() {
        let (_, tree) = chain();
        let text = render(|b| {
            write_swc_extended(
                b,
                &tree,
                &EdgeAnnotations::default(),
                &transform(),
                SwcUnits::Micron,
            )
        });
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("SampleID TypeID x y z r ParentID"));
        assert!(lines.all(|l| l.split(' ').count() == 7));
    }
}

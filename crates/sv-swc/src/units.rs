use sv_core::{CoordinateTransform, Point3, Vec3};

/// Coordinate frame of SWC positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwcUnits {
    /// Physical offset from the dataset origin.
    #[default]
    Micron,
    /// Continuous voxel coordinates, flip sign included.
    Pixel,
}

pub fn to_swc_coords(p: Point3, transform: &CoordinateTransform, units: SwcUnits) -> [f64; 3] {
    match units {
        SwcUnits::Micron => transform.offset(p).to_array(),
        SwcUnits::Pixel => transform.to_voxel(p).to_array(),
    }
}

/// Inverse of [`to_swc_coords`].
pub fn from_swc_coords(c: [f64; 3], transform: &CoordinateTransform, units: SwcUnits) -> Point3 {
    match units {
        SwcUnits::Micron => transform.origin() + Vec3::from_array(c),
        SwcUnits::Pixel => transform.to_physical(Point3::from_array(c)),
    }
}

#[cfg(test)]
mod tests {
    use sv_core::{CoordinateTransform, DatasetInfo, Extent, FlipPolicy, Point3};

    use super::{SwcUnits, from_swc_coords, to_swc_coords};

    fn flipped_transform() -> CoordinateTransform {
        let info = DatasetInfo {
            extent: Extent::new(Point3::new(10.0, 0.0, -40.0), Point3::new(20.0, 5.0, 0.0)),
            size: [20, 10, 80],
        };
        CoordinateTransform::new(&info, FlipPolicy::DepthOnly).expect("valid transform")
    }

    #[test]
    fn micron_units_are_origin_offsets() {
        let t = flipped_transform();
        let c = to_swc_coords(Point3::new(12.0, 1.0, -10.0), &t, SwcUnits::Micron);
        assert_eq!(c, [2.0, 1.0, -10.0]);
    }

    #[test]
    fn pixel_units_apply_signed_scale() {
        let t = flipped_transform();
        let c = to_swc_coords(Point3::new(12.0, 1.0, -10.0), &t, SwcUnits::Pixel);
        assert!((c[0] - 4.0).abs() < 1e-12);
        assert!((c[1] - 2.0).abs() < 1e-12);
        assert!((c[2] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn conversion_inverts_in_both_units() {
        let t = flipped_transform();
        let p = Point3::new(17.25, 3.5, -33.0);
        for units in [SwcUnits::Micron, SwcUnits::Pixel] {
            let back = from_swc_coords(to_swc_coords(p, &t, units), &t, units);
            assert!(back.distance(p) < 1e-9, "{units:?}: {back:?}");
        }
    }
}

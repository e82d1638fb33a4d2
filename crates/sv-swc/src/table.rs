use std::io::{self, Write};

use sv_stats::RegionStats;

pub const STATS_HEADER: &str =
    "label\tvolume_um\tcentroid-x_um\tcentroid-y_um\tcentroid-z_um\tdistance_to_reference_um";

/// Writes one tab-separated row per region. The header is always written.
pub fn write_stats_table<W: Write>(out: &mut W, stats: &[RegionStats]) -> io::Result<()> {
    writeln!(out, "{STATS_HEADER}")?;
    for r in stats {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.label, r.volume, r.centroid.x, r.centroid.y, r.centroid.z, r.distance
        )?;
    }
    Ok(())
}

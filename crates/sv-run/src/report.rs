use serde::Serialize;

use crate::ExportConfigDto;

/// Observable outcome of one run, serialized next to the outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub node_count: usize,
    /// Skeleton vertex used as root and statistics reference.
    pub root: usize,
    pub flipped_axes: Vec<String>,
    pub surfaces: Vec<SurfaceReport>,
    /// Traced voxels outside the volume, skipped during sampling.
    pub outside_samples: usize,
    pub config: ExportConfigDto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceReport {
    pub name: String,
    pub label_count: u32,
    pub region_count: usize,
    /// Edges crossing at least one label of this surface.
    pub edges_hit: usize,
    pub issues: Vec<String>,
}

impl RunReport {
    pub fn issue_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.issues.len()).sum()
    }
}

use std::io::{self, Write};

use sv_core::Axis;
use sv_mask::{LabelSet, SurfaceLabels, SurfaceSource};
use sv_stats::{RegionStats, region_stats};
use sv_swc::{write_swc_extended, write_swc_plain};
use sv_trace::{DebugOverlay, EdgeAnnotations, annotate_edges};
use sv_tree::{LinearizedTree, SkeletonGraph, TreeError, linearize};

use crate::{
    ExportConfig, ExportConfigDto, HostGateway, RunContext, RunError, RunReport, SurfaceReport,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStats {
    pub name: String,
    pub regions: Vec<RegionStats>,
}

/// Everything one run produced, ready to be written out.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub context: RunContext,
    pub skeleton: SkeletonGraph,
    pub tree: LinearizedTree,
    pub labels: LabelSet,
    pub annotations: EdgeAnnotations,
    pub stats: Vec<SurfaceStats>,
    pub overlay: Option<DebugOverlay>,
    pub report: RunReport,
}

impl ExportBundle {
    /// Writes the SWC in the configured flavor and units.
    pub fn write_swc<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let cfg = self.context.config();
        let transform = self.context.transform();
        if cfg.extended {
            write_swc_extended(out, &self.tree, &self.annotations, transform, cfg.units)
        } else {
            write_swc_plain(out, &self.tree, transform, cfg.units)
        }
    }
}

/// Runs the whole export against `host`.
///
/// Host data is pulled first; a missing dataset or skeleton, an unknown
/// selected surface, a degenerate extent or a skeleton that does not
/// linearize fail the run before any surface is processed. Surface anomalies
/// never fail the run; they end up in the report.
pub fn run_export<H: HostGateway + ?Sized>(
    host: &H,
    config: ExportConfig,
) -> Result<ExportBundle, RunError> {
    let info = host.dataset()?;
    let skeleton = host.skeleton()?;
    let sources = select_surfaces(host, &config)?;

    let context = RunContext::new(info, config)?;
    let tree = linearize(&skeleton, context.config().traversal)?;
    let root = tree.root().ok_or(TreeError::Empty)?;
    log::info!("linearized {} nodes from vertex {}", tree.len(), root.source);

    let labels = context
        .mask_builder()
        .build_all(sources.iter().map(|(name, s)| (name.as_str(), *s)));

    let mut overlay = context
        .config()
        .debug_overlay
        .then(|| DebugOverlay::from_labels(&labels));
    let annotations = annotate_edges(
        &tree,
        skeleton.positions(),
        context.transform(),
        &labels,
        overlay.as_mut(),
    );

    let voxel_size = context.transform().voxel_size();
    let reference = context.stats_frame(root.position);
    let stats: Vec<SurfaceStats> = labels
        .surfaces
        .iter()
        .map(|s| SurfaceStats {
            name: s.name.clone(),
            regions: region_stats(&s.labels, voxel_size, reference),
        })
        .collect();

    let report = RunReport {
        node_count: tree.len(),
        root: root.source,
        flipped_axes: Axis::ALL
            .into_iter()
            .filter(|&a| context.transform().is_flipped(a))
            .map(|a| a.to_string())
            .collect(),
        surfaces: labels
            .surfaces
            .iter()
            .zip(&stats)
            .enumerate()
            .map(|(i, (s, st))| SurfaceReport {
                name: s.name.clone(),
                label_count: s.labels.count(),
                region_count: st.regions.len(),
                edges_hit: annotations.edges_hit(i),
                issues: s.issues.iter().map(ToString::to_string).collect(),
            })
            .collect(),
        outside_samples: annotations.outside_samples(),
        config: ExportConfigDto::from(context.config()),
    };

    Ok(ExportBundle {
        context,
        skeleton,
        tree,
        labels,
        annotations,
        stats,
        overlay,
        report,
    })
}

/// Builds the label volume of a single surface, for label image export.
pub fn build_label_image<H: HostGateway + ?Sized>(
    host: &H,
    config: ExportConfig,
    name: &str,
) -> Result<(RunContext, SurfaceLabels), RunError> {
    let context = RunContext::from_host(host, config)?;
    let source = host
        .surface(name)
        .ok_or_else(|| RunError::UnknownSurface(name.to_owned()))?;

    let mut set = context.mask_builder().build_all([(name, source)]);
    let surface = set
        .surfaces
        .pop()
        .ok_or_else(|| RunError::UnknownSurface(name.to_owned()))?;
    Ok((context, surface))
}

fn select_surfaces<'h, H: HostGateway + ?Sized>(
    host: &'h H,
    config: &ExportConfig,
) -> Result<Vec<(String, SurfaceSource<'h>)>, RunError> {
    let names = match &config.surfaces {
        Some(names) => names.clone(),
        None => host.surface_names(),
    };
    if names.is_empty() {
        log::warn!("no surfaces selected, exporting skeleton without label columns");
    }

    names
        .into_iter()
        .map(|name| match host.surface(&name) {
            Some(source) => Ok((name, source)),
            None => Err(RunError::UnknownSurface(name)),
        })
        .collect()
}

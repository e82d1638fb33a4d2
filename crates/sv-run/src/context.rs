use sv_core::{Axis, CoordinateTransform, DatasetInfo, Point3};
use sv_mask::MaskBuilder;

use crate::{ExportConfig, HostGateway, RunError};

/// Explicit per-run state: dataset, the transform derived from it, options.
///
/// Built once per run and passed to every stage; nothing is looked up from
/// ambient state.
#[derive(Debug, Clone)]
pub struct RunContext {
    info: DatasetInfo,
    transform: CoordinateTransform,
    config: ExportConfig,
}

impl RunContext {
    pub fn new(info: DatasetInfo, config: ExportConfig) -> Result<Self, RunError> {
        let transform = CoordinateTransform::new(&info, config.flip)?;
        for axis in Axis::ALL {
            if transform.is_flipped(axis) {
                log::info!("{axis} extent is inverted, using max as origin");
            }
        }
        Ok(Self {
            info,
            transform,
            config,
        })
    }

    pub fn from_host<H: HostGateway + ?Sized>(
        host: &H,
        config: ExportConfig,
    ) -> Result<Self, RunError> {
        Self::new(host.dataset()?, config)
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn mask_builder(&self) -> MaskBuilder {
        MaskBuilder::new(self.info, self.transform, self.config.connectivity)
    }

    /// `p` in the region statistics frame: continuous voxel coordinate times
    /// the unsigned voxel size.
    pub fn stats_frame(&self, p: Point3) -> Point3 {
        let v = self.transform.to_voxel(p).to_array();
        let s = self.transform.voxel_size().to_array();
        Point3::from_array([0, 1, 2].map(|a| v[a] * s[a]))
    }
}

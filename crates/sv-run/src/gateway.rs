use sv_core::DatasetInfo;
use sv_mask::SurfaceSource;
use sv_tree::SkeletonGraph;

use crate::RunError;

/// Narrow data-pull surface of the host application. Everything a run needs
/// is queried through here, once, at the start of the run.
pub trait HostGateway {
    /// Fails with [`RunError::NoDataset`] when no dataset is loaded.
    fn dataset(&self) -> Result<DatasetInfo, RunError>;

    /// Fails with [`RunError::NoSkeleton`] when the host has no skeleton.
    fn skeleton(&self) -> Result<SkeletonGraph, RunError>;

    /// Names of the labeled surfaces, in host order.
    fn surface_names(&self) -> Vec<String>;

    fn surface(&self, name: &str) -> Option<SurfaceSource<'_>>;
}

//! End-to-end export run.
//!
//! A run pulls a dataset descriptor, a skeleton and surface masks from a
//! [`HostGateway`] once, threads an explicit [`RunContext`] through the core
//! crates, and returns everything needed to write the SWC, the statistics
//! tables and the optional debug overlays.

mod config;
mod context;
mod error;
mod gateway;
mod report;
mod run;
mod scene;

pub use config::{ConnectivityDto, ExportConfig, ExportConfigDto, FlipDto, TraversalDto, UnitsDto};
pub use context::RunContext;
pub use error::{RunError, SceneError};
pub use gateway::HostGateway;
pub use report::{RunReport, SurfaceReport};
pub use run::{ExportBundle, SurfaceStats, build_label_image, run_export};
pub use scene::{BlockDto, DatasetDto, JsonScene, SceneDto, SkeletonDto, SurfaceDto};

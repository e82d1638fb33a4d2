//! Umbrella crate for the `skelvox` workspace.
//!
//! Re-exports the component crates: geometry and transforms, surface label
//! volumes, skeleton linearization, segment tracing, region statistics, SWC
//! formats and the end-to-end export run.

pub use sv_core::*;
pub use sv_mask::*;
pub use sv_run::*;
pub use sv_stats::*;
pub use sv_swc::*;
pub use sv_trace::*;
pub use sv_tree::*;

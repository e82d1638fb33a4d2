//! Skeleton graphs and their linearization into parent-indexed trees.
//!
//! A [`SkeletonGraph`] is the raw host skeleton: positions, radii, type codes
//! and an unordered edge list. [`linearize`] walks it from the root and emits
//! one [`TreeNode`] per vertex with 1-based sample ids and `-1` as the root's
//! parent id.
//!
//! Traversal uses an explicit stack by default ([`Traversal::DepthFirst`]).
//! Neighbors are pushed in ascending index order, so a fixed edge set always
//! produces the same sample ids. Vertices are marked visited when they are
//! pushed, which keeps every vertex to exactly one emission even when the
//! edge set contains cycles.

mod error;
mod linearize;
mod skeleton;

pub use error::TreeError;
pub use linearize::{LinearizedTree, Traversal, TreeEdge, TreeNode, linearize};
pub use skeleton::SkeletonGraph;

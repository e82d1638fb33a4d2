use std::collections::VecDeque;

use sv_core::Point3;

use crate::{SkeletonGraph, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Last-in-first-out pending list.
    #[default]
    DepthFirst,
    /// First-in-first-out pending list.
    BreadthFirst,
}

/// One emitted SWC sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// 1-based emission index.
    pub sample_id: usize,
    pub type_id: i32,
    pub position: Point3,
    pub radius: f64,
    /// Sample id of the traversal predecessor, `-1` for the root.
    pub parent_id: i64,
    /// Vertex index in the source skeleton.
    pub source: usize,
    /// Source vertex index of the traversal predecessor.
    pub parent_source: Option<usize>,
}

impl TreeNode {
    pub fn is_root(&self) -> bool {
        self.parent_id < 0
    }
}

/// A parent -> child skeleton segment, in source vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeEdge {
    /// Sample id of the child.
    pub sample_id: usize,
    pub parent: usize,
    pub child: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearizedTree {
    nodes: Vec<TreeNode>,
}

impl LinearizedTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Node with 1-based `sample_id`.
    pub fn sample(&self, sample_id: usize) -> Option<&TreeNode> {
        sample_id.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    /// Every non-root node as a segment from its true parent vertex.
    pub fn edges(&self) -> impl Iterator<Item = TreeEdge> + '_ {
        self.nodes.iter().filter_map(|n| {
            n.parent_source.map(|parent| TreeEdge {
                sample_id: n.sample_id,
                parent,
                child: n.source,
            })
        })
    }
}

/// Linearizes `graph` from [`SkeletonGraph::root`].
///
/// Fails with [`TreeError::Disconnected`] when fewer than all vertices are
/// reachable from the root; no partial tree is returned.
pub fn linearize(
    graph: &SkeletonGraph,
    traversal: Traversal,
) -> Result<LinearizedTree, TreeError> {
    let n = graph.len();
    let root = graph.root();
    if root >= n {
        return Err(TreeError::RootOutOfRange { root, len: n });
    }

    let adj = graph.adjacency();
    let mut visited = vec![false; n];
    let mut nodes = Vec::with_capacity(n);

    // (vertex, parent sample id, parent vertex)
    let mut pending: VecDeque<(usize, i64, Option<usize>)> = VecDeque::new();
    visited[root] = true;
    pending.push_back((root, -1, None));

    loop {
        let next = match traversal {
            Traversal::DepthFirst => pending.pop_back(),
            Traversal::BreadthFirst => pending.pop_front(),
        };
        let Some((cur, parent_id, parent_source)) = next else {
            break;
        };

        let sample_id = nodes.len() + 1;
        nodes.push(TreeNode {
            sample_id,
            type_id: graph.types()[cur],
            position: graph.positions()[cur],
            radius: graph.radii()[cur],
            parent_id,
            source: cur,
            parent_source,
        });

        for &nb in &adj[cur] {
            if !visited[nb] {
                visited[nb] = true;
                pending.push_back((nb, sample_id as i64, Some(cur)));
            }
        }
    }

    if nodes.len() != n {
        log::warn!(
            "linearization reached {} of {} vertices from root {root}",
            nodes.len(),
            n
        );
        return Err(TreeError::Disconnected {
            reached: nodes.len(),
            total: n,
        });
    }

    Ok(LinearizedTree { nodes })
}

#[cfg(test)]
mod tests {
    use sv_core::Point3;

    use super::{Traversal, linearize};
    use crate::{SkeletonGraph, TreeError};

    fn graph(n: usize, edges: &[(usize, usize)]) -> SkeletonGraph {
        SkeletonGraph::new(
            (0..n).map(|i| Point3::new(i as f64, 2.0 * i as f64, 0.5)).collect(),
            edges.to_vec(),
            (0..n).map(|i| 0.1 * i as f64).collect(),
            (0..n).map(|i| i as i32 % 3).collect(),
        )
        .expect("valid graph")
    }

    /// Branched tree used by several tests:
    ///
    /// ```text
    /// 0 - 1 - 2 - 3
    ///     |    \
    ///     4     5 - 6
    /// ```
    fn branched() -> SkeletonGraph {
        graph(7, &[(0, 1), (1, 2), (2, 3), (4, 1), (2, 5), (6, 5)])
    }

    fn check_tree_invariants(g: &SkeletonGraph, traversal: Traversal) {
        let tree = linearize(g, traversal).expect("connected tree");

        assert_eq!(tree.len(), g.len());
        assert_eq!(tree.iter().filter(|n| n.parent_id == -1).count(), 1);

        let mut seen = vec![false; g.len()];
        for (i, node) in tree.iter().enumerate() {
            assert_eq!(node.sample_id, i + 1);
            assert!(!seen[node.source], "vertex {} emitted twice", node.source);
            seen[node.source] = true;

            if node.is_root() {
                assert_eq!(node.source, g.root());
                assert!(node.parent_source.is_none());
                continue;
            }

            let parent = tree
                .sample(node.parent_id as usize)
                .expect("parent refers to an emitted sample");
            assert!(parent.sample_id < node.sample_id);
            assert_eq!(Some(parent.source), node.parent_source);
            let adjacent = g.edges().iter().any(|&(a, b)| {
                (a, b) == (parent.source, node.source) || (b, a) == (parent.source, node.source)
            });
            assert!(adjacent, "parent of {} is not adjacent", node.source);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn tree_invariants_hold_for_both_orders() {
        for t in [Traversal::DepthFirst, Traversal::BreadthFirst] {
            check_tree_invariants(&branched(), t);
            check_tree_invariants(&graph(1, &[]), t);
            check_tree_invariants(&graph(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]), t);
            check_tree_invariants(&graph(4, &[(3, 2), (2, 1), (1, 0)]), t);
        }
    }

    #[test]
    fn depth_first_pops_highest_neighbor_first() {
        let tree = linearize(&branched(), Traversal::DepthFirst).expect("connected tree");
        let order: Vec<usize> = tree.iter().map(|n| n.source).collect();
        assert_eq!(order, vec![0, 1, 4, 2, 5, 6, 3]);

        let parents: Vec<i64> = tree.iter().map(|n| n.parent_id).collect();
        assert_eq!(parents, vec![-1, 1, 2, 2, 4, 5, 4]);
    }

    #[test]
    fn breadth_first_order() {
        let tree = linearize(&branched(), Traversal::BreadthFirst).expect("connected tree");
        let order: Vec<usize> = tree.iter().map(|n| n.source).collect();
        assert_eq!(order, vec![0, 1, 2, 4, 3, 5, 6]);
    }

    #[test]
    fn node_attributes_follow_source_vertex() {
        let tree = linearize(&branched(), Traversal::DepthFirst).expect("connected tree");
        let node = tree.sample(3).expect("present");
        assert_eq!(node.source, 4);
        assert_eq!(node.position, Point3::new(4.0, 8.0, 0.5));
        assert!((node.radius - 0.4).abs() < 1e-12);
        assert_eq!(node.type_id, 1);
    }

    #[test]
    fn edges_go_from_true_parent_to_child() {
        let tree = linearize(&branched(), Traversal::DepthFirst).expect("connected tree");
        let edges: Vec<(usize, usize)> = tree.edges().map(|e| (e.parent, e.child)).collect();
        assert_eq!(edges, vec![(0, 1), (1, 4), (1, 2), (2, 5), (5, 6), (2, 3)]);
        assert_eq!(tree.edges().count(), tree.len() - 1);
    }

    #[test]
    fn explicit_beginning_vertex_is_root() {
        let g = branched().with_beginning(6).expect("in range");
        let tree = linearize(&g, Traversal::DepthFirst).expect("connected tree");
        let root = tree.root().expect("non-empty");
        assert_eq!(root.source, 6);
        assert_eq!(root.parent_id, -1);
        check_tree_invariants(&g, Traversal::DepthFirst);
    }

    #[test]
    fn cycles_do_not_duplicate_emission() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let tree = linearize(&g, Traversal::DepthFirst).expect("reachable");
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn disconnected_graph_fails_whole_linearization() {
        let g = graph(5, &[(0, 1), (1, 2), (3, 4)]);
        assert_eq!(
            linearize(&g, Traversal::DepthFirst),
            Err(TreeError::Disconnected {
                reached: 3,
                total: 5
            })
        );
    }
}

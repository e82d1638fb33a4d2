use sv_core::Point3;

use crate::TreeError;

/// Raw skeleton as pulled from the host. Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonGraph {
    positions: Vec<Point3>,
    edges: Vec<(usize, usize)>,
    radii: Vec<f64>,
    types: Vec<i32>,
    beginning: Option<usize>,
}

impl SkeletonGraph {
    pub fn new(
        positions: Vec<Point3>,
        edges: Vec<(usize, usize)>,
        radii: Vec<f64>,
        types: Vec<i32>,
    ) -> Result<Self, TreeError> {
        let n = positions.len();
        if n == 0 {
            return Err(TreeError::Empty);
        }
        if radii.len() != n {
            return Err(TreeError::LengthMismatch {
                what: "radii",
                expected: n,
                actual: radii.len(),
            });
        }
        if types.len() != n {
            return Err(TreeError::LengthMismatch {
                what: "types",
                expected: n,
                actual: types.len(),
            });
        }
        if let Some(&(a, b)) = edges.iter().find(|&&(a, b)| a >= n || b >= n) {
            return Err(TreeError::EdgeOutOfRange { a, b, len: n });
        }

        Ok(Self {
            positions,
            edges,
            radii,
            types,
            beginning: None,
        })
    }

    /// Sets the host's designated beginning vertex, used as the root.
    pub fn with_beginning(mut self, index: usize) -> Result<Self, TreeError> {
        if index >= self.len() {
            return Err(TreeError::RootOutOfRange {
                root: index,
                len: self.len(),
            });
        }
        self.beginning = Some(index);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn types(&self) -> &[i32] {
        &self.types
    }

    pub fn beginning(&self) -> Option<usize> {
        self.beginning
    }

    /// Beginning vertex if the host supplied one, vertex 0 otherwise.
    pub fn root(&self) -> usize {
        self.beginning.unwrap_or(0)
    }

    pub fn position(&self, index: usize) -> Option<Point3> {
        self.positions.get(index).copied()
    }

    /// Sorted, de-duplicated neighbor lists. Self-loops are dropped.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.len()];
        for &(a, b) in &self.edges {
            if a == b {
                continue;
            }
            adj[a].push(b);
            adj[b].push(a);
        }
        for list in &mut adj {
            list.sort_unstable();
            list.dedup();
        }
        adj
    }
}

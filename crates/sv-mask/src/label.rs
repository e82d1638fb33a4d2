use sv_core::Volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Face neighbors only.
    C6,
    /// Faces and edges.
    C18,
    /// Faces, edges and corners.
    #[default]
    C26,
}

impl Connectivity {
    fn max_manhattan(self) -> i32 {
        match self {
            Connectivity::C6 => 1,
            Connectivity::C18 => 2,
            Connectivity::C26 => 3,
        }
    }

    fn offsets(self) -> Vec<[i64; 3]> {
        let limit = self.max_manhattan();
        let mut out = Vec::with_capacity(26);
        for dz in -1i64..=1 {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let m = (dx.abs() + dy.abs() + dz.abs()) as i32;
                    if m != 0 && m <= limit {
                        out.push([dx, dy, dz]);
                    }
                }
            }
        }
        out
    }
}

/// Integer label grid for one surface. `0` is background; labels `1..=count`
/// identify sub-regions.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    labels: Volume<u32>,
    count: u32,
}

impl LabelVolume {
    pub fn new(labels: Volume<u32>, count: u32) -> Self {
        Self { labels, count }
    }

    /// Wraps an existing grid, taking the largest value as the label count.
    pub fn from_volume(labels: Volume<u32>) -> Self {
        let count = labels.data().iter().copied().max().unwrap_or(0);
        Self { labels, count }
    }

    pub fn empty(dims: [usize; 3]) -> Self {
        Self {
            labels: Volume::new_fill(dims, 0),
            count: 0,
        }
    }

    pub fn volume(&self) -> &Volume<u32> {
        &self.labels
    }

    pub fn dims(&self) -> [usize; 3] {
        self.labels.dims()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_background(&self) -> bool {
        self.labels.data().iter().all(|&v| v == 0)
    }

    /// Label at a possibly out-of-range voxel; `None` outside the grid.
    pub fn label_at(&self, p: [i64; 3]) -> Option<u32> {
        self.labels.get_signed(p).copied()
    }
}

/// Enumerates the connected foreground components of `mask` (any value
/// different from `T::default()` is foreground).
///
/// Labels are assigned in storage order of each component's first voxel, so
/// identical input always yields an identical labeling.
pub fn label_components<T>(mask: &Volume<T>, connectivity: Connectivity) -> LabelVolume
where
    T: Copy + Default + PartialEq,
{
    let dims = mask.dims();
    let mut labels = Volume::new_fill(dims, 0u32);
    let zero = T::default();
    let offsets = connectivity.offsets();
    let mut stack = Vec::new();
    let mut next = 0u32;

    for start in 0..mask.len() {
        if mask.data()[start] == zero || labels.data()[start] != 0 {
            continue;
        }

        next += 1;
        labels.data_mut()[start] = next;
        stack.clear();
        stack.push(start);

        while let Some(i) = stack.pop() {
            let [x, y, z] = mask.coords_of(i);
            for off in &offsets {
                let p = [x as i64 + off[0], y as i64 + off[1], z as i64 + off[2]];
                let Some(&v) = mask.get_signed(p) else {
                    continue;
                };
                if v == zero {
                    continue;
                }
                let Some(slot) = labels.get_signed_mut(p) else {
                    continue;
                };
                if *slot == 0 {
                    *slot = next;
                    let [px, py, pz] = p.map(|c| c as usize);
                    if let Some(j) = mask.index_of(px, py, pz) {
                        stack.push(j);
                    }
                }
            }
        }
    }

    LabelVolume::new(labels, next)
}

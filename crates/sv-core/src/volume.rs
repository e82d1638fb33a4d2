use crate::Error;
use crate::geom::Axis;

/// Half-open voxel box `[start, end)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: [usize; 3],
    pub end: [usize; 3],
}

impl Block {
    pub fn shape(&self) -> [usize; 3] {
        [0, 1, 2].map(|a| self.end[a].saturating_sub(self.start[a]))
    }

    pub fn is_empty(&self) -> bool {
        self.shape().contains(&0)
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        let p = [x, y, z];
        (0..3).all(|a| p[a] >= self.start[a] && p[a] < self.end[a])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    dims: [usize; 3],
    data: Vec<T>,
}

impl<T> Volume<T> {
    pub fn from_vec(dims: [usize; 3], data: Vec<T>) -> Result<Self, Error> {
        let expected = voxel_count(dims).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn nx(&self) -> usize {
        self.dims[0]
    }

    pub fn ny(&self) -> usize {
        self.dims[1]
    }

    pub fn nz(&self) -> usize {
        self.dims[2]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x >= self.dims[0] || y >= self.dims[1] || z >= self.dims[2] {
            return None;
        }
        Some((z * self.dims[1] + y) * self.dims[0] + x)
    }

    /// Inverse of [`Volume::index_of`]. `idx` must be `< self.len()`.
    pub fn coords_of(&self, idx: usize) -> [usize; 3] {
        let x = idx % self.dims[0];
        let rest = idx / self.dims[0];
        [x, rest % self.dims[1], rest / self.dims[1]]
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        let idx = self.index_of(x, y, z)?;
        self.data.get(idx)
    }

    pub fn get_mut(&mut self, x: usize, y: usize, z: usize) -> Option<&mut T> {
        let idx = self.index_of(x, y, z)?;
        self.data.get_mut(idx)
    }

    /// Bounds-checked access with signed coordinates; anything outside the
    /// grid (including negative indices) yields `None`.
    pub fn get_signed(&self, p: [i64; 3]) -> Option<&T> {
        let idx = self.signed_index(p)?;
        self.data.get(idx)
    }

    pub fn get_signed_mut(&mut self, p: [i64; 3]) -> Option<&mut T> {
        let idx = self.signed_index(p)?;
        self.data.get_mut(idx)
    }

    fn signed_index(&self, p: [i64; 3]) -> Option<usize> {
        let x = usize::try_from(p[0]).ok()?;
        let y = usize::try_from(p[1]).ok()?;
        let z = usize::try_from(p[2]).ok()?;
        self.index_of(x, y, z)
    }

    /// Mirrors the volume along `axis` in place.
    pub fn flip_axis(&mut self, axis: Axis) {
        let [nx, ny, nz] = self.dims;
        match axis {
            Axis::X => {
                for row in self.data.chunks_mut(nx.max(1)) {
                    row.reverse();
                }
            }
            Axis::Y => {
                for z in 0..nz {
                    for y in 0..ny / 2 {
                        let a = (z * ny + y) * nx;
                        let b = (z * ny + (ny - 1 - y)) * nx;
                        for x in 0..nx {
                            self.data.swap(a + x, b + x);
                        }
                    }
                }
            }
            Axis::Z => {
                let plane = nx * ny;
                for z in 0..nz / 2 {
                    let a = z * plane;
                    let b = (nz - 1 - z) * plane;
                    for i in 0..plane {
                        self.data.swap(a + i, b + i);
                    }
                }
            }
        }
    }

    /// Iterates `([x, y, z], value)` in storage order.
    pub fn iter_voxels(&self) -> impl Iterator<Item = ([usize; 3], &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.coords_of(i), v))
    }
}

impl<T: Clone> Volume<T> {
    pub fn new_fill(dims: [usize; 3], value: T) -> Self {
        let len = voxel_count(dims).expect("volume size overflow");
        Self {
            dims,
            data: vec![value; len],
        }
    }
}

fn voxel_count(dims: [usize; 3]) -> Option<usize> {
    dims[0].checked_mul(dims[1])?.checked_mul(dims[2])
}

#[cfg(test)]
mod tests {
    use super::{Block, Volume};
    use crate::Axis;

    fn ramp(dims: [usize; 3]) -> Volume<u32> {
        let n = dims[0] * dims[1] * dims[2];
        Volume::from_vec(dims, (0..n as u32).collect()).expect("valid volume")
    }

    #[test]
    fn indexing_is_x_fastest() {
        let vol = ramp([3, 2, 2]);

        assert_eq!(vol.get(1, 0, 0), Some(&1));
        assert_eq!(vol.get(0, 1, 0), Some(&3));
        assert_eq!(vol.get(0, 0, 1), Some(&6));
        assert_eq!(vol.get(2, 1, 1), Some(&11));
        assert_eq!(vol.get(3, 0, 0), None);
        assert_eq!(vol.coords_of(10), [1, 1, 1]);
    }

    #[test]
    fn signed_access_rejects_negative_and_overflow() {
        let vol = ramp([2, 2, 2]);

        assert_eq!(vol.get_signed([1, 1, 1]), Some(&7));
        assert_eq!(vol.get_signed([-1, 0, 0]), None);
        assert_eq!(vol.get_signed([0, 2, 0]), None);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Volume::from_vec([2, 2, 2], vec![0u8; 7]).is_err());
        assert!(Volume::from_vec([2, 2, 2], vec![0u8; 8]).is_ok());
    }

    #[test]
    fn flip_each_axis_mirrors_coordinates() {
        let dims = [3, 2, 4];
        let orig = ramp(dims);

        for axis in Axis::ALL {
            let mut flipped = orig.clone();
            flipped.flip_axis(axis);
            for ([x, y, z], v) in orig.iter_voxels() {
                let mut p = [x, y, z];
                p[axis.index()] = dims[axis.index()] - 1 - p[axis.index()];
                assert_eq!(flipped.get(p[0], p[1], p[2]), Some(v), "axis {axis}");
            }
        }
    }

    #[test]
    fn block_shape_and_containment() {
        let b = Block {
            start: [1, 0, 2],
            end: [4, 2, 2],
        };
        assert_eq!(b.shape(), [3, 2, 0]);
        assert!(b.is_empty());

        let b = Block {
            start: [1, 0, 2],
            end: [4, 2, 3],
        };
        assert!(b.contains(3, 1, 2));
        assert!(!b.contains(4, 1, 2));
    }
}

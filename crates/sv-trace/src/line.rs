use core::ops::RangeInclusive;

/// Voxels of the digital line from `start` to `end`, both inclusive.
///
/// With `n = max_axis |end - start|`, the line has `n + 1` voxels; voxel `i`
/// is `start + round_half_even(delta * i / n)` per axis.
#[derive(Debug, Clone)]
pub struct LineIter {
    start: [i64; 3],
    delta: [i64; 3],
    steps: i64,
    range: RangeInclusive<i64>,
}

impl LineIter {
    pub fn new(start: [i64; 3], end: [i64; 3]) -> Self {
        let delta = [0, 1, 2].map(|a| end[a].saturating_sub(start[a]));
        let steps = delta.iter().map(|d| d.saturating_abs()).max().unwrap_or(0);
        Self {
            start,
            delta,
            steps,
            range: 0..=steps,
        }
    }

    /// Number of voxels on the unclipped line.
    pub fn voxel_count(&self) -> usize {
        usize::try_from(self.steps).map_or(usize::MAX, |s| s.saturating_add(1))
    }

    /// Keeps only the steps whose voxel lies inside a grid of `dims`.
    ///
    /// Each coordinate is monotone in the step index, so the inside steps form
    /// one interval per axis; it is found by bisection without walking the
    /// outside part of the line.
    pub fn clip_to(mut self, dims: [usize; 3]) -> Self {
        let (mut lo, mut hi) = (*self.range.start(), *self.range.end());
        for (a, &n) in dims.iter().enumerate() {
            let n = i64::try_from(n).unwrap_or(i64::MAX);
            let (first, end) = if self.delta[a] >= 0 {
                (
                    self.first_step(|i| self.coord(a, i) >= 0),
                    self.first_step(|i| self.coord(a, i) >= n),
                )
            } else {
                (
                    self.first_step(|i| self.coord(a, i) < n),
                    self.first_step(|i| self.coord(a, i) < 0),
                )
            };
            lo = lo.max(first);
            hi = hi.min(end - 1);
        }
        self.range = if self.range.is_empty() || lo > hi {
            1..=0
        } else {
            lo..=hi
        };
        self
    }

    fn coord(&self, axis: usize, i: i64) -> i64 {
        let s = self.start[axis];
        if self.steps == 0 {
            return s;
        }
        if i == self.steps {
            return s.saturating_add(self.delta[axis]);
        }
        let t = i as f64 / self.steps as f64;
        s.saturating_add((self.delta[axis] as f64 * t).round_ties_even() as i64)
    }

    // smallest step in [0, steps + 1] where a monotone `pred` holds
    fn first_step(&self, pred: impl Fn(i64) -> bool) -> i64 {
        let (mut lo, mut hi) = (0, self.steps.saturating_add(1));
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(mid) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }
}

impl Iterator for LineIter {
    type Item = [i64; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.range.next()?;
        Some([0, 1, 2].map(|a| self.coord(a, i)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() {
            return (0, Some(0));
        }
        let left = usize::try_from(self.range.end() - self.range.start())
            .map_or(usize::MAX, |d| d.saturating_add(1));
        (left, Some(left))
    }
}

impl ExactSizeIterator for LineIter {}

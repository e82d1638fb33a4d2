use sv_core::Volume;

/// Order-0 (nearest neighbor) resize of `src` to `dims`.
///
/// Output index `o` samples input index
/// `round_half_even((o + 0.5) * in / out - 0.5)`, clamped to the input range.
/// An input with a zero dimension yields a volume filled with `T::default()`.
pub fn resize_nearest<T: Copy + Default>(src: &Volume<T>, dims: [usize; 3]) -> Volume<T> {
    if src.dims() == dims {
        return src.clone();
    }
    if src.is_empty() {
        return Volume::new_fill(dims, T::default());
    }

    let src_dims = src.dims();
    let maps: [Vec<usize>; 3] = [0, 1, 2].map(|a| axis_map(src_dims[a], dims[a]));

    let mut out = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
    for &sz in &maps[2] {
        for &sy in &maps[1] {
            for &sx in &maps[0] {
                out.push(src.get(sx, sy, sz).copied().unwrap_or_default());
            }
        }
    }

    Volume::from_vec(dims, out).expect("resized buffer matches requested dims")
}

fn axis_map(src_len: usize, dst_len: usize) -> Vec<usize> {
    let ratio = src_len as f64 / dst_len.max(1) as f64;
    let last = src_len.saturating_sub(1) as f64;
    (0..dst_len)
        .map(|o| {
            let s = ((o as f64 + 0.5) * ratio - 0.5).round_ties_even();
            s.clamp(0.0, last) as usize
        })
        .collect()
}

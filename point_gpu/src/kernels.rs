use crate::Point;
use cuda_std::{kernel, thread};

/// Writes the squared distance from each point to `query` into `dist2s`.
///
/// `dist2s` must have room for `points.len()` values.
#[kernel]
#[allow(improper_ctypes_definitions, clippy::missing_safety_doc)]
pub unsafe fn distances2_to(points: &[Point], query: Point, dist2s: *mut f32) {
    let mut i = (thread::thread_idx_x() + thread::block_idx_x() * thread::block_dim_x()) as usize;
    while i < points.len() {
        *(&mut *dist2s.add(i)) = Point::distance2(&points[i], &query);
        i += (thread::block_dim_x() * thread::grid_dim_x()) as usize;
    }
}

/// Subtracts `offset` from each of the `n` points, e.g. to center a cloud on
/// its centroid.
#[kernel]
#[allow(improper_ctypes_definitions, clippy::missing_safety_doc)]
pub unsafe fn translate(points: *mut Point, n: usize, offset: Point) {
    let mut i = (thread::thread_idx_x() + thread::block_idx_x() * thread::block_dim_x()) as usize;
    while i < n {
        *(&mut *points.add(i)) -= offset;
        i += (thread::block_dim_x() * thread::grid_dim_x()) as usize;
    }
}

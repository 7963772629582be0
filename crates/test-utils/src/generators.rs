//! Test data generators.
//!
//! Values are chosen so that a read can be checked without the source
//! array at hand: [`encode_index`] packs a `(t, z, y, x)` index into one
//! `f32` that survives the round trip exactly.

use ndarray::{ArrayD, Dimension, IxDyn};

/// Value stored at index `(t, z, y, x)`: `t * 1e6 + z * 1e4 + y * 100 + x`.
///
/// Exact in `f32` for `t < 16` and `z, y, x < 100`.
pub fn encode_index(t: usize, z: usize, y: usize, x: usize) -> f32 {
    debug_assert!(t < 16 && z < 100 && y < 100 && x < 100, "index too large to encode");
    (t * 1_000_000 + z * 10_000 + y * 100 + x) as f32
}

/// Inverse of [`encode_index`].
pub fn decode_index(value: f32) -> (usize, usize, usize, usize) {
    let v = value as usize;
    (v / 1_000_000, v / 10_000 % 100, v / 100 % 100, v % 100)
}

/// Array of `shape` (rank 1 to 4) holding [`encode_index`] of every index.
///
/// Lower-rank shapes are treated as the trailing dimensions of
/// `(t, z, y, x)`, with the missing leading indices zero.
///
/// # Example
///
/// ```
/// use test_utils::{encoded_array, encode_index};
///
/// let a = encoded_array(&[3, 4, 5]);
/// assert_eq!(a[[2, 1, 4]], encode_index(0, 2, 1, 4));
/// ```
pub fn encoded_array(shape: &[usize]) -> ArrayD<f32> {
    assert!((1..=4).contains(&shape.len()), "rank must be 1 to 4");
    let pad = 4 - shape.len();
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let mut full = [0usize; 4];
        full[pad..].copy_from_slice(idx.slice());
        encode_index(full[0], full[1], full[2], full[3])
    })
}

/// `count` values `start, start + step, ...`.
pub fn regular_values(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Terrain-following sigma coefficients from 1 (surface) down to 0 (top).
pub fn sigma_levels(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![1.0],
        n => (0..n).map(|k| 1.0 - k as f64 / (n - 1) as f64).collect(),
    }
}

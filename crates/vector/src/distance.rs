use ndarray::ArrayView1;

/// Squared Euclidean distance between two equal-length views.
/// Orders identically to the true L2 distance and skips the square root.
pub(crate) fn squared_l2(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let diff = &a - &b;
    diff.dot(&diff)
}

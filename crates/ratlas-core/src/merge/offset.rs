//! Label offsetting.

use ndarray::Array3;

/// Shift every nonzero label by `offset`; background stays 0.
///
/// With `offset` equal to the running maximum of the built volume, the
/// nonzero minimum of the result is strictly above every label already
/// allocated, so two atlases can never share a code in the output even
/// when their native vocabularies reuse the same small integers.
pub fn offset_labels(labels: &Array3<i32>, offset: i32) -> Array3<i32> {
    labels.mapv(|v| if v > 0 { v + offset } else { v })
}

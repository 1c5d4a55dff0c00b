//! Conflict mask between the built volume and a candidate atlas.

use ndarray::{Array3, Zip};

/// Voxels a candidate atlas may write: labeled in the candidate and
/// still background in the built volume. Once a voxel is claimed by an
/// earlier atlas it is never overwritten.
pub fn conflict_mask(built: &Array3<i32>, candidate: &Array3<i32>) -> Array3<bool> {
    Zip::from(built)
        .and(candidate)
        .map_collect(|&b, &c| c > 0 && b == 0)
}

//! Nearest-neighbor resampling onto a target voxel grid.
//!
//! Labels are region identities, not intensities, so resampling must
//! never blend values: each output voxel copies exactly one source voxel.
//! Coordinates that land outside the source extent take the nearest edge
//! voxel.

use ndarray::Array3;

use crate::error::{MergeError, Result};
use crate::grid::VoxelGrid;
use crate::volume::LabelVolume;

/// Ensure a volume lives on `grid`, resampling when it does not.
///
/// A volume whose shape and affine already match the target is returned
/// unchanged. Anything else goes through [`resample_to_grid`].
pub fn reconcile_to_grid(volume: LabelVolume, grid: &VoxelGrid) -> Result<LabelVolume> {
    if volume.grid() == *grid {
        Ok(volume)
    } else {
        resample_to_grid(&volume, grid)
    }
}

/// Resample a volume onto `grid` with nearest-neighbor interpolation.
///
/// Each output voxel index is mapped through the target affine into
/// physical space and back through the inverse source affine, then
/// rounded and clamped to the source extent.
///
/// # Errors
/// [`MergeError::SingularAffine`] when the source affine cannot be
/// inverted.
pub fn resample_to_grid(volume: &LabelVolume, grid: &VoxelGrid) -> Result<LabelVolume> {
    let inverse = volume
        .affine()
        .try_inverse()
        .ok_or(MergeError::SingularAffine)?;

    // Composed map: output voxel index -> source voxel index.
    let map = inverse.matrix() * grid.affine().matrix();

    let [sx, sy, sz] = volume.shape();
    let [nx, ny, nz] = grid.shape();
    let source = volume.data();

    let data = Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| {
        let v = map * nalgebra::Vector4::new(i as f64, j as f64, k as f64, 1.0);
        let x = nearest_index(v[0], sx);
        let y = nearest_index(v[1], sy);
        let z = nearest_index(v[2], sz);
        source[[x, y, z]]
    });

    Ok(LabelVolume::new(data, *grid.affine()))
}

/// Round a continuous coordinate and clamp it into `0..len`.
fn nearest_index(coord: f64, len: usize) -> usize {
    let rounded = coord.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= (len - 1) as f64 {
        len - 1
    } else {
        rounded as usize
    }
}

//! Voxel-to-world affine transforms.
//!
//! An affine maps discrete voxel indices to physical (mm) coordinates.
//! Two volumes live on the same grid only when their affines compare
//! equal exactly; resampling decisions hinge on that comparison, so no
//! tolerance is applied.

use nalgebra::{Matrix4, Vector4};

/// A 4x4 homogeneous voxel-index-to-physical-space transform.
///
/// This is a thin wrapper around nalgebra's `Matrix4<f64>` to provide
/// domain-specific functionality while keeping all nalgebra operations
/// available through the inner matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub Matrix4<f64>);

impl Affine {
    /// Create an affine from a 4x4 matrix.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    /// The identity transform (voxel indices are physical coordinates).
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// A pure translation by `offset` (mm).
    pub fn translation(offset: [f64; 3]) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = offset[0];
        m[(1, 3)] = offset[1];
        m[(2, 3)] = offset[2];
        Self(m)
    }

    /// An axis-aligned scaling, e.g. anisotropic voxel sizes.
    pub fn scaling(factors: [f64; 3]) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = factors[0];
        m[(1, 1)] = factors[1];
        m[(2, 2)] = factors[2];
        Self(m)
    }

    /// Get the inner matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Invert the transform, if possible.
    pub fn try_inverse(&self) -> Option<Affine> {
        self.0.try_inverse().map(Self)
    }

    /// Map a continuous voxel index to a physical point.
    pub fn apply(&self, index: [f64; 3]) -> [f64; 3] {
        let v = self.0 * Vector4::new(index[0], index[1], index[2], 1.0);
        [v[0], v[1], v[2]]
    }
}

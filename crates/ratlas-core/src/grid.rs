//! Voxel grid descriptions.

use crate::affine::Affine;

/// The voxel grid of a volume: array shape plus voxel-to-world affine.
///
/// Two volumes share a grid iff both the shape and the affine match
/// exactly. A `VoxelGrid` is also how a reference grid is described when
/// the output should use a different sampling than the base atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    shape: [usize; 3],
    affine: Affine,
}

impl VoxelGrid {
    /// Create a grid description.
    pub fn new(shape: [usize; 3], affine: Affine) -> Self {
        Self { shape, affine }
    }

    /// The array shape.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// The voxel-to-world affine.
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    /// Whether the grid holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

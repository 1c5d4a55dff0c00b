//! Labeled volume type.
//!
//! A labeled volume is a 3D array of integer region codes together with
//! the affine that places its voxel grid in physical space. Code 0 is
//! background; every positive code names one region.

use std::collections::BTreeSet;

use ndarray::Array3;

use crate::affine::Affine;
use crate::grid::VoxelGrid;

/// A discrete-labeled 3D volume with physical-space metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    data: Array3<i32>,
    affine: Affine,
}

impl LabelVolume {
    /// Create a labeled volume from voxel data and its affine.
    pub fn new(data: Array3<i32>, affine: Affine) -> Self {
        Self { data, affine }
    }

    /// The voxel data.
    pub fn data(&self) -> &Array3<i32> {
        &self.data
    }

    /// The voxel-to-world affine.
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// The array shape as `[x, y, z]`.
    pub fn shape(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    /// The grid this volume is sampled on.
    pub fn grid(&self) -> VoxelGrid {
        VoxelGrid::new(self.shape(), self.affine)
    }

    /// The highest label code present, 0 for an all-background volume.
    pub fn max_label(&self) -> i32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// The set of nonzero label codes present anywhere in the volume.
    pub fn labels(&self) -> BTreeSet<i32> {
        self.data.iter().copied().filter(|&v| v > 0).collect()
    }

    /// Decompose into voxel data and affine.
    pub fn into_parts(self) -> (Array3<i32>, Affine) {
        (self.data, self.affine)
    }
}

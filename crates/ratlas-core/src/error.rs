//! Error types for atlas merge operations.

use thiserror::Error;

/// Main error type for atlas merge operations.
#[derive(Error, Debug)]
pub enum MergeError {
    /// No atlases were supplied.
    #[error("no atlases supplied")]
    EmptyAtlasList,

    /// Two volumes reached a voxelwise operation with different shapes.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    /// A volume's affine cannot be inverted for resampling.
    #[error("volume affine is singular and cannot be inverted")]
    SingularAffine,

    /// The name-tag list does not line up with the atlases to merge.
    #[error("expected {expected} name tag(s), one per atlas after the base, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },
}

/// Result type for atlas merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

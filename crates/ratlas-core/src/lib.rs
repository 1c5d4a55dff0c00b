pub mod affine;
pub mod error;
pub mod grid;
pub mod merge;
pub mod resample;
pub mod vocabulary;
pub mod volume;

pub use affine::Affine;
pub use error::{MergeError, Result};
pub use grid::VoxelGrid;
pub use merge::{AtlasMerger, LookupRow, MergeOutcome, MergeRequest};
pub use vocabulary::NetworkVocabulary;
pub use volume::LabelVolume;

//! The atlas merge pipeline.
//!
//! Atlases are folded into a single output volume in input order: each
//! candidate is reconciled to the output grid, masked against voxels
//! already claimed, offset past every label already allocated, then
//! written. Earlier atlases always win conflicts.

pub mod coverage;
pub mod lookup;
pub mod mask;
pub mod merger;
pub mod offset;

pub use coverage::CoverageReport;
pub use lookup::LookupRow;
pub use merger::{AtlasMerger, MergeOutcome, MergeRequest};

//! Merge orchestrator.
//!
//! Owns the accumulating output buffer and the running maximum label
//! index, and drives reconcile / mask / coverage / offset / write over
//! the atlas list in order. Ordering is semantically load-bearing: each
//! atlas is checked and offset against the state produced by all earlier
//! ones, so the loop is strictly sequential.

use ndarray::Zip;
use tracing::{debug, info, warn};

use crate::error::{MergeError, Result};
use crate::grid::VoxelGrid;
use crate::merge::{coverage, lookup, mask, offset, LookupRow};
use crate::resample;
use crate::vocabulary::NetworkVocabulary;
use crate::volume::LabelVolume;

/// Inputs to one merge invocation.
pub struct MergeRequest {
    /// Atlases in merge order, the first being the base.
    pub atlases: Vec<LabelVolume>,
    /// One name tag per atlas after the base, used for diagnostics and
    /// lookup-table region names.
    pub names: Vec<String>,
    /// Output grid override; when set, the base atlas is resampled onto
    /// it before the merge loop begins.
    pub reference: Option<VoxelGrid>,
    /// `Some` requests a lookup table, seeded with these pre-existing
    /// rows (typically the base atlas's own table, taken verbatim).
    pub seed_rows: Option<Vec<LookupRow>>,
}

/// The merged volume and, when requested, the combined lookup table.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The merged, non-overlapping labeled volume.
    pub volume: LabelVolume,
    /// Seed rows followed by each atlas's rows, in merge order.
    pub lookup: Option<Vec<LookupRow>>,
}

/// Merges discrete-labeled atlases into one non-overlapping volume.
pub struct AtlasMerger {
    vocabulary: NetworkVocabulary,
}

impl AtlasMerger {
    /// Create a merger that checks and names regions against
    /// `vocabulary`.
    pub fn new(vocabulary: NetworkVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Merge the request's atlases in order.
    ///
    /// Later atlases never overwrite voxels claimed by earlier ones, and
    /// every atlas's labels are shifted past the highest label already
    /// present, so contributions stay disjoint both spatially and
    /// numerically.
    ///
    /// # Errors
    /// Fails before any voxel is written on an empty atlas list, a
    /// name-tag count mismatch, or an atlas whose grid cannot be
    /// reconciled with the base.
    pub fn merge(&self, request: MergeRequest) -> Result<MergeOutcome> {
        let MergeRequest {
            mut atlases,
            names,
            reference,
            seed_rows,
        } = request;

        if atlases.is_empty() {
            return Err(MergeError::EmptyAtlasList);
        }
        if atlases.len() == 1 {
            warn!("only one atlas supplied, returning it unchanged");
            return Ok(MergeOutcome {
                volume: atlases.remove(0),
                lookup: None,
            });
        }
        if names.len() != atlases.len() - 1 {
            return Err(MergeError::NameCountMismatch {
                expected: atlases.len() - 1,
                actual: names.len(),
            });
        }

        let rest = atlases.split_off(1);
        let mut base = atlases.remove(0);
        if let Some(grid) = &reference {
            base = resample::reconcile_to_grid(base, grid)?;
        }

        let grid = base.grid();
        let (mut built, affine) = base.into_parts();
        let mut max_index = built.iter().copied().max().unwrap_or(0);
        let mut rows = seed_rows;

        for (name, atlas) in names.iter().zip(rest) {
            let atlas = resample::reconcile_to_grid(atlas, &grid)?;
            if atlas.shape() != grid.shape() {
                return Err(MergeError::ShapeMismatch {
                    expected: grid.shape(),
                    actual: atlas.shape(),
                });
            }

            let write_mask = mask::conflict_mask(&built, atlas.data());

            let report = coverage::check_coverage(atlas.data(), &write_mask, &self.vocabulary);
            if report.missing.is_empty() {
                debug!(atlas = %name, "all networks contributed");
            } else {
                warn!(
                    atlas = %name,
                    "missing networks: {}",
                    report.missing.join(" ")
                );
            }

            let shift = max_index;
            let shifted = offset::offset_labels(atlas.data(), shift);
            Zip::from(&mut built)
                .and(&shifted)
                .and(&write_mask)
                .for_each(|out, &label, &write| {
                    if write {
                        *out = label;
                    }
                });
            max_index = built.iter().copied().max().unwrap_or(0);

            if let Some(rows) = rows.as_mut() {
                rows.extend(lookup::atlas_rows(
                    name,
                    &atlas.labels(),
                    shift,
                    &self.vocabulary,
                ));
            }

            info!(atlas = %name, max_index, "merged atlas");
        }

        Ok(MergeOutcome {
            volume: LabelVolume::new(built, affine),
            lookup: rows,
        })
    }
}

//! Lookup table rows.

use std::collections::BTreeSet;

use crate::vocabulary::NetworkVocabulary;

/// One `(region name, label index)` entry of the combined lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRow {
    /// Region name, e.g. `subcortical-SomMotA`.
    pub region: String,
    /// Numeric label as it appears in the merged volume.
    pub index: i32,
}

impl LookupRow {
    /// Create a row.
    pub fn new(region: impl Into<String>, index: i32) -> Self {
        Self {
            region: region.into(),
            index,
        }
    }
}

/// Rows for one merged atlas.
///
/// `labels` is the candidate's native label set taken over the whole
/// atlas, not just its uniquely contributed voxels; this is deliberately
/// broader than the coverage check and means a fully shadowed code still
/// receives a row. One row is produced per vocabulary code present, in
/// ascending code order, indexed at `code + offset` — the same shift the
/// offsetter applied to that atlas's voxels.
pub fn atlas_rows(
    tag: &str,
    labels: &BTreeSet<i32>,
    offset: i32,
    vocabulary: &NetworkVocabulary,
) -> Vec<LookupRow> {
    vocabulary
        .iter()
        .filter(|(code, _)| labels.contains(code))
        .map(|(code, name)| LookupRow::new(format!("{tag}-{name}"), code + offset))
        .collect()
}

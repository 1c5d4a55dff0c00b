//! Vocabulary coverage of a candidate's contribution.

use std::collections::BTreeSet;

use ndarray::{Array3, Zip};

use crate::vocabulary::NetworkVocabulary;

/// Which vocabulary networks a candidate atlas actually contributes.
///
/// The observed set is taken over the conflict-mask-selected voxels
/// only, so a network whose voxels were all claimed by an earlier atlas
/// counts as missing even though the candidate nominally contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    /// Label codes found in the uniquely contributed region.
    pub observed: BTreeSet<i32>,
    /// Canonical names of vocabulary codes absent from that region,
    /// in ascending code order.
    pub missing: Vec<String>,
}

/// Compare a candidate's masked labels against the reference vocabulary.
pub fn check_coverage(
    candidate: &Array3<i32>,
    mask: &Array3<bool>,
    vocabulary: &NetworkVocabulary,
) -> CoverageReport {
    let mut observed = BTreeSet::new();
    Zip::from(candidate).and(mask).for_each(|&label, &selected| {
        if selected && label > 0 {
            observed.insert(label);
        }
    });

    let missing = vocabulary
        .iter()
        .filter(|(code, _)| !observed.contains(code))
        .map(|(_, name)| name.to_string())
        .collect();

    CoverageReport { observed, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn vocab() -> NetworkVocabulary {
        NetworkVocabulary::new([(1, "A"), (2, "B"), (3, "C")])
    }

    #[test]
    fn test_full_coverage_reports_nothing_missing() {
        let candidate = Array3::from_shape_vec((3, 1, 1), vec![1, 2, 3]).unwrap();
        let mask = Array3::from_elem((3, 1, 1), true);
        let report = check_coverage(&candidate, &mask, &vocab());
        assert!(report.missing.is_empty());
        assert_eq!(report.observed.len(), 3);
    }

    #[test]
    fn test_missing_names_in_code_order() {
        let candidate = Array3::from_shape_vec((3, 1, 1), vec![2, 0, 0]).unwrap();
        let mask = Array3::from_shape_vec((3, 1, 1), vec![true, false, false]).unwrap();
        let report = check_coverage(&candidate, &mask, &vocab());
        assert_eq!(report.missing, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_masked_out_voxels_are_not_observed() {
        // Code 1 exists in the candidate but only at a masked-out voxel.
        let candidate = Array3::from_shape_vec((2, 1, 1), vec![1, 2]).unwrap();
        let mask = Array3::from_shape_vec((2, 1, 1), vec![false, true]).unwrap();
        let report = check_coverage(&candidate, &mask, &vocab());
        assert!(!report.observed.contains(&1));
        assert!(report.missing.contains(&"A".to_string()));
    }

    #[test]
    fn test_codes_outside_vocabulary_are_observed_but_irrelevant() {
        let candidate = Array3::from_shape_vec((2, 1, 1), vec![99, 1]).unwrap();
        let mask = Array3::from_elem((2, 1, 1), true);
        let report = check_coverage(&candidate, &mask, &vocab());
        assert!(report.observed.contains(&99));
        assert_eq!(report.missing, vec!["B".to_string(), "C".to_string()]);
    }
}

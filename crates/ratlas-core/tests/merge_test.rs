use ndarray::Array3;
use ratlas_core::{
    Affine, AtlasMerger, LabelVolume, LookupRow, MergeError, MergeRequest, NetworkVocabulary,
    VoxelGrid,
};

const N: usize = 27;

/// 3x3x3 volume on the identity grid with the given flat values.
fn volume(values: Vec<i32>) -> LabelVolume {
    assert_eq!(values.len(), N);
    LabelVolume::new(
        Array3::from_shape_vec((3, 3, 3), values).unwrap(),
        Affine::identity(),
    )
}

fn sparse(entries: &[(usize, i32)]) -> LabelVolume {
    let mut values = vec![0; N];
    for &(at, label) in entries {
        values[at] = label;
    }
    volume(values)
}

fn flat(v: &LabelVolume) -> Vec<i32> {
    v.data().iter().copied().collect()
}

fn merger() -> AtlasMerger {
    AtlasMerger::new(NetworkVocabulary::schaefer_17())
}

/// Base with networks 1..17, a second atlas contributing two disjoint
/// regions: the new labels land at 18 and 19 and the lookup rows name
/// them through the vocabulary.
#[test]
fn test_disjoint_merge_offsets_past_base() {
    let base_entries: Vec<(usize, i32)> = (0..17).map(|i| (i, i as i32 + 1)).collect();
    let base = sparse(&base_entries);
    let subcortical = sparse(&[(20, 1), (21, 2)]);

    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, subcortical],
            names: vec!["subcortical".into()],
            reference: None,
            seed_rows: Some(vec![]),
        })
        .unwrap();

    let out = flat(&outcome.volume);
    for i in 0..17 {
        assert_eq!(out[i], i as i32 + 1);
    }
    assert_eq!(out[20], 18);
    assert_eq!(out[21], 19);

    let rows = outcome.lookup.unwrap();
    assert_eq!(
        rows,
        vec![
            LookupRow::new("subcortical-VisCent", 18),
            LookupRow::new("subcortical-VisPeri", 19),
        ]
    );
}

/// Overlapping voxels keep the earlier atlas's values; only the
/// non-overlapping remainder of the later atlas is written.
#[test]
fn test_overlap_keeps_earlier_atlas() {
    let base = sparse(&[(0, 4), (1, 9)]);
    let other = sparse(&[(0, 5), (2, 5)]);

    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, other],
            names: vec!["second".into()],
            reference: None,
            seed_rows: None,
        })
        .unwrap();

    let out = flat(&outcome.volume);
    assert_eq!(out[0], 4);
    assert_eq!(out[1], 9);
    assert_eq!(out[2], 5 + 9);
}

/// Merging one atlas returns its data unchanged and produces no table.
#[test]
fn test_single_input_identity() {
    let only = sparse(&[(3, 12), (5, 1)]);
    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![only.clone()],
            names: vec![],
            reference: None,
            seed_rows: Some(vec![LookupRow::new("seed", 1)]),
        })
        .unwrap();
    assert_eq!(outcome.volume, only);
    assert!(outcome.lookup.is_none());
}

#[test]
fn test_empty_input_fails() {
    let err = merger()
        .merge(MergeRequest {
            atlases: vec![],
            names: vec![],
            reference: None,
            seed_rows: None,
        })
        .unwrap_err();
    assert!(matches!(err, MergeError::EmptyAtlasList));
}

/// Same inputs, same outputs, bit for bit.
#[test]
fn test_merge_is_deterministic() {
    let request = || MergeRequest {
        atlases: vec![
            sparse(&[(0, 3), (1, 1)]),
            sparse(&[(1, 2), (2, 2)]),
            sparse(&[(2, 7), (3, 7)]),
        ],
        names: vec!["a".into(), "b".into()],
        reference: None,
        seed_rows: Some(vec![LookupRow::new("base-region", 3)]),
    };
    let first = merger().merge(request()).unwrap();
    let second = merger().merge(request()).unwrap();
    assert_eq!(first.volume, second.volume);
    assert_eq!(first.lookup, second.lookup);
}

/// After each atlas the running maximum equals the volume maximum, and
/// offsets grow monotonically across three atlases.
#[test]
fn test_offsets_are_monotonic_across_atlases() {
    let base = sparse(&[(0, 10)]);
    let second = sparse(&[(1, 2)]);
    let third = sparse(&[(2, 1)]);

    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, second, third],
            names: vec!["second".into(), "third".into()],
            reference: None,
            seed_rows: None,
        })
        .unwrap();

    let out = flat(&outcome.volume);
    assert_eq!(out[0], 10);
    assert_eq!(out[1], 12); // 2 + 10
    assert_eq!(out[2], 13); // 1 + 12
    assert_eq!(outcome.volume.max_label(), 13);
}

/// Voxels labeled 0 in every input stay 0.
#[test]
fn test_background_is_preserved() {
    let base = sparse(&[(0, 1)]);
    let other = sparse(&[(1, 1)]);
    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, other],
            names: vec!["other".into()],
            reference: None,
            seed_rows: None,
        })
        .unwrap();
    let out = flat(&outcome.volume);
    for i in 2..N {
        assert_eq!(out[i], 0);
    }
}

/// Seed rows pass through untouched, ahead of the appended rows.
#[test]
fn test_seed_rows_come_first_verbatim() {
    let base = sparse(&[(0, 17)]);
    let other = sparse(&[(1, 3)]);
    let seed = vec![
        LookupRow::new("cortex-VisCent", 1),
        LookupRow::new("cortex-DefaultB", 17),
    ];
    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, other],
            names: vec!["sub".into()],
            reference: None,
            seed_rows: Some(seed.clone()),
        })
        .unwrap();
    let rows = outcome.lookup.unwrap();
    assert_eq!(&rows[..2], &seed[..]);
    assert_eq!(rows[2], LookupRow::new("sub-SomMotA", 20));
}

/// The coverage check scopes to uniquely contributed voxels while the
/// lookup rows scope to the whole atlas: a code whose voxels were all
/// claimed by an earlier atlas still gets a row, at an index that never
/// made it into the volume.
#[test]
fn test_fully_shadowed_code_still_gets_lookup_row() {
    let base = sparse(&[(0, 9)]);
    // Code 3 only under the base's voxel; code 1 in open space.
    let other = sparse(&[(0, 3), (1, 1)]);

    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, other],
            names: vec!["sub".into()],
            reference: None,
            seed_rows: Some(vec![]),
        })
        .unwrap();

    let rows = outcome.lookup.unwrap();
    assert!(rows.contains(&LookupRow::new("sub-VisCent", 10)));
    assert!(rows.contains(&LookupRow::new("sub-SomMotA", 12)));

    // The shadowed index is advertised but absent from the volume.
    let out = flat(&outcome.volume);
    assert!(out.contains(&10));
    assert!(!out.contains(&12));
}

/// Contributions from distinct atlases never share a label value.
#[test]
fn test_contributed_label_sets_are_disjoint() {
    let base = sparse(&[(0, 5), (1, 5), (2, 2)]);
    let second = sparse(&[(3, 1), (4, 2), (5, 5)]);
    let third = sparse(&[(6, 1), (7, 5)]);

    let base_labels = base.labels();
    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, second, third],
            names: vec!["second".into(), "third".into()],
            reference: None,
            seed_rows: None,
        })
        .unwrap();

    let out = flat(&outcome.volume);
    let second_set: std::collections::BTreeSet<i32> =
        out[3..6].iter().copied().filter(|&v| v > 0).collect();
    let third_set: std::collections::BTreeSet<i32> =
        out[6..8].iter().copied().filter(|&v| v > 0).collect();
    assert!(second_set.is_disjoint(&third_set));
    assert!(second_set.iter().all(|v| !base_labels.contains(v)));
    assert!(third_set.iter().all(|v| !base_labels.contains(v)));
}

/// An atlas on a shifted grid is pulled onto the base grid before
/// merging.
#[test]
fn test_mismatched_grid_is_reconciled() {
    let base = sparse(&[(0, 1)]);
    let mut data = Array3::zeros((3, 3, 3));
    data[[1, 0, 0]] = 2;
    // Shifted one voxel along x: its voxel (1,0,0) sits at world (0,0,0).
    let other = LabelVolume::new(data, Affine::translation([-1.0, 0.0, 0.0]));

    let outcome = merger()
        .merge(MergeRequest {
            atlases: vec![base, other],
            names: vec!["shifted".into()],
            reference: None,
            seed_rows: None,
        })
        .unwrap();

    // World (0,0,0) is base voxel (0,0,0), already claimed by label 1;
    // the shifted atlas's region resolves there and is masked out.
    let out = flat(&outcome.volume);
    assert_eq!(out[0], 1);
    assert!(outcome.volume.grid() == VoxelGrid::new([3, 3, 3], Affine::identity()));
}

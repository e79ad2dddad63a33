use ragprobe_vector::{l2_normalize, FlatIpIndex, NO_MATCH};

fn unit(v: &[f32]) -> Vec<f32> {
    let mut v = v.to_vec();
    l2_normalize(&mut v);
    v
}

#[test]
fn identical_vector_scores_highest() {
    let mut index = FlatIpIndex::new(3).unwrap();
    index
        .add(&[unit(&[1.0, 0.0, 0.0]), unit(&[0.0, 1.0, 0.0]), unit(&[0.7, 0.7, 0.0])])
        .unwrap();

    let (ids, scores) = index.search(&unit(&[0.0, 1.0, 0.0]), 3).unwrap();

    assert_eq!(ids[0], 1);
    assert!((scores[0] - 1.0).abs() < 1e-6);
    assert!(scores[0] >= scores[1] && scores[1] >= scores[2]);
}

#[test]
fn underfull_results_are_padded_with_sentinel() {
    let mut index = FlatIpIndex::new(2).unwrap();
    index.add(&[unit(&[1.0, 0.0])]).unwrap();

    let (ids, scores) = index.search(&unit(&[1.0, 0.0]), 4).unwrap();

    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], 0);
    assert_eq!(&ids[1..], &[NO_MATCH, NO_MATCH, NO_MATCH]);
    assert!(scores[1..].iter().all(|s| *s == f32::NEG_INFINITY));
}

#[test]
fn dimension_mismatch_is_rejected() {
    let mut index = FlatIpIndex::new(4).unwrap();
    assert!(index.add(&[vec![1.0, 2.0]]).is_err());
    assert_eq!(index.len(), 0);
    assert!(index.search(&[1.0, 2.0], 1).is_err());
}

#[test]
fn normalize_produces_unit_norm() {
    let mut v = vec![3.0, 4.0];
    l2_normalize(&mut v);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-6);

    // zero vector stays finite
    let mut z = vec![0.0, 0.0];
    l2_normalize(&mut z);
    assert!(z.iter().all(|x| x.is_finite()));
}

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct IntVal(i64);

impl RbValue for IntVal {
    type Extra = i64;

    fn own_weight(&self) -> usize {
        1
    }

    fn own_extra(&self) -> i64 {
        self.0
    }

    fn combine_extra(own: &i64, left: Option<&Agg<i64>>, right: Option<&Agg<i64>>) -> i64 {
        own + left.map(|a| a.extra).unwrap_or(0) + right.map(|a| a.extra).unwrap_or(0)
    }
}

fn build_seq(values: &[i64]) -> Link<IntVal> {
    let mut root: Link<IntVal> = None;
    for (i, v) in values.iter().enumerate() {
        root = Some(insert_at(&root, i, IntVal(*v)));
    }
    root
}

#[test]
fn test_insert_preserves_order() {
    let root = build_seq(&[1, 2, 3, 4, 5]);
    let got: Vec<i64> = collect(&root).into_iter().map(|(v, _)| v.0).collect();
    assert_eq!(got, vec![1, 2, 3, 4, 5]);
    assert!(validate(&root).is_ok());
}

#[test]
fn test_insert_at_middle() {
    let mut root = build_seq(&[1, 2, 4, 5]);
    root = Some(insert_at(&root, 2, IntVal(3)));
    let got: Vec<i64> = collect(&root).into_iter().map(|(v, _)| v.0).collect();
    assert_eq!(got, vec![1, 2, 3, 4, 5]);
    assert!(validate(&root).is_ok());
}

#[test]
fn test_remove_at() {
    let root = build_seq(&[1, 2, 3, 4, 5]);
    let removed = remove_at(&root, 2);
    let got: Vec<i64> = collect(&removed).into_iter().map(|(v, _)| v.0).collect();
    assert_eq!(got, vec![1, 2, 4, 5]);
    assert!(validate(&removed).is_ok());
}

#[test]
fn test_remove_all() {
    let mut root = build_seq(&[1, 2, 3, 4, 5, 6, 7, 8]);
    for _ in 0..8 {
        root = remove_at(&root, 0);
        assert!(validate(&root).is_ok());
    }
    assert!(root.is_none());
}

#[test]
fn test_aggregate_tracks_sum() {
    let root = build_seq(&[1, 2, 3, 4, 5]);
    assert_eq!(total_count(&root), 5);
    assert_eq!(root_extra(&root), Some(15));
}

#[test]
fn test_find_at() {
    let root = build_seq(&[10, 20, 30]);
    let (v, base) = find_at(&root, 1).unwrap();
    assert_eq!(v.0, 20);
    assert_eq!(base, 1);
}

#[test]
fn test_update_at() {
    let root = build_seq(&[1, 2, 3]);
    let updated = Some(update_at(&root, 1, IntVal(99)));
    let got: Vec<i64> = collect(&updated).into_iter().map(|(v, _)| v.0).collect();
    assert_eq!(got, vec![1, 99, 3]);
}

#[test]
fn test_random_insert_remove_stays_balanced() {
    use rand::prelude::*;
    let mut rng = rand::thread_rng();
    let mut values: Vec<i64> = Vec::new();
    let mut root: Link<IntVal> = None;
    for _ in 0..200 {
        let idx = rng.gen_range(0..=values.len());
        let v: i64 = rng.gen_range(0..1_000_000);
        root = Some(insert_at(&root, idx, IntVal(v)));
        values.insert(idx, v);
        assert!(validate(&root).is_ok());
    }
    while !values.is_empty() {
        let idx = rng.gen_range(0..values.len());
        root = remove_at(&root, idx);
        values.remove(idx);
        assert!(validate(&root).is_ok());
        let got: Vec<i64> = collect(&root).into_iter().map(|(v, _)| v.0).collect();
        assert_eq!(got, values);
    }
}

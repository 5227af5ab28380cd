//! Shared helpers for the integration tests

#![allow(dead_code)]

use qframe::{Column, Frame, RowIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Frame with an int key, a string key, an int value and a float value.
///
/// `keys` controls how many distinct values the int key takes.
pub fn random_frame(rows: usize, keys: i64, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let k: Vec<i64> = (0..rows).map(|_| rng.random_range(0..keys)).collect();
    let tag: Vec<String> = (0..rows)
        .map(|_| format!("t{}", rng.random_range(0..3)))
        .collect();
    let value: Vec<i64> = (0..rows).map(|_| rng.random_range(-100..100)).collect();
    let score: Vec<f64> = (0..rows).map(|_| rng.random_range(0.0..1.0)).collect();
    Frame::new(vec![
        ("k", Column::from(k)),
        ("tag", Column::from(tag)),
        ("value", Column::from(value)),
        ("score", Column::from(score)),
    ])
    .unwrap()
}

/// Shuffled copy of `index`
pub fn shuffled(index: &RowIndex, seed: u64) -> RowIndex {
    let mut positions = index.as_slice().to_vec();
    positions.shuffle(&mut StdRng::seed_from_u64(seed));
    RowIndex::new(positions)
}

/// Groups as sorted sets of row positions, for order independent comparison
pub fn normalize(groups: &[RowIndex]) -> Vec<Vec<u32>> {
    let mut sets: Vec<Vec<u32>> = groups
        .iter()
        .map(|g| {
            let mut v = g.as_slice().to_vec();
            v.sort_unstable();
            v
        })
        .collect();
    sets.sort();
    sets
}

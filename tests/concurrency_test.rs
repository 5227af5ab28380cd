mod common;

use rayon::prelude::*;

use qframe::error::Result;
use qframe::{AggregateFn, Aggregation, Comparator, Filter, Frame, Grouper};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_core_types_are_send_and_sync() {
    assert_send_sync::<Frame>();
    assert_send_sync::<Grouper>();
    assert_send_sync::<AggregateFn>();
}

/// Sum of `value` per `k` for rows above `threshold`, as sorted (key, sum) pairs
fn pipeline(frame: &Frame, threshold: i64) -> Result<Vec<(i64, i64)>> {
    let out = frame
        .filter(&Filter::new("value", Comparator::Gt, threshold))?
        .group_by(&["k"])?
        .aggregate(&[Aggregation::new(AggregateFn::Sum, "value")])?;
    let keys = out.int_view("k")?.to_vec();
    let sums = out.int_view("value")?.to_vec();
    let mut pairs: Vec<(i64, i64)> = keys.into_iter().zip(sums).collect();
    pairs.sort_unstable();
    Ok(pairs)
}

#[test]
fn test_parallel_pipelines_share_one_frame() -> Result<()> {
    let frame = common::random_frame(20_000, 64, 42);
    let thresholds: Vec<i64> = (-100..100).step_by(10).collect();

    let sequential = thresholds
        .iter()
        .map(|&t| pipeline(&frame, t))
        .collect::<Result<Vec<_>>>()?;
    let parallel = thresholds
        .par_iter()
        .map(|&t| pipeline(&frame, t))
        .collect::<Result<Vec<_>>>()?;

    assert_eq!(sequential, parallel);
    Ok(())
}

#[test]
fn test_group_frames_processed_in_parallel() -> Result<()> {
    let frame = common::random_frame(5_000, 16, 8);
    let grouper = frame.group_by(&["k"])?;
    let sizes: Vec<usize> = grouper.frames().par_iter().map(Frame::len).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 5_000);
    Ok(())
}

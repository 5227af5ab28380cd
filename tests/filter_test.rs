mod common;

use std::collections::HashSet;

use qframe::error::{Error, Result};
use qframe::{BitMask, Column, ColumnType, Comparator, EnumColumn, Filter, Frame, RowIndex, Value};

#[test]
fn test_greater_than_mask_and_index() -> Result<()> {
    let b = Column::from(vec![1i64, 3, 2, 5]);
    let ix = RowIndex::ascending(4);
    let mut mask = BitMask::new(4);
    b.filter_const(&ix, Comparator::Gt, &Value::Int(2), &mut mask)?;
    assert_eq!(mask.to_bools(), vec![false, true, false, true]);
    assert_eq!(ix.filter(&mask).as_slice(), &[1, 3]);

    let frame = Frame::new(vec![("B", b)])?;
    let filtered = frame.filter(&Filter::new("B", Comparator::Gt, 2))?;
    assert_eq!(filtered.index().as_slice(), &[1, 3]);
    Ok(())
}

#[test]
fn test_predicate_and_negation_partition_rows() -> Result<()> {
    let frame = common::random_frame(500, 20, 7);
    let predicate = Filter::new("value", Comparator::Gt, 10)
        .and(Filter::new("tag", Comparator::Eq, "t1"))
        .or(Filter::new("k", Comparator::Lte, 3));

    let kept = frame.filter(&predicate)?;
    let rest = frame.filter(&!predicate.clone())?;

    assert_eq!(kept.len() + rest.len(), frame.len());
    let kept_rows: HashSet<u32> = kept.index().iter().collect();
    let rest_rows: HashSet<u32> = rest.index().iter().collect();
    assert!(kept_rows.is_disjoint(&rest_rows));
    let all: HashSet<u32> = kept_rows.union(&rest_rows).copied().collect();
    assert_eq!(all, frame.index().iter().collect::<HashSet<u32>>());
    Ok(())
}

#[test]
fn test_identity_filter_reproduces_frame() -> Result<()> {
    let frame = common::random_frame(200, 10, 3);
    let same = frame.filter(&Filter::new("value", Comparator::Gte, -100))?;
    assert_eq!(same.index(), frame.index());
    assert!(same.equals(&frame));
    assert_eq!(same.column_names(), frame.column_names());
    Ok(())
}

#[test]
fn test_filter_of_filtered_frame() -> Result<()> {
    let frame = Frame::new(vec![
        ("n", Column::from((0..10).collect::<Vec<i64>>())),
        ("sq", Column::from((0..10).map(|v| v * v).collect::<Vec<i64>>())),
    ])?;
    let nested = frame
        .filter(&Filter::new("n", Comparator::Gte, 3))?
        .filter(&Filter::new("sq", Comparator::Lt, 50))?;
    assert_eq!(nested.index().as_slice(), &[3, 4, 5, 6, 7]);
    assert_eq!(nested.value("sq", 0)?, Value::Int(9));
    Ok(())
}

#[test]
fn test_column_to_column_filter() -> Result<()> {
    let frame = Frame::new(vec![
        ("lo", Column::from(vec![1.0, 5.0, 3.0])),
        ("hi", Column::from(vec![2.0, 4.0, 3.0])),
    ])?;
    let ordered = frame.filter(&Filter::columns("lo", Comparator::Lte, "hi"))?;
    assert_eq!(ordered.index().as_slice(), &[0, 2]);

    let mismatch = Frame::new(vec![
        ("a", Column::from(vec![1i64])),
        ("b", Column::from(vec!["x"])),
    ])?;
    assert!(matches!(
        mismatch.filter(&Filter::columns("a", Comparator::Eq, "b")),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_numeric_operands_mix() -> Result<()> {
    let frame = Frame::new(vec![
        ("i", Column::from(vec![1i64, 2, 3])),
        ("f", Column::from(vec![0.5, 2.0, f64::NAN])),
    ])?;
    assert_eq!(
        frame.filter(&Filter::new("i", Comparator::Gt, 1.5))?.len(),
        2
    );
    assert_eq!(frame.filter(&Filter::new("f", Comparator::Eq, 2))?.len(), 1);

    // NaN is the float null: skipped by ordering comparators, selected by eq Null
    let big = frame.filter(&Filter::new("f", Comparator::Gt, 1.0))?;
    assert_eq!(big.index().as_slice(), &[1]);
    let missing = frame.filter(&Filter::new("f", Comparator::Eq, Value::Null))?;
    assert_eq!(missing.index().as_slice(), &[2]);
    Ok(())
}

#[test]
fn test_boolean_ordering_unsupported() -> Result<()> {
    let frame = Frame::new(vec![("flag", Column::from(vec![true, false]))])?;
    let err = frame
        .filter(&Filter::new("flag", Comparator::Gt, false))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedOperation {
            column_type: ColumnType::Boolean,
            ..
        }
    ));
    assert_eq!(frame.filter(&Filter::new("flag", Comparator::Eq, true))?.len(), 1);
    Ok(())
}

#[test]
fn test_operand_type_mismatch() -> Result<()> {
    let frame = Frame::new(vec![("s", Column::from(vec!["a", "b"]))])?;
    assert!(matches!(
        frame.filter(&Filter::new("s", Comparator::Eq, 1)),
        Err(Error::TypeMismatch {
            expected: ColumnType::String,
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_string_nulls() -> Result<()> {
    let frame = Frame::new(vec![(
        "s",
        Column::from(vec![Some("a"), None, Some("c"), None]),
    )])?;
    assert_eq!(
        frame
            .filter(&Filter::new("s", Comparator::Eq, Value::Null))?
            .index()
            .as_slice(),
        &[1, 3]
    );
    assert_eq!(
        frame
            .filter(&Filter::new("s", Comparator::Neq, "a"))?
            .index()
            .as_slice(),
        &[1, 2, 3]
    );
    assert_eq!(
        frame
            .filter(&Filter::new("s", Comparator::Gte, "a"))?
            .index()
            .as_slice(),
        &[0, 2]
    );
    assert!(matches!(
        frame.filter(&Filter::new("s", Comparator::Lt, Value::Null)),
        Err(Error::InvalidOperand(_))
    ));
    Ok(())
}

#[test]
fn test_enum_filters() -> Result<()> {
    let sizes = vec!["S".to_string(), "M".to_string(), "L".to_string()];
    let ordered = EnumColumn::new(vec![Some("L"), Some("S"), None, Some("M")], Some(sizes))?;
    let unordered = EnumColumn::new(vec![Some("x"), Some("y"), Some("x"), None], None)?;
    let frame = Frame::new(vec![("size", ordered), ("kind", unordered)])?;

    let at_least_m = frame.filter(&Filter::new("size", Comparator::Gte, "M"))?;
    assert_eq!(at_least_m.index().as_slice(), &[0, 3]);

    assert!(frame
        .filter(&Filter::new("size", Comparator::Eq, "XL"))?
        .is_empty());
    assert_eq!(
        frame.filter(&Filter::new("size", Comparator::Neq, "XL"))?.len(),
        4
    );
    assert!(matches!(
        frame.filter(&Filter::new("size", Comparator::Lt, "XL")),
        Err(Error::InvalidOperand(_))
    ));

    assert_eq!(frame.filter(&Filter::new("kind", Comparator::Eq, "x"))?.len(), 2);
    assert!(matches!(
        frame.filter(&Filter::new("kind", Comparator::Lt, "y")),
        Err(Error::UnsupportedOperation {
            column_type: ColumnType::Enum,
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_parsed_comparators() -> Result<()> {
    let frame = Frame::new(vec![("n", Column::from(vec![1i64, 2, 3]))])?;
    let cmp: Comparator = "<=".parse()?;
    assert_eq!(frame.filter(&Filter::new("n", cmp, 2))?.len(), 2);
    assert!(matches!(
        "like".parse::<Comparator>(),
        Err(Error::InvalidOperand(_))
    ));
    Ok(())
}

#[test]
fn test_unknown_column_in_filter() -> Result<()> {
    let frame = Frame::new(vec![("n", Column::from(vec![1i64]))])?;
    assert_eq!(
        frame
            .filter(&Filter::new("missing", Comparator::Eq, 1))
            .unwrap_err(),
        Error::UnknownColumn("missing".to_string())
    );
    Ok(())
}

#[test]
fn test_ordering_filters_never_select_nan() -> Result<()> {
    let frame = Frame::new(vec![
        ("x", Column::from(vec![0.5, f64::NAN, 2.0, 4.0])),
        ("y", Column::from(vec![1.0, 1.0, f64::NAN, 3.0])),
    ])?;
    let above = frame.filter(&Filter::new("x", Comparator::Gt, 1.0))?;
    assert_eq!(above.index().as_slice(), &[2, 3]);
    let below = frame.filter(&Filter::new("x", Comparator::Lt, 3.0))?;
    assert_eq!(below.index().as_slice(), &[0, 2]);
    assert!(frame
        .filter(&Filter::new("x", Comparator::Lt, f64::NAN))?
        .is_empty());

    // nulls still match eq against each other and neq against numbers
    assert_eq!(
        frame
            .filter(&Filter::new("x", Comparator::Neq, 2.0))?
            .index()
            .as_slice(),
        &[0, 1, 3]
    );
    let ordered = frame.filter(&Filter::columns("x", Comparator::Lte, "y"))?;
    assert_eq!(ordered.index().as_slice(), &[0]);

    let ints = Frame::new(vec![("n", Column::from(vec![1i64, 2, 3]))])?;
    assert!(ints
        .filter(&Filter::new("n", Comparator::Gte, f64::NAN))?
        .is_empty());
    assert_eq!(
        ints.filter(&Filter::new("n", Comparator::Neq, f64::NAN))?.len(),
        3
    );
    Ok(())
}

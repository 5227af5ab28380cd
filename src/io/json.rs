use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde_json::{Map, Value as Json};

use crate::column::{Column, Float64Column, StringColumn};
use crate::error::{Error, Result};
use crate::frame::Frame;

/// JSON layout of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonOrient {
    /// `[{"col1": v, "col2": v}, ...]`
    Records,
    /// `{"col1": [v, ...], "col2": [v, ...]}`
    Columns,
}

/// Read a frame from a JSON file in either orientation
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let file = File::open(path.as_ref())?;
    let json: Json = serde_json::from_reader(BufReader::new(file))?;
    from_json_value(json)
}

/// Parse a frame from a JSON string in either orientation.
///
/// Column types are inferred from the first value of each column: integers give
/// an int column, other numbers a float column, booleans a bool column and strings
/// or null a string column. Columns are ordered by name.
pub fn from_json_str(json: &str) -> Result<Frame> {
    from_json_value(serde_json::from_str(json)?)
}

fn from_json_value(json: Json) -> Result<Frame> {
    match json {
        Json::Array(records) => read_records(records),
        Json::Object(columns) => read_columns(columns),
        _ => Err(Error::Json(
            "expected an array of records or an object of columns".to_string(),
        )),
    }
}

fn read_records(records: Vec<Json>) -> Result<Frame> {
    let first = match records.first() {
        None => return Frame::new(Vec::<(String, Column)>::new()),
        Some(Json::Object(first)) => first,
        Some(_) => return Err(Error::Json("records must be JSON objects".to_string())),
    };

    let mut columns = Vec::with_capacity(first.len());
    for name in first.keys() {
        let mut cells = Vec::with_capacity(records.len());
        for record in &records {
            match record {
                Json::Object(map) => cells.push(map.get(name).unwrap_or(&Json::Null)),
                _ => return Err(Error::Json("records must be JSON objects".to_string())),
            }
        }
        columns.push((name.clone(), build_column(name, &cells)?));
    }
    Frame::new(columns)
}

fn read_columns(map: Map<String, Json>) -> Result<Frame> {
    let mut columns = Vec::with_capacity(map.len());
    for (name, values) in &map {
        let cells: Vec<&Json> = match values {
            Json::Array(values) => values.iter().collect(),
            _ => {
                return Err(Error::Json(format!(
                    "column '{}' must be a JSON array",
                    name
                )))
            }
        };
        columns.push((name.clone(), build_column(name, &cells)?));
    }
    Frame::new(columns)
}

fn build_column(name: &str, cells: &[&Json]) -> Result<Column> {
    let mixed = |cell: &Json| {
        Error::Json(format!(
            "column '{}' mixes types, unexpected value {}",
            name, cell
        ))
    };

    match cells.first() {
        Some(Json::Number(n)) if n.is_i64() => cells
            .iter()
            .map(|&cell| cell.as_i64().ok_or_else(|| mixed(cell)))
            .collect::<Result<Vec<i64>>>()
            .map(Column::from),
        Some(Json::Number(_)) => cells
            .iter()
            .map(|&cell| match cell {
                Json::Null => Ok(f64::NAN),
                other => other.as_f64().ok_or_else(|| mixed(other)),
            })
            .collect::<Result<Vec<f64>>>()
            .map(|data| Column::Float64(Float64Column::new(data))),
        Some(Json::Bool(_)) => cells
            .iter()
            .map(|&cell| cell.as_bool().ok_or_else(|| mixed(cell)))
            .collect::<Result<Vec<bool>>>()
            .map(Column::from),
        _ => cells
            .iter()
            .map(|&cell| match cell {
                Json::Null => Ok(None),
                Json::String(s) => Ok(Some(s.as_str())),
                other => Err(mixed(other)),
            })
            .collect::<Result<Vec<Option<&str>>>>()
            .map(|data| Column::String(StringColumn::with_nulls(data))),
    }
}

/// Write a frame to a JSON file
pub fn write_json<P: AsRef<Path>>(frame: &Frame, path: P, orient: JsonOrient) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_json_value(frame, orient)?)?;
    Ok(())
}

/// Render a frame as a JSON string.
///
/// Enum cells are written as their category names; nulls and NaN become `null`.
pub fn to_json_string(frame: &Frame, orient: JsonOrient) -> Result<String> {
    Ok(serde_json::to_string(&to_json_value(frame, orient)?)?)
}

fn to_json_value(frame: &Frame, orient: JsonOrient) -> Result<Json> {
    match orient {
        JsonOrient::Records => {
            let mut records = Vec::with_capacity(frame.len());
            for row in 0..frame.len() {
                let mut record = Map::new();
                for name in frame.column_names() {
                    record.insert(name.clone(), serde_json::to_value(frame.value(name, row)?)?);
                }
                records.push(Json::Object(record));
            }
            Ok(Json::Array(records))
        }
        JsonOrient::Columns => {
            let mut columns = Map::new();
            for name in frame.column_names() {
                let values = (0..frame.len())
                    .map(|row| Ok(serde_json::to_value(frame.value(name, row)?)?))
                    .collect::<Result<Vec<Json>>>()?;
                columns.insert(name.clone(), Json::Array(values));
            }
            Ok(Json::Object(columns))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, EnumColumn};
    use crate::value::Value;

    #[test]
    fn test_read_records_infers_types() {
        let frame = from_json_str(
            r#"[{"n": 1, "x": 1.5, "b": true, "s": "a"},
                {"n": 2, "x": null, "b": false, "s": null}]"#,
        )
        .unwrap();
        assert_eq!(frame.column_names(), &["b", "n", "s", "x"]);
        assert_eq!(frame.column_type("n").unwrap(), ColumnType::Int64);
        assert_eq!(frame.column_type("x").unwrap(), ColumnType::Float64);
        assert_eq!(frame.column_type("b").unwrap(), ColumnType::Boolean);
        assert_eq!(frame.column_type("s").unwrap(), ColumnType::String);
        assert_eq!(frame.value("s", 1).unwrap(), Value::Null);
        assert!(frame.float_view("x").unwrap().get(1).unwrap().is_nan());
    }

    #[test]
    fn test_read_columns() {
        let frame = from_json_str(r#"{"a": [3, 4], "b": ["x", "y"]}"#).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.value("a", 1).unwrap(), Value::Int(4));
    }

    #[test]
    fn test_mixed_types_rejected() {
        let err = from_json_str(r#"[{"a": 1}, {"a": "x"}]"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(from_json_str("3").is_err());
    }

    #[test]
    fn test_write_records() {
        let frame = Frame::new(vec![
            ("e", Column::from(EnumColumn::new(vec![Some("lo"), None], None).unwrap())),
            ("f", Column::from(vec![f64::NAN, 2.5])),
        ])
        .unwrap();
        let json = to_json_string(&frame, JsonOrient::Records).unwrap();
        assert_eq!(json, r#"[{"e":"lo","f":null},{"e":null,"f":2.5}]"#);

        let json = to_json_string(&frame, JsonOrient::Columns).unwrap();
        assert_eq!(json, r#"{"e":["lo",null],"f":[null,2.5]}"#);
    }

    #[test]
    fn test_string_round_trip_keeps_values() {
        let frame = Frame::new(vec![
            ("id", Column::from(vec![1i64, 2])),
            ("name", Column::from(vec![Some("a"), None])),
        ])
        .unwrap();
        let json = to_json_string(&frame, JsonOrient::Records).unwrap();
        assert!(from_json_str(&json).unwrap().equals(&frame));
    }
}

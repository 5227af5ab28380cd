//! Conversion between frames and external formats

pub mod json;

pub use json::{from_json_str, read_json, to_json_string, write_json, JsonOrient};

//! Demographic JSON reading.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Read the demographic file as a list of raw JSON records.
///
/// Field extraction and validation happen in the demographic loader so that
/// a bad record is reported by index rather than as a decode error.
pub fn read_demographic_records(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let records = parse_demographic_records(&text).map_err(|err| match err {
        ParseFailure::Json(source) => IngestError::Json {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::NotAnArray => IngestError::NotAnArray {
            path: path.to_path_buf(),
        },
    })?;
    debug!(path = %path.display(), records = records.len(), "read demographic file");
    Ok(records)
}

/// Why a demographic document could not be turned into records.
#[derive(Debug)]
pub enum ParseFailure {
    Json(serde_json::Error),
    NotAnArray,
}

pub fn parse_demographic_records(text: &str) -> std::result::Result<Vec<Value>, ParseFailure> {
    match serde_json::from_str::<Value>(text).map_err(ParseFailure::Json)? {
        Value::Array(records) => Ok(records),
        _ => Err(ParseFailure::NotAnArray),
    }
}

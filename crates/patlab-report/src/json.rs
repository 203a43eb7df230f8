//! JSON rendering and writing of the patient document.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::document::PatientDataDocument;

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "patient_data.json";

const INDENT: &[u8] = b"    ";

/// Render the document as four-space indented JSON.
pub fn to_json_string(document: &PatientDataDocument) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    write_pretty(&mut buffer, document)?;
    String::from_utf8(buffer)
        .map_err(|err| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Parse a previously rendered document.
pub fn from_json_str(text: &str) -> serde_json::Result<PatientDataDocument> {
    serde_json::from_str(text)
}

/// Write the document to `path`, replacing any existing file.
pub fn write_document(path: &Path, document: &PatientDataDocument) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_pretty(&mut writer, document)
        .with_context(|| format!("serialize {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;
    info!(
        path = %path.display(),
        patients = document.patients.len(),
        results = document.result_count(),
        "output written"
    );
    Ok(())
}

fn write_pretty<W: Write>(writer: W, document: &PatientDataDocument) -> serde_json::Result<()> {
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)
}

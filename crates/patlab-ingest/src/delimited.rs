//! Delimited file reading.
//!
//! Rows are returned verbatim, header included: the lab table's header is
//! skipped by the grouper and the code table has none.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use patlab_model::SourceRow;

use crate::error::{IngestError, Result};

/// Options shared by both delimited inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter byte (default `,`).
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Read every record of a delimited file.
pub fn read_source_rows(path: &Path, options: IngestOptions) -> Result<Vec<SourceRow>> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let rows = parse_source_rows(file, options).map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), "read delimited file");
    Ok(rows)
}

/// Parse delimited records from any reader.
///
/// Records may differ in length; column-count rules belong to the consumer.
pub fn parse_source_rows<R: Read>(
    reader: R,
    options: IngestOptions,
) -> std::result::Result<Vec<SourceRow>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let fields = record
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                if idx == 0 {
                    value.trim_start_matches('\u{feff}').to_string()
                } else {
                    value.to_string()
                }
            })
            .collect::<Vec<_>>();
        rows.push(SourceRow { line, fields });
    }
    Ok(rows)
}

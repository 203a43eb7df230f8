//! Short code to standard code lookup.

use std::collections::BTreeMap;

use tracing::debug;

use patlab_model::{LabError, Result, SourceRow};

/// Number of columns in a code reference row.
const CODE_TABLE_COLUMNS: usize = 3;

/// Standard code and description a short code resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub standard_code: String,
    pub description: String,
}

/// Read-only mapping from lab short codes to standard codes.
#[derive(Debug, Clone, Default)]
pub struct CodeLookupTable {
    entries: BTreeMap<String, CodeEntry>,
}

impl CodeLookupTable {
    /// Build from `(short_code, standard_code, description)` rows.
    ///
    /// A repeated short code replaces the earlier entry.
    pub fn build<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for (short_code, standard_code, description) in rows {
            let short_code = short_code.into();
            let entry = CodeEntry {
                standard_code: standard_code.into(),
                description: description.into(),
            };
            if let Some(previous) = entries.insert(short_code.clone(), entry) {
                debug!(
                    short_code = %short_code,
                    replaced = %previous.standard_code,
                    "duplicate short code, last row wins"
                );
            }
        }
        Self { entries }
    }

    /// Build from delimited rows that must have exactly three columns.
    pub fn from_source_rows(rows: &[SourceRow]) -> Result<Self> {
        let mut triples = Vec::with_capacity(rows.len());
        for row in rows {
            match row.fields.as_slice() {
                [short_code, standard_code, description] => {
                    triples.push((short_code.as_str(), standard_code.as_str(), description.as_str()));
                }
                fields => {
                    return Err(LabError::malformed_row(
                        row.line,
                        format!(
                            "code table row has {} columns, expected {CODE_TABLE_COLUMNS}",
                            fields.len()
                        ),
                    ));
                }
            }
        }
        Ok(Self::build(triples))
    }

    pub fn get(&self, short_code: &str) -> Option<&CodeEntry> {
        self.entries.get(short_code)
    }

    /// Resolve a short code declared on source line `line`.
    pub fn resolve(&self, line: u64, short_code: &str) -> Result<&CodeEntry> {
        self.get(short_code).ok_or_else(|| LabError::UnknownCode {
            line,
            code: short_code.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by short code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }
}

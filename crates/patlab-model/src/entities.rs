//! Patient, result and analyte entities.
//!
//! The graph is a pure tree: a [`PatientIdentity`] owns its [`ResultBlock`]s
//! and each block owns its [`AnalyteEntry`] values. Nothing points back up,
//! so a serializer can walk it field by field.

use serde::{Deserialize, Serialize};

/// Hospital-internal patient identifier shared by demographics and lab rows.
pub type InternalId = i64;

/// A patient loaded from the demographic source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientIdentity {
    /// Internal id, unique within one load.
    pub internal_id: InternalId,
    /// Opaque external identifier (rendered as the output `id`).
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO 8601 date of birth, passed through unmodified.
    pub date_of_birth: String,
    /// Results attached by the assembler; empty until then.
    pub results: Vec<ResultBlock>,
}

impl PatientIdentity {
    pub fn new(
        internal_id: InternalId,
        external_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            internal_id,
            external_id: external_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: date_of_birth.into(),
            results: Vec::new(),
        }
    }

    /// Total analyte entries across all results.
    pub fn analyte_count(&self) -> usize {
        self.results.iter().map(|block| block.analytes.len()).sum()
    }
}

/// Name and code of the lab profile a sample was run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub code: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// One physical sample's measurement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBlock {
    /// Patient this block belongs to.
    pub internal_id: InternalId,
    /// ISO 8601 sample date (`YYYY-MM-DD`).
    pub timestamp: String,
    pub profile: Profile,
    /// Entries in source row order.
    pub analytes: Vec<AnalyteEntry>,
}

impl ResultBlock {
    pub fn new(internal_id: InternalId, timestamp: impl Into<String>, profile: Profile) -> Self {
        Self {
            internal_id,
            timestamp: timestamp.into(),
            profile,
            analytes: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: AnalyteEntry) {
        self.analytes.push(entry);
    }
}

/// A single analyte measurement inside a result block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyteEntry {
    pub standard_code: String,
    pub description: String,
    pub value: String,
    pub unit: String,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

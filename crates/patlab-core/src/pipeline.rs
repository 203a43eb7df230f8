//! In-memory merge pipeline.
//!
//! Runs the stages in order over already-read inputs:
//!
//! 1. Code lookup table and demographic loading (independent)
//! 2. Result grouping
//! 3. Assembly onto patients
//! 4. Assignment verification
//!
//! Any stage error aborts the run; no partial graph is returned.

use std::time::Instant;

use serde_json::Value;
use tracing::{info, info_span};

use patlab_model::{LabError, PatientIdentity, Result, SourceRow};

use crate::assemble::{assemble, verify_assignment};
use crate::demographics::load_patients;
use crate::grouper::group_rows_with_layout;
use crate::layout::RowLayout;
use crate::lookup::CodeLookupTable;

/// Raw inputs as read from disk.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    /// Lab table rows, header first.
    pub lab_rows: Vec<SourceRow>,
    /// Code reference rows (no header).
    pub code_rows: Vec<SourceRow>,
    /// Demographic records.
    pub demographic_records: Vec<Value>,
}

/// Counts describing a merged graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub codes: usize,
    pub data_rows: usize,
    pub patients: usize,
    pub patients_with_results: usize,
    pub results: usize,
    pub analytes: usize,
}

/// The assembled patient tree plus run counts.
#[derive(Debug, Clone)]
pub struct PatientGraph {
    pub patients: Vec<PatientIdentity>,
    pub stats: GraphStats,
}

/// Merge lab rows and demographics into the patient graph.
pub fn build_patient_graph(inputs: &PipelineInputs, layout: &RowLayout) -> Result<PatientGraph> {
    let lookup = info_span!("lookup", rows = inputs.code_rows.len())
        .in_scope(|| CodeLookupTable::from_source_rows(&inputs.code_rows))?;

    let load_start = Instant::now();
    let mut patients = info_span!("demographics", records = inputs.demographic_records.len())
        .in_scope(|| load_patients(&inputs.demographic_records))?;
    info!(
        patients = patients.len(),
        duration_ms = load_start.elapsed().as_millis(),
        "demographics complete"
    );

    let group_start = Instant::now();
    let grouped = group_rows_with_layout(&inputs.lab_rows, &lookup, layout)?;
    info!(
        duration_ms = group_start.elapsed().as_millis(),
        "group complete"
    );

    info_span!("assemble").in_scope(|| assemble(&mut patients, grouped))?;

    let violations = verify_assignment(&patients);
    if !violations.is_empty() {
        return Err(LabError::Inconsistent {
            violations: violations.iter().map(ToString::to_string).collect(),
        });
    }

    let stats = GraphStats {
        codes: lookup.len(),
        data_rows: inputs.lab_rows.len().saturating_sub(1),
        patients: patients.len(),
        patients_with_results: patients
            .iter()
            .filter(|patient| !patient.results.is_empty())
            .count(),
        results: patients.iter().map(|patient| patient.results.len()).sum(),
        analytes: patients.iter().map(PatientIdentity::analyte_count).sum(),
    };
    info!(
        patients = stats.patients,
        results = stats.results,
        analytes = stats.analytes,
        "patient graph built"
    );
    Ok(PatientGraph { patients, stats })
}

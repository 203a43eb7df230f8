//! Merge logic for lab results and patient demographics.
//!
//! The stages mirror the data flow:
//!
//! - [`lookup`]: short code to standard code/description table
//! - [`demographics`]: patient identities from demographic records
//! - [`grouper`]: analyte rows grouped into per-sample result blocks
//! - [`assemble`]: result blocks attached to their patients
//! - [`pipeline`]: all of the above over in-memory inputs

#![deny(unsafe_code)]

pub mod assemble;
pub mod date;
pub mod demographics;
pub mod grouper;
pub mod layout;
pub mod lookup;
pub mod phi;
pub mod pipeline;

pub use assemble::{AssignmentViolation, assemble, verify_assignment};
pub use date::normalize_sample_date;
pub use demographics::load_patients;
pub use grouper::{GroupedResults, ResultGrouper, group_rows, group_rows_with_layout};
pub use layout::RowLayout;
pub use lookup::{CodeEntry, CodeLookupTable};
pub use pipeline::{GraphStats, PatientGraph, PipelineInputs, build_patient_graph};

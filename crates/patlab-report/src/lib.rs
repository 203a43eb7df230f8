//! Output generation for the merged patient graph.
//!
//! The graph is rendered as one JSON document with a top-level `patients`
//! array. [`PatientDataDocument`] is the owned output shape; it parses back
//! into an equal value, so written files can be re-read for checks.

mod document;
mod json;

pub use document::{
    PanelDocument, PatientDataDocument, PatientDocument, ProfileDocument, ResultDocument,
};
pub use json::{DEFAULT_OUTPUT_FILE, from_json_str, to_json_string, write_document};

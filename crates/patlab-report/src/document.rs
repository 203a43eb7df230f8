use serde::{Deserialize, Serialize};

use patlab_model::{AnalyteEntry, PatientIdentity, Profile, ResultBlock};

/// Top-level output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDataDocument {
    pub patients: Vec<PatientDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDocument {
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub dob: String,
    /// External identifier.
    pub id: String,
    pub lab_results: Vec<ResultDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub timestamp: String,
    pub profile: ProfileDocument,
    pub panel: Vec<PanelDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub name: String,
    pub code: String,
}

/// One analyte; absent bounds serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDocument {
    /// Standard code.
    pub code: String,
    /// Description of the standard code.
    pub label: String,
    pub value: String,
    pub unit: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl PatientDataDocument {
    pub fn from_patients(patients: &[PatientIdentity]) -> Self {
        Self {
            patients: patients.iter().map(PatientDocument::from).collect(),
        }
    }

    pub fn result_count(&self) -> usize {
        self.patients
            .iter()
            .map(|patient| patient.lab_results.len())
            .sum()
    }
}

impl From<&PatientIdentity> for PatientDocument {
    fn from(patient: &PatientIdentity) -> Self {
        Self {
            last_name: patient.last_name.clone(),
            first_name: patient.first_name.clone(),
            dob: patient.date_of_birth.clone(),
            id: patient.external_id.clone(),
            lab_results: patient.results.iter().map(ResultDocument::from).collect(),
        }
    }
}

impl From<&ResultBlock> for ResultDocument {
    fn from(block: &ResultBlock) -> Self {
        Self {
            timestamp: block.timestamp.clone(),
            profile: ProfileDocument::from(&block.profile),
            panel: block.analytes.iter().map(PanelDocument::from).collect(),
        }
    }
}

impl From<&Profile> for ProfileDocument {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            code: profile.code.clone(),
        }
    }
}

impl From<&AnalyteEntry> for PanelDocument {
    fn from(entry: &AnalyteEntry) -> Self {
        Self {
            code: entry.standard_code.clone(),
            label: entry.description.clone(),
            value: entry.value.clone(),
            unit: entry.unit.clone(),
            lower: entry.lower_bound,
            upper: entry.upper_bound,
        }
    }
}

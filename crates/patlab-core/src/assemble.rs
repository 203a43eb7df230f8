//! Attaching grouped result blocks to patients.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{info, warn};

use patlab_model::{InternalId, LabError, PatientIdentity, Result};

use crate::grouper::GroupedResults;

/// Replace each patient's results with the blocks grouped under its id.
///
/// Patients without grouped blocks get an empty list. Blocks whose id
/// matches no patient fail with [`LabError::OrphanResult`]; the check runs
/// before any patient is touched, so on error `patients` is unchanged.
pub fn assemble(patients: &mut [PatientIdentity], mut grouped: GroupedResults) -> Result<()> {
    let known: BTreeSet<InternalId> = patients.iter().map(|patient| patient.internal_id).collect();

    let mut orphans = grouped
        .iter()
        .filter(|(internal_id, _)| !known.contains(*internal_id));
    if let Some((&internal_id, blocks)) = orphans.next() {
        let others = orphans.count();
        warn!(
            internal_id,
            blocks = blocks.len(),
            other_orphan_patients = others,
            "result blocks reference an unknown patient"
        );
        return Err(LabError::OrphanResult {
            internal_id,
            blocks: blocks.len(),
        });
    }

    let mut attached = 0usize;
    for patient in patients.iter_mut() {
        patient.results = grouped.remove(&patient.internal_id).unwrap_or_default();
        attached += patient.results.len();
    }
    info!(patients = patients.len(), blocks = attached, "results assembled");
    Ok(())
}

/// A block that sits under the wrong patient or holds no analytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentViolation {
    ForeignBlock {
        patient: InternalId,
        block_owner: InternalId,
        index: usize,
    },
    EmptyBlock {
        patient: InternalId,
        index: usize,
    },
}

impl fmt::Display for AssignmentViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignBlock {
                patient,
                block_owner,
                index,
            } => write!(
                f,
                "patient {patient} result {index} belongs to patient {block_owner}"
            ),
            Self::EmptyBlock { patient, index } => {
                write!(f, "patient {patient} result {index} has no analytes")
            }
        }
    }
}

/// Walk the assembled graph and report every misplaced or empty block.
pub fn verify_assignment(patients: &[PatientIdentity]) -> Vec<AssignmentViolation> {
    let mut violations = Vec::new();
    for patient in patients {
        for (index, block) in patient.results.iter().enumerate() {
            if block.internal_id != patient.internal_id {
                violations.push(AssignmentViolation::ForeignBlock {
                    patient: patient.internal_id,
                    block_owner: block.internal_id,
                    index,
                });
            }
            if block.analytes.is_empty() {
                violations.push(AssignmentViolation::EmptyBlock {
                    patient: patient.internal_id,
                    index,
                });
            }
        }
    }
    violations
}

use thiserror::Error;

use crate::InternalId;

/// Fatal conditions raised while merging lab rows into the patient graph.
///
/// Every variant carries enough position information (source line or record
/// index) and the offending key to diagnose the input.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("line {line}: unknown short code {code:?}")]
    UnknownCode { line: u64, code: String },

    #[error("line {line}: sample {sample_id:?} declares code {code:?} but no value is given for it")]
    MissingValue {
        line: u64,
        sample_id: String,
        code: String,
    },

    #[error("line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("patient record {index}: {message}")]
    MalformedRecord { index: usize, message: String },

    #[error("{blocks} result block(s) reference unknown patient {internal_id}")]
    OrphanResult {
        internal_id: InternalId,
        blocks: usize,
    },

    #[error("patient graph is inconsistent: {}", violations.join("; "))]
    Inconsistent { violations: Vec<String> },
}

/// Error category without payload, for callers that branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabErrorKind {
    UnknownCode,
    MissingValue,
    MalformedRow,
    MalformedRecord,
    OrphanResult,
    Inconsistent,
}

impl LabError {
    pub fn kind(&self) -> LabErrorKind {
        match self {
            Self::UnknownCode { .. } => LabErrorKind::UnknownCode,
            Self::MissingValue { .. } => LabErrorKind::MissingValue,
            Self::MalformedRow { .. } => LabErrorKind::MalformedRow,
            Self::MalformedRecord { .. } => LabErrorKind::MalformedRecord,
            Self::OrphanResult { .. } => LabErrorKind::OrphanResult,
            Self::Inconsistent { .. } => LabErrorKind::Inconsistent,
        }
    }

    pub fn malformed_row(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            message: message.into(),
        }
    }

    pub fn malformed_record(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabError>;

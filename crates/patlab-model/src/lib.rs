pub mod entities;
pub mod error;
pub mod row;

pub use entities::{AnalyteEntry, InternalId, PatientIdentity, Profile, ResultBlock};
pub use error::{LabError, LabErrorKind, Result};
pub use row::SourceRow;

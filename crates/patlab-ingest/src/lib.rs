//! Input loading for the lab-result merge.
//!
//! Everything here is plain file I/O: delimited files become
//! [`SourceRow`](patlab_model::SourceRow)s and the demographic file becomes a
//! list of JSON records. Interpreting either is the job of `patlab-core`.

#![deny(unsafe_code)]

pub mod delimited;
pub mod demographics;
pub mod error;
pub mod hash;

pub use delimited::{IngestOptions, parse_source_rows, read_source_rows};
pub use demographics::{parse_demographic_records, read_demographic_records};
pub use error::{IngestError, Result};
pub use hash::{sha256_file, sha256_hex};

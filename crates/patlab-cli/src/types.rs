use std::path::PathBuf;

use patlab_core::GraphStats;

/// Outcome of a `convert` run.
#[derive(Debug)]
pub struct ConvertResult {
    pub inputs: Vec<InputSummary>,
    pub stats: GraphStats,
    /// Written document; `None` on a dry run.
    pub output: Option<PathBuf>,
}

/// One input file as seen by the run.
#[derive(Debug)]
pub struct InputSummary {
    pub role: &'static str,
    pub path: PathBuf,
    pub records: usize,
    pub sha256: String,
}

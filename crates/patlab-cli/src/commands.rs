use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use patlab_core::{CodeLookupTable, PipelineInputs, RowLayout, build_patient_graph};
use patlab_ingest::{IngestOptions, read_demographic_records, read_source_rows, sha256_file};
use patlab_report::{PatientDataDocument, write_document};

use crate::cli::{CodesArgs, ConvertArgs};
use crate::summary::print_code_table;
use crate::types::{ConvertResult, InputSummary};

pub fn run_codes(args: &CodesArgs) -> Result<()> {
    let options = ingest_options(args.delimiter)?;
    let rows = read_source_rows(&args.code_table, options).context("read code table")?;
    let lookup = CodeLookupTable::from_source_rows(&rows).context("build code table")?;
    print_code_table(&lookup);
    Ok(())
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let convert_span = info_span!("convert", dry_run = args.dry_run);
    let _convert_guard = convert_span.enter();
    let options = ingest_options(args.delimiter)?;

    // =========================================================================
    // Stage 1: Ingest - read all three inputs into memory
    // =========================================================================
    let ingest_start = Instant::now();
    let (inputs, summaries) = info_span!("ingest").in_scope(|| ingest(args, options))?;
    info!(
        lab_rows = inputs.lab_rows.len(),
        code_rows = inputs.code_rows.len(),
        patients = inputs.demographic_records.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2: Merge - lookup, demographics, grouping, assembly
    // =========================================================================
    let graph = build_patient_graph(&inputs, &RowLayout::default())
        .context("merge lab results with demographics")?;

    // =========================================================================
    // Stage 3: Output
    // =========================================================================
    let document = PatientDataDocument::from_patients(&graph.patients);
    let output = if args.dry_run {
        info!(path = %args.output.display(), "dry run, output not written");
        None
    } else {
        let output_start = Instant::now();
        info_span!("output", path = %args.output.display())
            .in_scope(|| write_document(&args.output, &document))?;
        info!(
            duration_ms = output_start.elapsed().as_millis(),
            "output complete"
        );
        Some(args.output.clone())
    };

    Ok(ConvertResult {
        inputs: summaries,
        stats: graph.stats,
        output,
    })
}

fn ingest(args: &ConvertArgs, options: IngestOptions) -> Result<(PipelineInputs, Vec<InputSummary>)> {
    let lab_rows = read_source_rows(&args.lab_results, options).context("read lab results")?;
    let code_rows = read_source_rows(&args.code_table, options).context("read code table")?;
    let demographic_records =
        read_demographic_records(&args.patients).context("read patient demographics")?;

    let summaries = vec![
        input_summary("lab results", &args.lab_results, lab_rows.len())?,
        input_summary("code table", &args.code_table, code_rows.len())?,
        input_summary("patients", &args.patients, demographic_records.len())?,
    ];
    let inputs = PipelineInputs {
        lab_rows,
        code_rows,
        demographic_records,
    };
    Ok((inputs, summaries))
}

fn input_summary(role: &'static str, path: &Path, records: usize) -> Result<InputSummary> {
    let sha256 = sha256_file(path).with_context(|| format!("fingerprint {}", path.display()))?;
    Ok(InputSummary {
        role,
        path: path.to_path_buf(),
        records,
        sha256,
    })
}

fn ingest_options(delimiter: char) -> Result<IngestOptions> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {delimiter:?}");
    }
    Ok(IngestOptions::default().with_delimiter(delimiter as u8))
}

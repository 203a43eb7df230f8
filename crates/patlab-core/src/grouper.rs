//! Grouping of analyte rows into per-sample result blocks.
//!
//! Each data row of the lab table describes one analyte. Rows of the same
//! physical sample are contiguous and share a sample id, so a block boundary
//! is simply a change of sample id between consecutive rows.
//!
//! [`ResultGrouper`] is a two-state machine:
//!
//! - `Idle`: no block open (before the first data row)
//! - `Open`: a block is accumulating entries
//!
//! [`ResultGrouper::push`] appends to the open block, or finalizes it and
//! opens a new one when the sample id changes. [`ResultGrouper::finish`]
//! finalizes the last open block at end of input. A block's patient id,
//! timestamp and profile are those of the last row pushed into it.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, info_span, trace, warn};

use patlab_model::{AnalyteEntry, InternalId, LabError, Profile, Result, ResultBlock, SourceRow};

use crate::date::normalize_sample_date;
use crate::layout::RowLayout;
use crate::lookup::CodeLookupTable;
use crate::phi::redact_value;

/// Result blocks per patient, each list in first-occurrence order.
pub type GroupedResults = BTreeMap<InternalId, Vec<ResultBlock>>;

/// Group the lab table with the default column layout.
///
/// The first row is the header and is skipped unconditionally.
pub fn group_rows(rows: &[SourceRow], lookup: &CodeLookupTable) -> Result<GroupedResults> {
    group_rows_with_layout(rows, lookup, &RowLayout::default())
}

/// Group the lab table with an explicit column layout.
pub fn group_rows_with_layout(
    rows: &[SourceRow],
    lookup: &CodeLookupTable,
    layout: &RowLayout,
) -> Result<GroupedResults> {
    let span = info_span!("group", rows = rows.len());
    let _guard = span.enter();

    let mut grouper = ResultGrouper::new(lookup, layout);
    for row in rows.iter().skip(1) {
        grouper.push(row)?;
    }
    let data_rows = grouper.rows_seen();
    let grouped = grouper.finish();

    info!(
        data_rows,
        blocks = grouped.values().map(Vec::len).sum::<usize>(),
        patients = grouped.len(),
        "grouping complete"
    );
    Ok(grouped)
}

/// A data row after parsing and code resolution.
#[derive(Debug)]
struct AnalyteRow {
    line: u64,
    internal_id: InternalId,
    sample_id: String,
    timestamp: String,
    profile: Profile,
    entry: AnalyteEntry,
}

#[derive(Debug)]
struct OpenBlock {
    sample_id: String,
    opened_at: u64,
    block: ResultBlock,
}

#[derive(Debug, Default)]
enum GroupState {
    #[default]
    Idle,
    Open(OpenBlock),
}

/// Sequential, single-pass grouping state.
#[derive(Debug)]
pub struct ResultGrouper<'a> {
    lookup: &'a CodeLookupTable,
    layout: &'a RowLayout,
    state: GroupState,
    grouped: GroupedResults,
    finalized_samples: HashSet<String>,
    rows_seen: usize,
}

impl<'a> ResultGrouper<'a> {
    pub fn new(lookup: &'a CodeLookupTable, layout: &'a RowLayout) -> Self {
        Self {
            lookup,
            layout,
            state: GroupState::Idle,
            grouped: GroupedResults::new(),
            finalized_samples: HashSet::new(),
            rows_seen: 0,
        }
    }

    /// Feed one data row (never the header).
    pub fn push(&mut self, row: &SourceRow) -> Result<()> {
        let parsed = self.parse_row(row)?;
        self.rows_seen += 1;

        if let GroupState::Open(open) = &mut self.state
            && open.sample_id == parsed.sample_id
        {
            refresh_header(&mut open.block, parsed);
            return Ok(());
        }

        self.finalize_open();
        self.open(parsed);
        Ok(())
    }

    /// Data rows accepted so far.
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    /// Finalize the last open block and return the grouped results.
    pub fn finish(mut self) -> GroupedResults {
        self.finalize_open();
        self.grouped
    }

    fn open(&mut self, row: AnalyteRow) {
        if self.finalized_samples.contains(&row.sample_id) {
            warn!(
                line = row.line,
                sample_id = %row.sample_id,
                "sample id reappears after other samples; rows are not contiguous"
            );
        }
        trace!(line = row.line, sample_id = %row.sample_id, "block opened");
        let mut block = ResultBlock::new(row.internal_id, row.timestamp, row.profile);
        block.push(row.entry);
        self.state = GroupState::Open(OpenBlock {
            sample_id: row.sample_id,
            opened_at: row.line,
            block,
        });
    }

    fn finalize_open(&mut self) {
        if let GroupState::Open(open) = std::mem::take(&mut self.state) {
            debug!(
                sample_id = %open.sample_id,
                opened_at = open.opened_at,
                internal_id = open.block.internal_id,
                analytes = open.block.analytes.len(),
                "block finalized"
            );
            self.grouped
                .entry(open.block.internal_id)
                .or_default()
                .push(open.block);
            self.finalized_samples.insert(open.sample_id);
        }
    }

    fn parse_row(&self, row: &SourceRow) -> Result<AnalyteRow> {
        let layout = self.layout;
        let line = row.line;
        let min_columns = layout.min_columns();
        if row.len() < min_columns {
            return Err(LabError::malformed_row(
                line,
                format!("expected {min_columns} columns, found {}", row.len()),
            ));
        }
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let raw_id = field(layout.patient_id);
        let internal_id = raw_id.trim().parse::<InternalId>().map_err(|_| {
            LabError::malformed_row(line, format!("patient id {raw_id:?} is not an integer"))
        })?;
        let sample_id = field(layout.sample_id).to_string();

        let raw_date = field(layout.date);
        let timestamp = normalize_sample_date(raw_date).ok_or_else(|| {
            LabError::malformed_row(line, format!("date {raw_date:?} is not DD/MM/YYYY"))
        })?;

        let code = field(layout.code);
        let resolved = self.lookup.resolve(line, code)?;

        let pairs = self.window_pairs(row)?;
        let value = pairs
            .get(code)
            .ok_or_else(|| LabError::MissingValue {
                line,
                sample_id: sample_id.clone(),
                code: code.to_string(),
            })?
            .to_string();
        trace!(line, code, value = redact_value(&value), "analyte value");

        let entry = AnalyteEntry {
            standard_code: resolved.standard_code.clone(),
            description: resolved.description.clone(),
            value,
            unit: field(layout.unit).to_string(),
            lower_bound: parse_bound(line, "lower", field(layout.lower_bound))?,
            upper_bound: parse_bound(line, "upper", field(layout.upper_bound))?,
        };

        Ok(AnalyteRow {
            line,
            internal_id,
            sample_id,
            timestamp,
            profile: Profile::new(field(layout.profile_name), field(layout.profile_code)),
            entry,
        })
    }

    /// Short code to value map from the row's `shortcode~value` window.
    fn window_pairs<'r>(&self, row: &'r SourceRow) -> Result<HashMap<&'r str, &'r str>> {
        let mut pairs = HashMap::new();
        for idx in self.layout.value_window.clone() {
            let cell = row.get(idx).unwrap_or("");
            if cell.trim().is_empty() {
                continue;
            }
            let (code, value) = cell.split_once(self.layout.pair_separator).ok_or_else(|| {
                LabError::malformed_row(
                    row.line,
                    format!(
                        "column {idx} has no '{}' separator",
                        self.layout.pair_separator
                    ),
                )
            })?;
            pairs.insert(code, value);
        }
        Ok(pairs)
    }
}

/// Add a same-sample row to its block; the block header follows the latest row.
fn refresh_header(block: &mut ResultBlock, row: AnalyteRow) {
    if block.internal_id != row.internal_id {
        warn!(
            line = row.line,
            sample_id = %row.sample_id,
            block_patient = block.internal_id,
            row_patient = row.internal_id,
            "patient id changes inside a sample block"
        );
    }
    if block.timestamp != row.timestamp || block.profile != row.profile {
        warn!(
            line = row.line,
            sample_id = %row.sample_id,
            block_timestamp = %block.timestamp,
            row_timestamp = %row.timestamp,
            block_profile = %block.profile.code,
            row_profile = %row.profile.code,
            "date or profile changes inside a sample block"
        );
    }
    block.internal_id = row.internal_id;
    block.timestamp = row.timestamp;
    block.profile = row.profile;
    block.push(row.entry);
}

/// Empty means absent; anything else must be a finite number.
fn parse_bound(line: u64, which: &str, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(LabError::malformed_row(
            line,
            format!("{which} bound {raw:?} is not a number"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patlab_model::LabErrorKind;

    fn data_row(line: u64, patient: &str, sample: &str, code: &str, cells: &[&str]) -> SourceRow {
        let mut fields = vec![String::new(); 34];
        fields[0] = patient.to_string();
        fields[1] = sample.to_string();
        fields[2] = "05/03/2017".to_string();
        fields[3] = "Electrolytes".to_string();
        fields[4] = "ELEC".to_string();
        for (offset, cell) in cells.iter().enumerate() {
            fields[5 + offset] = (*cell).to_string();
        }
        fields[30] = code.to_string();
        fields[31] = "mmol/L".to_string();
        SourceRow { line, fields }
    }

    fn table() -> CodeLookupTable {
        CodeLookupTable::build([("C1", "S1", "Sodium"), ("C2", "S2", "Potassium")])
    }

    #[test]
    fn state_machine_opens_and_finishes() {
        let lookup = table();
        let layout = RowLayout::default();
        let mut grouper = ResultGrouper::new(&lookup, &layout);
        grouper
            .push(&data_row(2, "7", "A", "C1", &["C1~140"]))
            .unwrap();
        assert!(matches!(grouper.state, GroupState::Open(_)));
        assert!(grouper.grouped.is_empty());

        grouper.push(&data_row(3, "7", "B", "C2", &["C2~4.1"])).unwrap();
        assert_eq!(grouper.grouped[&7].len(), 1);

        let grouped = grouper.finish();
        assert_eq!(grouped[&7].len(), 2);
        assert_eq!(grouped[&7][1].analytes[0].value, "4.1");
    }

    #[test]
    fn finish_without_rows_is_empty() {
        let lookup = table();
        let layout = RowLayout::default();
        assert!(ResultGrouper::new(&lookup, &layout).finish().is_empty());
    }

    #[test]
    fn window_cell_without_separator_is_malformed() {
        let lookup = table();
        let layout = RowLayout::default();
        let mut grouper = ResultGrouper::new(&lookup, &layout);
        let err = grouper
            .push(&data_row(2, "7", "A", "C1", &["C1~140", "oops"]))
            .unwrap_err();
        assert_eq!(err.kind(), LabErrorKind::MalformedRow);
        assert!(err.to_string().contains("column 6"));
    }

    #[test]
    fn value_keeps_later_separators() {
        let lookup = table();
        let layout = RowLayout::default();
        let mut grouper = ResultGrouper::new(&lookup, &layout);
        grouper
            .push(&data_row(2, "7", "A", "C1", &["C1~<5~flag"]))
            .unwrap();
        let grouped = grouper.finish();
        assert_eq!(grouped[&7][0].analytes[0].value, "<5~flag");
    }

    #[test]
    fn bounds_parse() {
        assert_eq!(parse_bound(1, "lower", "").unwrap(), None);
        assert_eq!(parse_bound(1, "lower", "  ").unwrap(), None);
        assert_eq!(parse_bound(1, "lower", "0").unwrap(), Some(0.0));
        assert_eq!(parse_bound(1, "upper", " 3.5 ").unwrap(), Some(3.5));
        assert!(parse_bound(1, "upper", "high").is_err());
        assert!(parse_bound(1, "upper", "NaN").is_err());
    }
}

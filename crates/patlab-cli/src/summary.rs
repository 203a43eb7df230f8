use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use patlab_core::CodeLookupTable;

use crate::types::ConvertResult;

/// Characters of each SHA-256 shown in the input table.
const FINGERPRINT_WIDTH: usize = 12;

pub fn print_summary(result: &ConvertResult) {
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }

    let mut inputs = Table::new();
    inputs.set_header(vec![
        header_cell("Input"),
        header_cell("Path"),
        header_cell("Records"),
        header_cell("SHA-256"),
    ]);
    apply_summary_table_style(&mut inputs);
    align_column(&mut inputs, 2, CellAlignment::Right);
    for input in &result.inputs {
        inputs.add_row(vec![
            Cell::new(input.role)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(input.path.display()),
            Cell::new(input.records),
            dim_cell(short_fingerprint(&input.sha256)),
        ]);
    }
    println!("{inputs}");

    let stats = &result.stats;
    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Item"), header_cell("Count")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    for (label, value) in [
        ("Codes", stats.codes),
        ("Lab rows", stats.data_rows),
        ("Patients", stats.patients),
        ("Patients with results", stats.patients_with_results),
        ("Results", stats.results),
        ("Analytes", stats.analytes),
    ] {
        counts.add_row(vec![Cell::new(label), count_cell(value)]);
    }
    println!("{counts}");
}

pub fn print_code_table(lookup: &CodeLookupTable) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Short code"),
        header_cell("Standard code"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for (short_code, entry) in lookup.iter() {
        table.add_row(vec![
            Cell::new(short_code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.standard_code),
            Cell::new(&entry.description),
        ]);
    }
    println!("{table}");
    println!("{} codes", lookup.len());
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn short_fingerprint(sha256: &str) -> &str {
    sha256.get(..FINGERPRINT_WIDTH).unwrap_or(sha256)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_are_shortened() {
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint("abc"), "abc");
    }
}

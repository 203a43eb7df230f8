//! Column layout of the lab-result table.

use std::ops::RangeInclusive;

/// Zero-based column positions of the 34-column analyte table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub patient_id: usize,
    pub sample_id: usize,
    pub date: usize,
    pub profile_name: usize,
    pub profile_code: usize,
    /// Cells holding optional `shortcode~value` pairs.
    pub value_window: RangeInclusive<usize>,
    /// The row's own short code.
    pub code: usize,
    pub unit: usize,
    pub lower_bound: usize,
    pub upper_bound: usize,
    /// Separator between short code and value inside a window cell.
    pub pair_separator: char,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            patient_id: 0,
            sample_id: 1,
            date: 2,
            profile_name: 3,
            profile_code: 4,
            value_window: 5..=29,
            code: 30,
            unit: 31,
            lower_bound: 32,
            upper_bound: 33,
            pair_separator: '~',
        }
    }
}

impl RowLayout {
    /// Smallest column count a data row must have.
    pub fn min_columns(&self) -> usize {
        [
            self.patient_id,
            self.sample_id,
            self.date,
            self.profile_name,
            self.profile_code,
            *self.value_window.end(),
            self.code,
            self.unit,
            self.lower_bound,
            self.upper_bound,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

//! Row Selector
//!
//! Lookups by code or display label, membership filtering, and the stable
//! ascending ranking that every bar view is drawn from.

use std::collections::HashSet;

use crate::error::{DashError, DashResult};
use crate::types::{CountryRecord, RateField};

const PANEL: &str = "primary panel";

/// Position of the single row labelled `name`
pub fn find_by_name(rows: &[CountryRecord], name: &str) -> DashResult<usize> {
    unique_position(rows, name, |row| row.display_name == name)
}

/// Position of the single row with `code`
pub fn find_by_code(rows: &[CountryRecord], code: &str) -> DashResult<usize> {
    unique_position(rows, code, |row| row.country_code == code)
}

fn unique_position<F>(rows: &[CountryRecord], key: &str, matches: F) -> DashResult<usize>
where
    F: Fn(&CountryRecord) -> bool,
{
    let mut hits = rows.iter().enumerate().filter(|(_, row)| matches(row)).map(|(i, _)| i);
    let first = hits.next().ok_or_else(|| DashError::not_found(key, PANEL))?;
    if hits.next().is_some() {
        return Err(DashError::data_contract(format!(
            "'{}' matches more than one row of the {}",
            key, PANEL
        )));
    }
    Ok(first)
}

/// Rows for `codes`, in the order the caller listed them
pub fn select_codes<S: AsRef<str>>(rows: &[CountryRecord], codes: &[S]) -> DashResult<Vec<CountryRecord>> {
    codes
        .iter()
        .map(|code| find_by_code(rows, code.as_ref()).map(|idx| rows[idx].clone()))
        .collect()
}

/// Rows whose code is in `codes`, in panel order
pub fn filter_by_codes<S: AsRef<str>>(rows: &[CountryRecord], codes: &[S]) -> Vec<CountryRecord> {
    let wanted: HashSet<&str> = codes.iter().map(|code| code.as_ref()).collect();
    rows.iter()
        .filter(|row| wanted.contains(row.country_code.as_str()))
        .cloned()
        .collect()
}

/// Copy of `rows` sorted ascending by `field`; ties keep panel order
pub fn rank(rows: &[CountryRecord], field: RateField) -> Vec<CountryRecord> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| a.rate(field).total_cmp(&b.rate(field)));
    ranked
}

/// Named positions in a ranked sequence, used to place the reference line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub bottom: usize,
    pub mid: usize,
    pub top: usize,
}

impl Anchors {
    pub fn of(len: usize) -> DashResult<Self> {
        if len == 0 {
            return Err(DashError::invalid_input(
                "Cannot anchor a reference line on an empty row set",
                "Select at least one row",
            ));
        }
        Ok(Self {
            bottom: 0,
            mid: len / 2,
            top: len - 1,
        })
    }

    pub fn names(&self, rows: &[CountryRecord]) -> [String; 3] {
        [
            rows[self.bottom].display_name.clone(),
            rows[self.mid].display_name.clone(),
            rows[self.top].display_name.clone(),
        ]
    }
}

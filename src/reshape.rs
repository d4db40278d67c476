//! Wide-to-long reshape

use serde::Serialize;

use crate::types::{CountryRecord, RateField};

/// One (entity, variable) point of a melted table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LongRecord {
    pub country_code: String,
    pub display_name: String,
    pub variable: String,
    pub value: f64,
}

/// A melted point whose id columns are whatever the caller projected
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Melted<I> {
    pub id: I,
    pub variable: String,
    pub value: f64,
}

/// Melt `rows` over `value_fields`, carrying `id(row)` as the id columns.
///
/// Output is grouped by source row, and within a row follows `value_fields`,
/// so each entity occupies one contiguous block of `value_fields.len()` records.
pub fn melt_by<I, F>(rows: &[CountryRecord], value_fields: &[RateField], id: F) -> Vec<Melted<I>>
where
    I: Clone,
    F: Fn(&CountryRecord) -> I,
{
    let mut long = Vec::with_capacity(rows.len() * value_fields.len());
    for row in rows {
        let key = id(row);
        for field in value_fields {
            long.push(Melted {
                id: key.clone(),
                variable: field.label().to_string(),
                value: row.rate(*field),
            });
        }
    }
    long
}

/// Melt with code and display name as the id columns, the shape every chart uses
pub fn melt(rows: &[CountryRecord], value_fields: &[RateField]) -> Vec<LongRecord> {
    melt_by(rows, value_fields, |row| {
        (row.country_code.clone(), row.display_name.clone())
    })
    .into_iter()
    .map(|point| LongRecord {
        country_code: point.id.0,
        display_name: point.id.1,
        variable: point.variable,
        value: point.value,
    })
    .collect()
}

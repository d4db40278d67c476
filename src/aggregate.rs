//! Weighted Aggregator

use crate::error::{DashError, DashResult};
use crate::types::{CountryRecord, RateField, Rates};

/// Importance-weighted mean of `field`: Σ(wᵢ·rᵢ) / Σwᵢ
pub fn weighted_mean(rows: &[CountryRecord], field: RateField) -> DashResult<f64> {
    if rows.is_empty() {
        return Err(DashError::invalid_input(
            format!("Cannot average {} over an empty row set", field),
            "Pass the panel rows that are plotted",
        ));
    }

    let (weighted, total) = rows.iter().fold((0.0, 0.0), |(weighted, total), row| {
        (weighted + row.weight * row.rate(field), total + row.weight)
    });

    if total == 0.0 {
        return Err(DashError::invalid_input(
            format!("Weights sum to zero while averaging {}", field),
            "Every primary row needs a positive weight",
        ));
    }

    Ok(weighted / total)
}

/// Synthetic row holding the weighted mean of every rate column,
/// rounded to `decimals` places the way the published averages are
pub fn average_record(
    rows: &[CountryRecord],
    code: &str,
    name: &str,
    decimals: u32,
) -> DashResult<CountryRecord> {
    let scale = 10f64.powi(decimals as i32);
    let mut rates = Rates::default();
    for field in RateField::all() {
        let mean = weighted_mean(rows, field)?;
        rates.set(field, (mean * scale).round() / scale);
    }
    let total_weight: f64 = rows.iter().map(|row| row.weight).sum();
    Ok(CountryRecord::new(code, name, total_weight).with_rates(rates))
}

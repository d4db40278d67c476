//! Crate-level scenarios over a full reference-sized panel.

mod render_scenarios;

use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::dataset::DatasetStore;
use crate::types::{CountryRecord, RateField, Rates};

const COUNTRIES: [(&str, &str); 36] = [
    ("AUS", "Australia"),
    ("AUT", "Austria"),
    ("BEL", "Belgium"),
    ("CAN", "Canada"),
    ("CHE", "Switzerland"),
    ("CHL", "Chile"),
    ("COL", "Colombia"),
    ("CZE", "Czech Republic"),
    ("DEU", "Germany"),
    ("DNK", "Denmark"),
    ("ESP", "Spain"),
    ("EST", "Estonia"),
    ("FIN", "Finland"),
    ("FRA", "France"),
    ("GBR", "United Kingdom"),
    ("GRC", "Greece"),
    ("HUN", "Hungary"),
    ("IRL", "Ireland"),
    ("ISL", "Iceland"),
    ("ISR", "Israel"),
    ("ITA", "Italy"),
    ("JPN", "Japan"),
    ("KOR", "Korea"),
    ("LTU", "Lithuania"),
    ("LUX", "Luxembourg"),
    ("LVA", "Latvia"),
    ("MEX", "Mexico"),
    ("NLD", "Netherlands"),
    ("NOR", "Norway"),
    ("NZL", "New Zealand"),
    ("POL", "Poland"),
    ("PRT", "Portugal"),
    ("SVK", "Slovak Republic"),
    ("SVN", "Slovenia"),
    ("SWE", "Sweden"),
    ("TUR", "Turkey"),
];

/// (code, display name, base rate) of the three US rows
const US_ROWS: [(&str, &str, f64); 3] = [
    ("USA", "United States (Current Law)", 0.101),
    ("USA_H", "United States (House)", 0.131),
    ("USA_B", "United States (Biden)", 0.161),
];

/// Every field at `base` plus a small per-column offset, so columns differ
/// but any one column ranks rows the same way `base` does
pub(crate) fn rates_from(base: f64) -> Rates {
    RateField::all().fold(Rates::default(), |rates, field| {
        rates.with(field, base + field.index() as f64 / 1000.0)
    })
}

/// 36 countries followed by the three US rows
pub(crate) fn reference_panel() -> Vec<CountryRecord> {
    let mut panel: Vec<CountryRecord> = COUNTRIES
        .iter()
        .enumerate()
        .map(|(i, (code, name))| {
            CountryRecord::new(*code, *name, 1.0 + i as f64)
                .with_rates(rates_from(0.02 + 0.006 * i as f64))
        })
        .collect();
    panel.extend(
        US_ROWS
            .iter()
            .map(|(code, name, base)| CountryRecord::new(*code, *name, 40.0).with_rates(rates_from(*base))),
    );
    panel
}

/// Overlay step `n` lowers every US rate by `0.01 * n`
pub(crate) fn reference_overlay() -> BTreeMap<String, Rates> {
    let config = DashboardConfig::default();
    let mut table = BTreeMap::new();
    for (entity, (_, _, base)) in config.distinguished.iter().zip(US_ROWS) {
        for step in 1..=4u8 {
            table.insert(entity.overlay_code(step), rates_from(base - 0.01 * f64::from(step)));
        }
    }
    table
}

pub(crate) fn reference_store() -> DatasetStore {
    DatasetStore::new(reference_panel(), reference_overlay()).unwrap()
}

pub(crate) fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

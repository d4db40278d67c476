//! Dataset Store
//!
//! The store holds the primary panel (one row per OECD country plus the US
//! policy variants) and the alternative-policy overlay table. It is built once
//! at startup and only ever handed out by shared reference; every derived view
//! is an owned copy.

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::DashboardConfig;
use crate::error::{DashError, DashResult};
use crate::select;
use crate::types::{CountryRecord, RateField, Rates};

const COUNTRY_COLUMN: &str = "country";
const NAME_COLUMN: &str = "name";
const WEIGHT_COLUMN: &str = "weight";

#[derive(Debug, Clone)]
pub struct DatasetStore {
    primary: Vec<CountryRecord>,
    overlay: BTreeMap<String, Rates>,
}

impl DatasetStore {
    /// Build a store, checking the invariants every render relies on
    pub fn new(primary: Vec<CountryRecord>, overlay: BTreeMap<String, Rates>) -> DashResult<Self> {
        if primary.is_empty() {
            return Err(DashError::invalid_input(
                "The primary panel has no rows",
                "Load a dataset with at least one country row",
            ));
        }

        let mut seen = HashSet::new();
        for row in &primary {
            if !seen.insert(row.country_code.as_str()) {
                return Err(DashError::data_contract(format!(
                    "country code '{}' appears more than once in the primary panel",
                    row.country_code
                )));
            }
            if !(row.weight.is_finite() && row.weight > 0.0) {
                return Err(DashError::data_contract(format!(
                    "'{}' has weight {}; primary rows need a positive weight",
                    row.country_code, row.weight
                )));
            }
        }

        for code in overlay.keys() {
            if seen.contains(code.as_str()) {
                return Err(DashError::data_contract(format!(
                    "'{}' is both a primary row and an overlay row",
                    code
                )));
            }
            if overlay_owner(code, &seen).is_none() {
                return Err(DashError::data_contract(format!(
                    "overlay row '{}' does not name a primary row and a step between 1 and 4",
                    code
                )));
            }
        }

        Ok(Self { primary, overlay })
    }

    /// Read a combined CSV (primary rows followed by overlay rows) from disk
    pub fn load<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DashError::load(path, e.to_string()))?;
        let store = Self::read_csv(file, path)?;
        info!(
            "Loaded {} primary rows and {} overlay rows from {}",
            store.primary.len(),
            store.overlay.len(),
            path.display()
        );
        Ok(store)
    }

    /// Read a combined CSV from any reader
    pub fn from_reader<R: io::Read>(reader: R) -> DashResult<Self> {
        Self::read_csv(reader, Path::new("<reader>"))
    }

    fn read_csv<R: io::Read>(reader: R, source: &Path) -> DashResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv_reader
            .headers()
            .map_err(|e| DashError::load(source, e.to_string()))?
            .clone();

        let column = |name: &str| -> DashResult<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashError::missing_column(name))
        };
        let country_idx = column(COUNTRY_COLUMN)?;
        let name_idx = column(NAME_COLUMN)?;
        let weight_idx = column(WEIGHT_COLUMN)?;
        let rate_columns: Vec<(RateField, usize)> = RateField::all()
            .map(|field| column(&field.column_name()).map(|idx| (field, idx)))
            .collect::<DashResult<_>>()?;

        let mut primary = Vec::new();
        let mut overlay = BTreeMap::new();

        for (line, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| DashError::load(source, e.to_string()))?;
            let row_number = line + 2;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let mut rates = Rates::default();
            for (field, idx) in &rate_columns {
                let value = parse_number(cell(*idx)).ok_or_else(|| {
                    DashError::load(
                        source,
                        format!(
                            "row {}: '{}' is not a number in column {}",
                            row_number,
                            cell(*idx),
                            field
                        ),
                    )
                })?;
                rates.set(*field, value);
            }

            let code = cell(country_idx).to_string();
            if is_overlay_code(&code) {
                if overlay.insert(code.clone(), rates).is_some() {
                    return Err(DashError::data_contract(format!(
                        "overlay code '{}' appears more than once",
                        code
                    )));
                }
                continue;
            }

            let weight = parse_number(cell(weight_idx)).ok_or_else(|| {
                DashError::load(
                    source,
                    format!("row {}: '{}' has no usable weight", row_number, code),
                )
            })?;
            primary.push(CountryRecord {
                country_code: code,
                display_name: cell(name_idx).to_string(),
                weight,
                rates,
            });
        }

        Self::new(primary, overlay)
    }

    pub fn primary(&self) -> &[CountryRecord] {
        &self.primary
    }

    pub fn overlay(&self) -> &BTreeMap<String, Rates> {
        &self.overlay
    }

    pub fn overlay_row(&self, code: &str) -> Option<&Rates> {
        self.overlay.get(code)
    }

    /// Confirm every distinguished entity resolves to exactly one primary row,
    /// by code and by display name
    pub fn check_distinguished(&self, config: &DashboardConfig) -> DashResult<()> {
        for entity in &config.distinguished {
            let by_name = select::find_by_name(&self.primary, &entity.display_name)?;
            if self.primary[by_name].country_code != entity.code {
                return Err(DashError::data_contract(format!(
                    "'{}' is labelled '{}' but the configuration expects code '{}'",
                    self.primary[by_name].country_code, entity.display_name, entity.code
                )));
            }
        }
        Ok(())
    }
}

/// Overlay rows carry a trailing step number (`USA_1`, `USA_H4`)
pub fn is_overlay_code(code: &str) -> bool {
    code.chars().last().map_or(false, |c| c.is_ascii_digit())
}

/// Primary code an overlay row belongs to: `USA_H3` belongs to `USA_H`,
/// `USA_2` to `USA` (a trailing `_` on the stem is a separator)
fn overlay_owner<'a>(code: &'a str, primary: &HashSet<&str>) -> Option<&'a str> {
    let stem = code.strip_suffix(|c: char| ('1'..='4').contains(&c))?;
    if primary.contains(stem) {
        return Some(stem);
    }
    stem.strip_suffix('_').filter(|owner| primary.contains(owner))
}

fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Write rows as a flat table, the format the download action serves
pub fn write_table_csv<W: io::Write>(rows: &[CountryRecord], writer: W) -> DashResult<()> {
    let target = PathBuf::from("<table>");
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        COUNTRY_COLUMN.to_string(),
        NAME_COLUMN.to_string(),
        WEIGHT_COLUMN.to_string(),
    ];
    header.extend(RateField::all().map(RateField::column_name));
    csv_writer
        .write_record(&header)
        .map_err(|e| DashError::load(&target, e.to_string()))?;

    for row in rows {
        let mut record = vec![
            row.country_code.clone(),
            row.display_name.clone(),
            row.weight.to_string(),
        ];
        record.extend(row.rates.iter().map(|(_, value)| value.to_string()));
        csv_writer
            .write_record(&record)
            .map_err(|e| DashError::load(&target, e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| DashError::load(&target, e.to_string()))
}

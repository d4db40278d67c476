use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashError;

/// Which tax-rate measure a view plots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RateFamily {
    Statutory,
    Metr,
    Aetr,
}

impl RateFamily {
    /// The effective-rate measure behind this family, `None` for the statutory rate
    pub fn measure(self) -> Option<Measure> {
        match self {
            RateFamily::Statutory => None,
            RateFamily::Metr => Some(Measure::Metr),
            RateFamily::Aetr => Some(Measure::Aetr),
        }
    }
}

impl FromStr for RateFamily {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "statutory" | "stat" | "stat_tab" => Ok(RateFamily::Statutory),
            "metr" | "metr_tab" => Ok(RateFamily::Metr),
            "aetr" | "aetr_tab" => Ok(RateFamily::Aetr),
            _ => Err(DashError::invalid_input(
                format!("Unknown rate family: {}", s),
                "Supported rate families: statutory, metr, aetr",
            )),
        }
    }
}

impl fmt::Display for RateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateFamily::Statutory => write!(f, "statutory"),
            RateFamily::Metr => write!(f, "metr"),
            RateFamily::Aetr => write!(f, "aetr"),
        }
    }
}

/// Effective tax measure decomposed by asset class and financing source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Metr,
    Aetr,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Metr, Measure::Aetr];

    pub fn prefix(self) -> &'static str {
        match self {
            Measure::Metr => "metr",
            Measure::Aetr => "aetr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::Metr => "METR",
            Measure::Aetr => "AETR",
        }
    }
}

/// Decomposition of an effective tax measure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Overall,
    Land,
    Inventory,
    Ip,
    Buildings,
    Machines,
    EquityOverall,
    DebtOverall,
    DebtBias,
}

impl Component {
    pub const ALL: [Component; 9] = [
        Component::Overall,
        Component::Land,
        Component::Inventory,
        Component::Ip,
        Component::Buildings,
        Component::Machines,
        Component::EquityOverall,
        Component::DebtOverall,
        Component::DebtBias,
    ];

    /// Asset classes in the order charts list them
    pub const ASSETS: [Component; 5] = [
        Component::Land,
        Component::Inventory,
        Component::Ip,
        Component::Buildings,
        Component::Machines,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Component::Overall => "overall",
            Component::Land => "land",
            Component::Inventory => "inventory",
            Component::Ip => "ip",
            Component::Buildings => "buildings",
            Component::Machines => "machines",
            Component::EquityOverall => "equity_overall",
            Component::DebtOverall => "debt_overall",
            Component::DebtBias => "debt_bias",
        }
    }

    /// Human label used as the categorical axis value after a melt
    pub fn label(self) -> &'static str {
        match self {
            Component::Overall => "Overall",
            Component::Land => "Land",
            Component::Inventory => "Inventory",
            Component::Ip => "Intellectual Property",
            Component::Buildings => "Buildings",
            Component::Machines => "Machines",
            Component::EquityOverall => "Equity Financed",
            Component::DebtOverall => "Debt Financed",
            Component::DebtBias => "Debt-Equity Bias",
        }
    }
}

/// One numeric rate column of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateField {
    Statutory,
    Effective(Measure, Component),
}

impl RateField {
    pub const COUNT: usize = 1 + 2 * 9;

    pub const STATUTORY_COLUMN: &'static str = "statutory_tax_rate";

    pub fn metr(component: Component) -> Self {
        RateField::Effective(Measure::Metr, component)
    }

    pub fn aetr(component: Component) -> Self {
        RateField::Effective(Measure::Aetr, component)
    }

    /// Every rate field, in column order
    pub fn all() -> impl Iterator<Item = RateField> {
        std::iter::once(RateField::Statutory).chain(Measure::ALL.into_iter().flat_map(
            |measure| {
                Component::ALL
                    .into_iter()
                    .map(move |component| RateField::Effective(measure, component))
            },
        ))
    }

    pub fn index(self) -> usize {
        match self {
            RateField::Statutory => 0,
            RateField::Effective(measure, component) => {
                let m = match measure {
                    Measure::Metr => 0,
                    Measure::Aetr => 1,
                };
                let c = Component::ALL
                    .iter()
                    .position(|candidate| *candidate == component)
                    .unwrap_or(0);
                1 + m * Component::ALL.len() + c
            }
        }
    }

    pub fn column_name(self) -> String {
        match self {
            RateField::Statutory => Self::STATUTORY_COLUMN.to_string(),
            RateField::Effective(measure, component) => {
                format!("{}_{}", measure.prefix(), component.suffix())
            }
        }
    }

    pub fn from_column(name: &str) -> Option<RateField> {
        RateField::all().find(|field| field.column_name() == name)
    }

    /// Category label for long-form reshapes
    pub fn label(self) -> &'static str {
        match self {
            RateField::Statutory => "Statutory Rate",
            RateField::Effective(_, component) => component.label(),
        }
    }
}

impl fmt::Display for RateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

impl FromStr for RateField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateField::from_column(s).ok_or_else(|| {
            DashError::invalid_input(
                format!("Unknown rate column: {}", s),
                "Use statutory_tax_rate or <metr|aetr>_<component>, e.g. metr_overall",
            )
        })
    }
}

/// Fixed-size vector of every rate column for one row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rates([f64; RateField::COUNT]);

impl Default for Rates {
    fn default() -> Self {
        Rates([0.0; RateField::COUNT])
    }
}

impl Rates {
    pub fn get(&self, field: RateField) -> f64 {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: RateField, value: f64) {
        self.0[field.index()] = value;
    }

    pub fn with(mut self, field: RateField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (RateField, f64)> + '_ {
        RateField::all().map(move |field| (field, self.get(field)))
    }
}

/// One jurisdiction (or policy variant of one) in the panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRecord {
    pub country_code: String,
    pub display_name: String,
    pub weight: f64,
    pub rates: Rates,
}

impl CountryRecord {
    pub fn new(
        country_code: impl Into<String>,
        display_name: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            display_name: display_name.into(),
            weight,
            rates: Rates::default(),
        }
    }

    pub fn with_rate(mut self, field: RateField, value: f64) -> Self {
        self.rates.set(field, value);
        self
    }

    pub fn with_rates(mut self, rates: Rates) -> Self {
        self.rates = rates;
        self
    }

    pub fn rate(&self, field: RateField) -> f64 {
        self.rates.get(field)
    }
}

//! Selection record and the view profile table
//!
//! A `Selection` is everything the page shell sends for one interaction. The
//! profile table turns {rate family, display mode} into the column to plot and
//! the titles and labels the chart uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};
use crate::overlay::AlternativePolicy;
use crate::types::{Component, Measure, RateFamily, RateField};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Ranked bars of one rate
    Bar,
    /// Scatter of asset-class rates for selected countries and the average
    Asset,
    /// Debt-equity bias bars with equity and debt markers
    Financing,
    /// Two countries side by side by asset class
    CountryCompare,
    /// Ranked bars with alternative-policy overlays for the US variants
    Alternative,
}

impl FromStr for DisplayMode {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bar" => Ok(DisplayMode::Bar),
            "asset" => Ok(DisplayMode::Asset),
            "financing" => Ok(DisplayMode::Financing),
            "country_compare" | "country" | "compare" => Ok(DisplayMode::CountryCompare),
            "alternative" | "alt" => Ok(DisplayMode::Alternative),
            _ => Err(DashError::invalid_input(
                format!("Unknown display mode: {}", s),
                "Supported modes: bar, asset, financing, country-compare, alternative",
            )),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Bar => "bar",
            DisplayMode::Asset => "asset",
            DisplayMode::Financing => "financing",
            DisplayMode::CountryCompare => "country-compare",
            DisplayMode::Alternative => "alternative",
        };
        f.write_str(name)
    }
}

/// One user interaction's worth of choices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub rate: RateFamily,
    pub mode: DisplayMode,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub policy: AlternativePolicy,
}

impl Selection {
    pub fn new(rate: RateFamily, mode: DisplayMode) -> Self {
        Self {
            rate,
            mode,
            countries: Vec::new(),
            policy: AlternativePolicy::CurrentLaw,
        }
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_policy(mut self, policy: AlternativePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject combinations no view can draw
    pub fn validate(&self) -> DashResult<()> {
        match self.mode {
            DisplayMode::CountryCompare if self.countries.len() != 2 => {
                Err(DashError::invalid_input(
                    format!(
                        "Country comparison needs exactly two countries, got {}",
                        self.countries.len()
                    ),
                    "Pick a first and a second country",
                ))
            }
            DisplayMode::Asset if self.countries.len() > 2 => Err(DashError::invalid_input(
                format!(
                    "The asset view shows at most two extra countries, got {}",
                    self.countries.len()
                ),
                "Pick up to two countries",
            )),
            DisplayMode::Bar | DisplayMode::Financing if !self.countries.is_empty() => {
                Err(DashError::invalid_input(
                    format!("The {} view ranks the whole panel and takes no countries", self.mode),
                    "Clear the country selection",
                ))
            }
            DisplayMode::Alternative if !self.countries.is_empty() => {
                Err(DashError::invalid_input(
                    "The alternative-policy view takes no countries",
                    "Clear the country selection",
                ))
            }
            _ if self.policy != AlternativePolicy::CurrentLaw
                && self.mode != DisplayMode::Alternative =>
            {
                Err(DashError::invalid_input(
                    format!("Policy {} only applies to the alternative view", self.policy),
                    "Use --mode alternative or policy CL",
                ))
            }
            _ => ViewProfile::resolve(self.rate, self.mode).map(|_| ()),
        }
    }
}

/// Column, titles and labels for one {rate family, mode} pair
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProfile {
    pub field: RateField,
    pub measure: Option<Measure>,
    pub title: String,
    pub label: String,
    /// Overlay statutory-rate markers on the bars
    pub stat_marker: bool,
}

impl ViewProfile {
    pub fn resolve(rate: RateFamily, mode: DisplayMode) -> DashResult<Self> {
        let measure = rate.measure();
        let short_title = match rate {
            RateFamily::Statutory => "Statutory Corporate Tax Rates",
            RateFamily::Metr => "METRs",
            RateFamily::Aetr => "AETRs",
        };
        let label = match rate {
            RateFamily::Statutory => "Statutory Rate",
            RateFamily::Metr => "METR",
            RateFamily::Aetr => "AETR",
        };
        let overall = match measure {
            Some(m) => RateField::Effective(m, Component::Overall),
            None => RateField::Statutory,
        };

        let profile = match (mode, measure) {
            (DisplayMode::Bar, _) => ViewProfile {
                field: overall,
                measure,
                title: match rate {
                    RateFamily::Statutory => "Statutory Corporate Tax Rates",
                    RateFamily::Metr => "Marginal Effective Corporate Tax Rates (METRs)",
                    RateFamily::Aetr => "Average Effective Corporate Tax Rates (AETRs)",
                }
                .to_string(),
                label: label.to_string(),
                stat_marker: measure.is_some(),
            },
            (DisplayMode::Alternative, _) => ViewProfile {
                field: overall,
                measure,
                title: short_title.to_string(),
                label: label.to_string(),
                stat_marker: false,
            },
            (DisplayMode::Financing, Some(m)) => ViewProfile {
                field: RateField::Effective(m, Component::DebtBias),
                measure,
                title: short_title.to_string(),
                label: Component::DebtBias.label().to_string(),
                stat_marker: false,
            },
            (DisplayMode::CountryCompare, Some(_)) => ViewProfile {
                field: overall,
                measure,
                title: short_title.to_string(),
                label: label.to_string(),
                stat_marker: false,
            },
            (DisplayMode::Asset, Some(m)) => ViewProfile {
                field: overall,
                measure,
                title: match m {
                    Measure::Metr => "Marginal Effective Tax Rates",
                    Measure::Aetr => "Average Effective Tax Rates",
                }
                .to_string(),
                label: label.to_string(),
                stat_marker: false,
            },
            (_, None) => {
                return Err(DashError::invalid_input(
                    format!("The statutory rate has no breakdown for the {} view", mode),
                    "Choose metr or aetr for asset, financing and comparison views",
                ))
            }
        };
        Ok(profile)
    }

    /// The decomposed measure, for views that need one
    pub fn require_measure(&self) -> DashResult<Measure> {
        self.measure.ok_or_else(|| {
            DashError::invalid_input(
                "This view needs an effective-rate measure",
                "Choose metr or aetr",
            )
        })
    }
}

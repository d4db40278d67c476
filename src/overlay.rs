//! Scenario Overlay Resolver
//!
//! Alternative policies are cumulative: step 2 already contains step 1 and so
//! on. That property lives in the precomputed overlay rows; this module only
//! picks the row numbered for the selected step and swaps its rates in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::DistinguishedEntity;
use crate::error::{DashError, DashResult};
use crate::select;
use crate::types::{CountryRecord, Rates};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AlternativePolicy {
    /// Current law, no substitution
    #[default]
    #[serde(rename = "CL")]
    CurrentLaw,
    #[serde(rename = "BONUS")]
    Bonus,
    #[serde(rename = "RND")]
    RndExpensing,
    #[serde(rename = "EBITDA")]
    Ebitda,
    #[serde(rename = "FDII")]
    Fdii,
}

impl AlternativePolicy {
    pub const ALL: [AlternativePolicy; 5] = [
        AlternativePolicy::CurrentLaw,
        AlternativePolicy::Bonus,
        AlternativePolicy::RndExpensing,
        AlternativePolicy::Ebitda,
        AlternativePolicy::Fdii,
    ];

    /// Cumulative step number used in overlay codes
    pub fn step(self) -> Option<u8> {
        match self {
            AlternativePolicy::CurrentLaw => None,
            AlternativePolicy::Bonus => Some(1),
            AlternativePolicy::RndExpensing => Some(2),
            AlternativePolicy::Ebitda => Some(3),
            AlternativePolicy::Fdii => Some(4),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            AlternativePolicy::CurrentLaw => "CL",
            AlternativePolicy::Bonus => "BONUS",
            AlternativePolicy::RndExpensing => "RND",
            AlternativePolicy::Ebitda => "EBITDA",
            AlternativePolicy::Fdii => "FDII",
        }
    }

    /// Names every policy the estimate includes, for hover text
    pub fn included_policies(self) -> &'static str {
        match self {
            AlternativePolicy::CurrentLaw => "",
            AlternativePolicy::Bonus => "100% Bonus Depreciation",
            AlternativePolicy::RndExpensing => "100% Bonus Depreciation<br>and R&D Expensing",
            AlternativePolicy::Ebitda => {
                "100% Bonus Depreciation,<br>R&D Expensing,<br>and 30% EBITDA Limitation"
            }
            AlternativePolicy::Fdii => {
                "100% Bonus Depreciation,<br>R&D Expensing,<br>30% EBITDA Limitation,<br>and FDII"
            }
        }
    }
}

impl FromStr for AlternativePolicy {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CL" | "0" => Ok(AlternativePolicy::CurrentLaw),
            "BONUS" | "1" => Ok(AlternativePolicy::Bonus),
            "RND" | "2" => Ok(AlternativePolicy::RndExpensing),
            "EBITDA" | "3" => Ok(AlternativePolicy::Ebitda),
            "FDII" | "4" => Ok(AlternativePolicy::Fdii),
            _ => Err(DashError::invalid_input(
                format!("Unknown alternative policy: {}", s),
                "Supported policies: CL, BONUS, RND, EBITDA, FDII (or 1-4)",
            )),
        }
    }
}

impl fmt::Display for AlternativePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fresh copy of `primary` with each distinguished entity's rates replaced by
/// its overlay row for `policy`. Weight, code and name stay as they were.
pub fn apply_alternative(
    primary: &[CountryRecord],
    overlay: &BTreeMap<String, Rates>,
    entities: &[DistinguishedEntity],
    policy: AlternativePolicy,
) -> DashResult<Vec<CountryRecord>> {
    let mut panel = primary.to_vec();
    let Some(step) = policy.step() else {
        return Ok(panel);
    };

    for entity in entities {
        let position = select::find_by_name(primary, &entity.display_name)?;
        let code = entity.overlay_code(step);
        let rates = overlay.get(&code).ok_or_else(|| {
            DashError::data_contract(format!(
                "overlay row '{}' for '{}' under {} is missing",
                code, entity.display_name, policy
            ))
        })?;
        debug!("Substituting {} into position {} ({})", code, position, entity.code);
        panel[position].rates = *rates;
    }

    Ok(panel)
}

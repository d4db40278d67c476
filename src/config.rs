//! Dashboard configuration
//!
//! Colours, distinguished entities and layout constants. Every field has a
//! default, so a TOML file only needs the values it changes.

use std::collections::HashSet;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::colorize::Highlight;
use crate::error::{DashError, DashResult};
use crate::types::RateFamily;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub palette: Palette,
    /// Baseline first, then up to two proposals
    pub distinguished: Vec<DistinguishedEntity>,
    pub average: AverageRow,
    pub alternative: AlternativeView,
    pub layout: LayoutSizes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub bar: String,
    pub statutory_marker: String,
    pub financing_marker: String,
    pub reference_line: String,
    pub financing_reference_line: String,
    pub compare_first: String,
    pub compare_second: String,
    pub grid: String,
    pub dark_grid: String,
    pub light_background: String,
    pub grey_background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistinguishedEntity {
    pub code: String,
    pub display_name: String,
    pub legend_label: String,
    pub color: String,
    /// Overlay rows for this entity are keyed `<prefix><step>`
    pub overlay_prefix: String,
}

impl DistinguishedEntity {
    pub fn overlay_code(&self, step: u8) -> String {
        format!("{}{}", self.overlay_prefix, step)
    }
}

/// The synthetic average row mixed into asset views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AverageRow {
    pub code: String,
    pub display_name: String,
    pub color: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlternativeView {
    pub metr_range: Option<[f64; 2]>,
    pub aetr_range: Option<[f64; 2]>,
    pub statutory_range: Option<[f64; 2]>,
    /// Vertical lift of the alternative-policy markers above their bars
    pub marker_offset: f64,
}

impl AlternativeView {
    pub fn range_for(&self, rate: RateFamily) -> Option<[f64; 2]> {
        match rate {
            RateFamily::Statutory => self.statutory_range,
            RateFamily::Metr => self.metr_range,
            RateFamily::Aetr => self.aetr_range,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSizes {
    pub financing_height: u32,
    pub compare_height: u32,
    pub alternative_height: u32,
    pub hover_hint: String,
    pub toggle_hint: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bar: "#008CCC".to_string(),
            statutory_marker: "#67C5F0".to_string(),
            financing_marker: "#8E919A".to_string(),
            reference_line: "#FF5C68".to_string(),
            financing_reference_line: "#FB0023".to_string(),
            compare_first: "#008CCC".to_string(),
            compare_second: "#FFB400".to_string(),
            grid: "#F2F2F2".to_string(),
            dark_grid: "#8E919A".to_string(),
            light_background: "#FFFFFF".to_string(),
            grey_background: "#F2F2F2".to_string(),
        }
    }
}

impl Default for AverageRow {
    fn default() -> Self {
        Self {
            code: "OECD".to_string(),
            display_name: "OECD Average".to_string(),
            color: "#FB0023".to_string(),
            decimals: 3,
        }
    }
}

impl Default for AlternativeView {
    fn default() -> Self {
        Self {
            metr_range: Some([-0.20, 0.20]),
            aetr_range: Some([0.00, 0.31]),
            statutory_range: None,
            marker_offset: 0.015,
        }
    }
}

impl Default for LayoutSizes {
    fn default() -> Self {
        Self {
            financing_height: 600,
            compare_height: 400,
            alternative_height: 500,
            hover_hint: "Hover over data to view more information.".to_string(),
            toggle_hint: "Toggle legend items to show or hide elements.".to_string(),
        }
    }
}

fn entity(code: &str, name: &str, legend: &str, color: &str, prefix: &str) -> DistinguishedEntity {
    DistinguishedEntity {
        code: code.to_string(),
        display_name: name.to_string(),
        legend_label: legend.to_string(),
        color: color.to_string(),
        overlay_prefix: prefix.to_string(),
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            distinguished: vec![
                entity("USA", "United States (Current Law)", "US (Current Law)", "#00D56F", "USA_"),
                entity("USA_H", "United States (House)", "US (House)", "#FFB400", "USA_H"),
                entity("USA_B", "United States (Biden)", "US (Biden)", "#FF8100", "USA_B"),
            ],
            average: AverageRow::default(),
            alternative: AlternativeView::default(),
            layout: LayoutSizes::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(source: &str) -> DashResult<Self> {
        let config: DashboardConfig =
            toml::from_str(source).map_err(|e| DashError::config("toml", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> DashResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DashError::load(path, e.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded dashboard configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.distinguished.is_empty() || self.distinguished.len() > 3 {
            return Err(DashError::config(
                "distinguished",
                format!(
                    "expected a baseline and up to two proposals, found {} entries",
                    self.distinguished.len()
                ),
            ));
        }
        let mut codes = HashSet::new();
        for entity in &self.distinguished {
            if !codes.insert(entity.code.as_str()) {
                return Err(DashError::config(
                    "distinguished.code",
                    format!("'{}' is listed twice", entity.code),
                ));
            }
            if entity.overlay_prefix.is_empty() {
                return Err(DashError::config(
                    "distinguished.overlay_prefix",
                    format!("'{}' has no overlay prefix", entity.code),
                ));
            }
        }
        if codes.contains(self.average.code.as_str()) {
            return Err(DashError::config(
                "average.code",
                format!("'{}' collides with a distinguished entity", self.average.code),
            ));
        }
        Ok(())
    }

    /// The first distinguished entity; renders cannot proceed without one
    pub fn baseline(&self) -> DashResult<&DistinguishedEntity> {
        self.distinguished.first().ok_or_else(|| {
            DashError::config("distinguished", "no baseline entity is configured")
        })
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        self.distinguished
            .iter()
            .map(|e| Highlight::new(e.code.clone(), e.color.clone()))
            .collect()
    }

    pub fn is_distinguished(&self, code: &str) -> bool {
        self.distinguished.iter().any(|e| e.code == code)
    }
}

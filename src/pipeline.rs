//! Selection to chart, end to end

use log::debug;

use crate::chart::ChartSpec;
use crate::compose::{self, Composition};
use crate::config::DashboardConfig;
use crate::dataset::DatasetStore;
use crate::error::DashResult;
use crate::selection::{DisplayMode, Selection, ViewProfile};
use crate::types::CountryRecord;

/// Output of one render: the figure and the rows it plots
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub chart: ChartSpec,
    pub table: Vec<CountryRecord>,
}

impl From<Composition> for Rendered {
    fn from(composition: Composition) -> Self {
        Self {
            chart: composition.chart,
            table: composition.table,
        }
    }
}

/// Validate the configuration and selection, derive its view from the store and compose the chart.
///
/// The store is only read; every intermediate table is owned by this call, so
/// concurrent renders against one store never observe each other.
pub fn render(
    store: &DatasetStore,
    config: &DashboardConfig,
    selection: &Selection,
) -> DashResult<Rendered> {
    config.validate()?;
    selection.validate()?;
    let profile = ViewProfile::resolve(selection.rate, selection.mode)?;
    debug!(
        "Rendering {} view of {} ({} rows, field {})",
        selection.mode,
        selection.rate,
        store.primary().len(),
        profile.field
    );

    let panel = store.primary();
    let composition = match selection.mode {
        DisplayMode::Bar => compose::ranked_bar(panel, &profile, config)?,
        DisplayMode::Financing => compose::financing(panel, &profile, config)?,
        DisplayMode::CountryCompare => {
            compose::country_compare(panel, &profile, &selection.countries, config)?
        }
        DisplayMode::Asset => compose::asset_scatter(panel, &profile, &selection.countries, config)?,
        DisplayMode::Alternative => compose::alternative(
            panel,
            store.overlay(),
            &profile,
            selection.policy,
            config.alternative.range_for(selection.rate),
            config,
        )?,
    };

    debug!(
        "Composed {} series over {} rows",
        composition.chart.data.len(),
        composition.table.len()
    );
    Ok(composition.into())
}

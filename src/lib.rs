pub mod error;
pub mod types;
pub mod dataset;
pub mod select;
pub mod aggregate;
pub mod colorize;
pub mod overlay;
pub mod reshape;
pub mod chart;
pub mod selection;
pub mod config;
pub mod compose;
pub mod pipeline;
#[cfg(test)]
mod tests;
pub use error::{DashError, DashResult};
pub use types::{Component, CountryRecord, Measure, RateFamily, RateField, Rates};
pub use dataset::{write_table_csv, DatasetStore};
pub use select::Anchors;
pub use aggregate::{average_record, weighted_mean};
pub use colorize::{colorize, Highlight};
pub use overlay::{apply_alternative, AlternativePolicy};
pub use reshape::{melt, melt_by, LongRecord, Melted};
pub use chart::{ChartSpec, Datum, Layout, Series};
pub use selection::{DisplayMode, Selection, ViewProfile};
pub use config::{DashboardConfig, DistinguishedEntity};
pub use compose::Composition;
pub use pipeline::{render, Rendered};
use std::path::Path;
/// Load a dataset and configuration, then render one selection
pub fn render_files<P: AsRef<Path>, Q: AsRef<Path>>(
    data: P,
    config: Option<Q>,
    selection: &Selection,
) -> DashResult<Rendered> {
    let store = DatasetStore::load(data)?;
    let config = match config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    render(&store, &config, selection)
}

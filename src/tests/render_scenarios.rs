use super::{close, reference_panel, reference_store, rates_from};
use crate::aggregate::weighted_mean;
use crate::chart::{ColorSpec, Datum, HoverText};
use crate::config::DashboardConfig;
use crate::dataset::DatasetStore;
use crate::error::DashResult;
use crate::overlay::AlternativePolicy;
use crate::pipeline::render;
use crate::selection::{DisplayMode, Selection};
use crate::types::{Component, CountryRecord, RateFamily, RateField};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn metr() -> RateField {
    RateField::metr(Component::Overall)
}

fn per_point(colors: Option<&ColorSpec>) -> Vec<String> {
    match colors {
        Some(ColorSpec::PerPoint(colors)) => colors.clone(),
        other => panic!("expected per-point colours, got {:?}", other),
    }
}

fn texts(data: &[Datum]) -> Vec<&str> {
    data.iter().filter_map(Datum::as_text).collect()
}

// ---------------------------------------------------------------------------
// Three-row panel, ranked bars
// ---------------------------------------------------------------------------
#[test]
fn t01_toy_panel_ranked_bar() -> DashResult<()> {
    let store = DatasetStore::new(
        vec![
            CountryRecord::new("USA", "United States (Current Law)", 5.0).with_rate(metr(), 0.20),
            CountryRecord::new("GBR", "United Kingdom", 3.0).with_rate(metr(), 0.15),
            CountryRecord::new("DEU", "Germany", 2.0).with_rate(metr(), 0.25),
        ],
        BTreeMap::new(),
    )?;
    let config = DashboardConfig::default();
    let rendered = render(&store, &config, &Selection::new(RateFamily::Metr, DisplayMode::Bar))?;

    let codes: Vec<&str> = rendered.table.iter().map(|r| r.country_code.as_str()).collect();
    assert_eq!(codes, vec!["GBR", "USA", "DEU"]);

    let bars = &rendered.chart.data[0];
    assert_eq!(texts(&bars.x), vec!["United Kingdom", "United States (Current Law)", "Germany"]);
    assert_eq!(per_point(bars.point_colors()), vec!["#008CCC", "#00D56F", "#008CCC"]);

    let reference = rendered.chart.data.last().unwrap();
    assert_eq!(texts(&reference.x), vec!["United Kingdom", "United States (Current Law)", "Germany"]);
    assert_eq!(reference.y.len(), 3);
    assert!(reference.y.iter().all(|y| close(y.as_number().unwrap(), 0.195)));
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference panel, every mode
// ---------------------------------------------------------------------------
#[test]
fn t02_bar_over_full_panel() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let rendered = render(&store, &config, &Selection::new(RateFamily::Metr, DisplayMode::Bar))?;

    assert_eq!(rendered.table.len(), 39);
    assert!(rendered
        .table
        .windows(2)
        .all(|pair| pair[0].rate(metr()) <= pair[1].rate(metr())));

    let names: Vec<&str> = rendered.table.iter().map(|r| r.display_name.as_str()).collect();
    let reference = rendered.chart.data.last().unwrap();
    assert_eq!(texts(&reference.x), vec![names[0], names[19], names[38]]);
    let expected = weighted_mean(store.primary(), metr())?;
    assert!(close(reference.y[0].as_number().unwrap(), expected));

    let stat = rendered.chart.series_named("Statutory Rate").unwrap();
    let colors = per_point(stat.point_colors());
    let house = names.iter().position(|n| *n == "United States (House)").unwrap();
    let japan = names.iter().position(|n| *n == "Japan").unwrap();
    assert_eq!(colors[house], "#FFB400");
    assert_eq!(colors[japan], "#67C5F0");
    assert!(rendered.chart.layout.title.text.starts_with(
        "Marginal Effective Corporate Tax Rates (METRs) in the OECD, Current Law and Proposals"
    ));
    Ok(())
}

#[test]
fn t03_financing_series_order() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let rendered =
        render(&store, &config, &Selection::new(RateFamily::Aetr, DisplayMode::Financing))?;

    let names: Vec<&str> = rendered.chart.data.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "AETR on Equity <br>Financed Investment",
            "AETR on Debt <br>Financed Investment",
            "Debt-Equity Bias",
            "OECD Average<br>Debt-Equity Bias",
        ]
    );
    let bias = RateField::aetr(Component::DebtBias);
    assert!(rendered
        .table
        .windows(2)
        .all(|pair| pair[0].rate(bias) <= pair[1].rate(bias)));
    assert_eq!(rendered.chart.layout.height, Some(600));
    Ok(())
}

#[test]
fn t04_asset_scatter_colours_every_occurrence() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let selection =
        Selection::new(RateFamily::Metr, DisplayMode::Asset).with_countries(["FRA", "DEU"]);
    let rendered = render(&store, &config, &selection)?;

    let codes: Vec<&str> = rendered.table.iter().map(|r| r.country_code.as_str()).collect();
    assert_eq!(codes, vec!["USA", "USA_H", "USA_B", "DEU", "FRA", "OECD"]);

    let points = &rendered.chart.data[0];
    assert_eq!(points.x.len(), 30);
    let colors = per_point(points.point_colors());
    assert!(colors[0..5].iter().all(|c| c == "#00D56F"));
    assert!(colors[5..10].iter().all(|c| c == "#FFB400"));
    assert!(colors[10..15].iter().all(|c| c == "#FF8100"));
    assert!(colors[15..25].iter().all(|c| c == "#008CCC"));
    assert!(colors[25..30].iter().all(|c| c == "#FB0023"));
    assert_eq!(
        texts(&points.y[0..5]),
        vec!["Land", "Inventory", "Intellectual Property", "Buildings", "Machines"]
    );

    match &points.hovertemplate {
        Some(HoverText::PerPoint(hover)) => assert_eq!(
            hover[0],
            "United States (Current Law)<br>Land<br><b>%{x:.1%}<extra></extra><br>"
        ),
        other => panic!("expected per-point hover, got {:?}", other),
    }

    let legend: Vec<&str> = rendered.chart.data[1..].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(legend, vec!["OECD Average", "US (Current Law)", "US (House)", "US (Biden)"]);

    let land = RateField::metr(Component::Land);
    let average = rendered.table.last().unwrap().rate(land);
    let exact = weighted_mean(store.primary(), land)?;
    assert!(close(average, (exact * 1000.0).round() / 1000.0));
    Ok(())
}

#[test]
fn t05_country_compare_baseline_first() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let selection = Selection::new(RateFamily::Aetr, DisplayMode::CountryCompare)
        .with_countries(["GBR", "USA"]);
    let rendered = render(&store, &config, &selection)?;

    assert_eq!(rendered.chart.data.len(), 2);
    assert_eq!(rendered.chart.data[0].name, "United States (Current Law)");
    assert_eq!(rendered.chart.data[1].name, "United Kingdom");
    assert_eq!(
        rendered.chart.data[1].point_colors(),
        Some(&ColorSpec::Single("#FFB400".to_string()))
    );
    assert_eq!(rendered.chart.layout.height, Some(400));
    Ok(())
}

#[test]
fn t06_alternative_policy_markers() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let selection = Selection::new(RateFamily::Metr, DisplayMode::Alternative)
        .with_policy(AlternativePolicy::RndExpensing);
    let rendered = render(&store, &config, &selection)?;

    let usa = rendered.table.iter().find(|r| r.country_code == "USA").unwrap();
    assert!(close(usa.rate(metr()), rates_from(0.101 - 0.02).get(metr())));
    assert_eq!(usa.weight, 40.0);

    let reference = &rendered.chart.data[1];
    let baseline_average = weighted_mean(store.primary(), metr())?;
    assert!(close(reference.y[1].as_number().unwrap(), baseline_average));

    let markers = rendered.chart.series_named("Alternative Policy").unwrap();
    assert_eq!(markers.x.len(), 3);
    assert!(close(markers.y[0].as_number().unwrap(), usa.rate(metr()) + 0.015));
    match &markers.hovertemplate {
        Some(HoverText::Single(text)) => {
            assert!(text.ends_with("100% Bonus Depreciation<br>and R&D Expensing"))
        }
        other => panic!("expected a single hover template, got {:?}", other),
    }
    assert_eq!(
        rendered.chart.layout.yaxis.as_ref().and_then(|axis| axis.range),
        Some([-0.20, 0.20])
    );

    let current = render(
        &store,
        &config,
        &Selection::new(RateFamily::Metr, DisplayMode::Alternative),
    )?;
    assert_eq!(current.chart.data.len(), 2);
    Ok(())
}

#[test]
fn t07_alternative_renders_do_not_compound() -> DashResult<()> {
    let store = reference_store();
    let config = DashboardConfig::default();
    let policy = |p| Selection::new(RateFamily::Metr, DisplayMode::Alternative).with_policy(p);

    let first = render(&store, &config, &policy(AlternativePolicy::Bonus))?;
    let second = render(&store, &config, &policy(AlternativePolicy::RndExpensing))?;
    let again = render(&store, &config, &policy(AlternativePolicy::Bonus))?;

    assert_eq!(first, again);
    assert_ne!(first.table, second.table);
    assert_eq!(store.primary(), reference_panel().as_slice());
    Ok(())
}

// ---------------------------------------------------------------------------
// Failures surface as errors
// ---------------------------------------------------------------------------
#[test]
fn t08_missing_baseline_is_fatal() {
    let panel: Vec<CountryRecord> = reference_panel()
        .into_iter()
        .filter(|r| r.country_code != "USA")
        .collect();
    let store = DatasetStore::new(panel, BTreeMap::new()).unwrap();
    let config = DashboardConfig::default();
    for mode in [DisplayMode::Bar, DisplayMode::Financing, DisplayMode::Asset, DisplayMode::Alternative] {
        let err = render(&store, &config, &Selection::new(RateFamily::Metr, mode)).unwrap_err();
        assert_eq!(err.kind(), "not_found", "mode {}", mode);
    }
}

#[test]
fn t09_alternative_needs_every_variant() {
    let panel: Vec<CountryRecord> = reference_panel()
        .into_iter()
        .filter(|r| r.country_code != "USA_B")
        .collect();
    let mut overlay = super::reference_overlay();
    overlay.retain(|code, _| !code.starts_with("USA_B"));
    let store = DatasetStore::new(panel, overlay).unwrap();
    let config = DashboardConfig::default();

    let bar = render(&store, &config, &Selection::new(RateFamily::Metr, DisplayMode::Bar));
    assert!(bar.is_ok());

    let selection = Selection::new(RateFamily::Metr, DisplayMode::Alternative)
        .with_policy(AlternativePolicy::Bonus);
    assert_eq!(render(&store, &config, &selection).unwrap_err().kind(), "not_found");
}

#[test]
fn t10_missing_overlay_row_is_a_contract_error() {
    let mut overlay = super::reference_overlay();
    overlay.remove("USA_H4");
    let store = DatasetStore::new(reference_panel(), overlay).unwrap();
    let config = DashboardConfig::default();

    let fdii = Selection::new(RateFamily::Aetr, DisplayMode::Alternative)
        .with_policy(AlternativePolicy::Fdii);
    assert_eq!(render(&store, &config, &fdii).unwrap_err().kind(), "data_contract");

    let ebitda = fdii.clone().with_policy(AlternativePolicy::Ebitda);
    assert!(render(&store, &config, &ebitda).is_ok());
}

#[test]
fn t11_label_on_the_wrong_code_is_fatal() {
    let panel: Vec<CountryRecord> = reference_panel()
        .into_iter()
        .map(|mut row| {
            if row.country_code == "USA" {
                row.country_code = "US".to_string();
            }
            row
        })
        .collect();
    let store = DatasetStore::new(panel, BTreeMap::new()).unwrap();
    let config = DashboardConfig::default();
    for mode in [DisplayMode::Bar, DisplayMode::Financing, DisplayMode::Asset] {
        let err = render(&store, &config, &Selection::new(RateFamily::Metr, mode)).unwrap_err();
        assert_eq!(err.kind(), "data_contract", "mode {}", mode);
    }
}

#[test]
fn t12_config_without_baseline_is_rejected() {
    let store = reference_store();
    let mut config = DashboardConfig::default();
    config.distinguished.clear();

    let compare = Selection::new(RateFamily::Metr, DisplayMode::CountryCompare)
        .with_countries(["GBR", "DEU"]);
    assert_eq!(render(&store, &config, &compare).unwrap_err().kind(), "config");
    let bar = Selection::new(RateFamily::Metr, DisplayMode::Bar);
    assert_eq!(render(&store, &config, &bar).unwrap_err().kind(), "config");

    let panel = reference_panel();
    let profile = crate::selection::ViewProfile::resolve(RateFamily::Metr, DisplayMode::Bar).unwrap();
    let err = crate::compose::ranked_bar(&panel, &profile, &config).unwrap_err();
    assert_eq!(err.kind(), "config");
}

#[test]
fn t13_invalid_selections_are_rejected() {
    let store = reference_store();
    let config = DashboardConfig::default();

    let statutory = Selection::new(RateFamily::Statutory, DisplayMode::Financing);
    assert_eq!(render(&store, &config, &statutory).unwrap_err().kind(), "invalid_input");

    let unknown = Selection::new(RateFamily::Metr, DisplayMode::CountryCompare)
        .with_countries(["USA", "XXX"]);
    assert_eq!(render(&store, &config, &unknown).unwrap_err().kind(), "not_found");
}

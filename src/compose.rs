//! Chart Composer
//!
//! One recipe per display mode. Each recipe takes already-loaded rows, derives
//! its own owned view of them, and returns the figure together with the rows
//! it plotted.

use log::debug;

use crate::aggregate;
use crate::chart::{
    titled, Axis, ChartSpec, ColorSpec, Datum, HoverText, Layout, Marker, MarkerLine, Series,
};
use crate::colorize::{colorize, Highlight};
use crate::config::DashboardConfig;
use crate::error::{DashError, DashResult};
use crate::overlay::{self, AlternativePolicy};
use crate::reshape::{melt, LongRecord};
use crate::select::{self, Anchors};
use crate::selection::ViewProfile;
use crate::types::{Component, CountryRecord, Measure, RateField, Rates};

use std::collections::BTreeMap;

/// A composed figure and the rows behind it, in plotted order
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub chart: ChartSpec,
    pub table: Vec<CountryRecord>,
}

/// Rows ranked by one field, with the weighted mean over those same rows
#[derive(Debug, Clone, PartialEq)]
pub struct RankedView {
    pub rows: Vec<CountryRecord>,
    pub average: f64,
    pub anchors: Anchors,
}

impl RankedView {
    pub fn new(rows: &[CountryRecord], field: RateField) -> DashResult<Self> {
        let rows = select::rank(rows, field);
        let average = aggregate::weighted_mean(&rows, field)?;
        let anchors = Anchors::of(rows.len())?;
        Ok(Self { rows, average, anchors })
    }

    fn names(&self) -> Vec<Datum> {
        self.rows.iter().map(|r| Datum::from(r.display_name.as_str())).collect()
    }

    fn values(&self, field: RateField) -> Vec<Datum> {
        self.rows.iter().map(|r| Datum::from(r.rate(field))).collect()
    }

    fn colors(&self, highlights: &[Highlight], base: &str) -> Vec<String> {
        colorize(self.rows.iter().map(|r| r.country_code.as_str()), highlights, base)
    }
}

/// Resolve every distinguished entity by display label and confirm the row
/// found carries the configured code, since colours are assigned by code.
///
/// The baseline must be present exactly once. Proposal variants may be absent
/// unless `require_all` is set; a label that matches twice is always fatal.
pub fn check_distinguished(
    rows: &[CountryRecord],
    config: &DashboardConfig,
    require_all: bool,
) -> DashResult<()> {
    config.baseline()?;
    for (idx, entity) in config.distinguished.iter().enumerate() {
        match select::find_by_name(rows, &entity.display_name) {
            Ok(position) if rows[position].country_code != entity.code => {
                return Err(DashError::data_contract(format!(
                    "'{}' is labelled '{}' but the configuration expects code '{}'",
                    rows[position].country_code, entity.display_name, entity.code
                )));
            }
            Ok(_) => {}
            Err(DashError::NotFound { .. }) if idx > 0 && !require_all => {
                debug!("{} absent from this panel, left uncoloured", entity.display_name);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn asset_fields(measure: Measure) -> Vec<RateField> {
    Component::ASSETS
        .iter()
        .map(|c| RateField::Effective(measure, *c))
        .collect()
}

fn per_point_marker(colors: Vec<String>) -> Marker {
    Marker {
        color: Some(ColorSpec::PerPoint(colors)),
        ..Marker::default()
    }
}

/// Ranked bars of one rate with the weighted-average reference line,
/// optionally overlaid with statutory-rate markers
pub fn ranked_bar(
    panel: &[CountryRecord],
    profile: &ViewProfile,
    config: &DashboardConfig,
) -> DashResult<Composition> {
    let view = RankedView::new(panel, profile.field)?;
    check_distinguished(&view.rows, config, false)?;
    let highlights = config.highlights();
    let palette = &config.palette;
    debug!(
        "Ranked {} rows by {}, weighted average {:.4}",
        view.rows.len(),
        profile.field,
        view.average
    );

    let mut data = vec![Series::bar(
        profile.label.clone(),
        view.names(),
        view.values(profile.field),
        view.colors(&highlights, &palette.bar),
    )];

    if profile.stat_marker {
        data.push(Series::markers(
            "Statutory Rate",
            view.names(),
            view.values(RateField::Statutory),
            per_point_marker(view.colors(&highlights, &palette.statutory_marker)),
        ));
    }

    data.push(Series::reference_line(
        profile.label.clone(),
        view.anchors.names(&view.rows),
        view.average,
        format!("OECD Average {}", profile.label),
        &palette.reference_line,
    ));

    let layout = Layout {
        showlegend: Some(false),
        yaxis: Some(Axis::percent(".1%", &palette.grid)),
        ..Layout::new(
            titled(
                &format!("{} in the OECD, Current Law and Proposals ", profile.title),
                &config.layout.hover_hint,
            ),
            &palette.light_background,
        )
    };

    Ok(Composition {
        chart: ChartSpec { data, layout },
        table: view.rows,
    })
}

/// Debt-equity bias bars with equity and debt rate markers
pub fn financing(
    panel: &[CountryRecord],
    profile: &ViewProfile,
    config: &DashboardConfig,
) -> DashResult<Composition> {
    let measure = profile.require_measure()?;
    let view = RankedView::new(panel, profile.field)?;
    check_distinguished(&view.rows, config, false)?;
    let highlights = config.highlights();
    let palette = &config.palette;
    let point_label = measure.label();

    let marker_colors = view.colors(&highlights, &palette.financing_marker);
    let equity = Series::markers(
        format!("{} on Equity <br>Financed Investment", point_label),
        view.names(),
        view.values(RateField::Effective(measure, Component::EquityOverall)),
        Marker {
            color: Some(ColorSpec::PerPoint(marker_colors.clone())),
            size: Some(8.0),
            symbol: Some("circle".to_string()),
            line: Some(MarkerLine {
                color: ColorSpec::Single(palette.financing_marker.clone()),
                width: 2.0,
            }),
        },
    );
    let debt = Series::markers(
        format!("{} on Debt <br>Financed Investment", point_label),
        view.names(),
        view.values(RateField::Effective(measure, Component::DebtOverall)),
        Marker {
            color: Some(ColorSpec::PerPoint(marker_colors.clone())),
            size: Some(8.0),
            symbol: Some("square-open".to_string()),
            line: Some(MarkerLine {
                color: ColorSpec::PerPoint(marker_colors),
                width: 2.0,
            }),
        },
    );
    let bias = Series::bar(
        profile.label.clone(),
        view.names(),
        view.values(profile.field),
        view.colors(&highlights, &palette.bar),
    );
    let average = Series::reference_line(
        format!("OECD Average<br>{}", profile.label),
        view.anchors.names(&view.rows),
        view.average,
        format!("OECD Average {}", profile.label),
        &palette.financing_reference_line,
    );

    let yaxis = Axis {
        zerolinecolor: Some(palette.grid.clone()),
        ..Axis::percent(".1%", &palette.grid)
    };
    let layout = Layout {
        yaxis: Some(yaxis),
        height: Some(config.layout.financing_height),
        ..Layout::new(
            titled(
                &format!(
                    "{}, Measured by {} in the OECD, Current Law and Proposals",
                    profile.label, profile.title
                ),
                &format!("{} {}", config.layout.hover_hint, config.layout.toggle_hint),
            ),
            &palette.light_background,
        )
    };

    Ok(Composition {
        chart: ChartSpec {
            data: vec![equity, debt, bias, average],
            layout,
        },
        table: view.rows,
    })
}

/// Two entities' asset-class rates as two marker series on a category axis
pub fn country_compare(
    panel: &[CountryRecord],
    profile: &ViewProfile,
    codes: &[String],
    config: &DashboardConfig,
) -> DashResult<Composition> {
    let measure = profile.require_measure()?;
    if codes.len() != 2 {
        return Err(DashError::invalid_input(
            format!("Country comparison needs exactly two countries, got {}", codes.len()),
            "Pick a first and a second country",
        ));
    }

    let mut rows = select::select_codes(panel, codes)?;
    let baseline = &config.baseline()?.code;
    if rows[1].country_code == *baseline && rows[0].country_code != *baseline {
        rows.swap(0, 1);
    }

    let palette = &config.palette;
    let fields = asset_fields(measure);
    let data: Vec<Series> = rows
        .iter()
        .zip([&palette.compare_first, &palette.compare_second])
        .map(|(row, color)| {
            let long = melt(std::slice::from_ref(row), &fields);
            Series::markers(
                row.display_name.clone(),
                long.iter().map(|r| Datum::from(r.value)).collect(),
                long.iter().map(|r| Datum::from(r.variable.as_str())).collect(),
                Marker {
                    color: Some(ColorSpec::Single(color.clone())),
                    size: Some(20.0),
                    symbol: Some("circle".to_string()),
                    line: None,
                },
            )
        })
        .collect();

    let xaxis = Axis {
        zeroline: Some(false),
        ..Axis::percent(".1%", &palette.grid)
    };
    let layout = Layout {
        xaxis: Some(xaxis),
        yaxis: Some(Axis::category(&palette.dark_grid, &palette.grid)),
        height: Some(config.layout.compare_height),
        ..Layout::new(
            titled(
                &format!(
                    "<i>{} vs. {},</i> {} by Asset and Form of Financing",
                    rows[0].display_name, rows[1].display_name, profile.title
                ),
                &format!("{} {}", config.layout.hover_hint, config.layout.toggle_hint),
            ),
            &palette.grey_background,
        )
    };

    Ok(Composition {
        chart: ChartSpec { data, layout },
        table: rows,
    })
}

/// Asset-class scatter for the distinguished entities, up to two more
/// countries and the weighted OECD average
pub fn asset_scatter(
    panel: &[CountryRecord],
    profile: &ViewProfile,
    codes: &[String],
    config: &DashboardConfig,
) -> DashResult<Composition> {
    let measure = profile.require_measure()?;
    check_distinguished(panel, config, false)?;
    for code in codes {
        select::find_by_code(panel, code)?;
    }

    let mut rows: Vec<CountryRecord> = config
        .distinguished
        .iter()
        .filter_map(|e| select::find_by_name(panel, &e.display_name).ok())
        .map(|idx| panel[idx].clone())
        .collect();
    let extra: Vec<&String> = codes.iter().filter(|c| !config.is_distinguished(c)).collect();
    rows.extend(select::filter_by_codes(panel, &extra));

    let average = &config.average;
    rows.push(aggregate::average_record(
        panel,
        &average.code,
        &average.display_name,
        average.decimals,
    )?);

    let long: Vec<LongRecord> = melt(&rows, &asset_fields(measure));
    let mut highlights = config.highlights();
    highlights.push(Highlight::new(average.code.clone(), average.color.clone()));
    let palette = &config.palette;
    let colors = colorize(long.iter().map(|r| r.country_code.as_str()), &highlights, &palette.bar);
    let hover: Vec<String> = long
        .iter()
        .map(|r| {
            format!(
                "{}<br>{}<br><b>%{{x:.1%}}<extra></extra><br>",
                r.display_name, r.variable
            )
        })
        .collect();

    let points = Series::markers(
        "",
        long.iter().map(|r| Datum::from(r.value)).collect(),
        long.iter().map(|r| Datum::from(r.variable.as_str())).collect(),
        Marker {
            color: Some(ColorSpec::PerPoint(colors.clone())),
            size: Some(18.0),
            symbol: Some("line-ns".to_string()),
            line: Some(MarkerLine {
                color: ColorSpec::PerPoint(colors),
                width: 4.0,
            }),
        },
    )
    .with_hover(HoverText::PerPoint(hover))
    .with_showlegend(false);

    let mut data = vec![
        points,
        Series::legend_entry(average.display_name.clone(), &average.color, "legend"),
    ];
    data.extend(
        config
            .distinguished
            .iter()
            .map(|e| Series::legend_entry(e.legend_label.clone(), &e.color, "legend")),
    );

    let xaxis = Axis {
        zeroline: Some(false),
        ..Axis::percent(".0%", &palette.grid)
    };
    let layout = Layout {
        xaxis: Some(xaxis),
        yaxis: Some(Axis::category(&palette.dark_grid, &palette.grid)),
        ..Layout::new(
            titled(
                &format!(
                    "{} by Asset, Selected Countries and OECD Average, Current Law and Proposals",
                    profile.title
                ),
                &config.layout.hover_hint,
            ),
            &palette.grey_background,
        )
    };

    Ok(Composition {
        chart: ChartSpec { data, layout },
        table: rows,
    })
}

/// Ranked bars with the distinguished entities' rates swapped for their
/// alternative-policy overlay rows.
///
/// The reference average is taken over the unmodified panel, so switching
/// policies moves the US bars but never the line.
pub fn alternative(
    panel: &[CountryRecord],
    overlay_table: &BTreeMap<String, Rates>,
    profile: &ViewProfile,
    policy: AlternativePolicy,
    range: Option<[f64; 2]>,
    config: &DashboardConfig,
) -> DashResult<Composition> {
    check_distinguished(panel, config, true)?;
    let baseline_average = aggregate::weighted_mean(panel, profile.field)?;

    let substituted = overlay::apply_alternative(panel, overlay_table, &config.distinguished, policy)?;
    let view = RankedView {
        average: baseline_average,
        ..RankedView::new(&substituted, profile.field)?
    };
    let highlights = config.highlights();
    let palette = &config.palette;

    let mut data = vec![
        Series::bar(
            profile.label.clone(),
            view.names(),
            view.values(profile.field),
            view.colors(&highlights, &palette.bar),
        ),
        Series::reference_line(
            profile.label.clone(),
            view.anchors.names(&view.rows),
            view.average,
            format!("OECD Average {}", profile.label),
            &palette.reference_line,
        ),
    ];

    if policy != AlternativePolicy::CurrentLaw {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for entity in &config.distinguished {
            let idx = select::find_by_name(&view.rows, &entity.display_name)?;
            x.push(Datum::from(entity.display_name.as_str()));
            y.push(Datum::from(
                view.rows[idx].rate(profile.field) + config.alternative.marker_offset,
            ));
        }
        let line_colors = config.distinguished.iter().map(|e| e.color.clone()).collect();
        data.push(
            Series::markers(
                "Alternative Policy",
                x,
                y,
                Marker {
                    color: None,
                    size: Some(8.0),
                    symbol: Some("asterisk".to_string()),
                    line: Some(MarkerLine {
                        color: ColorSpec::PerPoint(line_colors),
                        width: 1.0,
                    }),
                },
            )
            .with_hover(HoverText::Single(format!(
                "<b>This Estimate Includes:</b><br>{}",
                policy.included_policies()
            ))),
        );
    }

    let yaxis = Axis {
        zerolinecolor: Some(palette.dark_grid.clone()),
        range,
        ..Axis::percent(".1%", &palette.dark_grid)
    };
    let layout = Layout {
        showlegend: Some(false),
        yaxis: Some(yaxis),
        height: Some(config.layout.alternative_height),
        ..Layout::new(
            titled(
                &format!(
                    "{} in the OECD, Current Law, Proposals, and Alternative Policies",
                    profile.title
                ),
                &config.layout.hover_hint,
            ),
            &palette.grey_background,
        )
    };

    Ok(Composition {
        chart: ChartSpec { data, layout },
        table: view.rows,
    })
}

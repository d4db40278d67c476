//! Declarative chart description
//!
//! Field names follow Plotly's figure JSON so a `ChartSpec` serialised with
//! serde_json can be handed straight to a Plotly renderer.

use serde::Serialize;

/// A single x or y value
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
    /// Placeholder point used by legend-only series
    Null,
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Number(value)
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl Datum {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
}

/// How a scatter trace draws its points
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RenderMode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+text")]
    LinesText,
}

/// One colour for the whole series, or one per point
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorSpec {
    /// Colour of point `idx`
    pub fn at(&self, idx: usize) -> Option<&str> {
        match self {
            ColorSpec::Single(color) => Some(color),
            ColorSpec::PerPoint(colors) => colors.get(idx).map(String::as_str),
        }
    }
}

/// One hover template for the whole series, or one per point
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum HoverText {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerLine {
    pub color: ColorSpec,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<MarkerLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub dash: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoverLabel {
    pub bgcolor: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<RenderMode>,
    pub name: String,
    pub x: Vec<Datum>,
    pub y: Vec<Datum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<HoverText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverlabel: Option<HoverLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
}

impl Series {
    fn empty(kind: TraceKind, mode: Option<RenderMode>, name: impl Into<String>) -> Self {
        Self {
            kind,
            mode,
            name: name.into(),
            x: Vec::new(),
            y: Vec::new(),
            marker: None,
            line: None,
            text: None,
            textposition: None,
            textfont: None,
            hovertemplate: None,
            hoverlabel: None,
            showlegend: None,
            legendgroup: None,
        }
    }

    pub fn bar(name: impl Into<String>, x: Vec<Datum>, y: Vec<Datum>, colors: Vec<String>) -> Self {
        Self {
            x,
            y,
            marker: Some(Marker {
                color: Some(ColorSpec::PerPoint(colors)),
                ..Marker::default()
            }),
            ..Self::empty(TraceKind::Bar, None, name)
        }
    }

    pub fn markers(name: impl Into<String>, x: Vec<Datum>, y: Vec<Datum>, marker: Marker) -> Self {
        Self {
            x,
            y,
            marker: Some(marker),
            ..Self::empty(TraceKind::Scatter, Some(RenderMode::Markers), name)
        }
    }

    /// Flat dashed line at `level` through the three anchor categories,
    /// labelled once at the middle anchor
    pub fn reference_line(
        name: impl Into<String>,
        anchors: [String; 3],
        level: f64,
        label: impl Into<String>,
        color: &str,
    ) -> Self {
        Self {
            x: anchors.into_iter().map(Datum::Text).collect(),
            y: vec![Datum::Number(level); 3],
            text: Some(vec![String::new(), label.into(), String::new()]),
            textposition: Some("top center".to_string()),
            textfont: Some(Font { color: color.to_string() }),
            line: Some(LineStyle {
                color: color.to_string(),
                dash: "dash".to_string(),
            }),
            hovertemplate: Some(HoverText::Single("(OECD Average, %{y})".to_string())),
            hoverlabel: Some(HoverLabel { bgcolor: color.to_string() }),
            ..Self::empty(TraceKind::Scatter, Some(RenderMode::LinesText), name)
        }
    }

    /// Series with a single null point, shown only as a legend entry
    pub fn legend_entry(name: impl Into<String>, color: &str, group: &str) -> Self {
        Self {
            x: vec![Datum::Null],
            y: vec![Datum::Null],
            marker: Some(Marker {
                color: Some(ColorSpec::Single(color.to_string())),
                size: Some(10.0),
                ..Marker::default()
            }),
            showlegend: Some(true),
            legendgroup: Some(group.to_string()),
            ..Self::empty(TraceKind::Scatter, Some(RenderMode::Markers), name)
        }
    }

    pub fn with_hover(mut self, hover: HoverText) -> Self {
        self.hovertemplate = Some(hover);
        self
    }

    pub fn with_showlegend(mut self, show: bool) -> Self {
        self.showlegend = Some(show);
        self
    }

    /// Per-point colours of the marker, if any
    pub fn point_colors(&self) -> Option<&ColorSpec> {
        self.marker.as_ref().and_then(|m| m.color.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zerolinecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
}

impl Axis {
    /// Percentage value axis with the given tick precision (".1%", ".0%")
    pub fn percent(tickformat: &str, gridcolor: &str) -> Self {
        Self {
            tickformat: Some(tickformat.to_string()),
            gridcolor: Some(gridcolor.to_string()),
            ..Self::default()
        }
    }

    /// Categorical axis, as used for asset-class names
    pub fn category(gridcolor: &str, linecolor: &str) -> Self {
        Self {
            gridcolor: Some(gridcolor.to_string()),
            linecolor: Some(linecolor.to_string()),
            axis_type: Some("category".to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Layout {
    pub fn new(title: impl Into<String>, background: &str) -> Self {
        Self {
            title: Title { text: title.into() },
            showlegend: None,
            xaxis: None,
            yaxis: None,
            paper_bgcolor: background.to_string(),
            plot_bgcolor: background.to_string(),
            height: None,
        }
    }
}

/// Fully specified figure: ordered series plus layout
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    pub data: Vec<Series>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.data.iter().find(|s| s.name == name)
    }
}

/// Title followed by the small italic hint line the dashboard puts under every chart
pub fn titled(title: &str, hint: &str) -> String {
    format!("{}<br><sup><i>{}</i></sup>", title, hint)
}

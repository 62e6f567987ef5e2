#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart description types.
//!
//! A [`Figure`] serializes to the JSON object accepted by `Plotly.react`:
//! field names follow the Plotly schema and unset options are omitted.
//! Only the attributes used by the dashboard panels are modelled.

pub mod controls;

use serde::{Deserialize, Serialize};

pub use controls::{AnimationSpeed, MapColor};

/// One value of a data array: a number, a label, or a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    /// Numeric value.
    Number(f64),
    /// Category label.
    Text(String),
    /// Missing value, rendered as a gap.
    Null,
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for Datum {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Plotly trace type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    #[default]
    Scatter,
    Bar,
    Pie,
    ScatterMapbox,
    ChoroplethMapbox,
}

/// Drawing mode of a scatter trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Trace visibility other than the default "shown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Hidden until its legend entry is clicked.
    LegendOnly,
}

/// Line styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Marker styling. Pies use `colors`, other traces `color`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Grid cell of a domain-based trace (pie).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub row: u32,
    pub column: u32,
}

/// A single data series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Traces sharing a stack group are stacked (area charts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    /// Per-point values referenced as `%{customdata[i]}` in hover
    /// templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<Vec<Datum>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Vec<f64>>,
    /// URL of the boundary collection for choropleth traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featureidkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<String>,
}

/// Font settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Figure title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    /// A plain title with default placement.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Title of an axis, legend or colorbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
}

/// Cartesian axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
}

impl Axis {
    /// An axis with only a title.
    #[must_use]
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Some(Text::new(text)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub r: f64,
    pub t: f64,
    pub l: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Map subplot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapbox {
    pub style: String,
    pub center: LatLon,
    pub zoom: f64,
}

/// Subplot grid for domain traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: u32,
    pub columns: u32,
}

/// Free text placed on the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub showarrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

/// A button of an update menu; `args` is passed verbatim to the
/// `method` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub method: String,
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: String,
    pub showactive: bool,
    pub buttons: Vec<MenuButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentValue {
    pub prefix: String,
}

/// Frame slider of an animated figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub active: usize,
    pub steps: Vec<SliderStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currentvalue: Option<CurrentValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: Text,
}

/// Shared continuous color scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    /// `(position, color)` stops from 0 to 1.
    pub colorscale: Vec<(f64, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
}

/// Figure layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updatemenus: Option<Vec<UpdateMenu>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sliders: Option<Vec<Slider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
}

/// Traces of one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
}

/// A complete chart description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

impl Figure {
    /// A figure with no traces and the given layout.
    #[must_use]
    pub fn empty(layout: Layout) -> Self {
        Self {
            data: Vec::new(),
            layout,
            frames: Vec::new(),
        }
    }

    /// Whether no trace carries any point.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|t| {
            t.x.as_ref().is_none_or(Vec::is_empty)
                && t.values.as_ref().is_none_or(Vec::is_empty)
                && t.lat.as_ref().is_none_or(Vec::is_empty)
                && t.z.as_ref().is_none_or(Vec::is_empty)
        })
    }

    /// Title text, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_ref().map(|t| t.text.as_str())
    }
}

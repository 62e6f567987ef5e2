#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed selection state and aggregate table types.
//!
//! A [`Selection`] maps column identifiers to a [`Restriction`]; it replaces
//! ad-hoc dictionaries with `"all"` sentinels. [`YearFilter`] is the single
//! "every year or one year" value read from the UI controls; a slider's
//! "all" position is mapped onto it with [`YearFilter::with_all_position`].
//! The remaining types are the rows of the
//! aggregate tables produced by the analytics crate and consumed by the
//! chart builders.

use std::collections::{BTreeMap, BTreeSet};

use dashbike_accident_models::{Column, Severity};
use serde::{Deserialize, Serialize};

/// Keyword accepted on the wire for "no restriction".
pub const ALL: &str = "all";

/// A scalar label as sent by UI controls: dropdown values may be numbers
/// (years) or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Label {
    Int(i64),
    Text(String),
}

impl Label {
    fn into_string(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RestrictionRepr {
    Keyword(String),
    Values(Vec<Label>),
}

/// Restriction applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RestrictionRepr", into = "RestrictionRepr")]
pub enum Restriction {
    /// Every value is accepted.
    #[default]
    Unrestricted,
    /// Only rows whose value is in the set are accepted. An empty set
    /// accepts nothing.
    OneOf(BTreeSet<String>),
}

impl Restriction {
    /// Builds a value-set restriction.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Whether `value` passes this restriction. Missing values pass only
    /// when unrestricted.
    #[must_use]
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::OneOf(values) => value.is_some_and(|v| values.contains(v)),
        }
    }
}

impl TryFrom<RestrictionRepr> for Restriction {
    type Error = String;

    fn try_from(repr: RestrictionRepr) -> Result<Self, Self::Error> {
        match repr {
            RestrictionRepr::Keyword(k) if k == ALL => Ok(Self::Unrestricted),
            RestrictionRepr::Keyword(k) => Ok(Self::OneOf(BTreeSet::from([k]))),
            RestrictionRepr::Values(values) => {
                Ok(Self::OneOf(values.into_iter().map(Label::into_string).collect()))
            }
        }
    }
}

impl From<Restriction> for RestrictionRepr {
    fn from(restriction: Restriction) -> Self {
        match restriction {
            Restriction::Unrestricted => Self::Keyword(ALL.to_string()),
            Restriction::OneOf(values) => {
                Self::Values(values.into_iter().map(Label::Text).collect())
            }
        }
    }
}

/// Per-column restrictions combined with AND semantics.
///
/// A column absent from the map is unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    constraints: BTreeMap<Column, Restriction>,
}

impl Selection {
    /// A selection that accepts every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the restriction on `column`.
    #[must_use]
    pub fn with(mut self, column: Column, restriction: Restriction) -> Self {
        self.constraints.insert(column, restriction);
        self
    }

    /// Restricts `column` to the given values.
    #[must_use]
    pub fn with_values<I, S>(self, column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(column, Restriction::one_of(values))
    }

    /// Iterates over the column restrictions in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &Restriction)> {
        self.constraints.iter().map(|(c, r)| (*c, r))
    }

    /// Iterates over the restrictions that actually narrow the rows.
    pub fn active(&self) -> impl Iterator<Item = (Column, &Restriction)> {
        self.iter()
            .filter(|(_, r)| !matches!(r, Restriction::Unrestricted))
    }

    /// Whether no restriction narrows the rows.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.active().next().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Number(i64),
    Keyword(String),
}

/// Year filter of a panel: every year, or a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "YearRepr", into = "YearRepr")]
pub enum YearFilter {
    /// No year restriction; the panel shows the yearly series.
    #[default]
    All,
    /// A single calendar year; the panel shows the monthly series.
    Year(i32),
}

impl TryFrom<YearRepr> for YearFilter {
    type Error = String;

    fn try_from(repr: YearRepr) -> Result<Self, Self::Error> {
        match repr {
            YearRepr::Number(n) => i32::try_from(n)
                .map(Self::Year)
                .map_err(|_| format!("year {n} out of range")),
            YearRepr::Keyword(k) if k == ALL => Ok(Self::All),
            YearRepr::Keyword(k) => k
                .trim()
                .parse::<i32>()
                .map(Self::Year)
                .map_err(|_| format!("invalid year '{k}': expected a year or \"all\"")),
        }
    }
}

impl From<YearFilter> for YearRepr {
    fn from(filter: YearFilter) -> Self {
        match filter {
            YearFilter::All => Self::Keyword(ALL.to_string()),
            YearFilter::Year(y) => Self::Number(i64::from(y)),
        }
    }
}

impl YearFilter {
    /// Maps the slider position standing for "every year" to [`Self::All`].
    #[must_use]
    pub const fn with_all_position(self, position: i32) -> Self {
        match self {
            Self::Year(y) if y == position => Self::All,
            other => other,
        }
    }

    /// Selection that restricts the year column accordingly.
    #[must_use]
    pub fn to_selection(self) -> Selection {
        match self {
            Self::All => Selection::new(),
            Self::Year(y) => Selection::new().with_values(Column::Year, [y.to_string()]),
        }
    }
}

/// Severity dropdown value: every class or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeverityChoice {
    #[default]
    All,
    Only(Severity),
}

impl TryFrom<String> for SeverityChoice {
    type Error = String;

    fn try_from(k: String) -> Result<Self, Self::Error> {
        if k == ALL {
            return Ok(Self::All);
        }
        k.parse::<Severity>()
            .map(Self::Only)
            .map_err(|_| format!("unknown severity class '{k}'"))
    }
}

impl From<SeverityChoice> for String {
    fn from(choice: SeverityChoice) -> Self {
        match choice {
            SeverityChoice::All => ALL.to_string(),
            SeverityChoice::Only(s) => s.to_string(),
        }
    }
}

/// Variable dropdown value: the overall total or a breakdown column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariableChoice {
    #[default]
    All,
    Column(Column),
}

impl TryFrom<String> for VariableChoice {
    type Error = String;

    fn try_from(k: String) -> Result<Self, Self::Error> {
        if k == ALL {
            return Ok(Self::All);
        }
        k.parse::<Column>()
            .map(Self::Column)
            .map_err(|_| format!("unknown column '{k}'"))
    }
}

impl From<VariableChoice> for String {
    fn from(choice: VariableChoice) -> Self {
        match choice {
            VariableChoice::All => ALL.to_string(),
            VariableChoice::Column(c) => c.to_string(),
        }
    }
}

/// Open numeric interval `(min, max)` taken from a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Exclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl AxisRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies strictly inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value > self.min && value < self.max
    }
}

/// Current zoom of a chart, one optional range per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisZoom {
    /// X-axis range, `None` when auto-ranged.
    pub x: Option<AxisRange>,
    /// Y-axis range, `None` when auto-ranged.
    pub y: Option<AxisRange>,
}

impl AxisZoom {
    /// Reads the axis ranges out of a chart relayout event.
    ///
    /// An `autosize` event resets both axes; `xaxis.autorange` or
    /// `yaxis.autorange` resets the corresponding axis. A range with a
    /// missing or non-numeric bound is ignored.
    #[must_use]
    pub fn from_relayout(event: &serde_json::Value) -> Self {
        let Some(event) = event.as_object() else {
            return Self::default();
        };
        if event.contains_key("autosize") {
            return Self::default();
        }

        let axis = |name: &str| -> Option<AxisRange> {
            if event.contains_key(&format!("{name}.autorange")) {
                return None;
            }
            let min = event.get(&format!("{name}.range[0]"))?.as_f64()?;
            let max = event.get(&format!("{name}.range[1]"))?.as_f64()?;
            Some(AxisRange::new(min, max))
        };

        Self {
            x: axis("xaxis"),
            y: axis("yaxis"),
        }
    }
}

/// Count of rows for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    /// Category label.
    pub key: String,
    /// Number of rows.
    pub count: u64,
}

/// Row counts grouped by a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTable {
    /// Grouping column.
    pub column: Column,
    /// One row per category of the column's domain.
    pub rows: Vec<GroupCount>,
}

impl CountTable {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Count of the given category, zero when absent.
    #[must_use]
    pub fn count_of(&self, key: &str) -> u64 {
        self.rows
            .iter()
            .find(|r| r.key == key)
            .map_or(0, |r| r.count)
    }
}

/// Count of rows for one pair of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCount {
    /// Category of the first grouping column.
    pub first: String,
    /// Category of the second grouping column.
    pub second: String,
    /// Number of rows.
    pub count: u64,
}

/// Row counts grouped by two columns, first column major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCountTable {
    /// First grouping column.
    pub first: Column,
    /// Second grouping column.
    pub second: Column,
    /// One row per combination of the two domains.
    pub rows: Vec<PairCount>,
}

impl PairCountTable {
    /// Distinct categories of the second column, in table order.
    #[must_use]
    pub fn second_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !keys.contains(&row.second.as_str()) {
                keys.push(&row.second);
            }
        }
        keys
    }

    /// Distinct categories of the first column, in table order.
    #[must_use]
    pub fn first_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !keys.contains(&row.first.as_str()) {
                keys.push(&row.first);
            }
        }
        keys
    }
}

/// Key figures for the most recent year in the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineFigures {
    /// Latest year present in the data.
    pub year: i32,
    /// Number of records that year.
    pub total: u64,
    /// Number of people killed that year.
    pub killed: u64,
    /// Killed as a percentage of the year's records, rounded.
    pub killed_share: f64,
    /// Number of people hospitalized that year.
    pub hospitalized: u64,
    /// Hospitalized as a percentage of the year's records, rounded.
    pub hospitalized_share: f64,
}

/// Additive decomposition of a monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decomposition {
    /// Period labels, e.g. `"2019-mars"`.
    pub labels: Vec<String>,
    /// Observed counts.
    pub observed: Vec<f64>,
    /// Centered moving average; `None` at the edges where the window does
    /// not fit.
    pub trend: Vec<Option<f64>>,
    /// Seasonal component, repeated every period.
    pub seasonal: Vec<f64>,
    /// Observed minus trend minus seasonal.
    pub residual: Vec<Option<f64>>,
}

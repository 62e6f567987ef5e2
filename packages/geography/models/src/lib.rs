#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Department and region reference types and aggregate rows.
//!
//! These types describe the French administrative geography used by the
//! choropleth views: which region a department belongs to, how many people
//! live there, and the per-area accident totals computed at load time.

pub mod regions;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Geographic aggregation level of a time series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum GeoLevel {
    /// Whole country, a single series.
    #[serde(rename = "nat")]
    #[strum(serialize = "nat")]
    National,
    /// One series per region.
    #[serde(rename = "reg")]
    #[strum(serialize = "reg")]
    Region,
    /// One series per department.
    #[serde(rename = "dep")]
    #[strum(serialize = "dep")]
    Department,
}

/// Level of the choropleth map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum MapLevel {
    #[serde(rename = "reg")]
    #[strum(serialize = "reg")]
    Region,
    #[serde(rename = "dep")]
    #[strum(serialize = "dep")]
    Department,
}

/// Value colored on the choropleth map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum Indicator {
    /// Raw accident count.
    #[serde(rename = "qte")]
    #[strum(serialize = "qte")]
    Count,
    /// Accidents per 1,000 inhabitants.
    #[serde(rename = "ratio")]
    #[strum(serialize = "ratio")]
    Ratio,
}

/// Granularity of the dashboard-wide zone filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ZoneLevel {
    /// No geographic restriction.
    #[default]
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    National,
    #[serde(rename = "reg")]
    #[strum(serialize = "reg")]
    Region,
    #[serde(rename = "dep")]
    #[strum(serialize = "dep")]
    Department,
}

/// A specific region or department chosen in the zone filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", content = "code", rename_all = "camelCase")]
pub enum Zone {
    /// Two-character region code.
    Region(String),
    /// Department code.
    Department(String),
}

/// A department as described by the commune/department/region reference
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRef {
    /// Department code.
    pub code: String,
    /// Department name.
    pub name: String,
    /// Two-character region code.
    pub region_code: String,
    /// Region name.
    pub region_name: String,
}

/// Population of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPopulation {
    /// Department code, zero-padded to two characters.
    pub code: String,
    /// Department name.
    pub name: String,
    /// Number of inhabitants.
    pub population: u64,
}

/// Accident totals of a department joined with its population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    /// Department code.
    pub code: String,
    /// Department name.
    pub name: String,
    /// Two-character region code.
    pub region_code: String,
    /// Region name.
    pub region_name: String,
    /// Number of accident records.
    pub accidents: u64,
    /// Population, `None` when the department has no population entry.
    pub population: Option<u64>,
    /// Accidents per 1,000 inhabitants, rounded to two decimals.
    pub ratio: Option<f64>,
}

/// Accident totals rolled up to a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    /// Two-character region code.
    pub code: String,
    /// Region name.
    pub name: String,
    /// Sum of department accident counts.
    pub accidents: u64,
    /// Sum of known department populations.
    pub population: u64,
    /// Mean of the department ratios, rounded to two decimals.
    pub ratio: Option<f64>,
}

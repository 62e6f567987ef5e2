#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the dashboard server.
//!
//! Figures, layouts and registry entries are serialized by the crates that
//! own them; these types cover the server's own endpoints.

use chrono::{DateTime, Utc};
use dashbike_chart_models::MapColor;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of accident records served.
    pub records: usize,
    /// When the dataset was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters of the page endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQueryParams {
    /// URL path to route. Defaults to `/`.
    pub path: Option<String>,
}

/// Distinct values of one column, in dropdown order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiColumnValues {
    /// Column identifier.
    pub column: String,
    /// Human-readable column name.
    pub title: String,
    /// Distinct values.
    pub values: Vec<String>,
}

/// A cached map selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSession {
    /// Session id (UUID v4).
    pub id: String,
    /// Number of rows in the selection.
    pub rows: usize,
    /// When the selection was cached.
    pub created_at: DateTime<Utc>,
}

/// Query parameters of the session map endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionMapParams {
    /// Point color column. Defaults to the severity.
    pub color: Option<MapColor>,
}

/// Summary of the loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDatasetSummary {
    /// Number of accident records.
    pub records: usize,
    /// First and last year present.
    pub years: Option<(i32, i32)>,
    /// Columns present in the accident file.
    pub columns: Vec<String>,
    /// Departments with at least one attributed accident.
    pub departments: usize,
    /// Departments with a population entry.
    pub departments_with_population: usize,
    /// Regions with at least one attributed accident.
    pub regions: usize,
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reactive update layer of the dashboard.
//!
//! Every panel of the UI is a named output driven by a fixed list of input
//! controls. The [`callbacks`] module holds the static registry of those
//! outputs and dispatches an [`UpdateRequest`] to the typed handler that
//! rebuilds the panel. Small UI state machines (reset button, sidebar,
//! submenus, zone picker) live in [`state`], and the page router with its
//! layout trees in [`pages`].
//!
//! Handlers only read the [`DataContext`](dashbike_dataset::DataContext);
//! a failed update is reported for that output alone.

pub mod callbacks;
pub mod pages;
pub mod state;

use dashbike_analytics::AnalyticsError;
use dashbike_dataset::DataContext;
use dashbike_geography_models::MapLevel;
use serde::{Deserialize, Serialize};

pub use callbacks::{CALLBACKS, Callback, OutputId, Update, UpdateRequest, update};
pub use pages::{LayoutNode, Page, PageContent, page_content};

/// Region boundaries used by the choropleth.
pub const REGIONS_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/gregoiredavid/france-geojson/master/regions.geojson";

/// Department boundaries, overseas departments included.
pub const DEPARTMENTS_GEOJSON_URL: &str = "https://raw.githubusercontent.com/gregoiredavid/france-geojson/master/departements-avec-outre-mer.geojson";

/// Errors raised while computing one output.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Filtering or aggregation failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    /// A chart click carried a label that is not a known category.
    #[error("Unknown selection label '{label}'")]
    UnknownSelectionLabel { label: String },
}

impl DashboardError {
    /// Whether the error stems from the request arguments rather than
    /// from the loaded data.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::UnknownSelectionLabel { .. } => true,
            Self::Analytics(e) => !matches!(e, AnalyticsError::InsufficientData { .. }),
        }
    }
}

/// Locations of the `GeoJSON` boundary collections referenced by the
/// choropleth figures. The files are fetched by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundaries {
    /// Region boundaries.
    pub regions_url: String,
    /// Department boundaries.
    pub departments_url: String,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            regions_url: REGIONS_GEOJSON_URL.to_string(),
            departments_url: DEPARTMENTS_GEOJSON_URL.to_string(),
        }
    }
}

impl Boundaries {
    /// Boundary collection for the given map level.
    #[must_use]
    pub fn url_for(&self, level: MapLevel) -> &str {
        match level {
            MapLevel::Region => &self.regions_url,
            MapLevel::Department => &self.departments_url,
        }
    }
}

/// Read-only inputs shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    /// Loaded dataset.
    pub ctx: &'a DataContext,
    /// Choropleth boundary locations.
    pub boundaries: &'a Boundaries,
}

impl<'a> Dashboard<'a> {
    #[must_use]
    pub const fn new(ctx: &'a DataContext, boundaries: &'a Boundaries) -> Self {
        Self { ctx, boundaries }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::{BTreeMap, BTreeSet};

    use dashbike_accident_models::{AccidentRecord, AgeGroup, Column, Month, Severity, Weekday};
    use dashbike_dataset::DataContext;
    use dashbike_geography_models::{DepartmentPopulation, DepartmentRef};

    pub fn record(year: i32, severity: Severity, age: u16, department: &str) -> AccidentRecord {
        AccidentRecord {
            year,
            month: Month::Juin,
            weekday: Weekday::Lundi,
            department: department.to_string(),
            department_name: None,
            region: None,
            region_name: None,
            latitude: Some(47.2),
            longitude: Some(-1.55),
            severity,
            age: Some(age),
            age_group: Some(AgeGroup::from_age(age)),
            sex: Some("M".to_string()),
            route_category: Some("Voie Communales".to_string()),
            obstacle: None,
            weather: Some("Normale".to_string()),
            intersection: Some("Hors intersection".to_string()),
            lighting: Some("Plein jour".to_string()),
            situation: Some("Sur chaussée".to_string()),
            trip: Some("Loisirs".to_string()),
            commune: Some("Nantes".to_string()),
            date: None,
            time: None,
        }
    }

    fn reference(code: &str, name: &str, region_code: &str, region_name: &str) -> DepartmentRef {
        DepartmentRef {
            code: code.to_string(),
            name: name.to_string(),
            region_code: region_code.to_string(),
            region_name: region_name.to_string(),
        }
    }

    pub fn context(records: Vec<AccidentRecord>) -> DataContext {
        let refs = [
            reference("44", "Loire-Atlantique", "52", "Pays de la Loire"),
            reference("35", "Ille-et-Vilaine", "53", "Bretagne"),
        ]
        .into_iter()
        .map(|r| (r.code.clone(), r))
        .collect::<BTreeMap<_, _>>();

        DataContext::from_parts(
            records,
            BTreeSet::from([
                Column::Year,
                Column::Month,
                Column::Weekday,
                Column::Department,
                Column::Severity,
                Column::AgeGroup,
                Column::Sex,
                Column::RouteCategory,
                Column::Obstacle,
                Column::Weather,
                Column::Intersection,
                Column::Lighting,
                Column::Situation,
                Column::Trip,
                Column::Commune,
            ]),
            vec![
                DepartmentPopulation {
                    code: "44".to_string(),
                    name: "Loire-Atlantique".to_string(),
                    population: 1_000,
                },
                DepartmentPopulation {
                    code: "35".to_string(),
                    name: "Ille-et-Vilaine".to_string(),
                    population: 2_000,
                },
            ],
            refs,
        )
    }

    /// Twelve rows over two years, two departments and several ages.
    pub fn sample() -> DataContext {
        context(vec![
            record(2020, Severity::Killed, 20, "44"),
            record(2020, Severity::Killed, 70, "44"),
            record(2020, Severity::Hospitalized, 20, "35"),
            record(2020, Severity::Hospitalized, 40, "35"),
            record(2020, Severity::LightlyInjured, 20, "44"),
            record(2020, Severity::Uninjured, 10, "44"),
            record(2021, Severity::Killed, 20, "44"),
            record(2021, Severity::Hospitalized, 20, "35"),
            record(2021, Severity::Hospitalized, 70, "35"),
            record(2021, Severity::LightlyInjured, 40, "44"),
            record(2021, Severity::Uninjured, 40, "35"),
            record(2021, Severity::Uninjured, 10, "35"),
        ])
    }
}

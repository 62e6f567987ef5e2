#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query layer over the accident table.
//!
//! Every function takes a [`dashbike_dataset::TableView`] and returns a
//! new view or an aggregate table; nothing here mutates the loaded data.
//! Chart builders and dashboard handlers compose these functions:
//! select rows, then aggregate, then optionally narrow the aggregate with
//! a zoom range.

pub mod aggregate;
pub mod headline;
pub mod range;
pub mod seasonal;
pub mod select;

use thiserror::Error;

pub use aggregate::{count_by, count_by_pair};
pub use headline::headline;
pub use range::RangeFilter;
pub use seasonal::{monthly_series, seasonal_decompose};
pub use select::{build_selection, select};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A filter or grouping refers to a column the table does not have.
    #[error("Unknown column '{column}'")]
    UnknownColumn {
        /// Column name as requested.
        column: String,
    },

    /// A range was supplied for an axis without naming its column.
    #[error("A {axis} range was given without a {axis} column")]
    MissingAxisColumn {
        /// `"x"` or `"y"`.
        axis: &'static str,
    },

    /// The lower bound of a range exceeds its upper bound.
    #[error("Invalid {axis} range: {min} > {max}")]
    InvalidRange {
        /// `"x"` or `"y"`.
        axis: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A range filter was requested on a categorical column.
    #[error("Column '{column}' is not numeric")]
    NonNumericColumn {
        /// Column name.
        column: String,
    },

    /// A time series is too short for the requested analysis.
    #[error("Series of {actual} points is too short: at least {required} are needed")]
    InsufficientData {
        /// Minimum length.
        required: usize,
        /// Actual length.
        actual: usize,
    },
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeSet;

    use dashbike_accident_models::{AccidentRecord, AgeGroup, Column, Month, Severity, Weekday};
    use dashbike_dataset::AccidentTable;

    pub fn record(year: i32, month: Month, severity: Severity) -> AccidentRecord {
        AccidentRecord {
            year,
            month,
            weekday: Weekday::Mercredi,
            department: "35".to_string(),
            department_name: Some("Ille-et-Vilaine".to_string()),
            region: Some("53".to_string()),
            region_name: Some("Bretagne".to_string()),
            latitude: Some(48.11),
            longitude: Some(-1.68),
            severity,
            age: Some(40),
            age_group: Some(AgeGroup::Adult),
            sex: Some("F".to_string()),
            route_category: None,
            obstacle: None,
            weather: None,
            intersection: None,
            lighting: None,
            situation: None,
            trip: None,
            commune: Some("Rennes".to_string()),
            date: None,
            time: None,
        }
    }

    pub fn columns() -> BTreeSet<Column> {
        BTreeSet::from([
            Column::Year,
            Column::Month,
            Column::Weekday,
            Column::Department,
            Column::DepartmentName,
            Column::Region,
            Column::RegionName,
            Column::Severity,
            Column::AgeGroup,
            Column::Sex,
            Column::Commune,
        ])
    }

    pub fn table(records: Vec<AccidentRecord>) -> AccidentTable {
        AccidentTable::new(records, columns())
    }
}

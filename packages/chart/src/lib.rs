#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart builders for every dashboard panel.
//!
//! Builders are pure: given the same view and parameters they return the
//! same [`Figure`]. An empty view yields a figure with the panel's layout
//! and no points rather than an error.

pub mod distribution;
pub mod maps;
pub mod palette;
pub mod series;

use dashbike_analytics_models::{PairCount, PairCountTable};
use dashbike_chart_models::{Font, Layout, Margin, Title};

pub use dashbike_chart_models::Figure;
pub use distribution::{bar, density, severity_age_pie};
pub use maps::{accident_map, choropleth};
pub use series::{monthly_animation, regional_series, seasonal_decomposition, yearly_trend};

/// Y-axis title shared by all count charts.
pub const COUNT_AXIS_TITLE: &str = "Nombre d'accidents";

/// Centered bold title used by the home page panels.
pub(crate) fn bold_title(text: &str, x: f64) -> Title {
    Title {
        text: format!("<b>{text}</b>"),
        x: Some(x),
        y: Some(0.98),
        xanchor: Some("center".to_string()),
        yanchor: Some("top".to_string()),
        font: Some(Font {
            size: Some(20.0),
            family: Some("Arial, sans-serif".to_string()),
            color: Some("black".to_string()),
        }),
    }
}

pub(crate) const fn tight_margin(top: f64) -> Margin {
    Margin {
        r: 0.0,
        t: top,
        l: 0.0,
        b: 0.0,
    }
}

/// Enables click selection on a layout.
pub(crate) fn selectable(layout: Layout) -> Layout {
    Layout {
        clickmode: Some("event+select".to_string()),
        hovermode: Some("closest".to_string()),
        ..layout
    }
}

pub(crate) fn hover(lines: &[&str]) -> String {
    lines.join("<br>")
}

/// Splits a pair table into one series per category of its second
/// column, keeping table order within and across series.
pub(crate) fn series_by_second(table: &PairCountTable) -> Vec<(&str, Vec<&PairCount>)> {
    let mut series: Vec<(&str, Vec<&PairCount>)> = table
        .second_keys()
        .into_iter()
        .map(|key| (key, Vec::new()))
        .collect();
    for row in &table.rows {
        if let Some((_, rows)) = series.iter_mut().find(|(key, _)| *key == row.second) {
            rows.push(row);
        }
    }
    series
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeSet;

    use dashbike_accident_models::{AccidentRecord, AgeGroup, Column, Month, Severity, Weekday};
    use dashbike_dataset::AccidentTable;

    pub struct Row {
        pub year: i32,
        pub month: Month,
        pub severity: Severity,
        pub age: u16,
        pub region: &'static str,
    }

    impl Row {
        pub const fn new(year: i32, month: Month, severity: Severity) -> Self {
            Self {
                year,
                month,
                severity,
                age: 30,
                region: "Bretagne",
            }
        }

        pub const fn age(mut self, age: u16) -> Self {
            self.age = age;
            self
        }

        pub const fn region(mut self, region: &'static str) -> Self {
            self.region = region;
            self
        }

        fn record(&self) -> AccidentRecord {
            AccidentRecord {
                year: self.year,
                month: self.month,
                weekday: Weekday::Samedi,
                department: if self.region == "Bretagne" { "35" } else { "75" }.to_string(),
                department_name: None,
                region: Some(if self.region == "Bretagne" { "53" } else { "11" }.to_string()),
                region_name: Some(self.region.to_string()),
                latitude: Some(48.1),
                longitude: Some(-1.6),
                severity: self.severity,
                age: Some(self.age),
                age_group: Some(AgeGroup::from_age(self.age)),
                sex: Some(if self.age % 2 == 0 { "M" } else { "F" }.to_string()),
                route_category: None,
                obstacle: None,
                weather: None,
                intersection: Some("Hors intersection".to_string()),
                lighting: Some("Plein jour".to_string()),
                situation: None,
                trip: Some("Loisirs".to_string()),
                commune: Some("Rennes".to_string()),
                date: None,
                time: None,
            }
        }
    }

    pub fn table(rows: &[Row]) -> AccidentTable {
        AccidentTable::new(
            rows.iter().map(Row::record).collect(),
            BTreeSet::from([
                Column::Year,
                Column::Month,
                Column::Weekday,
                Column::Department,
                Column::Region,
                Column::RegionName,
                Column::Severity,
                Column::AgeGroup,
                Column::Sex,
                Column::Intersection,
                Column::Lighting,
                Column::Trip,
                Column::Commune,
            ]),
        )
    }
}

//! Open-interval filtering driven by chart zoom.

use dashbike_accident_models::Column;
use dashbike_analytics_models::{AxisRange, AxisZoom, PairCountTable};
use dashbike_dataset::TableView;

use crate::AnalyticsError;

/// Name of the count column of an aggregate table.
pub const COUNT_COLUMN: &str = "count";

/// Optional x and y ranges, each bound to a named column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeFilter {
    /// Column filtered by `x_range`.
    pub x_column: Option<String>,
    /// Open interval on the x column.
    pub x_range: Option<AxisRange>,
    /// Column filtered by `y_range`.
    pub y_column: Option<String>,
    /// Open interval on the y column.
    pub y_range: Option<AxisRange>,
}

enum PairField {
    First,
    Second,
    Count,
}

impl RangeFilter {
    /// Binds a chart zoom to the columns plotted on each axis.
    #[must_use]
    pub fn from_zoom(x_column: &str, y_column: &str, zoom: AxisZoom) -> Self {
        Self {
            x_column: Some(x_column.to_string()),
            x_range: zoom.x,
            y_column: Some(y_column.to_string()),
            y_range: zoom.y,
        }
    }

    /// Whether neither axis carries a range.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.x_range.is_none() && self.y_range.is_none()
    }

    fn axes(&self) -> Result<Vec<(&str, AxisRange)>, AnalyticsError> {
        let mut axes = Vec::with_capacity(2);
        for (axis, column, range) in [
            ("x", self.x_column.as_deref(), self.x_range),
            ("y", self.y_column.as_deref(), self.y_range),
        ] {
            let Some(range) = range else { continue };
            let Some(column) = column else {
                return Err(AnalyticsError::MissingAxisColumn { axis });
            };
            if range.min > range.max {
                return Err(AnalyticsError::InvalidRange {
                    axis,
                    min: range.min,
                    max: range.max,
                });
            }
            axes.push((column, range));
        }
        Ok(axes)
    }

    /// Keeps the rows of a pair count table whose values lie strictly
    /// inside every given range. The count column is named
    /// [`COUNT_COLUMN`]; the two grouping columns by their identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error for a range without a column, an inverted range,
    /// a column the table does not have, or a categorical grouping column.
    pub fn apply_to_pairs(&self, table: &PairCountTable) -> Result<PairCountTable, AnalyticsError> {
        let axes = self
            .axes()?
            .into_iter()
            .map(|(name, range)| -> Result<(PairField, AxisRange), AnalyticsError> {
                let field = if name == COUNT_COLUMN {
                    PairField::Count
                } else if name == table.first.as_ref() {
                    numeric(table.first)?;
                    PairField::First
                } else if name == table.second.as_ref() {
                    numeric(table.second)?;
                    PairField::Second
                } else {
                    return Err(AnalyticsError::UnknownColumn {
                        column: name.to_string(),
                    });
                };
                Ok((field, range))
            })
            .collect::<Result<Vec<_>, _>>()?;

        #[allow(clippy::cast_precision_loss)]
        let rows = table
            .rows
            .iter()
            .filter(|row| {
                axes.iter().all(|(field, range)| {
                    let value = match field {
                        PairField::Count => Some(row.count as f64),
                        PairField::First => row.first.parse::<f64>().ok(),
                        PairField::Second => row.second.parse::<f64>().ok(),
                    };
                    value.is_some_and(|v| range.contains(v))
                })
            })
            .cloned()
            .collect();

        Ok(PairCountTable {
            first: table.first,
            second: table.second,
            rows,
        })
    }

    /// Keeps the records whose numeric columns lie strictly inside every
    /// given range.
    ///
    /// # Errors
    ///
    /// Returns an error for a range without a column, an inverted range,
    /// an unknown column, or a categorical column.
    pub fn apply_to_view<'a>(&self, view: &TableView<'a>) -> Result<TableView<'a>, AnalyticsError> {
        let axes = self
            .axes()?
            .into_iter()
            .map(|(name, range)| -> Result<(Column, AxisRange), AnalyticsError> {
                let column = name
                    .parse::<Column>()
                    .ok()
                    .filter(|c| view.table().has_column(*c))
                    .ok_or_else(|| AnalyticsError::UnknownColumn {
                        column: name.to_string(),
                    })?;
                numeric(column)?;
                Ok((column, range))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if axes.is_empty() {
            return Ok(view.clone());
        }

        Ok(view.retain(|record| {
            axes.iter().all(|(column, range)| {
                record
                    .numeric(*column)
                    .is_some_and(|v| range.contains(v))
            })
        }))
    }
}

fn numeric(column: Column) -> Result<(), AnalyticsError> {
    if column.is_numeric() {
        Ok(())
    } else {
        Err(AnalyticsError::NonNumericColumn {
            column: column.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity};

    use super::*;
    use crate::count_by_pair;
    use crate::fixtures::{record, table};

    fn yearly() -> PairCountTable {
        let mut records = Vec::new();
        for (year, n) in [(2017, 3), (2018, 8), (2019, 5), (2020, 1)] {
            for _ in 0..n {
                records.push(record(year, Month::Mai, Severity::LightlyInjured));
            }
        }
        let table = table(records);
        count_by_pair(&table.view(), Column::Year, Column::RegionName).unwrap()
    }

    #[test]
    fn keeps_rows_strictly_inside() {
        let filter = RangeFilter {
            x_column: Some("an".to_string()),
            x_range: Some(AxisRange::new(2017.0, 2020.0)),
            y_column: Some(COUNT_COLUMN.to_string()),
            y_range: Some(AxisRange::new(2.0, 8.0)),
        };
        let filtered = filter.apply_to_pairs(&yearly()).unwrap();
        let years: Vec<&str> = filtered.rows.iter().map(|r| r.first.as_str()).collect();
        assert_eq!(years, vec!["2019"]);
    }

    #[test]
    fn open_filter_is_identity() {
        let table = yearly();
        assert!(RangeFilter::default().is_open());
        assert_eq!(RangeFilter::default().apply_to_pairs(&table).unwrap(), table);
    }

    #[test]
    fn range_without_column_is_rejected() {
        let filter = RangeFilter {
            x_range: Some(AxisRange::new(0.0, 1.0)),
            ..RangeFilter::default()
        };
        assert!(matches!(
            filter.apply_to_pairs(&yearly()),
            Err(AnalyticsError::MissingAxisColumn { axis: "x" })
        ));
    }

    #[test]
    fn inverted_and_categorical_ranges_are_rejected() {
        let inverted = RangeFilter::from_zoom(
            "an",
            COUNT_COLUMN,
            AxisZoom {
                x: Some(AxisRange::new(2020.0, 2010.0)),
                y: None,
            },
        );
        assert!(matches!(
            inverted.apply_to_pairs(&yearly()),
            Err(AnalyticsError::InvalidRange { .. })
        ));

        let categorical = RangeFilter {
            x_column: Some("region_name".to_string()),
            x_range: Some(AxisRange::new(0.0, 1.0)),
            ..RangeFilter::default()
        };
        assert!(matches!(
            categorical.apply_to_pairs(&yearly()),
            Err(AnalyticsError::NonNumericColumn { .. })
        ));

        let unknown = RangeFilter {
            y_column: Some("population".to_string()),
            y_range: Some(AxisRange::new(0.0, 1.0)),
            ..RangeFilter::default()
        };
        assert!(matches!(
            unknown.apply_to_pairs(&yearly()),
            Err(AnalyticsError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn filters_records_by_year() {
        let table = table(vec![
            record(2015, Month::Mai, Severity::Killed),
            record(2018, Month::Mai, Severity::Killed),
            record(2021, Month::Mai, Severity::Killed),
        ]);
        let filter = RangeFilter {
            x_column: Some("an".to_string()),
            x_range: Some(AxisRange::new(2015.0, 2021.0)),
            ..RangeFilter::default()
        };
        let view = filter.apply_to_view(&table.view()).unwrap();
        assert_eq!(view.indices(), &[1]);
    }
}

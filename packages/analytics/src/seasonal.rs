//! Additive seasonal decomposition of monthly accident counts.

use std::collections::BTreeMap;

use dashbike_accident_models::{Column, Month};
use dashbike_analytics_models::Decomposition;
use dashbike_dataset::TableView;

use crate::{AnalyticsError, count_by_pair};

/// Months per seasonal cycle.
pub const MONTHS_PER_YEAR: usize = 12;

/// Monthly counts in chronological order, labelled `"<year>-<month>"`.
///
/// The series spans every month from January of the first year to
/// December of the last year; months and whole years without records
/// count zero.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks the year
/// or month column.
#[allow(clippy::cast_precision_loss)]
pub fn monthly_series(view: &TableView<'_>) -> Result<(Vec<String>, Vec<f64>), AnalyticsError> {
    let table = count_by_pair(view, Column::Year, Column::Month)?;
    let counts: BTreeMap<(i32, &str), u64> = table
        .rows
        .iter()
        .filter_map(|row| Some(((row.first.parse().ok()?, row.second.as_str()), row.count)))
        .collect();

    let (Some(&(first, _)), Some(&(last, _))) = (counts.keys().next(), counts.keys().next_back())
    else {
        return Ok((Vec::new(), Vec::new()));
    };

    Ok((first..=last)
        .flat_map(|year| Month::all().iter().map(move |month| (year, month.as_ref())))
        .map(|(year, month)| {
            let count = counts.get(&(year, month)).copied().unwrap_or(0);
            (format!("{year}-{month}"), count as f64)
        })
        .unzip())
}

/// Splits `observed` into trend, seasonal and residual components.
///
/// The trend is a centered moving average over one period (a 2×`period`
/// average when the period is even) and is undefined for the first and
/// last `period / 2` points. The seasonal component is the mean detrended
/// value at each position of the cycle, shifted to average zero.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] unless the series covers
/// at least two full periods.
#[allow(clippy::cast_precision_loss)]
pub fn seasonal_decompose(
    labels: Vec<String>,
    observed: Vec<f64>,
    period: usize,
) -> Result<Decomposition, AnalyticsError> {
    let n = observed.len();
    let required = 2 * period.max(1);
    if period < 2 || n < required {
        return Err(AnalyticsError::InsufficientData {
            required,
            actual: n,
        });
    }

    let weights = moving_average_weights(period);
    let half = period / 2;

    let trend: Vec<Option<f64>> = (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &observed[i - half..=i + half];
            Some(window.iter().zip(&weights).map(|(x, w)| x * w).sum())
        })
        .collect();

    let mut sums = vec![0.0; period];
    let mut counts = vec![0_u32; period];
    for (i, (x, t)) in observed.iter().zip(&trend).enumerate() {
        if let Some(t) = t {
            sums[i % period] += x - t;
            counts[i % period] += 1;
        }
    }
    let averages: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c == 0 { 0.0 } else { s / f64::from(c) })
        .collect();
    let mean = averages.iter().sum::<f64>() / period as f64;

    let seasonal: Vec<f64> = (0..n).map(|i| averages[i % period] - mean).collect();

    let residual = observed
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((x, t), s)| t.map(|t| x - t - s))
        .collect();

    Ok(Decomposition {
        labels,
        observed,
        trend,
        seasonal,
        residual,
    })
}

/// Weights of a centered moving average spanning one period. Even periods
/// use `period + 1` weights with halved end points.
#[allow(clippy::cast_precision_loss)]
fn moving_average_weights(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        weights
    } else {
        vec![1.0 / p; period]
    }
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::Severity;

    use super::*;
    use crate::fixtures::{record, table};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn constant_series_has_flat_trend_and_no_seasonality() {
        let labels = (0..36).map(|i| i.to_string()).collect();
        let result = seasonal_decompose(labels, vec![10.0; 36], 12).unwrap();

        assert_eq!(result.trend[..6], [None; 6]);
        assert_eq!(result.trend[30..], [None; 6]);
        assert!(result.trend[6..30].iter().all(|t| t.is_some_and(|t| close(t, 10.0))));
        assert!(result.seasonal.iter().all(|s| close(*s, 0.0)));
        assert!(result.residual[6..30].iter().all(|r| r.is_some_and(|r| close(r, 0.0))));
    }

    #[test]
    fn recovers_pure_seasonal_pattern() {
        let pattern = [5.0, 3.0, 1.0, -1.0, -3.0, -5.0, -5.0, -3.0, -1.0, 1.0, 3.0, 5.0];
        let observed: Vec<f64> = (0..48).map(|i| 100.0 + pattern[i % 12]).collect();
        let labels = (0..48).map(|i| i.to_string()).collect();

        let result = seasonal_decompose(labels, observed, 12).unwrap();
        for (i, s) in result.seasonal.iter().enumerate() {
            assert!(close(*s, pattern[i % 12]), "position {i}: {s}");
        }
        assert!(close(result.seasonal.iter().take(12).sum::<f64>(), 0.0));
    }

    #[test]
    fn short_series_is_rejected() {
        let err = seasonal_decompose(vec![], vec![1.0; 20], 12).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InsufficientData {
                required: 24,
                actual: 20
            }
        ));
    }

    #[test]
    fn monthly_series_is_chronological() {
        let table = table(vec![
            record(2020, Month::Mars, Severity::Killed),
            record(2019, Month::Decembre, Severity::Killed),
            record(2019, Month::Decembre, Severity::Killed),
        ]);
        let (labels, values) = monthly_series(&table.view()).unwrap();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], "2019-janvier");
        assert_eq!(labels[11], "2019-décembre");
        assert!(close(values[11], 2.0));
        assert!(close(values[14], 1.0));
    }

    #[test]
    fn monthly_series_fills_years_without_records() {
        let table = table(vec![
            record(2017, Month::Janvier, Severity::Killed),
            record(2019, Month::Juillet, Severity::Killed),
        ]);
        let (labels, values) = monthly_series(&table.view()).unwrap();
        assert_eq!(labels.len(), 36);
        assert_eq!(labels[12], "2018-janvier");
        assert!(values[12..24].iter().all(|v| close(*v, 0.0)));
        assert!(close(values[0], 1.0));
        assert!(close(values[30], 1.0));
    }

    #[test]
    fn monthly_series_of_empty_table_is_empty() {
        let table = table(Vec::new());
        let (labels, values) = monthly_series(&table.view()).unwrap();
        assert!(labels.is_empty());
        assert!(values.is_empty());
    }
}

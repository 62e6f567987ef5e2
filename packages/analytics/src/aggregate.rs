//! Zero-filled group counts.
//!
//! Group rows follow the column's domain as computed by the loaded table,
//! so every declared category appears (with a zero count if needed) in
//! declared order, and charts never see holes or reordered legends.

use std::collections::HashMap;

use dashbike_accident_models::Column;
use dashbike_analytics_models::{CountTable, GroupCount, PairCount, PairCountTable};
use dashbike_dataset::TableView;

use crate::AnalyticsError;

fn ensure_column(view: &TableView<'_>, column: Column) -> Result<(), AnalyticsError> {
    if view.table().has_column(column) {
        Ok(())
    } else {
        Err(AnalyticsError::UnknownColumn {
            column: column.to_string(),
        })
    }
}

/// Counts rows per category of `column`.
///
/// Rows with a missing value are not counted.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks `column`.
pub fn count_by(view: &TableView<'_>, column: Column) -> Result<CountTable, AnalyticsError> {
    ensure_column(view, column)?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in view.iter() {
        if let Some(key) = record.key(column) {
            *counts.entry(key.into_owned()).or_default() += 1;
        }
    }

    let rows = view
        .table()
        .domain(column)
        .iter()
        .map(|key| GroupCount {
            key: key.clone(),
            count: counts.get(key).copied().unwrap_or(0),
        })
        .collect();

    Ok(CountTable { column, rows })
}

/// Counts rows per combination of `first` and `second`.
///
/// The result holds the full cross product of both domains with `first`
/// as the outer key.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks either
/// column.
pub fn count_by_pair(
    view: &TableView<'_>,
    first: Column,
    second: Column,
) -> Result<PairCountTable, AnalyticsError> {
    ensure_column(view, first)?;
    ensure_column(view, second)?;

    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    for record in view.iter() {
        if let (Some(a), Some(b)) = (record.key(first), record.key(second)) {
            *counts.entry((a.into_owned(), b.into_owned())).or_default() += 1;
        }
    }

    let table = view.table();
    let outer = table.domain(first);
    let inner = table.domain(second);

    let mut rows = Vec::with_capacity(outer.len() * inner.len());
    for a in outer {
        for b in inner {
            let count = counts.remove(&(a.clone(), b.clone())).unwrap_or(0);
            rows.push(PairCount {
                first: a.clone(),
                second: b.clone(),
                count,
            });
        }
    }

    Ok(PairCountTable {
        first,
        second,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity};

    use super::*;
    use crate::fixtures::{record, table};

    #[test]
    fn empty_view_yields_twelve_zero_months() {
        let table = table(vec![record(2020, Month::Mai, Severity::Killed)]);
        let empty = table.view_of(&[]);

        let months = count_by(&empty, Column::Month).unwrap();
        assert_eq!(months.rows.len(), 12);
        assert!(months.rows.iter().all(|r| r.count == 0));
        assert_eq!(months.rows[0].key, "janvier");
        assert_eq!(months.rows[11].key, "décembre");
    }

    #[test]
    fn declared_order_with_zero_rows() {
        let table = table(vec![
            record(2020, Month::Mai, Severity::Killed),
            record(2020, Month::Mai, Severity::Killed),
            record(2020, Month::Mai, Severity::Uninjured),
        ]);
        let counts = count_by(&table.view(), Column::Severity).unwrap();
        let keys: Vec<&str> = counts.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Indemne", "Blessé léger", "Blessé hospitalisé", "Tué"]
        );
        assert_eq!(counts.count_of("Tué"), 2);
        assert_eq!(counts.count_of("Blessé léger"), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn pairs_form_full_cross_product() {
        let table = table(vec![
            record(2019, Month::Mai, Severity::Killed),
            record(2021, Month::Juin, Severity::Uninjured),
        ]);
        let pairs = count_by_pair(&table.view(), Column::Year, Column::Severity).unwrap();
        assert_eq!(pairs.rows.len(), 2 * 4);
        assert_eq!(pairs.first_keys(), vec!["2019", "2021"]);
        assert_eq!(pairs.rows[0].first, "2019");
        assert_eq!(pairs.rows[3].second, "Tué");
        assert_eq!(pairs.rows[3].count, 1);
        assert_eq!(pairs.rows.iter().map(|r| r.count).sum::<u64>(), 2);
    }

    #[test]
    fn grouping_by_absent_column_fails() {
        let table = table(vec![record(2019, Month::Mai, Severity::Killed)]);
        assert!(count_by(&table.view(), Column::Trip).is_err());
        assert!(count_by_pair(&table.view(), Column::Year, Column::Obstacle).is_err());
    }
}

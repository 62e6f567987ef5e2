//! Key figures for the home page.

use dashbike_accident_models::Severity;
use dashbike_analytics_models::HeadlineFigures;
use dashbike_dataset::TableView;

#[allow(clippy::cast_precision_loss)]
fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64 * 100.0).round()
    }
}

/// Totals for the latest year present in `view`, or `None` when the view
/// is empty.
#[must_use]
pub fn headline(view: &TableView<'_>) -> Option<HeadlineFigures> {
    let year = view.iter().map(|r| r.year).max()?;

    let (mut total, mut killed, mut hospitalized) = (0_u64, 0_u64, 0_u64);
    for record in view.iter().filter(|r| r.year == year) {
        total += 1;
        match record.severity {
            Severity::Killed => killed += 1,
            Severity::Hospitalized => hospitalized += 1,
            Severity::Uninjured | Severity::LightlyInjured => {}
        }
    }

    Some(HeadlineFigures {
        year,
        total,
        killed,
        killed_share: share(killed, total),
        hospitalized,
        hospitalized_share: share(hospitalized, total),
    })
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::Month;

    use super::*;
    use crate::fixtures::{record, table};

    #[test]
    fn figures_use_latest_year() {
        let mut records = vec![record(2019, Month::Mai, Severity::Killed); 5];
        records.extend(vec![record(2021, Month::Mai, Severity::Killed); 1]);
        records.extend(vec![record(2021, Month::Mai, Severity::Hospitalized); 2]);
        records.extend(vec![record(2021, Month::Mai, Severity::LightlyInjured); 5]);
        let table = table(records);

        let figures = headline(&table.view()).unwrap();
        assert_eq!(figures.year, 2021);
        assert_eq!(figures.total, 8);
        assert_eq!(figures.killed, 1);
        assert!((figures.killed_share - 13.0).abs() < f64::EPSILON);
        assert_eq!(figures.hospitalized, 2);
        assert!((figures.hospitalized_share - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_view_has_no_figures() {
        let table = table(vec![]);
        assert_eq!(headline(&table.view()), None);
    }
}
